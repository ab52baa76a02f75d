// Auto-reply simulation
//
// Every outgoing user message starts one reply instance:
//   Sent -> (pending delay) -> Typing -> (typing delay) -> reply stored -> Done
// Instances run as independent tokio tasks and may overlap. The UI learns
// about typing and replies through the event channel; only the final step
// touches the store.

use log::{debug, error, info};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

use crate::models::{Message, Sender};
use crate::storage::ChatStore;

/// Canned replies, picked uniformly with replacement
pub const RESPONSES: [&str; 15] = [
    "That's interesting!",
    "I see what you mean.",
    "Thanks for sharing that.",
    "Got it!",
    "That makes sense.",
    "I understand.",
    "Absolutely!",
    "Good point!",
    "I agree with you.",
    "Tell me more about that.",
    "How are you doing?",
    "That sounds great!",
    "I'm here if you need anything.",
    "What do you think about that?",
    "That's a good idea!",
];

/// Where a finished reply is filed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyRouting {
    /// File under the contact the user wrote to. Switching or closing the
    /// conversation cancels replies still in flight.
    #[default]
    PinToSender,
    /// File under whichever contact is selected when the reply lands, with no
    /// cancellation. A reply can end up in another contact's history.
    FollowSelection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub pending_delay_ms: Range<u64>,
    pub typing_delay_ms: Range<u64>,
    pub routing: ReplyRouting,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            pending_delay_ms: 1000..3000,
            typing_delay_ms: 2000..4000,
            routing: ReplyRouting::PinToSender,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimulatorEvent {
    /// Show a typing placeholder for this contact
    Typing { contact_id: String },
    /// Remove one typing placeholder for this contact
    TypingStopped { contact_id: String },
    /// The reply was stored under `contact_id`
    Replied { contact_id: String, message: Message },
    /// The instance ended without a reply (focus moved away, or nothing selected)
    Cancelled { contact_id: String },
}

fn uniform_delay(range: &Range<u64>) -> Duration {
    if range.start >= range.end {
        return Duration::from_millis(range.start);
    }
    Duration::from_millis(rand::thread_rng().gen_range(range.clone()))
}

pub fn random_response() -> &'static str {
    RESPONSES.choose(&mut rand::thread_rng()).copied().unwrap_or(RESPONSES[0])
}

/// Two-stage delayed reply scheduler.
///
/// The open conversation is published on a watch channel; each scheduled
/// instance remembers the focus generation it started under and, with
/// `PinToSender`, gives up as soon as that generation changes.
pub struct MessageSimulator {
    store: ChatStore,
    config: SimulatorConfig,
    events: mpsc::UnboundedSender<SimulatorEvent>,
    focus_tx: watch::Sender<Focus>,
}

#[derive(Debug, Clone, Default)]
struct Focus {
    generation: u64,
    contact_id: Option<String>,
    shut_down: bool,
}

impl MessageSimulator {
    /// Notifications never wait on the receiver, so replies keep landing
    /// even when nobody drains the returned channel.
    pub fn new(store: ChatStore, config: SimulatorConfig) -> (Self, mpsc::UnboundedReceiver<SimulatorEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let (focus_tx, _) = watch::channel(Focus::default());
        (
            MessageSimulator {
                store,
                config,
                events,
                focus_tx,
            },
            events_rx,
        )
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Record which conversation is open. Under `PinToSender` this cancels
    /// every reply that was scheduled for a different focus.
    pub fn set_focus(&self, contact_id: Option<&str>) {
        self.focus_tx.send_modify(|focus| {
            if focus.contact_id.as_deref() == contact_id {
                return;
            }
            focus.generation += 1;
            focus.contact_id = contact_id.map(str::to_string);
            debug!("Simulator focus is now {:?} (generation {})", focus.contact_id, focus.generation);
        });
    }

    /// Cancel all pending replies regardless of routing
    pub fn shutdown(&self) {
        self.focus_tx.send_modify(|focus| {
            focus.generation += 1;
            focus.contact_id = None;
            focus.shut_down = true;
        });
        info!("Simulator shut down, pending replies cancelled");
    }

    /// Start a reply instance for a message the user just sent to `contact_id`.
    /// Must be called from within a tokio runtime.
    pub fn schedule_reply(&self, contact_id: &str) -> tokio::task::JoinHandle<()> {
        let store = self.store.clone();
        let events = self.events.clone();
        let routing = self.config.routing;
        let pending = uniform_delay(&self.config.pending_delay_ms);
        let typing = uniform_delay(&self.config.typing_delay_ms);
        let response = random_response();
        let mut focus_rx = self.focus_tx.subscribe();
        let generation = focus_rx.borrow().generation;
        let contact_id = contact_id.to_string();

        debug!(
            "Scheduling reply for {} (pending {:?}, typing {:?})",
            contact_id, pending, typing
        );

        tokio::spawn(async move {
            let pinned = routing == ReplyRouting::PinToSender;

            if !wait_unless_refocused(pending, &mut focus_rx, generation, pinned).await {
                let _ = events.send(SimulatorEvent::Cancelled { contact_id });
                return;
            }
            let _ = events.send(SimulatorEvent::Typing { contact_id: contact_id.clone() });

            if !wait_unless_refocused(typing, &mut focus_rx, generation, pinned).await {
                let _ = events.send(SimulatorEvent::TypingStopped { contact_id: contact_id.clone() });
                let _ = events.send(SimulatorEvent::Cancelled { contact_id });
                return;
            }

            let target = match routing {
                ReplyRouting::PinToSender => Some(contact_id.clone()),
                // The persisted pointer is what every view writes when a
                // conversation is opened
                ReplyRouting::FollowSelection => match store.selected_contact() {
                    Ok(selected) => selected,
                    Err(e) => {
                        error!("Failed to read selected contact for reply: {}", e);
                        None
                    }
                },
            };

            // The reply is stored before anyone is told about it
            let outcome = match target {
                Some(target) => {
                    let reply = Message::text(Sender::Contact, response);
                    match store.record_message(&target, &reply) {
                        Ok(_) => {
                            if target != contact_id {
                                info!("Reply to {} was filed under {}", contact_id, target);
                            }
                            SimulatorEvent::Replied { contact_id: target, message: reply }
                        }
                        Err(e) => {
                            error!("Failed to store auto-reply for {}: {}", target, e);
                            SimulatorEvent::Cancelled { contact_id: contact_id.clone() }
                        }
                    }
                }
                None => {
                    info!("No contact selected when reply for {} landed, dropping it", contact_id);
                    SimulatorEvent::Cancelled { contact_id: contact_id.clone() }
                }
            };

            let _ = events.send(SimulatorEvent::TypingStopped { contact_id });
            let _ = events.send(outcome);
        })
    }
}

/// Sleep for `delay`. Returns false early on shutdown, or with `pinned` when
/// the focus generation moves past `generation`; true when the full delay ran.
async fn wait_unless_refocused(
    delay: Duration,
    focus_rx: &mut watch::Receiver<Focus>,
    generation: u64,
    pinned: bool,
) -> bool {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    loop {
        {
            let focus = focus_rx.borrow();
            if focus.shut_down || (pinned && focus.generation != generation) {
                return false;
            }
        }
        tokio::select! {
            _ = &mut sleep => return true,
            changed = focus_rx.changed() => {
                if changed.is_err() {
                    // Simulator dropped: nothing left to report to
                    return false;
                }
            }
        }
    }
}
