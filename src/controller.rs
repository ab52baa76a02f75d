// Page controller
// One controller drives every view (landing, chat list, conversation); what
// differs between pages lives in `PageConfig`.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::models::{ClearStats, Contact, Message, Sender, Wallpaper};
use crate::seed;
use crate::simulator::{MessageSimulator, SimulatorConfig, SimulatorEvent};
use crate::storage::settings::WallpaperScope;
use crate::storage::{ChatStore, StoreResult};

/// Features a page turns on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub auto_reply: bool,
    pub attachments: bool,
    pub online_indicators: bool,
}

impl Default for Features {
    fn default() -> Self {
        Features {
            auto_reply: true,
            attachments: true,
            online_indicators: true,
        }
    }
}

/// Per-page configuration: seed data plus enabled features
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub seed_contacts: Vec<Contact>,
    pub features: Features,
    pub simulator: SimulatorConfig,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            seed_contacts: seed::default_contacts(),
            features: Features::default(),
            simulator: SimulatorConfig::default(),
        }
    }
}

/// Summary shown by the conversation menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatInfo {
    pub name: String,
    pub online: bool,
    pub muted: bool,
}

pub struct ChatController {
    store: ChatStore,
    config: PageConfig,
    simulator: MessageSimulator,
}

impl ChatController {
    /// Build a controller. The returned receiver carries typing and reply
    /// notifications for re-rendering.
    pub fn new(store: ChatStore, config: PageConfig) -> (Self, mpsc::UnboundedReceiver<SimulatorEvent>) {
        let (simulator, events) = MessageSimulator::new(store.clone(), config.simulator.clone());
        (ChatController { store, config, simulator }, events)
    }

    pub fn store(&self) -> &ChatStore {
        &self.store
    }

    pub fn features(&self) -> Features {
        self.config.features
    }

    /// First-load seeding: default contacts when the list is empty, and one
    /// sample message for each contact without history. Returns the list to render.
    pub fn load(&self) -> StoreResult<Vec<Contact>> {
        self.store.seed_contacts_if_empty(&self.config.seed_contacts)?;
        let contacts = self.store.list_contacts()?;
        self.store.seed_sample_history(&contacts)?;
        // Resume the conversation that was open last time
        let selected = self.store.selected_contact()?;
        self.simulator.set_focus(selected.as_deref());
        self.store.visible_contacts()
    }

    /// Landing-page behavior: wipe conversations so the list reseeds next load
    pub fn reset_for_fresh_start(&self) -> StoreResult<()> {
        self.simulator.set_focus(None);
        self.store.reset_for_fresh_start()
    }

    pub fn contacts(&self) -> StoreResult<Vec<Contact>> {
        self.store.visible_contacts()
    }

    pub fn search(&self, query: &str) -> StoreResult<Vec<Contact>> {
        self.store.search_contacts(query)
    }

    /// Make `contact_id` the open conversation and return its history
    pub fn open_contact(&self, contact_id: &str) -> StoreResult<Vec<Message>> {
        self.store.set_selected_contact(contact_id)?;
        self.simulator.set_focus(Some(contact_id));
        self.store.get_history(contact_id)
    }

    pub fn close_contact(&self) -> StoreResult<()> {
        self.store.clear_selected_contact()?;
        self.simulator.set_focus(None);
        Ok(())
    }

    pub fn current_contact(&self) -> StoreResult<Option<Contact>> {
        match self.store.selected_contact()? {
            Some(id) => self.store.find_contact(&id),
            None => Ok(None),
        }
    }

    pub fn current_history(&self) -> StoreResult<Vec<Message>> {
        match self.store.selected_contact()? {
            Some(id) => self.store.get_history(&id),
            None => Ok(Vec::new()),
        }
    }

    /// Send `text` to the open conversation.
    ///
    /// Blank input (or no open conversation) is a no-op returning `None`.
    /// Otherwise the message is stored immediately and, if enabled, an
    /// auto-reply is scheduled. Must run inside a tokio runtime.
    pub fn send_message(&self, text: &str) -> StoreResult<Option<Message>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let Some(contact_id) = self.store.selected_contact()? else {
            warn!("Dropping message typed with no conversation open");
            return Ok(None);
        };

        let message = Message::text(Sender::User, text);
        self.store.record_message(&contact_id, &message)?;
        if self.config.features.auto_reply {
            self.simulator.schedule_reply(&contact_id);
        }
        Ok(Some(message))
    }

    /// Store a file message for the open conversation. Attachments get no auto-reply.
    pub fn attach_file(&self, file_name: &str, file_size: u64, file_type: &str) -> StoreResult<Option<Message>> {
        if !self.config.features.attachments {
            return Ok(None);
        }
        let Some(contact_id) = self.store.selected_contact()? else {
            return Ok(None);
        };
        let message = Message::file(Sender::User, file_name, file_size, file_type);
        self.store.record_message(&contact_id, &message)?;
        info!("Attached {} ({} bytes) to conversation with {}", file_name, file_size, contact_id);
        Ok(Some(message))
    }

    /// Append a new conversation partner to the list. A previously deleted id
    /// comes back with no history. Returns false if the id is already listed.
    pub fn add_contact(&self, contact: Contact) -> StoreResult<bool> {
        let id = contact.id.clone();
        let added = self.store.add_contact(contact)?;
        if added {
            info!("Added conversation with {}", id);
        }
        Ok(added)
    }

    pub fn toggle_mute(&self, contact_id: &str) -> StoreResult<Option<bool>> {
        self.store.toggle_mute(contact_id)
    }

    /// Remove a conversation: the contact entry and its history key.
    /// Closes it first if it is the open one.
    pub fn delete_contact(&self, contact_id: &str) -> StoreResult<bool> {
        if self.store.selected_contact()?.as_deref() == Some(contact_id) {
            self.close_contact()?;
        }
        let removed = self.store.remove_contact(contact_id)?;
        self.store.delete_contact_history(contact_id)?;
        if removed {
            info!("Deleted conversation with {}", contact_id);
        }
        Ok(removed)
    }

    /// Clear only the open conversation's messages
    pub fn clear_current_chat(&self) -> StoreResult<bool> {
        let Some(contact_id) = self.store.selected_contact()? else {
            return Ok(false);
        };
        self.store.delete_contact_history(&contact_id)?;
        self.store.reset_contact_preview(&contact_id)?;
        info!("Cleared chat with {}", contact_id);
        Ok(true)
    }

    /// Totals shown in the clear-all confirmation
    pub fn chat_stats(&self) -> StoreResult<ClearStats> {
        self.store.chat_stats()
    }

    /// Remove every message and the selection; contacts stay with reset previews.
    /// Returns what was cleared.
    pub fn clear_all_history(&self) -> StoreResult<ClearStats> {
        let stats = self.store.chat_stats()?;
        self.store.clear_all_history()?;
        self.store.clear_legacy_messages()?;
        self.close_contact()?;
        self.store.reset_all_previews()?;
        info!("Cleared {} messages from {} conversations", stats.messages, stats.contacts);
        Ok(stats)
    }

    pub fn chat_info(&self, contact_id: &str) -> StoreResult<Option<ChatInfo>> {
        Ok(self.store.find_contact(contact_id)?.map(|c| ChatInfo {
            name: c.name,
            online: c.is_online,
            muted: c.is_muted,
        }))
    }

    pub fn dark_mode(&self) -> StoreResult<bool> {
        self.store.dark_mode()
    }

    pub fn set_dark_mode(&self, enabled: bool) -> StoreResult<()> {
        self.store.set_dark_mode(enabled)
    }

    /// Whether presence dots are shown; always false when the page disables them
    pub fn online_status_visible(&self) -> StoreResult<bool> {
        Ok(self.config.features.online_indicators && self.store.online_status_visible()?)
    }

    pub fn set_online_status_visible(&self, visible: bool) -> StoreResult<()> {
        self.store.set_online_status_visible(visible)
    }

    pub fn wallpaper(&self, scope: WallpaperScope) -> StoreResult<Wallpaper> {
        self.store.wallpaper(scope)
    }

    pub fn set_wallpaper(&self, scope: WallpaperScope, wallpaper: Wallpaper) -> StoreResult<()> {
        self.store.set_wallpaper(scope, wallpaper)
    }

    /// Stop all pending auto-replies
    pub fn shutdown(&self) {
        self.simulator.shutdown();
    }
}
