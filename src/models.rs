use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Placeholder preview shown for a contact once its history has been cleared
pub const NO_MESSAGES_PREVIEW: &str = "No messages yet";

/// Preview shown in the chat list when the latest message is an attachment
pub const FILE_PREVIEW: &str = "File attachment";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(rename = "profileImage")]
    pub profile_image_ref: String,
    pub last_message: String,
    pub last_message_time: String, // display string, not a real timestamp
    pub unread_count: u32,
    pub is_online: bool,
    pub is_blocked: bool,
    pub is_muted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_online_status: Option<bool>,
}

impl Contact {
    pub fn new(id: &str, name: &str, profile_image_ref: &str) -> Self {
        Contact {
            id: id.to_string(),
            name: name.to_string(),
            profile_image_ref: profile_image_ref.to_string(),
            last_message: NO_MESSAGES_PREVIEW.to_string(),
            last_message_time: String::new(),
            unread_count: 0,
            is_online: false,
            is_blocked: false,
            is_muted: false,
            show_online_status: None,
        }
    }

    /// Reset the chat-list preview after the conversation was cleared
    pub fn reset_preview(&mut self) {
        self.last_message = NO_MESSAGES_PREVIEW.to_string();
        self.last_message_time = String::new();
        self.unread_count = 0;
    }

    /// Case-insensitive match against the name and the last message preview.
    /// `query` is expected to be lowercase already.
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query) || self.last_message.to_lowercase().contains(query)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,    // Sent from this device
    Contact, // Fabricated by the auto-reply simulator or seeded
}

/// Message payload, tagged by the stored `type` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageBody {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    File {
        file_name: String,
        file_size: u64,
        file_type: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(flatten)]
    pub body: MessageBody,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub time: String,
}

impl Message {
    pub fn text(sender: Sender, text: &str) -> Self {
        Self::with_body(sender, MessageBody::Text { text: text.to_string() })
    }

    pub fn file(sender: Sender, file_name: &str, file_size: u64, file_type: &str) -> Self {
        Self::with_body(
            sender,
            MessageBody::File {
                file_name: file_name.to_string(),
                file_size,
                file_type: file_type.to_string(),
            },
        )
    }

    fn with_body(sender: Sender, body: MessageBody) -> Self {
        let now = Utc::now();
        Message {
            id: Uuid::new_v4().to_string(),
            body,
            sender,
            timestamp: now,
            time: display_time(now),
        }
    }

    /// The sample message seeded for a contact with no history yet
    pub fn seed_sample(text: &str) -> Self {
        let timestamp = Utc::now() - Duration::minutes(2);
        Message {
            id: Uuid::new_v4().to_string(),
            body: MessageBody::Text { text: text.to_string() },
            sender: Sender::Contact,
            timestamp,
            time: "2 min ago".to_string(),
        }
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Text { text } => Some(text),
            MessageBody::File { .. } => None,
        }
    }

    /// Text used for the contact's chat-list preview
    pub fn preview(&self) -> &str {
        self.text_content().unwrap_or(FILE_PREVIEW)
    }
}

/// Locale-style short time, e.g. "02:30 PM"
pub fn display_time(instant: DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format("%I:%M %p").to_string()
}

/// Contact id -> messages in append order
pub type History = HashMap<String, Vec<Message>>;

/// Totals reported before and after clearing all history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearStats {
    pub contacts: usize,
    pub messages: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wallpaper {
    #[default]
    Default,
    Dark,
    Blue,
    Green,
}

impl Wallpaper {
    pub const ALL: [Wallpaper; 4] = [Wallpaper::Default, Wallpaper::Dark, Wallpaper::Blue, Wallpaper::Green];

    pub fn as_str(&self) -> &'static str {
        match self {
            Wallpaper::Default => "default",
            Wallpaper::Dark => "dark",
            Wallpaper::Blue => "blue",
            Wallpaper::Green => "green",
        }
    }

    /// Unknown values fall back to `Default`
    pub fn parse(value: &str) -> Self {
        match value {
            "dark" => Wallpaper::Dark,
            "blue" => Wallpaper::Blue,
            "green" => Wallpaper::Green,
            _ => Wallpaper::Default,
        }
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|w| w == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Wallpaper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable attachment size: "0 Bytes", "1.5 KB", "2 MB"
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
