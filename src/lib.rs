// Re-export modules for the binary and integration tests
pub mod config;
pub mod controller;
pub mod models;
pub mod seed;
pub mod simulator;
pub mod storage;

// Re-export main types for convenience
pub use controller::{ChatController, PageConfig};
pub use models::*;
pub use simulator::{MessageSimulator, ReplyRouting, SimulatorConfig, SimulatorEvent};
pub use storage::{ChatStore, StoreError, StoreResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_serializes_like_stored_json() {
        let message = Message::text(Sender::User, "hello");
        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["type"], "text");
        assert_eq!(value["text"], "hello");
        assert_eq!(value["sender"], "user");
        assert!(value.get("fileName").is_none());
        assert!(value["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_file_message_fields() {
        let message = Message::file(Sender::User, "notes.pdf", 1536, "application/pdf");
        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["type"], "file");
        assert_eq!(value["fileName"], "notes.pdf");
        assert_eq!(value["fileSize"], 1536);
        assert_eq!(value["fileType"], "application/pdf");
        assert!(value.get("text").is_none());
        assert_eq!(message.preview(), FILE_PREVIEW);
    }

    #[test]
    fn test_contact_reads_web_shaped_json() {
        let raw = r#"{
            "id": "calypso",
            "name": "Calypso",
            "profileImage": "../assets/calypso.jpg",
            "lastMessage": "Morning, sleepyhead",
            "lastMessageTime": "2 hours ago",
            "unreadCount": 3,
            "isOnline": true,
            "isBlocked": false,
            "isMuted": false
        }"#;
        let contact: Contact = serde_json::from_str(raw).unwrap();

        assert_eq!(contact.profile_image_ref, "../assets/calypso.jpg");
        assert_eq!(contact.unread_count, 3);
        assert_eq!(contact.show_online_status, None);

        let back = serde_json::to_value(&contact).unwrap();
        assert!(back.get("showOnlineStatus").is_none());
        assert_eq!(back["lastMessageTime"], "2 hours ago");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_file_size(1_288_490_189), "1.2 GB");
    }

    #[test]
    fn test_wallpaper_cycle_and_parse() {
        assert_eq!(Wallpaper::parse("green"), Wallpaper::Green);
        assert_eq!(Wallpaper::parse("unknown"), Wallpaper::Default);
        assert_eq!(Wallpaper::Green.next(), Wallpaper::Default);
        assert_eq!(Wallpaper::Default.next(), Wallpaper::Dark);
    }
}
