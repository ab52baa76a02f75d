// Per-contact message history
// One JSON object under the history key maps contact id -> messages in append
// order. A contact missing from the map simply has no messages.

use log::{debug, info, warn};

use super::{ChatStore, StoreResult};
use crate::models::{ClearStats, Contact, History, Message};

impl ChatStore {
    pub fn load_history_map(&self) -> StoreResult<History> {
        Ok(self.read_json(&self.keys.history)?.unwrap_or_default())
    }

    /// Messages exchanged with `contact_id`, oldest first
    pub fn get_history(&self, contact_id: &str) -> StoreResult<Vec<Message>> {
        Ok(self.load_history_map()?.remove(contact_id).unwrap_or_default())
    }

    /// Append one message to a contact's history, creating the list if needed.
    ///
    /// A message whose id is already present is not stored again; returns
    /// false in that case.
    pub fn append_message(&self, contact_id: &str, message: &Message) -> StoreResult<bool> {
        let _guard = self.begin_update();
        let mut history = self.load_history_map()?;
        let messages = history.entry(contact_id.to_string()).or_default();
        if messages.iter().any(|m| m.id == message.id) {
            warn!("Message {} already stored for {}, skipping", message.id, contact_id);
            return Ok(false);
        }
        messages.push(message.clone());
        let total = messages.len();
        self.write_json(&self.keys.history, &history)?;
        debug!("Stored message {} for {} ({} total)", message.id, contact_id, total);
        Ok(true)
    }

    /// Append a message and refresh the contact's chat-list preview
    pub fn record_message(&self, contact_id: &str, message: &Message) -> StoreResult<bool> {
        if !self.append_message(contact_id, message)? {
            return Ok(false);
        }
        self.touch_last_message(contact_id, message)?;
        Ok(true)
    }

    /// Remove one contact's entry from the history map
    pub fn delete_contact_history(&self, contact_id: &str) -> StoreResult<()> {
        let _guard = self.begin_update();
        let Some(mut history) = self.read_json::<History>(&self.keys.history)? else {
            return Ok(());
        };
        if history.remove(contact_id).is_some() {
            self.write_json(&self.keys.history, &history)?;
        }
        Ok(())
    }

    /// Remove the whole history map
    pub fn clear_all_history(&self) -> StoreResult<()> {
        let _guard = self.begin_update();
        self.remove_key(&self.keys.history)
    }

    /// Give every contact without history one sample message built from its
    /// preview text. Returns how many contacts were seeded.
    pub fn seed_sample_history(&self, contacts: &[Contact]) -> StoreResult<usize> {
        let _guard = self.begin_update();
        let mut history = self.load_history_map()?;
        let mut seeded = 0;
        for contact in contacts {
            let messages = history.entry(contact.id.clone()).or_default();
            if messages.is_empty() {
                messages.push(Message::seed_sample(&contact.last_message));
                seeded += 1;
            }
        }
        if seeded > 0 {
            self.write_json(&self.keys.history, &history)?;
            info!("Seeded sample history for {} contacts", seeded);
        }
        Ok(seeded)
    }

    /// Totals shown before a bulk clear
    pub fn chat_stats(&self) -> StoreResult<ClearStats> {
        let contacts = self.list_contacts()?.len();
        let messages = self.load_history_map()?.values().map(Vec::len).sum();
        Ok(ClearStats { contacts, messages })
    }

    /// The superseded single-conversation message list
    pub fn legacy_messages(&self) -> StoreResult<Vec<Message>> {
        Ok(self.read_json(&self.keys.legacy_messages)?.unwrap_or_default())
    }

    pub fn clear_legacy_messages(&self) -> StoreResult<()> {
        let _guard = self.begin_update();
        self.remove_key(&self.keys.legacy_messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageBody, Sender};

    #[test]
    fn test_get_history_empty_for_unknown_contact() {
        let store = ChatStore::in_memory();
        assert!(store.get_history("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let store = ChatStore::in_memory();
        let texts = ["one", "two", "three"];
        for text in texts {
            store.append_message("a", &Message::text(Sender::User, text)).unwrap();
        }

        let stored: Vec<String> = store
            .get_history("a")
            .unwrap()
            .iter()
            .filter_map(|m| m.text_content().map(str::to_string))
            .collect();
        assert_eq!(stored, texts);
    }

    #[test]
    fn test_duplicate_id_not_stored_twice() {
        let store = ChatStore::in_memory();
        let message = Message::text(Sender::User, "hi");
        assert!(store.append_message("a", &message).unwrap());
        assert!(!store.append_message("a", &message).unwrap());
        assert_eq!(store.get_history("a").unwrap().len(), 1);

        // The same id may appear under a different contact
        assert!(store.append_message("b", &message).unwrap());
    }

    #[test]
    fn test_delete_contact_history_leaves_others() {
        let store = ChatStore::in_memory();
        store.append_message("a", &Message::text(Sender::User, "a1")).unwrap();
        store.append_message("b", &Message::text(Sender::User, "b1")).unwrap();

        store.delete_contact_history("a").unwrap();
        let map = store.load_history_map().unwrap();
        assert!(!map.contains_key("a"));
        assert_eq!(map["b"].len(), 1);

        // Deleting from an absent map is a no-op
        store.clear_all_history().unwrap();
        store.delete_contact_history("b").unwrap();
        assert!(store.load_history_map().unwrap().is_empty());
    }

    #[test]
    fn test_seed_sample_history_only_fills_empty() {
        let store = ChatStore::in_memory();
        let mut alice = Contact::new("a", "Alice", "");
        alice.last_message = "Morning, sleepyhead".to_string();
        let bob = Contact::new("b", "Bob", "");
        store.append_message("b", &Message::text(Sender::User, "existing")).unwrap();

        assert_eq!(store.seed_sample_history(&[alice, bob]).unwrap(), 1);

        let seeded = store.get_history("a").unwrap();
        assert_eq!(seeded.len(), 1);
        assert_eq!(seeded[0].sender, Sender::Contact);
        assert_eq!(seeded[0].time, "2 min ago");
        assert_eq!(seeded[0].body, MessageBody::Text { text: "Morning, sleepyhead".to_string() });
        assert_eq!(store.get_history("b").unwrap().len(), 1);
    }

    #[test]
    fn test_chat_stats_counts_all_messages() {
        let store = ChatStore::in_memory();
        store.save_contacts(&[Contact::new("a", "A", ""), Contact::new("b", "B", "")]).unwrap();
        store.append_message("a", &Message::text(Sender::User, "1")).unwrap();
        store.append_message("a", &Message::text(Sender::Contact, "2")).unwrap();
        store.append_message("b", &Message::text(Sender::User, "3")).unwrap();

        assert_eq!(store.chat_stats().unwrap(), ClearStats { contacts: 2, messages: 3 });
    }

    #[test]
    fn test_legacy_messages_read_and_clear() {
        let store = ChatStore::in_memory();
        assert!(store.legacy_messages().unwrap().is_empty());

        let legacy = r#"[{"id":"x1","text":"old","type":"text","sender":"user","timestamp":"2024-05-01T10:00:00.000Z","time":"10:00 AM"}]"#;
        store.write_raw("chatMessages", legacy).unwrap();
        let messages = store.legacy_messages().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text_content(), Some("old"));

        store.clear_legacy_messages().unwrap();
        assert!(store.legacy_messages().unwrap().is_empty());
    }
}
