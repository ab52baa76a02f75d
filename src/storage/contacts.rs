// Contact list persistence
// The whole list is one JSON array under the contacts key; display order is
// insertion order.

use log::{debug, info};

use super::{ChatStore, StoreResult};
use crate::models::{Contact, Message};

impl ChatStore {
    /// All stored contacts, `[]` when nothing has been stored yet
    pub fn list_contacts(&self) -> StoreResult<Vec<Contact>> {
        Ok(self.read_json(&self.keys.contacts)?.unwrap_or_default())
    }

    /// Overwrite the entire contact list
    pub fn save_contacts(&self, contacts: &[Contact]) -> StoreResult<()> {
        let _guard = self.begin_update();
        self.write_json(&self.keys.contacts, contacts)
    }

    /// Write `defaults` if the stored list is empty. Returns true when seeded.
    pub fn seed_contacts_if_empty(&self, defaults: &[Contact]) -> StoreResult<bool> {
        let _guard = self.begin_update();
        if !self.list_contacts()?.is_empty() {
            return Ok(false);
        }
        self.write_json(&self.keys.contacts, defaults)?;
        info!("Seeded {} default contacts", defaults.len());
        Ok(true)
    }

    pub fn find_contact(&self, contact_id: &str) -> StoreResult<Option<Contact>> {
        Ok(self.list_contacts()?.into_iter().find(|c| c.id == contact_id))
    }

    /// Contacts shown in the chat list (blocked ones are hidden)
    pub fn visible_contacts(&self) -> StoreResult<Vec<Contact>> {
        Ok(self.list_contacts()?.into_iter().filter(|c| !c.is_blocked).collect())
    }

    /// Case-insensitive search over name and last message preview.
    /// A blank query returns the normal visible list.
    pub fn search_contacts(&self, query: &str) -> StoreResult<Vec<Contact>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.visible_contacts();
        }
        Ok(self.list_contacts()?.into_iter().filter(|c| c.matches(&query)).collect())
    }

    /// Flip the mute flag. Returns the new state, or None for an unknown id.
    pub fn toggle_mute(&self, contact_id: &str) -> StoreResult<Option<bool>> {
        self.update_contact(contact_id, |contact| {
            contact.is_muted = !contact.is_muted;
            contact.is_muted
        })
    }

    /// Remove a contact entry. Its history is left alone; see `delete_contact`.
    pub fn remove_contact(&self, contact_id: &str) -> StoreResult<bool> {
        let _guard = self.begin_update();
        let mut contacts = self.list_contacts()?;
        let before = contacts.len();
        contacts.retain(|c| c.id != contact_id);
        if contacts.len() == before {
            return Ok(false);
        }
        self.write_json(&self.keys.contacts, &contacts)?;
        Ok(true)
    }

    /// Add a contact at the end of the list. Returns false if the id is taken.
    pub fn add_contact(&self, contact: Contact) -> StoreResult<bool> {
        let _guard = self.begin_update();
        let mut contacts = self.list_contacts()?;
        if contacts.iter().any(|c| c.id == contact.id) {
            return Ok(false);
        }
        contacts.push(contact);
        self.write_json(&self.keys.contacts, &contacts)?;
        Ok(true)
    }

    /// Update the chat-list preview after a message was stored
    pub fn touch_last_message(&self, contact_id: &str, message: &Message) -> StoreResult<bool> {
        let preview = message.preview().to_string();
        Ok(self
            .update_contact(contact_id, move |contact| {
                contact.last_message = preview;
                contact.last_message_time = "now".to_string();
            })?
            .is_some())
    }

    pub fn reset_contact_preview(&self, contact_id: &str) -> StoreResult<bool> {
        Ok(self.update_contact(contact_id, Contact::reset_preview)?.is_some())
    }

    /// Reset every contact's preview; entries themselves are kept
    pub fn reset_all_previews(&self) -> StoreResult<usize> {
        let _guard = self.begin_update();
        let mut contacts = self.list_contacts()?;
        contacts.iter_mut().for_each(Contact::reset_preview);
        self.write_json(&self.keys.contacts, &contacts)?;
        Ok(contacts.len())
    }

    /// Record the online-status visibility on every stored contact
    pub fn set_contacts_online_visibility(&self, visible: bool) -> StoreResult<()> {
        let _guard = self.begin_update();
        let mut contacts = self.list_contacts()?;
        for contact in contacts.iter_mut() {
            contact.show_online_status = Some(visible);
        }
        self.write_json(&self.keys.contacts, &contacts)
    }

    fn update_contact<R>(&self, contact_id: &str, apply: impl FnOnce(&mut Contact) -> R) -> StoreResult<Option<R>> {
        let _guard = self.begin_update();
        let mut contacts = self.list_contacts()?;
        let Some(contact) = contacts.iter_mut().find(|c| c.id == contact_id) else {
            debug!("Ignoring update for unknown contact {}", contact_id);
            return Ok(None);
        };
        let result = apply(contact);
        self.write_json(&self.keys.contacts, &contacts)?;
        Ok(Some(result))
    }
}
