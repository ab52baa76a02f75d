// Built-in conversation partners written on first launch

use once_cell::sync::Lazy;

use crate::models::Contact;

struct SeedContact {
    id: &'static str,
    name: &'static str,
    image: &'static str,
    last_message: &'static str,
    last_message_time: &'static str,
    unread_count: u32,
    is_online: bool,
}

const SEED: &[SeedContact] = &[
    SeedContact {
        id: "aeolus",
        name: "Aeolus",
        image: "assets/aeolus.jpg",
        last_message: "You dare summon me, Aeolus, Master of the Four Winds, for this... mortal trifle?",
        last_message_time: "2 min ago",
        unread_count: 2,
        is_online: true,
    },
    SeedContact {
        id: "eleanor",
        name: "Eleanor",
        image: "assets/Eleanor.jpg",
        last_message: "Sweetheart, have you eaten? You sound thin. I'm sending soup.",
        last_message_time: "5 min ago",
        unread_count: 0,
        is_online: true,
    },
    SeedContact {
        id: "dennis",
        name: "Dennis",
        image: "assets/dennis.jpg",
        last_message: "Hey buddy! Long time no see. So, how's the new job treating you?",
        last_message_time: "10 min ago",
        unread_count: 1,
        is_online: false,
    },
    SeedContact {
        id: "chloe",
        name: "Chloe",
        image: "assets/Chloe.jpg",
        last_message: "Oh, hi. Sorry to bother you. I was just... wondering.",
        last_message_time: "20 min ago",
        unread_count: 0,
        is_online: true,
    },
    SeedContact {
        id: "gary",
        name: "Gary",
        image: "assets/Gary.jpg",
        last_message: "So. Your mother says you're 'seeing someone.'",
        last_message_time: "1 hour ago",
        unread_count: 0,
        is_online: false,
    },
    SeedContact {
        id: "calypso",
        name: "Calypso",
        image: "assets/calypso.jpg",
        last_message: "Morning, sleepyhead",
        last_message_time: "2 hours ago",
        unread_count: 3,
        is_online: true,
    },
];

/// The default contact list, in display order
pub static DEFAULT_CONTACTS: Lazy<Vec<Contact>> = Lazy::new(|| {
    SEED.iter()
        .map(|seed| {
            let mut contact = Contact::new(seed.id, seed.name, seed.image);
            contact.last_message = seed.last_message.to_string();
            contact.last_message_time = seed.last_message_time.to_string();
            contact.unread_count = seed.unread_count;
            contact.is_online = seed.is_online;
            contact
        })
        .collect()
});

pub fn default_contacts() -> Vec<Contact> {
    DEFAULT_CONTACTS.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_ids_unique_and_ordered() {
        let contacts = default_contacts();
        let ids: HashSet<&str> = contacts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), contacts.len());
        assert_eq!(contacts[0].id, "aeolus");
        assert!(contacts.iter().any(|c| c.id == "dennis"));
        assert!(contacts.iter().all(|c| !c.is_blocked && !c.is_muted));
    }
}
