//! In-memory contact storage.
//!
//! # Design Decisions
//! - Ordered by ID so listings are stable between requests
//! - Map key always equals the stored contact's `id`
//! - No locking here; `ContactService` serializes access

use std::collections::BTreeMap;

use crate::models::{Contact, ContactId};

/// Authoritative ID → contact mapping for the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct ContactStore {
    contacts: BTreeMap<ContactId, Contact>,
}

impl ContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from seed contacts. Later entries win on duplicate IDs.
    pub fn from_seed(seed: Vec<Contact>) -> Self {
        let mut store = Self::new();
        for contact in seed {
            tracing::trace!(
                contact.id = contact.id,
                contact.name = %contact.name,
                contact.email = %contact.email,
                contact.people_id = %contact.people_id,
                "Populating seed contact"
            );
            if let Some(previous) = store.insert(contact.id, contact) {
                tracing::warn!(contact.id = previous.id, "Duplicate seed contact ID, keeping the later record");
            }
        }
        store
    }

    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.get(&id)
    }

    pub fn contains(&self, id: ContactId) -> bool {
        self.contacts.contains_key(&id)
    }

    /// Store `contact` under `id`, returning the record it replaced.
    pub fn insert(&mut self, id: ContactId, mut contact: Contact) -> Option<Contact> {
        contact.id = id;
        self.contacts.insert(id, contact)
    }

    pub fn remove(&mut self, id: ContactId) -> Option<Contact> {
        self.contacts.remove(&id)
    }

    pub fn values(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.values()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}
