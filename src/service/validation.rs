//! Contact field validation.
//!
//! Rules are checked by category in priority order and the first failing
//! category is reported in full:
//! 1. `email`, `twitter_id`, `external_id` must not collide with another contact
//! 2. `name` must be non-empty
//! 3. at least one contact method must be non-empty

use serde::{Deserialize, Serialize};

use crate::models::{Contact, ContactId};
use crate::store::ContactStore;

pub const CODE_MISSING_FIELD: &str = "missing_field";
pub const CODE_EXISTING_FIELD_VALUE: &str = "existing_field_value";

/// A single offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

/// Validate `contact` against the rest of the store.
///
/// `own_id` excludes the contact's stored record from the uniqueness scan
/// (set on update, `None` on create).
pub fn validate_contact(
    contact: &Contact,
    own_id: Option<ContactId>,
    store: &ContactStore,
) -> Result<(), Vec<FieldError>> {
    let duplicates = find_duplicates(contact, own_id, store);
    if !duplicates.is_empty() {
        return Err(duplicates);
    }

    if contact.name.is_empty() {
        return Err(vec![FieldError::new(
            "name",
            "It should not be blank as this is a mandatory field",
            CODE_MISSING_FIELD,
        )]);
    }

    let methods = contact.contact_methods();
    if methods.iter().all(|(_, value)| value.is_empty()) {
        return Err(methods
            .iter()
            .map(|(field, _)| {
                FieldError::new(
                    *field,
                    "Please fill at least 1 of email, phone, mobile, twitter_id, external_id fields",
                    CODE_MISSING_FIELD,
                )
            })
            .collect());
    }

    Ok(())
}

fn find_duplicates(contact: &Contact, own_id: Option<ContactId>, store: &ContactStore) -> Vec<FieldError> {
    let mut errors = Vec::new();

    for (field, value) in contact.unique_fields() {
        if value.is_empty() {
            continue;
        }
        let taken = store
            .values()
            .filter(|other| Some(other.id) != own_id)
            .any(|other| {
                other
                    .unique_fields()
                    .iter()
                    .any(|(other_field, other_value)| *other_field == field && *other_value == value)
            });
        if taken {
            errors.push(FieldError::new(
                field,
                format!("It should be a unique value: {value} is already in use"),
                CODE_EXISTING_FIELD_VALUE,
            ));
        }
    }

    errors
}
