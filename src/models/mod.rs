//! Wire models shared by the store, the service and the HTTP layer.
//!
//! Field names follow the helpdesk JSON schema so responses can be consumed
//! by clients written against the real API.

pub mod contact;

pub use contact::{Contact, ContactAvatar, ContactCustomFields, ContactId, OtherCompany};
