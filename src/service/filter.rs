//! Query parsing for the contact search endpoint and list filters.
//!
//! Search queries use the informal grammar
//! `field:'value' OR field:'value' ...`. Only the values are extracted; the
//! field names are ignored and every value is matched against the contact's
//! People ID (`unique_external_id`).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::Contact;

/// Exact-match filters accepted by the list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub email: String,
    pub mobile: String,
    pub phone: String,
}

impl ListQuery {
    /// Whether `contact` satisfies every non-empty filter.
    pub fn matches(&self, contact: &Contact) -> bool {
        (self.email.is_empty() || contact.email == self.email)
            && (self.mobile.is_empty() || contact.mobile == self.mobile)
            && (self.phone.is_empty() || contact.phone == self.phone)
    }
}

/// Search endpoint response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterResponse {
    pub total: usize,
    pub results: Vec<Contact>,
}

/// Either the unfiltered listing (empty query) or the search envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterOutcome {
    All(Vec<Contact>),
    Matched(FilterResponse),
}

/// Extract the accepted values from a search query.
pub fn parse_filter_values(query: &str) -> BTreeSet<String> {
    let query = query.trim_matches('"');

    let values: BTreeSet<String> = query
        .split(" OR ")
        .filter_map(|statement| statement.split(':').nth(1))
        .map(|value| value.trim_matches('\''))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();

    tracing::debug!(query = %query, values.count = values.len(), values = ?values, "Filter query processed");
    values
}
