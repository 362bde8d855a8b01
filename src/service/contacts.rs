//! Contact CRUD and search operations.

use std::time::Instant;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::RwLock;

use crate::config::{ContactsConfig, UpdateMissingPolicy};
use crate::models::{Contact, ContactId};
use crate::observability::metrics;
use crate::service::filter::{parse_filter_values, FilterOutcome, FilterResponse, ListQuery};
use crate::service::validation::validate_contact;
use crate::service::{ServiceError, ServiceResult};
use crate::store::ContactStore;

/// Lowest server-assigned contact ID.
pub const ID_MIN: ContactId = 100_000_000_000;
/// Highest server-assigned contact ID.
pub const ID_MAX: ContactId = 999_999_999_999;

/// Helpdesk timestamp format, e.g. `2024-03-01T12:00:00Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

struct Inner {
    store: ContactStore,
    rng: StdRng,
}

/// Contact operations over the shared store.
pub struct ContactService {
    inner: RwLock<Inner>,
    config: ContactsConfig,
}

impl ContactService {
    /// Create a service owning `store`.
    pub fn new(store: ContactStore, config: ContactsConfig) -> Self {
        Self::with_rng(store, config, StdRng::from_entropy())
    }

    /// Create a service with an explicit ID generator.
    pub fn with_rng(store: ContactStore, config: ContactsConfig, rng: StdRng) -> Self {
        metrics::record_store_size(store.len());
        Self {
            inner: RwLock::new(Inner { store, rng }),
            config,
        }
    }

    /// Number of stored contacts.
    pub async fn len(&self) -> usize {
        self.inner.read().await.store.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// All contacts matching the exact-match list filters, ordered by ID.
    pub async fn list(&self, query: &ListQuery) -> Vec<Contact> {
        let inner = self.inner.read().await;
        inner
            .store
            .values()
            .filter(|contact| query.matches(contact))
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: ContactId) -> Option<Contact> {
        self.inner.read().await.store.get(id).cloned()
    }

    /// Search by People ID using the informal `field:'value' OR ...` grammar.
    ///
    /// An empty query degrades to [`ContactService::list`].
    pub async fn filter(&self, query: &str, list_query: &ListQuery) -> FilterOutcome {
        if query.is_empty() {
            return FilterOutcome::All(self.list(list_query).await);
        }

        let accepted = parse_filter_values(query);
        let inner = self.inner.read().await;
        let results: Vec<Contact> = inner
            .store
            .values()
            .filter(|contact| {
                let matched = accepted.contains(&contact.people_id);
                tracing::trace!(contact.people_id = %contact.people_id, matched, "Checking people ID");
                matched
            })
            .cloned()
            .collect();

        FilterOutcome::Matched(FilterResponse {
            total: results.len(),
            results,
        })
    }

    /// Validate and insert a new contact under a freshly allocated ID.
    pub async fn add(&self, mut contact: Contact) -> ServiceResult<Contact> {
        let start = Instant::now();
        let mut inner = self.inner.write().await;

        validate_contact(&contact, None, &inner.store).map_err(|errors| {
            tracing::debug!(errors = errors.len(), "Rejected new contact");
            ServiceError::Validation(errors)
        })?;

        let id = self.allocate_id(&mut inner)?;
        let now = now_timestamp();
        contact.id = id;
        contact.created_at = now.clone();
        contact.updated_at = now;

        inner.store.insert(id, contact.clone());
        metrics::record_contact_event("created");
        metrics::record_store_size(inner.store.len());
        tracing::info!(contact.id = id, elapsed = ?start.elapsed(), "Contact created");

        Ok(contact)
    }

    /// Overlay `patch` onto the stored contact and re-validate.
    pub async fn update(&self, id: ContactId, patch: Contact) -> ServiceResult<Contact> {
        let mut inner = self.inner.write().await;

        let mut contact = match inner.store.get(id) {
            Some(existing) => existing.clone(),
            None => match self.config.update_missing {
                UpdateMissingPolicy::NotFound => return Err(ServiceError::NotFound(id)),
                UpdateMissingPolicy::Upsert => {
                    tracing::warn!(contact.id = id, "Updating unknown contact, starting from an empty record");
                    Contact {
                        id,
                        ..Default::default()
                    }
                }
            },
        };

        let changed = contact.merge_from(patch);

        validate_contact(&contact, Some(id), &inner.store).map_err(|errors| {
            tracing::debug!(contact.id = id, errors = errors.len(), "Rejected contact update");
            ServiceError::Validation(errors)
        })?;

        if changed {
            contact.updated_at = now_timestamp();
        }

        let inserted = inner.store.insert(id, contact.clone()).is_none();
        if changed || inserted {
            metrics::record_contact_event("updated");
            metrics::record_store_size(inner.store.len());
        }
        tracing::info!(contact.id = id, changed, "Contact updated");

        Ok(contact)
    }

    /// Remove a contact. Returns whether a record existed.
    pub async fn delete(&self, id: ContactId) -> bool {
        let mut inner = self.inner.write().await;
        let removed = inner.store.remove(id).is_some();

        if removed {
            metrics::record_contact_event("deleted");
            metrics::record_store_size(inner.store.len());
        }
        tracing::info!(contact.id = id, removed, "Contact deleted");

        removed
    }

    /// Draw IDs until one is free, giving up after `max_id_attempts`.
    fn allocate_id(&self, inner: &mut Inner) -> ServiceResult<ContactId> {
        let attempts = self.config.max_id_attempts;
        for attempt in 1..=attempts {
            let candidate = inner.rng.gen_range(ID_MIN..=ID_MAX);
            if !inner.store.contains(candidate) {
                return Ok(candidate);
            }
            tracing::debug!(candidate, attempt, "Contact ID collision, retrying");
        }

        tracing::error!(attempts, "Unable to allocate a unique contact ID");
        Err(ServiceError::IdSpaceExhausted { attempts })
    }
}

fn now_timestamp() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::validation::{CODE_EXISTING_FIELD_VALUE, CODE_MISSING_FIELD};

    fn seeded() -> ContactService {
        let store = ContactStore::from_seed(vec![
            Contact {
                id: 111111111111,
                name: "Ada".into(),
                email: "ada@example.com".into(),
                phone: "555-0100".into(),
                people_id: "abc123".into(),
                job_title: "Analyst".into(),
                ..Default::default()
            },
            Contact {
                id: 222222222222,
                name: "Grace".into(),
                mobile: "555-0200".into(),
                people_id: "xyz789".into(),
                ..Default::default()
            },
            Contact {
                id: 333333333333,
                name: "Linus".into(),
                email: "linus@example.com".into(),
                phone: "555-0100".into(),
                ..Default::default()
            },
        ]);
        ContactService::with_rng(store, ContactsConfig::default(), StdRng::seed_from_u64(7))
    }

    fn new_contact(name: &str, email: &str) -> Contact {
        Contact {
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_filters() {
        let service = seeded();

        assert_eq!(service.list(&ListQuery::default()).await.len(), 3);

        let by_phone = service
            .list(&ListQuery {
                phone: "555-0100".into(),
                ..Default::default()
            })
            .await;
        assert_eq!(by_phone.len(), 2);

        let by_phone_and_email = service
            .list(&ListQuery {
                phone: "555-0100".into(),
                email: "linus@example.com".into(),
                ..Default::default()
            })
            .await;
        assert_eq!(by_phone_and_email.len(), 1);
        assert_eq!(by_phone_and_email[0].name, "Linus");
    }

    #[tokio::test]
    async fn test_add_assigns_id_and_timestamps() {
        let service = seeded();
        let created = service.add(new_contact("Barbara", "barbara@example.com")).await.unwrap();

        assert!((ID_MIN..=ID_MAX).contains(&created.id));
        assert!(!created.created_at.is_empty());
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(service.get(created.id).await, Some(created));
        assert_eq!(service.len().await, 4);
    }

    #[tokio::test]
    async fn test_add_ignores_client_id() {
        let service = seeded();
        let mut contact = new_contact("Barbara", "barbara@example.com");
        contact.id = 111111111111;

        let created = service.add(contact).await.unwrap();
        assert_ne!(created.id, 111111111111);
        assert_eq!(service.get(111111111111).await.unwrap().name, "Ada");
    }

    #[tokio::test]
    async fn test_add_duplicate_email_rejected() {
        let service = seeded();
        let err = service.add(new_contact("Imposter", "ada@example.com")).await.unwrap_err();

        match err {
            ServiceError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "email");
                assert_eq!(errors[0].code, CODE_EXISTING_FIELD_VALUE);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(service.len().await, 3);
    }

    #[tokio::test]
    async fn test_add_missing_name_not_inserted() {
        let service = seeded();
        let err = service.add(new_contact("", "new@example.com")).await.unwrap_err();

        assert!(matches!(err, ServiceError::Validation(ref errors) if errors[0].code == CODE_MISSING_FIELD));
        assert_eq!(service.len().await, 3);
    }

    #[tokio::test]
    async fn test_id_allocation_is_bounded() {
        let config = ContactsConfig {
            max_id_attempts: 0,
            ..Default::default()
        };
        let service = ContactService::new(ContactStore::new(), config);

        let err = service.add(new_contact("Nobody", "nobody@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::IdSpaceExhausted { attempts: 0 }));
        assert!(service.is_empty().await);
    }

    #[tokio::test]
    async fn test_id_collision_redraws() {
        let taken = StdRng::seed_from_u64(7).gen_range(ID_MIN..=ID_MAX);
        let occupied = || {
            ContactStore::from_seed(vec![Contact {
                id: taken,
                name: "Occupant".into(),
                email: "occupant@example.com".into(),
                ..Default::default()
            }])
        };

        let service = ContactService::with_rng(occupied(), ContactsConfig::default(), StdRng::seed_from_u64(7));
        let created = service.add(new_contact("Barbara", "barbara@example.com")).await.unwrap();
        assert_ne!(created.id, taken);
        assert!((ID_MIN..=ID_MAX).contains(&created.id));
        assert_eq!(service.get(taken).await.unwrap().name, "Occupant");
        assert_eq!(service.len().await, 2);

        let config = ContactsConfig {
            max_id_attempts: 1,
            ..Default::default()
        };
        let service = ContactService::with_rng(occupied(), config, StdRng::seed_from_u64(7));
        let err = service.add(new_contact("Barbara", "barbara@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::IdSpaceExhausted { attempts: 1 }));
        assert_eq!(service.len().await, 1);
        assert_eq!(service.list(&ListQuery::default()).await[0].id, taken);
    }

    #[tokio::test]
    async fn test_update_partial_patch() {
        let service = seeded();
        let patch = Contact {
            phone: "555-0999".into(),
            ..Default::default()
        };

        let updated = service.update(111111111111, patch).await.unwrap();
        assert_eq!(updated.phone, "555-0999");
        assert_eq!(updated.name, "Ada");
        assert_eq!(updated.email, "ada@example.com");
        assert_eq!(updated.job_title, "Analyst");
        assert_eq!(updated.people_id, "abc123");
        assert!(!updated.updated_at.is_empty());
        assert_eq!(service.get(111111111111).await, Some(updated));
    }

    #[tokio::test]
    async fn test_update_without_changes_keeps_timestamp() {
        let service = seeded();
        let patch = Contact {
            name: "Ada".into(),
            ..Default::default()
        };

        let updated = service.update(111111111111, patch).await.unwrap();
        assert!(updated.updated_at.is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_collision_and_keeps_store() {
        let service = seeded();
        let patch = new_contact("", "ada@example.com");

        let err = service.update(333333333333, patch).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(service.get(333333333333).await.unwrap().email, "linus@example.com");
    }

    #[tokio::test]
    async fn test_update_missing_upserts_by_default() {
        let service = seeded();
        let updated = service.update(42, new_contact("Fresh", "fresh@example.com")).await.unwrap();

        assert_eq!(updated.id, 42);
        assert_eq!(service.get(42).await.unwrap().name, "Fresh");
    }

    #[tokio::test]
    async fn test_update_missing_not_found_policy() {
        let config = ContactsConfig {
            update_missing: UpdateMissingPolicy::NotFound,
            ..Default::default()
        };
        let service = ContactService::new(ContactStore::new(), config);

        let err = service.update(42, new_contact("Fresh", "fresh@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(42)));
        assert!(service.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_is_unconditional() {
        let service = seeded();
        assert!(service.delete(222222222222).await);
        assert!(!service.delete(222222222222).await);
        assert!(service.get(222222222222).await.is_none());
    }

    #[test]
    fn test_events_recorded_only_for_mutations() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

        ::metrics::with_local_recorder(&recorder, || {
            runtime.block_on(async {
                let service = seeded();
                assert!(!service.delete(555555555555).await);
                let unchanged = Contact {
                    name: "Ada".into(),
                    ..Default::default()
                };
                service.update(111111111111, unchanged).await.unwrap();
            })
        });
        assert!(!handle.render().contains("staledesk_contact_events_total"));

        ::metrics::with_local_recorder(&recorder, || {
            runtime.block_on(async {
                let service = seeded();
                assert!(service.delete(222222222222).await);
                let patch = Contact {
                    phone: "555-0999".into(),
                    ..Default::default()
                };
                service.update(111111111111, patch).await.unwrap();
            })
        });
        let rendered = handle.render();
        assert!(rendered.contains("staledesk_contact_events_total{event=\"deleted\"} 1"));
        assert!(rendered.contains("staledesk_contact_events_total{event=\"updated\"} 1"));
    }

    #[tokio::test]
    async fn test_filter_by_people_id() {
        let service = seeded();
        let outcome = service
            .filter("\"people_id:'abc123' OR people_id:'xyz789'\"", &ListQuery::default())
            .await;

        match outcome {
            FilterOutcome::Matched(response) => {
                assert_eq!(response.total, 2);
                let ids: Vec<_> = response.results.iter().map(|c| c.id).collect();
                assert_eq!(ids, vec![111111111111, 222222222222]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_filter_empty_query_lists_all() {
        let service = seeded();
        let outcome = service.filter("", &ListQuery::default()).await;
        assert_eq!(outcome, FilterOutcome::All(service.list(&ListQuery::default()).await));
    }

    #[tokio::test]
    async fn test_filter_without_matches() {
        let service = seeded();
        let outcome = service.filter("people_id:'nope'", &ListQuery::default()).await;
        assert_eq!(
            outcome,
            FilterOutcome::Matched(FilterResponse {
                total: 0,
                results: Vec::new()
            })
        );
    }
}
