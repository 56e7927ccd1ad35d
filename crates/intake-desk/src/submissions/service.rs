use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use super::domain::{
    BlogPost, ContactSubmission, InternshipApplication, Moderated, QuoteRequest, SubmissionKind,
    Submittable,
};
use super::error::{SubmissionError, ValidationError};
use super::status::StatusMachine;
use crate::clock::{Clock, SystemClock};
use crate::store::{Document, DocumentId, DocumentStore, SortDirection, StoreError};

const STATUS_FIELD: &str = "status";

/// Validates, persists, and reads back one kind of record.
pub struct SubmissionService<K, S: ?Sized> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    kind: PhantomData<fn() -> K>,
}

pub type QuoteService<S> = SubmissionService<QuoteRequest, S>;
pub type ContactService<S> = SubmissionService<ContactSubmission, S>;
pub type InternshipService<S> = SubmissionService<InternshipApplication, S>;
pub type BlogService<S> = SubmissionService<BlogPost, S>;

impl<K, S: ?Sized> Clone for SubmissionService<K, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            kind: PhantomData,
        }
    }
}

impl<K, S> SubmissionService<K, S>
where
    K: SubmissionKind,
    S: DocumentStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            kind: PhantomData,
        }
    }

    /// All records of the kind, newest first.
    pub async fn list(&self) -> Result<Vec<K>, SubmissionError> {
        let documents = self
            .store
            .list(K::COLLECTION, K::TIMESTAMP_FIELD, SortDirection::Descending)
            .await
            .inspect_err(|err| warn!(collection = K::COLLECTION, error = %err, "list failed"))?;

        documents
            .into_iter()
            .map(decode::<K>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(SubmissionError::from)
    }

    pub async fn get(&self, id: &DocumentId) -> Result<Option<K>, SubmissionError> {
        let document = self.store.fetch(K::COLLECTION, id).await?;
        Ok(document.map(decode::<K>).transpose()?)
    }
}

impl<K, S> SubmissionService<K, S>
where
    K: Submittable,
    S: DocumentStore + ?Sized,
{
    /// Normalize and persist a visitor's form. Nothing is written when validation fails.
    pub async fn submit(&self, form: K::Form) -> Result<DocumentId, SubmissionError> {
        let new = K::normalize(form, self.clock.now()).inspect_err(|err| {
            warn!(
                collection = K::COLLECTION,
                field = err.field(),
                "{} rejected: {err}",
                K::NAME
            )
        })?;

        let fields = match serde_json::to_value(&new) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) | Err(_) => {
                return Err(StoreError::Write(format!("{} payload is not a document", K::NAME)).into())
            }
        };

        let id = self
            .store
            .create(K::COLLECTION, fields)
            .await
            .inspect_err(|err| warn!(collection = K::COLLECTION, error = %err, "create failed"))?;

        info!(
            collection = K::COLLECTION,
            %id,
            backend = self.store.backend_tag(),
            "{} stored",
            K::NAME
        );
        Ok(id)
    }
}

impl<K, S> SubmissionService<K, S>
where
    K: Moderated,
    S: DocumentStore + ?Sized,
{
    /// Move a record to `next` if its state machine allows it, writing only the status field.
    pub async fn update_status(
        &self,
        id: &DocumentId,
        next: K::Status,
    ) -> Result<K::Status, SubmissionError> {
        let current = self
            .get(id)
            .await?
            .ok_or_else(|| {
                StoreError::Write(format!("{} {id} not found in {}", K::NAME, K::COLLECTION))
            })?
            .status();

        if !current.can_transition_to(next) {
            let error = ValidationError::InvalidTransition {
                from: current.label(),
                to: next.label(),
            };
            warn!(collection = K::COLLECTION, %id, "{error}");
            return Err(error.into());
        }

        self.store
            .update_field(
                K::COLLECTION,
                id,
                STATUS_FIELD,
                Value::String(next.label().to_string()),
            )
            .await
            .inspect_err(|err| {
                warn!(
                    collection = K::COLLECTION,
                    %id,
                    error = %err,
                    "status write failed"
                )
            })?;

        info!(
            collection = K::COLLECTION,
            %id,
            from = current.label(),
            to = next.label(),
            "status updated"
        );
        Ok(next)
    }

    /// Same as [`Self::update_status`] for a raw status label coming from a request.
    pub async fn update_status_label(
        &self,
        id: &DocumentId,
        raw: &str,
    ) -> Result<K::Status, SubmissionError> {
        let next = parse_status::<K::Status>(raw)?;
        self.update_status(id, next).await
    }
}

pub fn parse_status<T: StatusMachine>(raw: &str) -> Result<T, ValidationError> {
    T::parse(raw).ok_or_else(|| ValidationError::UnknownStatus {
        value: raw.to_string(),
    })
}

fn decode<K: SubmissionKind>(document: Document) -> Result<K, StoreError> {
    let Document { id, mut fields } = document;
    fields.insert("id".to_string(), Value::String(id.0.clone()));
    serde_json::from_value(Value::Object(fields)).map_err(|err| {
        StoreError::Read(format!(
            "{} {id} in {} is malformed: {err}",
            K::NAME,
            K::COLLECTION
        ))
    })
}
