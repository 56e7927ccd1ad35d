use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use super::{Document, DocumentId, DocumentStore, SortDirection, StoreError};

/// In-process document store. Collections keep insertion order, which doubles as the
/// tie-breaker when listing.
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    sequence: AtomicU64,
    available: AtomicBool,
    writes: AtomicUsize,
    list_calls: AtomicUsize,
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
            sequence: AtomicU64::new(1),
            available: AtomicBool::new(true),
            writes: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
        }
    }
}

impl MemoryDocumentStore {
    /// Simulate the backing database going away (or coming back).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Successful `create` and `update_field` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .expect("store mutex poisoned")
            .get(collection)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn ensure_available(&self, failure: fn(String) -> StoreError) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(failure("document store unreachable".to_string()))
        }
    }

    fn next_id(&self) -> DocumentId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        DocumentId(format!("doc-{id:06}"))
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        collection: &str,
        fields: Map<String, Value>,
    ) -> Result<DocumentId, StoreError> {
        self.ensure_available(StoreError::Write)?;
        let id = self.next_id();
        self.collections
            .lock()
            .expect("store mutex poisoned")
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.clone(),
                fields,
            });
        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!(collection, %id, "memory store created document");
        Ok(id)
    }

    async fn list(
        &self,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Document>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.ensure_available(StoreError::Read)?;
        let mut documents = self
            .collections
            .lock()
            .expect("store mutex poisoned")
            .get(collection)
            .cloned()
            .unwrap_or_default();

        // `sort_by` is stable, so equal keys stay in insertion order in both directions.
        documents.sort_by(|left, right| {
            let ordering = compare_values(left.fields.get(order_by), right.fields.get(order_by));
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        Ok(documents)
    }

    async fn fetch(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<Document>, StoreError> {
        self.ensure_available(StoreError::Read)?;
        let guard = self.collections.lock().expect("store mutex poisoned");
        Ok(guard
            .get(collection)
            .and_then(|documents| documents.iter().find(|document| &document.id == id))
            .cloned())
    }

    async fn update_field(
        &self,
        collection: &str,
        id: &DocumentId,
        field: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        self.ensure_available(StoreError::Write)?;
        let mut guard = self.collections.lock().expect("store mutex poisoned");
        let document = guard
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|document| &document.id == id))
            .ok_or_else(|| StoreError::Write(format!("document {id} not found in {collection}")))?;
        document.fields.insert(field.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Cross-type ordering: missing/null < booleans < numbers < strings < everything else.
fn compare_values(left: Option<&Value>, right: Option<&Value>) -> CmpOrdering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) | Some(Value::Object(_)) => 4,
        }
    }

    match (left, right) {
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let a = a.as_f64().unwrap_or_default();
            let b = b.as_f64().unwrap_or_default();
            a.partial_cmp(&b).unwrap_or(CmpOrdering::Equal)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        _ => rank(left).cmp(&rank(right)),
    }
}
