use intake_desk::config::{StoreBackend, StoreConfig};
use intake_desk::error::AppError;
use intake_desk::store::{DocumentStore, FirestoreStore, MemoryDocumentStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Resolve the configured backend into a shared store handle.
pub(crate) fn build_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, AppError> {
    match &config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryDocumentStore::default())),
        StoreBackend::Firestore(firestore) => Ok(Arc::new(FirestoreStore::new(
            firestore,
            config.request_timeout,
        )?)),
    }
}
