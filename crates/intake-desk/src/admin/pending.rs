use std::collections::HashSet;
use std::sync::Mutex;

use super::controller::ControllerError;
use crate::store::DocumentId;

/// Ids of records that have a status write on its way to the store.
///
/// Only one write per record may be pending at a time; a second claim on the same id fails with
/// [`ControllerError::InFlight`] until the first claim is dropped.
#[derive(Debug, Default)]
pub struct PendingWrites {
    ids: Mutex<HashSet<DocumentId>>,
}

impl PendingWrites {
    pub fn claim(&self, id: &DocumentId) -> Result<PendingWrite<'_>, ControllerError> {
        let mut ids = self.ids.lock().expect("pending writes mutex poisoned");
        if !ids.insert(id.clone()) {
            return Err(ControllerError::InFlight(id.clone()));
        }
        Ok(PendingWrite {
            owner: self,
            id: id.clone(),
        })
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.ids
            .lock()
            .expect("pending writes mutex poisoned")
            .contains(id)
    }
}

/// Releases its record when dropped, whether the write landed or not.
#[derive(Debug)]
pub struct PendingWrite<'a> {
    owner: &'a PendingWrites,
    id: DocumentId,
}

impl Drop for PendingWrite<'_> {
    fn drop(&mut self) {
        if let Ok(mut ids) = self.owner.ids.lock() {
            ids.remove(&self.id);
        }
    }
}
