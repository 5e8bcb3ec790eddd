pub mod disk;
pub mod memory;

use crate::core::store::KeyValueStore;
use disk::DiskStore;
use memory::MemoryStore;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Opens the durable store at `path`, or an in-memory one if that fails.
///
/// Persistence problems never stop the dashboard; the session just won't
/// remember anything.
pub fn open_store(path: &Path) -> Arc<dyn KeyValueStore> {
    match DiskStore::open(path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, "Falling back to in-memory store");
            Arc::new(MemoryStore::new())
        }
    }
}
