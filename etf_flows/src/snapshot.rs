//! Lock-free, read-mostly holder for the loaded dataset.
//!
//! Readers call [`SnapshotStore::current`] and get an `Arc<FlowDataset>`
//! they can keep for as long as a view computation needs it. Reloads build
//! a complete new dataset first and then swap the pointer, so a reader sees
//! either the old or the new snapshot, never a mix.
//!
//! Implementation notes:
//! - Uses `arc-swap` for atomic pointer swaps + cheap reads (no RwLock).
//! - The store is an ordinary value passed to whoever needs it; there is no
//!   process-wide instance.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use arc_swap::ArcSwap;

use crate::config::DashboardConfig;
use crate::errors::LoadError;
use crate::loader::{WorkbookSource, load};
use crate::models::dataset::FlowDataset;

#[derive(Debug)]
pub struct SnapshotStore {
    current: ArcSwap<FlowDataset>,
    generation: AtomicU64,
}

impl SnapshotStore {
    pub fn new(initial: FlowDataset) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
            generation: AtomicU64::new(0),
        }
    }

    /// Loads `source` and wraps the result in a new store.
    pub fn open(source: &WorkbookSource, cfg: &DashboardConfig) -> Result<Self, LoadError> {
        load(source, cfg).map(Self::new)
    }

    /// The current snapshot. One atomic load; no locking.
    pub fn current(&self) -> Arc<FlowDataset> {
        self.current.load_full()
    }

    /// Number of snapshots published since construction.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Atomically replaces the snapshot and returns the previous one.
    pub fn publish(&self, next: FlowDataset) -> Arc<FlowDataset> {
        let previous = self.current.swap(Arc::new(next));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::info!(generation, "published dataset snapshot");
        previous
    }

    /// Loads `source` and publishes it. On failure the current snapshot is
    /// left untouched and the error is returned.
    pub fn reload(
        &self,
        source: &WorkbookSource,
        cfg: &DashboardConfig,
    ) -> Result<Arc<FlowDataset>, LoadError> {
        match load(source, cfg) {
            Ok(next) => {
                self.publish(next);
                Ok(self.current())
            }
            Err(err) => {
                tracing::warn!(error = %err, "reload failed; keeping current snapshot");
                Err(err)
            }
        }
    }
}
