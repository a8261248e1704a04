//! Where warehouse geometry comes from.

use std::collections::BTreeMap;
use std::future::Future;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::PlannerError;
use crate::layout::WarehouseLayout;

/// A read-only supplier of stored warehouse geometry.
///
/// Loading is the only step of a planning request that may wait on I/O.
pub trait GeometrySource: Send + Sync {
    /// Loads the stored layout of one warehouse.
    ///
    /// # Errors
    /// * `PlannerError::WarehouseNotFound` if no warehouse has this id.
    /// * `PlannerError::Source` if the backing store fails.
    fn load_layout(
        &self,
        warehouse_id: i64,
    ) -> impl Future<Output = Result<WarehouseLayout, PlannerError>> + Send;
}

/// A geometry source kept in memory, keyed by warehouse id.
#[derive(Debug, Default)]
pub struct InMemoryGeometryStore {
    layouts: RwLock<BTreeMap<i64, WarehouseLayout>>,
}

impl InMemoryGeometryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `layout` under its own id, returning the layout it replaced.
    pub fn insert(&self, layout: WarehouseLayout) -> Option<WarehouseLayout> {
        debug!(warehouse_id = layout.id, "storing warehouse layout");
        self.layouts.write().insert(layout.id, layout)
    }

    /// Removes and returns the layout of `warehouse_id`.
    pub fn remove(&self, warehouse_id: i64) -> Option<WarehouseLayout> {
        self.layouts.write().remove(&warehouse_id)
    }

    /// Number of stored warehouses.
    pub fn len(&self) -> usize {
        self.layouts.read().len()
    }

    /// Returns `true` if no warehouse is stored.
    pub fn is_empty(&self) -> bool {
        self.layouts.read().is_empty()
    }
}

impl FromIterator<WarehouseLayout> for InMemoryGeometryStore {
    fn from_iter<I: IntoIterator<Item = WarehouseLayout>>(iter: I) -> Self {
        let layouts = iter.into_iter().map(|layout| (layout.id, layout)).collect();
        InMemoryGeometryStore {
            layouts: RwLock::new(layouts),
        }
    }
}

impl GeometrySource for InMemoryGeometryStore {
    async fn load_layout(&self, warehouse_id: i64) -> Result<WarehouseLayout, PlannerError> {
        self.layouts
            .read()
            .get(&warehouse_id)
            .cloned()
            .ok_or(PlannerError::WarehouseNotFound(warehouse_id))
    }
}
