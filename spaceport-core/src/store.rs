//! Persistence seam for ships.

use std::sync::Arc;

use crate::domain::{NewShip, Ship, ShipOrder};
use crate::error::Result;
use crate::filter::ShipPredicate;

/// Storage backend executing queries and writes for the ship service.
#[cfg_attr(test, mockall::automock)]
pub trait ShipStore {
    /// Ships matching the predicate, ordered by `order` then id, paged.
    fn find_matching(
        &self,
        predicate: &ShipPredicate,
        order: ShipOrder,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Ship>>;
    /// Number of ships matching the predicate.
    fn count_matching(&self, predicate: &ShipPredicate) -> Result<u64>;
    /// Look up a ship by identifier.
    fn find_by_id(&self, id: i64) -> Result<Option<Ship>>;
    /// Persist a new ship and return it with its assigned identifier.
    fn insert(&self, ship: NewShip) -> Result<Ship>;
    /// Overwrite every field of an existing ship.
    fn update(&self, ship: &Ship) -> Result<Ship>;
    /// Remove a ship.
    fn delete(&self, ship: &Ship) -> Result<()>;
}

/// Shared, thread-safe store handle.
pub type SharedStore = Arc<dyn ShipStore + Send + Sync>;

impl<T: ShipStore + ?Sized> ShipStore for Arc<T> {
    fn find_matching(
        &self,
        predicate: &ShipPredicate,
        order: ShipOrder,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Ship>> {
        (**self).find_matching(predicate, order, limit, offset)
    }

    fn count_matching(&self, predicate: &ShipPredicate) -> Result<u64> {
        (**self).count_matching(predicate)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ship>> {
        (**self).find_by_id(id)
    }

    fn insert(&self, ship: NewShip) -> Result<Ship> {
        (**self).insert(ship)
    }

    fn update(&self, ship: &Ship) -> Result<Ship> {
        (**self).update(ship)
    }

    fn delete(&self, ship: &Ship) -> Result<()> {
        (**self).delete(ship)
    }
}
