//! In-memory ship store.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::domain::{NewShip, Ship, ShipOrder};
use crate::error::{Result, ShipError};
use crate::filter::ShipPredicate;
use crate::store::ShipStore;

#[derive(Debug, Default)]
struct Fleet {
    ships: BTreeMap<i64, Ship>,
    last_id: i64,
}

/// Volatile store backed by a locked map. Identifiers start at 1.
#[derive(Debug, Default)]
pub struct MemoryShipStore {
    fleet: RwLock<Fleet>,
}

impl MemoryShipStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Fleet) -> T) -> Result<T> {
        let fleet = self
            .fleet
            .read()
            .map_err(|_| ShipError::store("ship store lock poisoned"))?;
        Ok(f(&fleet))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Fleet) -> Result<T>) -> Result<T> {
        let mut fleet = self
            .fleet
            .write()
            .map_err(|_| ShipError::store("ship store lock poisoned"))?;
        f(&mut fleet)
    }
}

fn compare(order: ShipOrder, left: &Ship, right: &Ship) -> Ordering {
    let primary = match order {
        ShipOrder::Id => Ordering::Equal,
        ShipOrder::Speed => left.speed.total_cmp(&right.speed),
        ShipOrder::CrewSize => left.crew_size.cmp(&right.crew_size),
        ShipOrder::Date => left.prod_date.cmp(&right.prod_date),
        ShipOrder::Rating => left.rating.total_cmp(&right.rating),
    };
    primary.then(left.id.cmp(&right.id))
}

impl ShipStore for MemoryShipStore {
    fn find_matching(
        &self,
        predicate: &ShipPredicate,
        order: ShipOrder,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Ship>> {
        let mut ships = self.read(|fleet| {
            fleet
                .ships
                .values()
                .filter(|ship| predicate.matches(ship))
                .cloned()
                .collect::<Vec<_>>()
        })?;
        ships.sort_by(|left, right| compare(order, left, right));
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(ships.into_iter().skip(offset).take(limit).collect())
    }

    fn count_matching(&self, predicate: &ShipPredicate) -> Result<u64> {
        self.read(|fleet| {
            fleet
                .ships
                .values()
                .filter(|ship| predicate.matches(ship))
                .count() as u64
        })
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ship>> {
        self.read(|fleet| fleet.ships.get(&id).cloned())
    }

    fn insert(&self, ship: NewShip) -> Result<Ship> {
        self.write(|fleet| {
            fleet.last_id += 1;
            let ship = ship.with_id(fleet.last_id);
            fleet.ships.insert(ship.id, ship.clone());
            Ok(ship)
        })
    }

    fn update(&self, ship: &Ship) -> Result<Ship> {
        self.write(|fleet| match fleet.ships.get_mut(&ship.id) {
            Some(stored) => {
                *stored = ship.clone();
                Ok(ship.clone())
            }
            None => Err(ShipError::NotFound(ship.id)),
        })
    }

    fn delete(&self, ship: &Ship) -> Result<()> {
        self.write(|fleet| {
            fleet
                .ships
                .remove(&ship.id)
                .map(|_| ())
                .ok_or(ShipError::NotFound(ship.id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShipType;
    use crate::filter::{ShipFilter, compose};
    use chrono::{TimeZone, Utc};

    fn new_ship(name: &str, speed: f64, crew_size: i32) -> NewShip {
        NewShip {
            name: name.to_string(),
            planet: "Venus".to_string(),
            ship_type: ShipType::Transport,
            prod_date: Utc.with_ymd_and_hms(2999, 1, 1, 0, 0, 0).unwrap(),
            is_used: false,
            speed,
            crew_size,
            rating: 1.0,
        }
    }

    #[test]
    fn insert_assigns_sequential_ids() {
        let store = MemoryShipStore::new();
        let first = store.insert(new_ship("A", 0.1, 1)).expect("insert");
        let second = store.insert(new_ship("B", 0.2, 2)).expect("insert");
        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(store.find_by_id(2).expect("find"), Some(second));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = MemoryShipStore::new();
        let first = store.insert(new_ship("A", 0.1, 1)).expect("insert");
        store.delete(&first).expect("delete");
        let second = store.insert(new_ship("B", 0.2, 2)).expect("insert");
        assert_eq!(second.id, 2);
        assert_eq!(store.find_by_id(1).expect("find"), None);
    }

    #[test]
    fn orders_then_pages() {
        let store = MemoryShipStore::new();
        for (name, speed, crew) in [("A", 0.3, 5), ("B", 0.1, 9), ("C", 0.2, 1), ("D", 0.1, 3)] {
            store.insert(new_ship(name, speed, crew)).expect("insert");
        }
        let everything = ShipPredicate::default();

        let by_speed = store
            .find_matching(&everything, ShipOrder::Speed, 10, 0)
            .expect("list");
        let names: Vec<_> = by_speed.iter().map(|ship| ship.name.as_str()).collect();
        assert_eq!(names, ["B", "D", "C", "A"]);

        let page = store
            .find_matching(&everything, ShipOrder::CrewSize, 2, 2)
            .expect("list");
        let names: Vec<_> = page.iter().map(|ship| ship.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn count_uses_predicate() {
        let store = MemoryShipStore::new();
        store.insert(new_ship("Alpha", 0.3, 5)).expect("insert");
        store.insert(new_ship("Beta", 0.1, 9)).expect("insert");
        let filter = ShipFilter {
            name: Some("lph".to_string()),
            ..ShipFilter::default()
        };
        assert_eq!(store.count_matching(&compose(&filter)).expect("count"), 1);
        assert_eq!(
            store.count_matching(&ShipPredicate::default()).expect("count"),
            2
        );
    }

    #[test]
    fn update_and_delete_missing_ship_fail() {
        let store = MemoryShipStore::new();
        let ghost = new_ship("Ghost", 0.5, 1).with_id(77);
        assert_eq!(store.update(&ghost), Err(ShipError::NotFound(77)));
        assert_eq!(store.delete(&ghost), Err(ShipError::NotFound(77)));
    }
}
