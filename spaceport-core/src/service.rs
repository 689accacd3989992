//! Ship lifecycle: listing, lookup, creation, partial update and deletion.

use crate::domain::{NewShip, PageRequest, Ship, ShipDraft};
use crate::error::{Result, ShipError};
use crate::filter::{ShipFilter, compose};
use crate::store::ShipStore;
use crate::validation::{
    check_crew_size, check_id, check_name, check_planet, check_prod_date, check_speed,
    compute_rating, round_speed,
};

/// Validates and applies ship operations against a store.
pub struct ShipService<S: ShipStore> {
    store: S,
}

impl<S: ShipStore> ShipService<S> {
    /// Create a service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// One page of ships matching the filter.
    pub fn list(&self, filter: &ShipFilter, page: &PageRequest) -> Result<Vec<Ship>> {
        if page.page_size == 0 {
            return Ok(Vec::new());
        }
        let predicate = compose(filter);
        self.store
            .find_matching(&predicate, page.order, page.limit(), page.offset())
    }

    /// Total number of ships matching the filter.
    pub fn count(&self, filter: &ShipFilter) -> Result<u64> {
        self.store.count_matching(&compose(filter))
    }

    /// Fetch a ship by its raw path identifier.
    pub fn get(&self, raw_id: &str) -> Result<Ship> {
        let id = check_id(raw_id)?;
        self.fetch(id)
    }

    /// Validate a draft and persist it as a new ship.
    pub fn create(&self, draft: ShipDraft) -> Result<Ship> {
        let new_ship = validate_new(draft)?;
        let saved = self.store.insert(new_ship)?;
        log::info!("created ship {} ({})", saved.id, saved.name);
        self.fetch(saved.id)
    }

    /// Merge the supplied draft fields into an existing ship.
    pub fn update(&self, raw_id: &str, draft: ShipDraft) -> Result<Ship> {
        let id = check_id(raw_id)?;
        let mut ship = self.fetch(id)?;
        merge(&mut ship, draft)?;
        ship.rating = compute_rating(ship.speed, ship.is_used, &ship.prod_date);
        self.store.update(&ship)?;
        log::info!("updated ship {id}");
        self.fetch(id)
    }

    /// Remove an existing ship.
    pub fn delete(&self, raw_id: &str) -> Result<()> {
        let id = check_id(raw_id)?;
        let ship = self.fetch(id)?;
        self.store.delete(&ship)?;
        log::info!("deleted ship {id}");
        Ok(())
    }

    fn fetch(&self, id: i64) -> Result<Ship> {
        self.store
            .find_by_id(id)?
            .ok_or(ShipError::NotFound(id))
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| ShipError::bad_request(format!("{field} is required")))
}

fn validate_new(draft: ShipDraft) -> Result<NewShip> {
    let name = required(draft.name, "name")?;
    let planet = required(draft.planet, "planet")?;
    let ship_type = required(draft.ship_type, "shipType")?;
    let prod_date = required(draft.prod_date, "prodDate")?;
    let speed = required(draft.speed, "speed")?;
    let crew_size = required(draft.crew_size, "crewSize")?;
    let is_used = draft.is_used.unwrap_or(false);

    check_name(&name)?;
    check_planet(&planet)?;
    check_speed(speed)?;
    check_crew_size(crew_size)?;
    check_prod_date(&prod_date)?;

    let speed = round_speed(speed);
    Ok(NewShip {
        name,
        planet,
        ship_type,
        prod_date,
        is_used,
        speed,
        crew_size,
        rating: compute_rating(speed, is_used, &prod_date),
    })
}

fn merge(ship: &mut Ship, draft: ShipDraft) -> Result<()> {
    if let Some(name) = draft.name {
        check_name(&name)?;
        ship.name = name;
    }
    if let Some(planet) = draft.planet {
        check_planet(&planet)?;
        ship.planet = planet;
    }
    if let Some(ship_type) = draft.ship_type {
        ship.ship_type = ship_type;
    }
    if let Some(prod_date) = draft.prod_date {
        check_prod_date(&prod_date)?;
        ship.prod_date = prod_date;
    }
    if let Some(is_used) = draft.is_used {
        ship.is_used = is_used;
    }
    if let Some(speed) = draft.speed {
        check_speed(speed)?;
        ship.speed = round_speed(speed);
    }
    if let Some(crew_size) = draft.crew_size {
        check_crew_size(crew_size)?;
        ship.crew_size = crew_size;
    }
    Ok(())
}
