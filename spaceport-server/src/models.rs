//! Database models for Spaceport server.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use spaceport_core::{NewShip, Ship, ShipError};

use crate::schema::ships;

#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = ships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
/// Ship database record.
pub struct ShipRecord {
    /// Ship identifier.
    pub id: i64,
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship type token.
    pub ship_type: String,
    /// Production instant.
    pub prod_date: DateTime<Utc>,
    /// Whether the ship is second-hand.
    pub is_used: bool,
    /// Rounded speed.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl TryFrom<ShipRecord> for Ship {
    type Error = ShipError;

    fn try_from(record: ShipRecord) -> Result<Self, Self::Error> {
        let ship_type = record
            .ship_type
            .parse()
            .map_err(|_| ShipError::store(format!("corrupt ship type: {}", record.ship_type)))?;
        Ok(Ship {
            id: record.id,
            name: record.name,
            planet: record.planet,
            ship_type,
            prod_date: record.prod_date,
            is_used: record.is_used,
            speed: record.speed,
            crew_size: record.crew_size,
            rating: record.rating,
        })
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = ships)]
/// Insertable and updatable ship columns (everything but the id).
pub struct ShipColumns {
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship type token.
    pub ship_type: String,
    /// Production instant.
    pub prod_date: DateTime<Utc>,
    /// Whether the ship is second-hand.
    pub is_used: bool,
    /// Rounded speed.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl From<NewShip> for ShipColumns {
    fn from(ship: NewShip) -> Self {
        Self {
            name: ship.name,
            planet: ship.planet,
            ship_type: ship.ship_type.as_str().to_string(),
            prod_date: ship.prod_date,
            is_used: ship.is_used,
            speed: ship.speed,
            crew_size: ship.crew_size,
            rating: ship.rating,
        }
    }
}

impl From<&Ship> for ShipColumns {
    fn from(ship: &Ship) -> Self {
        Self {
            name: ship.name.clone(),
            planet: ship.planet.clone(),
            ship_type: ship.ship_type.as_str().to_string(),
            prod_date: ship.prod_date,
            is_used: ship.is_used,
            speed: ship.speed,
            crew_size: ship.crew_size,
            rating: ship.rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use spaceport_core::ShipType;

    fn record(ship_type: &str) -> ShipRecord {
        ShipRecord {
            id: 3,
            name: "Serenity".to_string(),
            planet: "Persephone".to_string(),
            ship_type: ship_type.to_string(),
            prod_date: Utc.with_ymd_and_hms(3001, 1, 1, 0, 0, 0).unwrap(),
            is_used: true,
            speed: 0.61,
            crew_size: 9,
            rating: 1.28,
        }
    }

    #[test]
    fn record_converts_to_ship() {
        let ship = Ship::try_from(record("TRANSPORT")).expect("convert");
        assert_eq!(ship.id, 3);
        assert_eq!(ship.ship_type, ShipType::Transport);
        assert_eq!(ShipColumns::from(&ship).ship_type, "TRANSPORT");
    }

    #[test]
    fn unknown_ship_type_is_a_store_error() {
        let err = Ship::try_from(record("PIRATE")).expect_err("corrupt");
        assert!(matches!(err, ShipError::Store(_)));
    }
}
