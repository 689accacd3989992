//! Domain entities for Spaceport.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::ShipError;

/// Category of a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipType {
    /// Cargo and trade vessel.
    Merchant,
    /// Armed vessel.
    Military,
    /// Passenger transport.
    Transport,
}

impl ShipType {
    /// Every ship type, in declaration order.
    pub const ALL: [ShipType; 3] = [Self::Merchant, Self::Military, Self::Transport];

    /// Stable token used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Merchant => "MERCHANT",
            Self::Military => "MILITARY",
            Self::Transport => "TRANSPORT",
        }
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipType {
    type Err = ShipError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ship_type| ship_type.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ShipError::BadRequest(format!("unknown ship type: {value}")))
    }
}

/// Field a ship listing can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipOrder {
    /// Order by identifier.
    #[default]
    Id,
    /// Order by speed.
    Speed,
    /// Order by crew size.
    CrewSize,
    /// Order by production date.
    Date,
    /// Order by rating.
    Rating,
}

impl ShipOrder {
    /// Every order token, in declaration order.
    pub const ALL: [ShipOrder; 5] = [
        Self::Id,
        Self::Speed,
        Self::CrewSize,
        Self::Date,
        Self::Rating,
    ];

    /// Token accepted in the `order` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Speed => "SPEED",
            Self::CrewSize => "CREW_SIZE",
            Self::Date => "DATE",
            Self::Rating => "RATING",
        }
    }
}

impl fmt::Display for ShipOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipOrder {
    type Err = ShipError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ShipError::BadRequest(format!("unknown order: {value}")))
    }
}

/// A persisted ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    /// Store-assigned identifier.
    pub id: i64,
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship category.
    pub ship_type: ShipType,
    /// Production instant, serialized as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schema(value_type = i64)]
    pub prod_date: DateTime<Utc>,
    /// Whether the ship has had a previous owner.
    pub is_used: bool,
    /// Speed, rounded to two decimal places.
    pub speed: f64,
    /// Number of crew members.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

/// A validated ship that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShip {
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship category.
    pub ship_type: ShipType,
    /// Production instant.
    pub prod_date: DateTime<Utc>,
    /// Whether the ship has had a previous owner.
    pub is_used: bool,
    /// Speed, rounded to two decimal places.
    pub speed: f64,
    /// Number of crew members.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl NewShip {
    /// Attach a store-assigned identifier.
    pub fn with_id(self, id: i64) -> Ship {
        Ship {
            id,
            name: self.name,
            planet: self.planet,
            ship_type: self.ship_type,
            prod_date: self.prod_date,
            is_used: self.is_used,
            speed: self.speed,
            crew_size: self.crew_size,
            rating: self.rating,
        }
    }
}

/// Client-supplied ship fields for creation or partial update.
///
/// A field that is absent (or explicitly `null`) is "not supplied". Any
/// `id` or `rating` in the payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ShipDraft {
    /// Ship name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Home planet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planet: Option<String>,
    /// Ship category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<ShipType>,
    /// Production instant as epoch milliseconds.
    #[serde(
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i64>)]
    pub prod_date: Option<DateTime<Utc>>,
    /// Whether the ship has had a previous owner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_used: Option<bool>,
    /// Speed in `[0.01, 0.99]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Crew size in `[1, 9999]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crew_size: Option<i32>,
}

/// Ordering and paging for a ship listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct PageRequest {
    /// Sort key, `ID` by default.
    #[param(inline)]
    pub order: ShipOrder,
    /// Zero-based page index.
    pub page_number: u32,
    /// Records per page.
    pub page_size: u32,
}

impl PageRequest {
    /// Default page size when none is requested.
    pub const DEFAULT_PAGE_SIZE: u32 = 3;

    /// Number of records to skip before the page starts.
    pub fn offset(&self) -> i64 {
        i64::from(self.page_number) * i64::from(self.page_size)
    }

    /// Maximum number of records on the page.
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            order: ShipOrder::Id,
            page_number: 0,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn ship_serializes_wire_names_and_millis() {
        let ship = Ship {
            id: 7,
            name: "Orion".to_string(),
            planet: "Mars".to_string(),
            ship_type: ShipType::Military,
            prod_date: Utc.with_ymd_and_hms(2950, 1, 1, 0, 0, 0).unwrap(),
            is_used: true,
            speed: 0.5,
            crew_size: 12,
            rating: 0.57,
        };
        let value = serde_json::to_value(&ship).expect("serialize");
        assert_eq!(value["shipType"], "MILITARY");
        assert_eq!(value["isUsed"], true);
        assert_eq!(value["crewSize"], 12);
        assert_eq!(value["prodDate"], ship.prod_date.timestamp_millis());
    }

    #[test]
    fn draft_ignores_id_and_rating() {
        let draft: ShipDraft = serde_json::from_str(
            r#"{"id": 99, "rating": 42.0, "name": "Nova", "prodDate": 0, "isUsed": null}"#,
        )
        .expect("deserialize");
        assert_eq!(draft.name.as_deref(), Some("Nova"));
        assert_eq!(draft.prod_date, Some(Utc.timestamp_millis_opt(0).unwrap()));
        assert_eq!(draft.is_used, None);
        assert_eq!(draft.planet, None);
    }

    #[test]
    fn parses_tokens_case_insensitively() {
        assert_eq!("transport".parse::<ShipType>().unwrap(), ShipType::Transport);
        assert_eq!("CREW_SIZE".parse::<ShipOrder>().unwrap(), ShipOrder::CrewSize);
        assert!("FREIGHTER".parse::<ShipType>().is_err());
    }

    #[test]
    fn page_request_defaults_and_offset() {
        let page = PageRequest::default();
        assert_eq!(page.order, ShipOrder::Id);
        assert_eq!(page.page_size, 3);
        assert_eq!(page.offset(), 0);

        let page = PageRequest {
            page_number: 4,
            page_size: 25,
            ..PageRequest::default()
        };
        assert_eq!(page.offset(), 100);
        assert_eq!(page.limit(), 25);
    }
}
