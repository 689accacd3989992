//! Composition of optional query criteria into a single ship predicate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::domain::{Ship, ShipType};

/// Optional criteria accepted by listing and counting.
///
/// Every field is independent; an absent field places no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct ShipFilter {
    /// Case-sensitive substring of the ship name.
    pub name: Option<String>,
    /// Case-sensitive substring of the planet.
    pub planet: Option<String>,
    /// Exact ship type.
    #[param(inline)]
    pub ship_type: Option<ShipType>,
    /// Earliest production instant, epoch milliseconds (inclusive).
    pub after: Option<i64>,
    /// Latest production instant, epoch milliseconds (inclusive).
    pub before: Option<i64>,
    /// Exact usage flag.
    pub is_used: Option<bool>,
    /// Minimum speed (inclusive).
    pub min_speed: Option<f64>,
    /// Maximum speed (inclusive).
    pub max_speed: Option<f64>,
    /// Minimum crew size (inclusive).
    pub min_crew_size: Option<i32>,
    /// Maximum crew size (inclusive).
    pub max_crew_size: Option<i32>,
    /// Minimum rating (inclusive).
    pub min_rating: Option<f64>,
    /// Maximum rating (inclusive).
    pub max_rating: Option<f64>,
}

/// A range with at least one inclusive bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InclusiveRange<T> {
    /// `value >= min`
    AtLeast(T),
    /// `value <= max`
    AtMost(T),
    /// `min <= value <= max`
    Between(T, T),
}

impl<T> InclusiveRange<T> {
    /// Build a range from two optional bounds; `None` when both are absent.
    pub fn from_bounds(min: Option<T>, max: Option<T>) -> Option<Self> {
        match (min, max) {
            (None, None) => None,
            (Some(min), None) => Some(Self::AtLeast(min)),
            (None, Some(max)) => Some(Self::AtMost(max)),
            (Some(min), Some(max)) => Some(Self::Between(min, max)),
        }
    }
}

impl<T: PartialOrd> InclusiveRange<T> {
    /// Whether `value` lies within the range.
    pub fn contains(&self, value: &T) -> bool {
        match self {
            Self::AtLeast(min) => value >= min,
            Self::AtMost(max) => value <= max,
            Self::Between(min, max) => min <= value && value <= max,
        }
    }
}

/// A single constraint over ship fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Name contains the substring.
    NameContains(String),
    /// Planet contains the substring.
    PlanetContains(String),
    /// Ship type equals.
    ShipTypeIs(ShipType),
    /// Production instant within range.
    ProducedWithin(InclusiveRange<DateTime<Utc>>),
    /// Usage flag equals.
    UsedIs(bool),
    /// Speed within range.
    SpeedWithin(InclusiveRange<f64>),
    /// Crew size within range.
    CrewSizeWithin(InclusiveRange<i32>),
    /// Rating within range.
    RatingWithin(InclusiveRange<f64>),
}

impl Criterion {
    /// Evaluate the criterion against a ship.
    pub fn matches(&self, ship: &Ship) -> bool {
        match self {
            Self::NameContains(needle) => ship.name.contains(needle.as_str()),
            Self::PlanetContains(needle) => ship.planet.contains(needle.as_str()),
            Self::ShipTypeIs(ship_type) => ship.ship_type == *ship_type,
            Self::ProducedWithin(range) => range.contains(&ship.prod_date),
            Self::UsedIs(is_used) => ship.is_used == *is_used,
            Self::SpeedWithin(range) => range.contains(&ship.speed),
            Self::CrewSizeWithin(range) => range.contains(&ship.crew_size),
            Self::RatingWithin(range) => range.contains(&ship.rating),
        }
    }
}

/// Conjunction of criteria. An empty predicate matches every ship.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipPredicate {
    criteria: Vec<Criterion>,
}

impl ShipPredicate {
    /// The AND-ed criteria, in composition order.
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// True when no constraint was emitted.
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Whether the ship satisfies every criterion.
    pub fn matches(&self, ship: &Ship) -> bool {
        self.criteria.iter().all(|criterion| criterion.matches(ship))
    }

    fn push(&mut self, criterion: Option<Criterion>) {
        self.criteria.extend(criterion);
    }
}

/// Build the predicate for a filter. Never fails.
pub fn compose(filter: &ShipFilter) -> ShipPredicate {
    let mut predicate = ShipPredicate::default();
    predicate.push(filter.name.clone().map(Criterion::NameContains));
    predicate.push(filter.planet.clone().map(Criterion::PlanetContains));
    predicate.push(filter.ship_type.map(Criterion::ShipTypeIs));
    predicate.push(
        InclusiveRange::from_bounds(
            filter.after.map(instant_from_millis),
            filter.before.map(instant_from_millis),
        )
        .map(Criterion::ProducedWithin),
    );
    predicate.push(filter.is_used.map(Criterion::UsedIs));
    predicate.push(
        InclusiveRange::from_bounds(filter.min_speed, filter.max_speed)
            .map(Criterion::SpeedWithin),
    );
    predicate.push(
        InclusiveRange::from_bounds(filter.min_crew_size, filter.max_crew_size)
            .map(Criterion::CrewSizeWithin),
    );
    predicate.push(
        InclusiveRange::from_bounds(filter.min_rating, filter.max_rating)
            .map(Criterion::RatingWithin),
    );
    predicate
}

/// Convert epoch milliseconds to an instant, saturating outside chrono's range.
pub fn instant_from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(if millis < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ship() -> Ship {
        Ship {
            id: 1,
            name: "Daedalus".to_string(),
            planet: "Earth".to_string(),
            ship_type: ShipType::Merchant,
            prod_date: Utc.with_ymd_and_hms(2990, 6, 1, 0, 0, 0).unwrap(),
            is_used: false,
            speed: 0.42,
            crew_size: 120,
            rating: 1.12,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let predicate = compose(&ShipFilter::default());
        assert!(predicate.is_empty());
        assert!(predicate.matches(&ship()));
    }

    #[test]
    fn range_shapes_follow_present_bounds() {
        assert_eq!(InclusiveRange::<i32>::from_bounds(None, None), None);
        assert_eq!(
            InclusiveRange::from_bounds(Some(1), None),
            Some(InclusiveRange::AtLeast(1))
        );
        assert_eq!(
            InclusiveRange::from_bounds(None, Some(9)),
            Some(InclusiveRange::AtMost(9))
        );
        assert_eq!(
            InclusiveRange::from_bounds(Some(1), Some(9)),
            Some(InclusiveRange::Between(1, 9))
        );
    }

    #[test]
    fn bounds_are_inclusive_on_both_ends() {
        let ship = ship();
        let exact = ShipFilter {
            min_speed: Some(0.42),
            max_speed: Some(0.42),
            min_crew_size: Some(120),
            max_crew_size: Some(120),
            min_rating: Some(1.12),
            max_rating: Some(1.12),
            after: Some(ship.prod_date.timestamp_millis()),
            before: Some(ship.prod_date.timestamp_millis()),
            ..ShipFilter::default()
        };
        assert!(compose(&exact).matches(&ship));

        let above = ShipFilter {
            min_crew_size: Some(121),
            ..ShipFilter::default()
        };
        assert!(!compose(&above).matches(&ship));

        let below = ShipFilter {
            max_speed: Some(0.41),
            ..ShipFilter::default()
        };
        assert!(!compose(&below).matches(&ship));
    }

    #[test]
    fn string_filters_are_case_sensitive_substrings() {
        let ship = ship();
        let hit = ShipFilter {
            name: Some("edal".to_string()),
            planet: Some("Ear".to_string()),
            ..ShipFilter::default()
        };
        assert!(compose(&hit).matches(&ship));

        let miss = ShipFilter {
            name: Some("daedalus".to_string()),
            ..ShipFilter::default()
        };
        assert!(!compose(&miss).matches(&ship));
    }

    #[test]
    fn criteria_are_conjoined() {
        let filter = ShipFilter {
            ship_type: Some(ShipType::Merchant),
            is_used: Some(true),
            ..ShipFilter::default()
        };
        let predicate = compose(&filter);
        assert_eq!(predicate.criteria().len(), 2);
        assert!(!predicate.matches(&ship()));
    }

    #[test]
    fn out_of_range_millis_saturate() {
        assert_eq!(instant_from_millis(i64::MAX), DateTime::<Utc>::MAX_UTC);
        assert_eq!(instant_from_millis(i64::MIN), DateTime::<Utc>::MIN_UTC);
        assert_eq!(instant_from_millis(0).timestamp_millis(), 0);
    }

    #[test]
    fn filter_deserializes_camel_case_query_names() {
        let filter: ShipFilter = serde_json::from_str(
            r#"{"shipType": "TRANSPORT", "isUsed": false, "minCrewSize": 3, "maxRating": 2.5}"#,
        )
        .expect("deserialize");
        assert_eq!(filter.ship_type, Some(ShipType::Transport));
        assert_eq!(filter.is_used, Some(false));
        assert_eq!(filter.min_crew_size, Some(3));
        assert_eq!(filter.max_rating, Some(2.5));
    }
}
