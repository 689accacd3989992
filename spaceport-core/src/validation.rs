//! Field checks and derived values applied on write.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{Result, ShipError};

/// Maximum length of `name` and `planet`, in characters.
pub const MAX_TEXT_LEN: usize = 50;
/// Slowest permitted speed.
pub const MIN_SPEED: f64 = 0.01;
/// Fastest permitted speed.
pub const MAX_SPEED: f64 = 0.99;
/// Smallest permitted crew.
pub const MIN_CREW_SIZE: i32 = 1;
/// Largest permitted crew.
pub const MAX_CREW_SIZE: i32 = 9999;
/// Earliest permitted production year.
pub const MIN_PROD_YEAR: i32 = 2800;
/// Latest permitted production year; also the "current" year for ratings.
pub const MAX_PROD_YEAR: i32 = 3019;

/// Parse a path identifier; it must be a positive integer.
pub fn check_id(raw: &str) -> Result<i64> {
    let id: i64 = raw
        .parse()
        .map_err(|_| ShipError::bad_request(format!("invalid id: {raw}")))?;
    if id <= 0 {
        return Err(ShipError::bad_request(format!("id must be positive: {id}")));
    }
    Ok(id)
}

/// Check the ship name length.
pub fn check_name(name: &str) -> Result<()> {
    check_text("name", name)
}

/// Check the planet length.
pub fn check_planet(planet: &str) -> Result<()> {
    check_text("planet", planet)
}

fn check_text(field: &str, value: &str) -> Result<()> {
    let len = value.chars().count();
    if len == 0 || len > MAX_TEXT_LEN {
        return Err(ShipError::bad_request(format!(
            "{field} must be 1-{MAX_TEXT_LEN} characters, got {len}"
        )));
    }
    Ok(())
}

/// Check that speed lies in `[MIN_SPEED, MAX_SPEED]`.
pub fn check_speed(speed: f64) -> Result<()> {
    if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
        return Err(ShipError::bad_request(format!(
            "speed must be within [{MIN_SPEED}, {MAX_SPEED}], got {speed}"
        )));
    }
    Ok(())
}

/// Check that crew size lies in `[MIN_CREW_SIZE, MAX_CREW_SIZE]`.
pub fn check_crew_size(crew_size: i32) -> Result<()> {
    if !(MIN_CREW_SIZE..=MAX_CREW_SIZE).contains(&crew_size) {
        return Err(ShipError::bad_request(format!(
            "crew size must be within [{MIN_CREW_SIZE}, {MAX_CREW_SIZE}], got {crew_size}"
        )));
    }
    Ok(())
}

/// Check that the UTC production year lies in `[MIN_PROD_YEAR, MAX_PROD_YEAR]`.
pub fn check_prod_date(prod_date: &DateTime<Utc>) -> Result<()> {
    let year = prod_date.year();
    if !(MIN_PROD_YEAR..=MAX_PROD_YEAR).contains(&year) {
        return Err(ShipError::bad_request(format!(
            "production year must be within [{MIN_PROD_YEAR}, {MAX_PROD_YEAR}], got {year}"
        )));
    }
    Ok(())
}

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|decimal| decimal.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|decimal| decimal.to_f64())
        .unwrap_or(value)
}

/// Speed as stored.
pub fn round_speed(speed: f64) -> f64 {
    round2(speed)
}

/// Derived rating: `80 * speed * k / (MAX_PROD_YEAR - year + 1)`, where `k`
/// halves the score of used ships.
pub fn compute_rating(speed: f64, is_used: bool, prod_date: &DateTime<Utc>) -> f64 {
    let usage = if is_used { 0.5 } else { 1.0 };
    let age = MAX_PROD_YEAR - prod_date.year() + 1;
    round2(80.0 * speed * usage / f64::from(age))
}
