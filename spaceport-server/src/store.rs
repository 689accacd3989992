//! PostgreSQL-backed ship store.

use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use spaceport_core::{
    Criterion, InclusiveRange, NewShip, Result, Ship, ShipError, ShipOrder, ShipPredicate,
    ShipStore,
};

use crate::db::DbPool;
use crate::models::{ShipColumns, ShipRecord};
use crate::schema::ships;

type BoxedShips = ships::BoxedQuery<'static, Pg>;

/// Applies an [`InclusiveRange`] to a column of a boxed ship query.
macro_rules! filter_range {
    ($query:expr, $column:expr, $range:expr) => {
        match *$range {
            InclusiveRange::AtLeast(min) => $query.filter($column.ge(min)),
            InclusiveRange::AtMost(max) => $query.filter($column.le(max)),
            InclusiveRange::Between(min, max) => $query.filter($column.between(min, max)),
        }
    };
}

/// Ship store running queries through a Diesel connection pool.
#[derive(Clone)]
pub struct PgShipStore {
    pool: DbPool,
}

impl PgShipStore {
    /// Wrap an initialized pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>> {
        self.pool.get().map_err(ShipError::store)
    }
}

/// Escape LIKE wildcards so the needle matches literally.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Julian day 0, the earliest instant a `timestamptz` can hold.
const EARLIEST_TIMESTAMPTZ_MILLIS: i64 = -210_866_803_200_000;

fn earliest_timestamptz() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(EARLIEST_TIMESTAMPTZ_MILLIS)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Bounds below the `timestamptz` floor are never bound as parameters: a lower
/// bound there constrains nothing and an upper bound there matches nothing.
fn produced_within(query: BoxedShips, range: &InclusiveRange<DateTime<Utc>>) -> BoxedShips {
    let floor = earliest_timestamptz();
    match *range {
        InclusiveRange::AtMost(max) | InclusiveRange::Between(_, max) if max < floor => {
            query.filter(ships::prod_date.lt(floor))
        }
        InclusiveRange::AtLeast(min) if min < floor => query,
        InclusiveRange::Between(min, max) if min < floor => query.filter(ships::prod_date.le(max)),
        _ => filter_range!(query, ships::prod_date, range),
    }
}

fn filtered(predicate: &ShipPredicate) -> BoxedShips {
    let mut query: BoxedShips = ships::table.into_boxed();
    for criterion in predicate.criteria() {
        query = match criterion {
            Criterion::NameContains(needle) => {
                query.filter(ships::name.like(contains_pattern(needle)))
            }
            Criterion::PlanetContains(needle) => {
                query.filter(ships::planet.like(contains_pattern(needle)))
            }
            Criterion::ShipTypeIs(ship_type) => {
                query.filter(ships::ship_type.eq(ship_type.as_str()))
            }
            Criterion::ProducedWithin(range) => produced_within(query, range),
            Criterion::UsedIs(is_used) => query.filter(ships::is_used.eq(*is_used)),
            Criterion::SpeedWithin(range) => filter_range!(query, ships::speed, range),
            Criterion::CrewSizeWithin(range) => filter_range!(query, ships::crew_size, range),
            Criterion::RatingWithin(range) => filter_range!(query, ships::rating, range),
        };
    }
    query
}

fn ordered(query: BoxedShips, order: ShipOrder) -> BoxedShips {
    match order {
        ShipOrder::Id => query.order(ships::id.asc()),
        ShipOrder::Speed => query.order((ships::speed.asc(), ships::id.asc())),
        ShipOrder::CrewSize => query.order((ships::crew_size.asc(), ships::id.asc())),
        ShipOrder::Date => query.order((ships::prod_date.asc(), ships::id.asc())),
        ShipOrder::Rating => query.order((ships::rating.asc(), ships::id.asc())),
    }
}

impl ShipStore for PgShipStore {
    fn find_matching(
        &self,
        predicate: &ShipPredicate,
        order: ShipOrder,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Ship>> {
        let mut conn = self.conn()?;
        let records = ordered(filtered(predicate), order)
            .limit(limit)
            .offset(offset)
            .load::<ShipRecord>(&mut conn)
            .map_err(ShipError::store)?;
        records.into_iter().map(Ship::try_from).collect()
    }

    fn count_matching(&self, predicate: &ShipPredicate) -> Result<u64> {
        let mut conn = self.conn()?;
        let count: i64 = filtered(predicate)
            .count()
            .get_result(&mut conn)
            .map_err(ShipError::store)?;
        u64::try_from(count).map_err(ShipError::store)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Ship>> {
        let mut conn = self.conn()?;
        ships::table
            .find(id)
            .first::<ShipRecord>(&mut conn)
            .optional()
            .map_err(ShipError::store)?
            .map(Ship::try_from)
            .transpose()
    }

    fn insert(&self, ship: NewShip) -> Result<Ship> {
        let mut conn = self.conn()?;
        let record = diesel::insert_into(ships::table)
            .values(&ShipColumns::from(ship))
            .get_result::<ShipRecord>(&mut conn)
            .map_err(ShipError::store)?;
        log::debug!("inserted ship row {}", record.id);
        Ship::try_from(record)
    }

    fn update(&self, ship: &Ship) -> Result<Ship> {
        let mut conn = self.conn()?;
        diesel::update(ships::table.find(ship.id))
            .set(&ShipColumns::from(ship))
            .get_result::<ShipRecord>(&mut conn)
            .optional()
            .map_err(ShipError::store)?
            .ok_or(ShipError::NotFound(ship.id))
            .and_then(Ship::try_from)
    }

    fn delete(&self, ship: &Ship) -> Result<()> {
        let mut conn = self.conn()?;
        let removed = diesel::delete(ships::table.find(ship.id))
            .execute(&mut conn)
            .map_err(ShipError::store)?;
        if removed == 0 {
            return Err(ShipError::NotFound(ship.id));
        }
        Ok(())
    }
}
