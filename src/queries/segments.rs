use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use crate::schema::Segments;

/// INSERT INTO segments (name, country, latitude, longitude, arrival_ms, departure_ms, is_current)
/// VALUES (?, ?, ?, ?, ?, ?, ?)
pub fn insert(
    name: &str,
    country: &str,
    latitude: f64,
    longitude: f64,
    arrival_ms: i64,
    departure_ms: Option<i64>,
    is_current: bool,
) -> String {
    Query::insert()
        .into_table(Segments::Table)
        .columns([
            Segments::Name,
            Segments::Country,
            Segments::Latitude,
            Segments::Longitude,
            Segments::ArrivalMs,
            Segments::DepartureMs,
            Segments::IsCurrent,
        ])
        .values_panic([
            name.into(),
            country.into(),
            latitude.into(),
            longitude.into(),
            arrival_ms.into(),
            departure_ms.into(),
            (is_current as i32).into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT id FROM segments WHERE country = ? ORDER BY id DESC LIMIT 1
///
/// The most recently created segment wins when a country was visited twice.
pub fn select_latest_id_for_country(country: &str) -> String {
    Query::select()
        .column(Segments::Id)
        .from(Segments::Table)
        .and_where(Expr::col(Segments::Country).eq(country))
        .order_by(Segments::Id, Order::Desc)
        .limit(1)
        .to_string(SqliteQueryBuilder)
}

/// SELECT id, name, country, latitude, longitude, arrival_ms, departure_ms, is_current
/// FROM segments ORDER BY arrival_ms
pub fn select_all_by_arrival() -> String {
    Query::select()
        .columns([
            Segments::Id,
            Segments::Name,
            Segments::Country,
            Segments::Latitude,
            Segments::Longitude,
            Segments::ArrivalMs,
            Segments::DepartureMs,
            Segments::IsCurrent,
        ])
        .from(Segments::Table)
        .order_by(Segments::ArrivalMs, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// UPDATE segments SET is_current = 0 WHERE is_current = 1
///
/// Run before inserting a new current segment so at most one row carries the flag.
pub fn clear_current_flags() -> String {
    Query::update()
        .table(Segments::Table)
        .value(Segments::IsCurrent, 0)
        .and_where(Expr::col(Segments::IsCurrent).eq(1))
        .to_string(SqliteQueryBuilder)
}
