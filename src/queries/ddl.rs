use sea_query::{ColumnDef, ForeignKey, ForeignKeyAction, Index, SqliteQueryBuilder, Table};

use crate::schema::{Media, Places, Segments};

/// CREATE TABLE IF NOT EXISTS segments (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     name TEXT NOT NULL,
///     country TEXT NOT NULL,
///     latitude REAL NOT NULL,
///     longitude REAL NOT NULL,
///     arrival_ms INTEGER NOT NULL,
///     departure_ms INTEGER,
///     is_current INTEGER NOT NULL DEFAULT 0
/// )
pub fn create_segments_table() -> String {
    Table::create()
        .table(Segments::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Segments::Id)
                .integer()
                .primary_key()
                .auto_increment(),
        )
        .col(ColumnDef::new(Segments::Name).string().not_null())
        .col(ColumnDef::new(Segments::Country).string().not_null())
        .col(ColumnDef::new(Segments::Latitude).double().not_null())
        .col(ColumnDef::new(Segments::Longitude).double().not_null())
        .col(ColumnDef::new(Segments::ArrivalMs).big_integer().not_null())
        .col(ColumnDef::new(Segments::DepartureMs).big_integer())
        .col(
            ColumnDef::new(Segments::IsCurrent)
                .integer()
                .not_null()
                .default(0),
        )
        .to_string(SqliteQueryBuilder)
}

/// CREATE TABLE IF NOT EXISTS places (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     segment_id INTEGER NOT NULL REFERENCES segments(id) ON DELETE CASCADE,
///     name TEXT NOT NULL,
///     latitude REAL NOT NULL,
///     longitude REAL NOT NULL,
///     country TEXT NOT NULL,
///     first_visited_ms INTEGER NOT NULL,
///     last_visited_ms INTEGER NOT NULL
/// )
pub fn create_places_table() -> String {
    Table::create()
        .table(Places::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Places::Id)
                .integer()
                .primary_key()
                .auto_increment(),
        )
        .col(ColumnDef::new(Places::SegmentId).big_integer().not_null())
        .col(ColumnDef::new(Places::Name).string().not_null())
        .col(ColumnDef::new(Places::Latitude).double().not_null())
        .col(ColumnDef::new(Places::Longitude).double().not_null())
        .col(ColumnDef::new(Places::Country).string().not_null())
        .col(
            ColumnDef::new(Places::FirstVisitedMs)
                .big_integer()
                .not_null(),
        )
        .col(
            ColumnDef::new(Places::LastVisitedMs)
                .big_integer()
                .not_null(),
        )
        .foreign_key(
            ForeignKey::create()
                .from(Places::Table, Places::SegmentId)
                .to(Segments::Table, Segments::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_string(SqliteQueryBuilder)
}

/// CREATE TABLE IF NOT EXISTS media (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     user_id TEXT NOT NULL,
///     media_type TEXT NOT NULL,
///     storage_path TEXT,
///     description TEXT,
///     taken_at_ms INTEGER NOT NULL,
///     latitude REAL,
///     longitude REAL,
///     segment_id INTEGER REFERENCES segments(id),
///     place_id INTEGER REFERENCES places(id),
///     location_name TEXT
/// )
pub fn create_media_table() -> String {
    Table::create()
        .table(Media::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Media::Id)
                .integer()
                .primary_key()
                .auto_increment(),
        )
        .col(ColumnDef::new(Media::UserId).string().not_null())
        .col(ColumnDef::new(Media::MediaType).string().not_null())
        .col(ColumnDef::new(Media::StoragePath).string())
        .col(ColumnDef::new(Media::Description).string())
        .col(ColumnDef::new(Media::TakenAtMs).big_integer().not_null())
        .col(ColumnDef::new(Media::Latitude).double())
        .col(ColumnDef::new(Media::Longitude).double())
        .col(ColumnDef::new(Media::SegmentId).big_integer())
        .col(ColumnDef::new(Media::PlaceId).big_integer())
        .col(ColumnDef::new(Media::LocationName).string())
        .foreign_key(
            ForeignKey::create()
                .from(Media::Table, Media::SegmentId)
                .to(Segments::Table, Segments::Id),
        )
        .foreign_key(
            ForeignKey::create()
                .from(Media::Table, Media::PlaceId)
                .to(Places::Table, Places::Id),
        )
        .to_string(SqliteQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_segments_country ON segments(country)
pub fn create_segments_country_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_segments_country")
        .table(Segments::Table)
        .col(Segments::Country)
        .to_string(SqliteQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_places_segment_id ON places(segment_id)
pub fn create_places_segment_id_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_places_segment_id")
        .table(Places::Table)
        .col(Places::SegmentId)
        .to_string(SqliteQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_media_taken_at ON media(taken_at_ms)
pub fn create_media_taken_at_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_media_taken_at")
        .table(Media::Table)
        .col(Media::TakenAtMs)
        .to_string(SqliteQueryBuilder)
}
