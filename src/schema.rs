use sea_query::Iden;

/// Segments table - one contiguous country-level stay in the itinerary
#[derive(Iden)]
pub enum Segments {
    Table,
    Id,
    Name,
    Country,
    Latitude,
    Longitude,
    ArrivalMs,
    DepartureMs,
    IsCurrent,
}

/// Places table - city-level points of interest nested under a segment
#[derive(Iden)]
pub enum Places {
    Table,
    Id,
    SegmentId,
    Name,
    Latitude,
    Longitude,
    Country,
    FirstVisitedMs,
    LastVisitedMs,
}

/// Media table - captured artifacts (photo, video, audio, text note)
#[derive(Iden)]
pub enum Media {
    Table,
    Id,
    UserId,
    MediaType,
    StoragePath,
    Description,
    TakenAtMs,
    Latitude,
    Longitude,
    SegmentId,
    PlaceId,
    LocationName,
}
