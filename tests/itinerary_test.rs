use chrono::{DateTime, TimeZone, Utc};

use travel_moments::itinerary::{resolve_current, resolve_next, trip_stats};
use travel_moments::models::Segment;

/// Build a segment with millisecond timestamps taken from UTC dates
fn segment(
    id: i64,
    country: &str,
    arrival: DateTime<Utc>,
    departure: Option<DateTime<Utc>>,
    is_current: bool,
) -> Segment {
    Segment {
        id,
        name: country.to_string(),
        country: country.to_string(),
        latitude: 0.0,
        longitude: 0.0,
        arrival_ms: arrival.timestamp_millis(),
        departure_ms: departure.map(|d| d.timestamp_millis()),
        is_current,
    }
}

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

/// Two stops: a closed January stay and an open-ended follow-up
fn sample_trip() -> Vec<Segment> {
    vec![
        segment(1, "Japan", date(2024, 1, 1), Some(date(2024, 1, 10)), false),
        segment(2, "Thailand", date(2024, 1, 11), None, false),
    ]
}

#[test]
fn test_explicit_current_flag_wins() {
    let mut segments = sample_trip();
    segments[0].is_current = true;

    // The flag beats interval containment: now is inside segment 2
    let current = resolve_current(&segments, date(2024, 1, 15)).unwrap();
    assert_eq!(current.id, 1);
}

#[test]
fn test_interval_containment_without_flag() {
    let segments = sample_trip();
    let current = resolve_current(&segments, date(2024, 1, 15)).unwrap();
    assert_eq!(current.id, 2, "open-ended interval should contain Jan 15");

    let current = resolve_current(&segments, date(2024, 1, 5)).unwrap();
    assert_eq!(current.id, 1);
}

#[test]
fn test_departure_instant_is_exclusive() {
    let segments = vec![
        segment(1, "Japan", date(2024, 1, 1), Some(date(2024, 1, 10)), false),
        segment(2, "Thailand", date(2024, 1, 11), Some(date(2024, 1, 20)), false),
    ];
    // Jan 20 00:00 is segment 2's departure instant: no interval contains
    // it, so the first-segment fallback applies
    let current = resolve_current(&segments, date(2024, 1, 20)).unwrap();
    assert_eq!(current.id, 1);
}

#[test]
fn test_fallback_to_first_segment_before_trip() {
    let segments = sample_trip();
    let current = resolve_current(&segments, date(2023, 12, 1)).unwrap();
    assert_eq!(current.id, 1, "before all arrivals the first stop is shown");
}

#[test]
fn test_empty_list_resolves_to_none() {
    assert!(resolve_current(&[], date(2024, 1, 1)).is_none());
}

#[test]
fn test_multiple_current_flags_tolerated() {
    let mut segments = sample_trip();
    segments[0].is_current = true;
    segments[1].is_current = true;
    let current = resolve_current(&segments, date(2024, 1, 15)).unwrap();
    assert_eq!(current.id, 1, "first flagged segment wins");
}

#[test]
fn test_resolve_next() {
    let segments = sample_trip();
    let first = segments[0].clone();
    let second = segments[1].clone();

    assert_eq!(resolve_next(&segments, Some(&first)).unwrap().id, 2);
    assert!(resolve_next(&segments, Some(&second)).is_none());
    assert!(resolve_next(&segments, None).is_none());
}

#[test]
fn test_trip_stats() {
    let segments = sample_trip();
    let stats = trip_stats(&segments, date(2024, 1, 15));
    assert_eq!(stats.total_stops, 2);
    // Jan 1 to Jan 15 inclusive
    assert_eq!(stats.days_on_road, 15);
}

#[test]
fn test_trip_stats_on_arrival_day() {
    let segments = sample_trip();
    let stats = trip_stats(&segments, date(2024, 1, 1));
    assert_eq!(stats.days_on_road, 1);
}

#[test]
fn test_trip_stats_before_trip_clamps_to_zero() {
    let segments = sample_trip();
    let stats = trip_stats(&segments, date(2023, 11, 1));
    assert_eq!(stats.days_on_road, 0);
}

#[test]
fn test_trip_stats_empty() {
    let stats = trip_stats(&[], date(2024, 1, 1));
    assert_eq!(stats.total_stops, 0);
    assert_eq!(stats.days_on_road, 0);
}
