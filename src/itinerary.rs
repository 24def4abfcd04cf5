//! "Where are we now" resolution over the ordered segment list.

use chrono::{DateTime, Utc};

use crate::models::Segment;

/// Aggregate figures derived from the segment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripStats {
    pub total_stops: usize,
    pub days_on_road: i64,
}

/// Resolve the segment to present as "current".
///
/// Priority order:
/// 1. the first segment explicitly flagged `is_current`
/// 2. the first segment whose `[arrival, departure)` interval contains `now`
///    (an absent departure is an open interval)
/// 3. the first segment in list order
///
/// The last step intentionally returns a past or future stop rather than
/// nothing, so callers always have something to render. Returns `None` only
/// for an empty list.
pub fn resolve_current(segments: &[Segment], now: DateTime<Utc>) -> Option<&Segment> {
    if let Some(flagged) = segments.iter().find(|segment| segment.is_current) {
        return Some(flagged);
    }

    let now_ms = now.timestamp_millis();
    let containing = segments.iter().find(|segment| {
        segment.arrival_ms <= now_ms
            && segment.departure_ms.map_or(true, |departure| now_ms < departure)
    });
    if let Some(segment) = containing {
        return Some(segment);
    }

    segments.first()
}

/// The stop immediately after `current` in arrival order, if any.
///
/// `segments` is expected in arrival order, as returned by
/// `queries::segments::select_all_by_arrival`.
pub fn resolve_next<'a>(segments: &'a [Segment], current: Option<&Segment>) -> Option<&'a Segment> {
    let current = current?;
    let position = segments.iter().position(|segment| segment.id == current.id)?;
    segments.get(position + 1)
}

/// Stops visited and days elapsed since the first arrival (inclusive).
pub fn trip_stats(segments: &[Segment], now: DateTime<Utc>) -> TripStats {
    let days_on_road = match segments.first() {
        Some(first) => {
            let elapsed_ms = now.timestamp_millis() - first.arrival_ms;
            let days = div_ceil_ms_to_days(elapsed_ms) + 1;
            days.max(0)
        }
        None => 0,
    };
    TripStats {
        total_stops: segments.len(),
        days_on_road,
    }
}

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Ceiling division of a millisecond span into whole days, sign-correct
fn div_ceil_ms_to_days(ms: i64) -> i64 {
    if ms >= 0 {
        (ms + MS_PER_DAY - 1) / MS_PER_DAY
    } else {
        ms / MS_PER_DAY
    }
}
