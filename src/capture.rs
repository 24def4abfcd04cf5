//! Best-effort EXIF metadata extraction for captured images.
//!
//! Everything here is allowed to fail silently: a capture without EXIF, a
//! stripped JPEG, or a malformed GPS block all yield `None` fields and the
//! ingestion pipeline proceeds without coordinates.

use chrono::{DateTime, NaiveDateTime, Utc};
use exif::{In, Reader, Tag, Value};
use std::io::Cursor;

/// Degrees/minutes/seconds divisors for GPS rationals
const DMS_DIVISION: [f64; 3] = [1.0, 60.0, 3600.0];

/// Metadata recovered from an image's EXIF block.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CaptureMetadata {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub taken_at: Option<DateTime<Utc>>,
}

impl CaptureMetadata {
    /// Both coordinates, when the EXIF block carried a complete GPS fix
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some((latitude, longitude)),
            _ => None,
        }
    }
}

/// Read GPS position and original capture time from raw image bytes.
///
/// Returns `None` when the bytes hold no parseable EXIF container at all;
/// individual missing tags leave the corresponding field `None`.
pub fn read_capture_metadata(bytes: &[u8]) -> Option<CaptureMetadata> {
    let exif = Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;

    let latitude = read_coordinate(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef);
    let longitude = read_coordinate(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef);
    let taken_at = read_date_time_original(&exif);

    Some(CaptureMetadata {
        latitude,
        longitude,
        taken_at,
    })
}

/// Convert one GPS coordinate from DMS rationals plus a hemisphere ref
/// (`S` and `W` negate) into signed decimal degrees.
fn read_coordinate(exif: &exif::Exif, value_tag: Tag, ref_tag: Tag) -> Option<f64> {
    let field = exif.get_field(value_tag, In::PRIMARY)?;
    let rationals = match &field.value {
        Value::Rational(rationals) if rationals.len() == 3 => rationals,
        _ => return None,
    };

    let degrees: f64 = rationals
        .iter()
        .zip(DMS_DIVISION.iter())
        .map(|(rational, divisor)| rational.to_f64() / divisor)
        .sum();
    if !degrees.is_finite() {
        return None;
    }

    let hemisphere = exif
        .get_field(ref_tag, In::PRIMARY)
        .map(|field| field.display_value().to_string())
        .unwrap_or_default();
    if hemisphere == "S" || hemisphere == "W" {
        Some(-degrees)
    } else {
        Some(degrees)
    }
}

/// Parse `DateTimeOriginal` (`YYYY:MM:DD HH:MM:SS`, no zone) as UTC
fn read_date_time_original(exif: &exif::Exif) -> Option<DateTime<Utc>> {
    let field = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY)?;
    let raw = match &field.value {
        Value::Ascii(lines) => lines.first().map(|line| String::from_utf8_lossy(line).into_owned())?,
        _ => return None,
    };
    let naive = NaiveDateTime::parse_from_str(raw.trim(), "%Y:%m:%d %H:%M:%S").ok()?;
    Some(naive.and_utc())
}
