use rand::Rng;

/// Mean Earth radius in kilometers, used by the haversine distance
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A captured coordinate closer than this to an existing place reuses it
/// instead of creating a new one
pub const PLACE_MATCH_RADIUS_KM: f64 = 1.0;

/// Country fallback when reverse geocoding is unavailable or fails
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Place-name fallback when reverse geocoding is unavailable or fails
pub const UNKNOWN_PLACE: &str = "Unknown Position";

/// Generate a randomized storage filename: `{timestamp_ms}_{random}.{ext}`
/// The random component avoids collisions between uploads in the same millisecond
pub fn generate_storage_filename(timestamp_ms: i64, extension: &str) -> String {
    let random: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!("{}_{}.{}", timestamp_ms, random, extension)
}
