//! Great-circle distance and nearest-place matching.

use crate::constants::EARTH_RADIUS_KM;
use crate::models::Place;

/// The closest existing place to a captured coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestPlace<'a> {
    pub place: &'a Place,
    pub distance_km: f64,
}

/// Haversine distance in kilometers between two latitude/longitude pairs.
///
/// Total over finite inputs; NaN inputs propagate NaN.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Linear scan for the candidate closest to `(latitude, longitude)`.
///
/// Returns `None` for an empty candidate list. Ties keep the first
/// candidate encountered (strict `<` while folding). Whether the nearest
/// place is close enough to reuse is the caller's decision.
pub fn find_nearest_place<'a>(
    latitude: f64,
    longitude: f64,
    candidates: &'a [Place],
) -> Option<NearestPlace<'a>> {
    let mut nearest: Option<NearestPlace<'a>> = None;
    for place in candidates {
        let distance = distance_km(latitude, longitude, place.latitude, place.longitude);
        let closer = match &nearest {
            Some(best) => distance < best.distance_km,
            None => true,
        };
        if closer {
            nearest = Some(NearestPlace {
                place,
                distance_km: distance,
            });
        }
    }
    nearest
}
