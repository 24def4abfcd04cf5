//! Reverse geocoding: coordinates in, country + place name out.

use serde::Deserialize;
use std::error::Error as StdError;
use std::fmt;
use url::Url;

/// Geocoding-specific errors
#[derive(Debug)]
pub enum GeocodeError {
    /// Request construction or transport failure
    Http(String),
    /// Provider answered but the payload could not be interpreted
    Parse(String),
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodeError::Http(msg) => write!(f, "Geocoding request failed: {}", msg),
            GeocodeError::Parse(msg) => write!(f, "Geocoding response invalid: {}", msg),
        }
    }
}

impl StdError for GeocodeError {}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        GeocodeError::Http(err.to_string())
    }
}

/// Country and city-level name for a coordinate pair.
///
/// Fields are `None` when the provider returned no feature of that type;
/// the ingestion pipeline owns the `Unknown` fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReverseGeocode {
    pub country: Option<String>,
    pub place_name: Option<String>,
}

/// Interface for reverse geocoding providers, injectable for testing
pub trait Geocoder {
    fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl std::future::Future<Output = Result<ReverseGeocode, GeocodeError>> + Send;
}

/// One feature of a provider response; `place_type` classifies it
/// (e.g. `["country"]`, `["place"]`)
#[derive(Debug, Deserialize)]
struct GeocodeFeature {
    text: String,
    place_type: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    features: Vec<GeocodeFeature>,
}

/// Mapbox-style geocoding client: `GET {endpoint}/{lng},{lat}.json`
pub struct HttpGeocoder {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
}

pub const DEFAULT_GEOCODER_ENDPOINT: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

impl HttpGeocoder {
    pub fn new(endpoint: String, access_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            access_token,
        }
    }

    /// Build the request URL; longitude comes first in the path
    fn request_url(&self, latitude: f64, longitude: f64) -> Result<Url, GeocodeError> {
        let raw = format!(
            "{}/{},{}.json",
            self.endpoint.trim_end_matches('/'),
            longitude,
            latitude
        );
        let mut url = Url::parse(&raw).map_err(|e| GeocodeError::Http(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("access_token", &self.access_token)
            .append_pair("types", "country,place");
        Ok(url)
    }
}

impl Geocoder for HttpGeocoder {
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ReverseGeocode, GeocodeError> {
        let url = self.request_url(latitude, longitude)?;
        let response: GeocodeResponse = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| GeocodeError::Parse(e.to_string()))?;

        Ok(extract_names(response))
    }
}

/// Pick the first country-typed and first place-typed feature from the list
fn extract_names(response: GeocodeResponse) -> ReverseGeocode {
    let mut result = ReverseGeocode::default();
    for feature in response.features {
        if result.country.is_none() && feature.place_type.iter().any(|t| t == "country") {
            result.country = Some(feature.text);
        } else if result.place_name.is_none() && feature.place_type.iter().any(|t| t == "place") {
            result.place_name = Some(feature.text);
        }
        if result.country.is_some() && result.place_name.is_some() {
            break;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> GeocodeResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_extracts_country_and_place() {
        let response = parse(
            r#"{"features": [
                {"text": "Kyoto", "place_type": ["place"]},
                {"text": "Kyoto Prefecture", "place_type": ["region"]},
                {"text": "Japan", "place_type": ["country"]}
            ]}"#,
        );
        let names = extract_names(response);
        assert_eq!(names.country.as_deref(), Some("Japan"));
        assert_eq!(names.place_name.as_deref(), Some("Kyoto"));
    }

    #[test]
    fn test_missing_feature_types_stay_none() {
        let names = extract_names(parse(r#"{"features": []}"#));
        assert_eq!(names, ReverseGeocode::default());
    }

    #[test]
    fn test_request_url_orders_lng_lat() {
        let geocoder = HttpGeocoder::new(
            DEFAULT_GEOCODER_ENDPOINT.to_string(),
            "token123".to_string(),
        );
        let url = geocoder.request_url(35.0, 135.0).unwrap();
        assert!(url.path().ends_with("/135,35.json"));
        assert!(url.query().unwrap().contains("types=country%2Cplace"));
    }
}
