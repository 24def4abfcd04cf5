//! The capture ingestion pipeline.
//!
//! One `ingest` call walks six steps: coordinate resolution, reverse
//! geocoding, segment find-or-create, place find-or-create by proximity,
//! binary upload, media insert. Every external call is a sequential await;
//! there is no transaction across steps and no rollback, so a fatal failure
//! late in the pipeline leaves earlier segment/place writes in place (they
//! are valid rows, merely unreferenced).
//!
//! Failure policy:
//! - EXIF and geocoding failures are soft: the pipeline continues with
//!   missing coordinates / `Unknown` names.
//! - Segment and place creation failures are tolerated: logged, and the
//!   media row is inserted without that link.
//! - A missing user, an upload failure or a media insert failure aborts the
//!   call and surfaces to the caller.

use chrono::Utc;
use log::{debug, info, warn};
use std::error::Error as StdError;
use std::fmt;
use uuid::Uuid;

use crate::capture::{read_capture_metadata, CaptureMetadata};
use crate::constants::{
    generate_storage_filename, PLACE_MATCH_RADIUS_KM, UNKNOWN_COUNTRY, UNKNOWN_PLACE,
};
use crate::geo::find_nearest_place;
use crate::geocode::Geocoder;
use crate::models::{MediaType, NewMedia};
use crate::storage::{MediaStorage, StorageError};
use crate::store::{JournalStore, NewPlace, NewSegment, StoreError};

/// Fatal pipeline errors; soft and partial failures never surface here
#[derive(Debug)]
pub enum IngestError {
    /// No authenticated user was supplied
    NotAuthenticated,
    /// Binary upload to object storage failed
    Upload(StorageError),
    /// The final media insert failed
    MediaInsert(StoreError),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::NotAuthenticated => write!(f, "Not authenticated"),
            IngestError::Upload(err) => write!(f, "Upload failed: {}", err),
            IngestError::MediaInsert(err) => write!(f, "Media insert failed: {}", err),
        }
    }
}

impl StdError for IngestError {}

/// A captured file handed to the pipeline
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    fn extension(&self) -> &str {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
            .unwrap_or("bin")
    }
}

/// Manually supplied coordinates, overriding any EXIF fix
#[derive(Debug, Clone, Copy)]
pub struct ManualLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// One ingestion request: a file and/or manual coordinates and/or free text
#[derive(Debug, Clone, Default)]
pub struct IngestRequest {
    pub file: Option<MediaFile>,
    pub manual_location: Option<ManualLocation>,
    pub note_text: Option<String>,
    pub user_id: Option<String>,
}

/// What an ingest attached the captured item to
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    pub media_id: i64,
    pub segment_id: Option<i64>,
    pub place_id: Option<i64>,
    pub storage_path: Option<String>,
    pub location_name: String,
    pub taken_at_ms: i64,
}

/// Orchestrates one capture through geocoding, the relational store and
/// object storage. All collaborators are injected so tests can run the full
/// pipeline against fakes.
pub struct IngestionPipeline<S, G, O> {
    store: S,
    geocoder: G,
    storage: O,
}

impl<S, G, O> IngestionPipeline<S, G, O>
where
    S: JournalStore,
    G: Geocoder,
    O: MediaStorage,
{
    pub fn new(store: S, geocoder: G, storage: O) -> Self {
        Self {
            store,
            geocoder,
            storage,
        }
    }

    /// Run the full pipeline for one captured item.
    pub async fn ingest(&self, request: IngestRequest) -> Result<IngestOutcome, IngestError> {
        let trace = Uuid::new_v4();
        let now_ms = Utc::now().timestamp_millis();

        // Step 1: coordinate resolution. Manual coordinates win; otherwise
        // an image file may carry a GPS fix. EXIF failures are swallowed.
        let capture_meta = match &request.file {
            Some(file) if MediaType::from_file_name(&file.file_name) == MediaType::Photo => {
                read_capture_metadata(&file.bytes)
            }
            _ => None,
        }
        .unwrap_or_else(CaptureMetadata::default);

        let coordinates = request
            .manual_location
            .map(|manual| (manual.latitude, manual.longitude))
            .or_else(|| capture_meta.coordinates());
        let taken_at_ms = capture_meta
            .taken_at
            .map(|taken| taken.timestamp_millis())
            .unwrap_or(now_ms);

        // Step 2: reverse geocoding, soft-failing to the Unknown fallbacks
        let (country, place_name) = match coordinates {
            Some((latitude, longitude)) => {
                match self.geocoder.reverse_geocode(latitude, longitude).await {
                    Ok(geocode) => (
                        geocode.country.unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
                        geocode
                            .place_name
                            .unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
                    ),
                    Err(err) => {
                        warn!("[{}] Reverse geocoding failed, using fallback: {}", trace, err);
                        (UNKNOWN_COUNTRY.to_string(), UNKNOWN_PLACE.to_string())
                    }
                }
            }
            None => (UNKNOWN_COUNTRY.to_string(), UNKNOWN_PLACE.to_string()),
        };
        debug!(
            "[{}] Resolved capture to country='{}' place='{}'",
            trace, country, place_name
        );

        // Step 3: segment resolution, skipped for unknown countries
        let segment_id = if country != UNKNOWN_COUNTRY {
            self.resolve_segment(trace, &country, coordinates, taken_at_ms)
                .await
        } else {
            None
        };

        // Step 4: place resolution, needs both coordinates and a segment
        let place_id = match (coordinates, segment_id) {
            (Some((latitude, longitude)), Some(segment_id)) => {
                self.resolve_place(
                    trace, segment_id, latitude, longitude, &country, &place_name, taken_at_ms,
                )
                .await
            }
            _ => None,
        };

        // Step 5: binary upload; failure is fatal, nothing further is
        // committed (segment/place writes above are not rolled back)
        let storage_path = match &request.file {
            Some(file) => {
                let filename = generate_storage_filename(now_ms, file.extension());
                let stored = self
                    .storage
                    .put(&filename, file.bytes.clone())
                    .await
                    .map_err(IngestError::Upload)?;
                debug!("[{}] Stored {} bytes as {}", trace, file.bytes.len(), stored);
                Some(stored)
            }
            None => None,
        };

        // Step 6: media insert, requires an authenticated user
        let user_id = request.user_id.ok_or(IngestError::NotAuthenticated)?;
        let media_type = if request.note_text.is_some() {
            MediaType::Text
        } else {
            request
                .file
                .as_ref()
                .map(|file| MediaType::from_file_name(&file.file_name))
                .unwrap_or(MediaType::Text)
        };
        let media = NewMedia {
            user_id,
            media_type,
            storage_path: storage_path.clone(),
            description: request.note_text.clone(),
            taken_at_ms,
            latitude: coordinates.map(|(latitude, _)| latitude),
            longitude: coordinates.map(|(_, longitude)| longitude),
            segment_id,
            place_id,
            location_name: Some(place_name.clone()),
        };
        let media_id = self
            .store
            .insert_media(&media)
            .await
            .map_err(IngestError::MediaInsert)?;

        info!(
            "[{}] Ingested media {} (type={}, segment={:?}, place={:?})",
            trace,
            media_id,
            media_type.as_str(),
            segment_id,
            place_id
        );

        Ok(IngestOutcome {
            media_id,
            segment_id,
            place_id,
            storage_path,
            location_name: place_name,
            taken_at_ms,
        })
    }

    /// Reuse the most recent segment for `country` or create a new current
    /// one. Failures are logged and yield `None` (the media row simply gets
    /// no segment link).
    async fn resolve_segment(
        &self,
        trace: Uuid,
        country: &str,
        coordinates: Option<(f64, f64)>,
        taken_at_ms: i64,
    ) -> Option<i64> {
        match self.store.latest_segment_id_for_country(country).await {
            Ok(Some(id)) => {
                debug!("[{}] Reusing segment {} for '{}'", trace, id, country);
                Some(id)
            }
            Ok(None) => {
                // New country: the previous current segment loses its flag
                // before the new one takes it. Two statements, no
                // transaction; concurrent ingests can still race.
                if let Err(err) = self.store.clear_current_segments().await {
                    warn!("[{}] Failed to clear current segment flags: {}", trace, err);
                }
                let (latitude, longitude) = coordinates.unwrap_or((0.0, 0.0));
                let segment = NewSegment {
                    name: country.to_string(),
                    country: country.to_string(),
                    latitude,
                    longitude,
                    arrival_ms: taken_at_ms,
                    is_current: true,
                };
                match self.store.insert_segment(&segment).await {
                    Ok(id) => {
                        info!("[{}] Created segment {} for '{}'", trace, id, country);
                        Some(id)
                    }
                    Err(err) => {
                        warn!("[{}] Failed to create segment for '{}': {}", trace, country, err);
                        None
                    }
                }
            }
            Err(err) => {
                warn!("[{}] Segment lookup failed for '{}': {}", trace, country, err);
                None
            }
        }
    }

    /// Match the coordinate against every known place; reuse within the
    /// proximity threshold, create otherwise. Failures are logged and yield
    /// `None`.
    #[allow(clippy::too_many_arguments)]
    async fn resolve_place(
        &self,
        trace: Uuid,
        segment_id: i64,
        latitude: f64,
        longitude: f64,
        country: &str,
        place_name: &str,
        taken_at_ms: i64,
    ) -> Option<i64> {
        let places = match self.store.list_places().await {
            Ok(places) => places,
            Err(err) => {
                warn!("[{}] Place lookup failed: {}", trace, err);
                return None;
            }
        };

        if let Some(nearest) = find_nearest_place(latitude, longitude, &places) {
            if nearest.distance_km < PLACE_MATCH_RADIUS_KM {
                debug!(
                    "[{}] Reusing place {} '{}' at {:.3} km",
                    trace, nearest.place.id, nearest.place.name, nearest.distance_km
                );
                // Revisit bookkeeping only; the match stands even if it fails
                if let Err(err) = self
                    .store
                    .touch_place_visit(nearest.place.id, taken_at_ms)
                    .await
                {
                    warn!("[{}] Failed to refresh place visit time: {}", trace, err);
                }
                return Some(nearest.place.id);
            }
        }

        let place = NewPlace {
            segment_id,
            name: place_name.to_string(),
            latitude,
            longitude,
            country: country.to_string(),
            visited_ms: taken_at_ms,
        };
        match self.store.insert_place(&place).await {
            Ok(id) => {
                info!("[{}] Created place {} '{}'", trace, id, place_name);
                Some(id)
            }
            Err(err) => {
                warn!("[{}] Failed to create place '{}': {}", trace, place_name, err);
                None
            }
        }
    }
}
