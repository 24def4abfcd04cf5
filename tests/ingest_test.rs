use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::runtime::Runtime;

use travel_moments::db;
use travel_moments::geo::distance_km;
use travel_moments::geocode::{GeocodeError, Geocoder, ReverseGeocode};
use travel_moments::ingest::{
    IngestError, IngestRequest, IngestionPipeline, ManualLocation, MediaFile,
};
use travel_moments::storage::{MediaStorage, StorageError};
use travel_moments::store::{JournalStore, NewPlace, NewSegment, SqlJournalStore};

/// Geocoder stub returning a fixed answer, or failing when `fail` is set
struct StubGeocoder {
    country: Option<String>,
    place_name: Option<String>,
    fail: bool,
}

impl StubGeocoder {
    fn returning(country: &str, place_name: &str) -> Self {
        Self {
            country: Some(country.to_string()),
            place_name: Some(place_name.to_string()),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            country: None,
            place_name: None,
            fail: true,
        }
    }
}

impl Geocoder for StubGeocoder {
    async fn reverse_geocode(
        &self,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<ReverseGeocode, GeocodeError> {
        if self.fail {
            return Err(GeocodeError::Http("stubbed provider outage".to_string()));
        }
        Ok(ReverseGeocode {
            country: self.country.clone(),
            place_name: self.place_name.clone(),
        })
    }
}

/// In-memory object storage fake
#[derive(Default)]
struct MemoryStorage {
    files: Mutex<HashMap<String, Vec<u8>>>,
    fail: bool,
}

impl MemoryStorage {
    fn failing() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            fail: true,
        }
    }

    fn stored_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

impl MediaStorage for MemoryStorage {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        if self.fail {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "stubbed upload failure",
            )));
        }
        self.files.lock().unwrap().insert(path.to_string(), bytes);
        Ok(path.to_string())
    }

    fn public_url(&self, path: &str) -> String {
        format!("memory://{}", path)
    }
}

async fn fresh_store() -> (SqlitePool, SqlJournalStore) {
    let pool = db::create_test_pool_in_memory().await.unwrap();
    let store = SqlJournalStore::new(pool.clone());
    (pool, store)
}

/// Seed one segment and return its id
async fn seed_segment(store: &SqlJournalStore, country: &str) -> i64 {
    store
        .insert_segment(&NewSegment {
            name: country.to_string(),
            country: country.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            arrival_ms: 1_700_000_000_000,
            is_current: true,
        })
        .await
        .unwrap()
}

/// Seed one place under `segment_id` and return its id
async fn seed_place(store: &SqlJournalStore, segment_id: i64, latitude: f64, longitude: f64) -> i64 {
    store
        .insert_place(&NewPlace {
            segment_id,
            name: "Seeded Place".to_string(),
            latitude,
            longitude,
            country: "Japan".to_string(),
            visited_ms: 1_700_000_000_000,
        })
        .await
        .unwrap()
}

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM {}", table);
    sqlx::query_scalar(&sql).fetch_one(pool).await.unwrap()
}

fn note_request(latitude: f64, longitude: f64, note: &str) -> IngestRequest {
    IngestRequest {
        file: None,
        manual_location: Some(ManualLocation {
            latitude,
            longitude,
        }),
        note_text: Some(note.to_string()),
        user_id: Some("user-1".to_string()),
    }
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[test]
fn test_note_with_fresh_country_creates_segment_and_place() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let (pool, store) = fresh_store().await;
        let pipeline = IngestionPipeline::new(
            store,
            StubGeocoder::returning("Japan", "Kyoto"),
            MemoryStorage::default(),
        );

        let outcome = pipeline
            .ingest(note_request(35.0, 135.0, "hello"))
            .await
            .unwrap();

        let segment_id = outcome.segment_id.expect("segment should be created");
        let place_id = outcome.place_id.expect("place should be created");
        assert_eq!(outcome.storage_path, None, "text notes carry no binary");
        assert_eq!(outcome.location_name, "Kyoto");

        let segment_row = sqlx::query("SELECT country, is_current FROM segments WHERE id = ?")
            .bind(segment_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(segment_row.get::<String, _>("country"), "Japan");
        assert_eq!(segment_row.get::<i64, _>("is_current"), 1);

        let place_row =
            sqlx::query("SELECT name, latitude, longitude, segment_id FROM places WHERE id = ?")
                .bind(place_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(place_row.get::<String, _>("name"), "Kyoto");
        assert_eq!(place_row.get::<i64, _>("segment_id"), segment_id);
        let d = distance_km(
            35.0,
            135.0,
            place_row.get::<f64, _>("latitude"),
            place_row.get::<f64, _>("longitude"),
        );
        assert!(d < 1.0, "new place should sit at the captured coordinate");

        let media_row = sqlx::query(
            "SELECT media_type, segment_id, place_id, location_name, description FROM media",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(media_row.get::<String, _>("media_type"), "text");
        assert_eq!(media_row.get::<i64, _>("segment_id"), segment_id);
        assert_eq!(media_row.get::<i64, _>("place_id"), place_id);
        assert_eq!(media_row.get::<String, _>("location_name"), "Kyoto");
        assert_eq!(media_row.get::<String, _>("description"), "hello");
    });
}

#[test]
fn test_existing_segment_is_reused() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let (pool, store) = fresh_store().await;
        let existing_id = seed_segment(&store, "Japan").await;

        let pipeline = IngestionPipeline::new(
            store,
            StubGeocoder::returning("Japan", "Kyoto"),
            MemoryStorage::default(),
        );
        let outcome = pipeline
            .ingest(note_request(35.0, 135.0, "back again"))
            .await
            .unwrap();

        assert_eq!(outcome.segment_id, Some(existing_id));
        assert_eq!(count(&pool, "segments").await, 1, "no duplicate segment");
    });
}

#[test]
fn test_nearby_place_is_reused() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let (pool, store) = fresh_store().await;
        let segment_id = seed_segment(&store, "Japan").await;
        let place_id = seed_place(&store, segment_id, 35.0, 135.0).await;

        let pipeline = IngestionPipeline::new(
            store,
            StubGeocoder::returning("Japan", "Kyoto"),
            MemoryStorage::default(),
        );
        // ~0.5 meters from the seeded place, far below the 1 km threshold
        let outcome = pipeline
            .ingest(note_request(35.0000045, 135.0, "same spot"))
            .await
            .unwrap();

        assert_eq!(outcome.place_id, Some(place_id));
        assert_eq!(count(&pool, "places").await, 1, "no duplicate place");

        // Revisit bookkeeping: the match refreshed last_visited_ms
        let last_visited: i64 = sqlx::query_scalar("SELECT last_visited_ms FROM places WHERE id = ?")
            .bind(place_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(last_visited > 1_700_000_000_000);
    });
}

#[test]
fn test_distant_coordinate_creates_new_place() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let (pool, store) = fresh_store().await;
        let segment_id = seed_segment(&store, "Japan").await;
        let seeded = seed_place(&store, segment_id, 35.0, 135.0).await;

        let pipeline = IngestionPipeline::new(
            store,
            StubGeocoder::returning("Japan", "Uji"),
            MemoryStorage::default(),
        );
        // ~5 km north of the seeded place
        let outcome = pipeline
            .ingest(note_request(35.045, 135.0, "day trip"))
            .await
            .unwrap();

        let new_place = outcome.place_id.expect("place should be created");
        assert_ne!(new_place, seeded);
        assert_eq!(count(&pool, "places").await, 2);
    });
}

// ============================================================================
// Failure semantics
// ============================================================================

#[test]
fn test_geocode_failure_falls_back_to_unknown() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let (pool, store) = fresh_store().await;
        let pipeline =
            IngestionPipeline::new(store, StubGeocoder::failing(), MemoryStorage::default());

        let outcome = pipeline
            .ingest(note_request(35.0, 135.0, "offline"))
            .await
            .unwrap();

        // Unknown country skips segment (and therefore place) resolution,
        // but the media row still lands
        assert_eq!(outcome.segment_id, None);
        assert_eq!(outcome.place_id, None);
        assert_eq!(outcome.location_name, "Unknown Position");
        assert_eq!(count(&pool, "segments").await, 0);
        assert_eq!(count(&pool, "media").await, 1);
    });
}

#[test]
fn test_missing_user_aborts_before_media_insert() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let (pool, store) = fresh_store().await;
        let pipeline = IngestionPipeline::new(
            store,
            StubGeocoder::returning("Japan", "Kyoto"),
            MemoryStorage::default(),
        );

        let mut request = note_request(35.0, 135.0, "anonymous");
        request.user_id = None;
        let err = pipeline.ingest(request).await.unwrap_err();
        assert!(matches!(err, IngestError::NotAuthenticated));
        assert_eq!(count(&pool, "media").await, 0);
    });
}

#[test]
fn test_upload_failure_aborts_but_keeps_prior_writes() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let (pool, store) = fresh_store().await;
        let pipeline = IngestionPipeline::new(
            store,
            StubGeocoder::returning("Japan", "Kyoto"),
            MemoryStorage::failing(),
        );

        let request = IngestRequest {
            file: Some(MediaFile {
                file_name: "photo.jpg".to_string(),
                bytes: vec![0xff, 0xd8, 0xff],
            }),
            manual_location: Some(ManualLocation {
                latitude: 35.0,
                longitude: 135.0,
            }),
            note_text: None,
            user_id: Some("user-1".to_string()),
        };
        let err = pipeline.ingest(request).await.unwrap_err();
        assert!(matches!(err, IngestError::Upload(_)));

        // No rollback: the segment and place created in earlier steps stay
        assert_eq!(count(&pool, "segments").await, 1);
        assert_eq!(count(&pool, "places").await, 1);
        assert_eq!(count(&pool, "media").await, 0);
    });
}

#[test]
fn test_photo_upload_stores_binary_and_infers_type() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let (pool, store) = fresh_store().await;
        let storage = MemoryStorage::default();
        let pipeline = IngestionPipeline::new(
            store,
            StubGeocoder::returning("Japan", "Kyoto"),
            storage,
        );

        // Garbage bytes: EXIF extraction fails softly, manual location wins
        let request = IngestRequest {
            file: Some(MediaFile {
                file_name: "IMG_0001.jpg".to_string(),
                bytes: vec![1, 2, 3, 4],
            }),
            manual_location: Some(ManualLocation {
                latitude: 35.0,
                longitude: 135.0,
            }),
            note_text: None,
            user_id: Some("user-1".to_string()),
        };
        let outcome = pipeline.ingest(request).await.unwrap();

        let storage_path = outcome.storage_path.expect("binary should be stored");
        assert!(storage_path.ends_with(".jpg"));

        let media_row = sqlx::query("SELECT media_type, storage_path FROM media")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(media_row.get::<String, _>("media_type"), "photo");
        assert_eq!(media_row.get::<String, _>("storage_path"), storage_path);
    });
}

#[test]
fn test_new_country_takes_over_current_flag() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let (pool, store) = fresh_store().await;

        let japan = IngestionPipeline::new(
            store.clone(),
            StubGeocoder::returning("Japan", "Kyoto"),
            MemoryStorage::default(),
        );
        japan
            .ingest(note_request(35.0, 135.0, "arrived"))
            .await
            .unwrap();

        let thailand = IngestionPipeline::new(
            store,
            StubGeocoder::returning("Thailand", "Chiang Mai"),
            MemoryStorage::default(),
        );
        thailand
            .ingest(note_request(18.79, 98.98, "moved on"))
            .await
            .unwrap();

        let current_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM segments WHERE is_current = 1")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(current_count, 1, "only the newest segment stays current");

        let current_country: String =
            sqlx::query_scalar("SELECT country FROM segments WHERE is_current = 1")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(current_country, "Thailand");
    });
}

#[test]
fn test_text_only_note_without_location() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let (pool, store) = fresh_store().await;
        let pipeline = IngestionPipeline::new(
            store,
            StubGeocoder::returning("Japan", "Kyoto"),
            MemoryStorage::default(),
        );

        let request = IngestRequest {
            file: None,
            manual_location: None,
            note_text: Some("thoughts from the train".to_string()),
            user_id: Some("user-1".to_string()),
        };
        let outcome = pipeline.ingest(request).await.unwrap();

        // No coordinates: geocoding is skipped entirely and nothing links
        assert_eq!(outcome.segment_id, None);
        assert_eq!(outcome.place_id, None);
        assert_eq!(outcome.location_name, "Unknown Position");
        assert_eq!(count(&pool, "media").await, 1);
    });
}

#[test]
fn test_storage_fake_receives_bytes() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let storage = MemoryStorage::default();
        assert_eq!(storage.stored_count(), 0);
        let stored = storage.put("a.jpg", vec![9, 9]).await.unwrap();
        assert_eq!(stored, "a.jpg");
        assert_eq!(storage.stored_count(), 1);
        assert_eq!(storage.public_url("a.jpg"), "memory://a.jpg");
    });
}
