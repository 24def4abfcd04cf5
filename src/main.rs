use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use travel_moments::config::JournalConfig;
use travel_moments::credentials;
use travel_moments::db;
use travel_moments::geocode::{HttpGeocoder, DEFAULT_GEOCODER_ENDPOINT};
use travel_moments::ingest::{IngestRequest, IngestionPipeline, ManualLocation, MediaFile};
use travel_moments::itinerary::{resolve_current, resolve_next, trip_stats};
use travel_moments::location::format_location;
use travel_moments::sftp::SftpConfig;
use travel_moments::storage::{LocalDirStorage, MediaStorage, SftpStorage, StorageError};
use travel_moments::store::{JournalStore, SqlJournalStore};

#[derive(Parser, Debug)]
#[command(author, version, about = "Ingest travel captures and track the itinerary")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the journal database schema
    Init {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Ingest a captured file and/or note into the journal
    Ingest {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: PathBuf,

        /// Captured media file to ingest
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Manual latitude, overriding any EXIF fix
        #[arg(long, requires = "longitude", allow_hyphen_values = true)]
        latitude: Option<f64>,

        /// Manual longitude, overriding any EXIF fix
        #[arg(long, requires = "latitude", allow_hyphen_values = true)]
        longitude: Option<f64>,

        /// Free-text note or caption
        #[arg(short, long)]
        note: Option<String>,

        /// Authenticated user id recorded on the media row
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Show the current destination and trip stats
    Status {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Object storage backend picked from the config file
enum StorageBackend {
    Local(LocalDirStorage),
    Sftp(SftpStorage),
}

impl MediaStorage for StorageBackend {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        match self {
            StorageBackend::Local(storage) => storage.put(path, bytes).await,
            StorageBackend::Sftp(storage) => storage.put(path, bytes).await,
        }
    }

    fn public_url(&self, path: &str) -> String {
        match self {
            StorageBackend::Local(storage) => storage.public_url(path),
            StorageBackend::Sftp(storage) => storage.public_url(path),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Init { config } => init(&config).await,
        Command::Ingest {
            config,
            file,
            latitude,
            longitude,
            note,
            user,
        } => ingest(&config, file, latitude, longitude, note, user).await,
        Command::Status { config } => status(&config).await,
    }
}

/// Load and validate the config file (required for every command)
fn load_config(config_path: &Path) -> Result<JournalConfig, Box<dyn std::error::Error>> {
    let config_content = std::fs::read_to_string(config_path)
        .map_err(|e| format!("Failed to read config file '{}': {}", config_path.display(), e))?;
    let config: JournalConfig = toml::from_str(&config_content)
        .map_err(|e| format!("Failed to parse config file '{}': {}", config_path.display(), e))?;
    config.validate()?;
    Ok(config)
}

async fn init(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let pool = db::open_database_pool(&config.database_path).await?;
    db::init_database_schema(&pool).await?;
    println!("Journal database ready: {}", config.database_path.display());
    Ok(())
}

fn build_storage(config: &JournalConfig) -> Result<StorageBackend, Box<dyn std::error::Error>> {
    if config.upload_to_sftp.unwrap_or(false) {
        // validate() guarantees the section exists when the flag is set
        let sftp = config
            .sftp
            .as_ref()
            .ok_or("upload_to_sftp is enabled but [sftp] section is missing in config")?;
        let creds =
            credentials::load_credentials().map_err(|e| e as Box<dyn std::error::Error>)?;
        let password = credentials::get_sftp_password(&creds, &sftp.credential_profile)?;
        let sftp_config = SftpConfig {
            host: sftp.host.clone(),
            port: sftp.port,
            username: sftp.username.clone(),
            password,
        };
        Ok(StorageBackend::Sftp(SftpStorage::new(
            sftp_config,
            sftp.remote_dir.clone(),
            config.public_base_url.clone(),
        )))
    } else {
        Ok(StorageBackend::Local(LocalDirStorage::new(
            config.media_dir.clone(),
            config.public_base_url.clone(),
        )))
    }
}

async fn ingest(
    config_path: &Path,
    file: Option<PathBuf>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    note: Option<String>,
    user: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;

    let pool = db::open_database_pool(&config.database_path).await?;
    db::init_database_schema(&pool).await?;
    let store = SqlJournalStore::new(pool);

    let creds = credentials::load_credentials().map_err(|e| e as Box<dyn std::error::Error>)?;
    let token = credentials::get_geocoder_token(&creds, &config.geocoder.credential_profile)?;
    let endpoint = config
        .geocoder
        .endpoint
        .clone()
        .unwrap_or_else(|| DEFAULT_GEOCODER_ENDPOINT.to_string());
    let geocoder = HttpGeocoder::new(endpoint, token);

    let storage = build_storage(&config)?;

    let media_file = match file {
        Some(path) => {
            let bytes = std::fs::read(&path)
                .map_err(|e| format!("Failed to read media file '{}': {}", path.display(), e))?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            Some(MediaFile { file_name, bytes })
        }
        None => None,
    };

    let manual_location = match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(ManualLocation {
            latitude,
            longitude,
        }),
        _ => None,
    };

    let pipeline = IngestionPipeline::new(store, geocoder, storage);
    let outcome = pipeline
        .ingest(IngestRequest {
            file: media_file,
            manual_location,
            note_text: note,
            user_id: user,
        })
        .await?;

    println!("Ingested media {} ({})", outcome.media_id, outcome.location_name);
    match (outcome.segment_id, outcome.place_id) {
        (Some(segment_id), Some(place_id)) => {
            println!("Attached to segment {} / place {}", segment_id, place_id)
        }
        (Some(segment_id), None) => println!("Attached to segment {}", segment_id),
        _ => println!("No segment/place link (no usable coordinates)"),
    }
    Ok(())
}

async fn status(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let pool = db::open_database_pool(&config.database_path).await?;
    db::init_database_schema(&pool).await?;
    let store = SqlJournalStore::new(pool);

    let segments = store.list_segments().await?;
    let now = Utc::now();

    let current = match resolve_current(&segments, now) {
        Some(current) => current,
        None => {
            println!("No destinations recorded yet");
            return Ok(());
        }
    };

    // The segment name usually repeats the country; the context country
    // keeps the label from reading "Japan, Japan"
    println!(
        "Currently in: {}",
        format_location(&current.name, &current.country, Some(&current.country))
    );
    if let Some(next) = resolve_next(&segments, Some(current)) {
        println!(
            "Next stop: {}",
            format_location(&next.name, &next.country, Some(&current.country))
        );
    }
    let stats = trip_stats(&segments, now);
    println!(
        "{} stops, {} days on the road",
        stats.total_stops, stats.days_on_road
    );
    Ok(())
}
