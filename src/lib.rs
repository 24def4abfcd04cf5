// Library interface for testing

// Declare all modules
pub mod capture;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod db;
pub mod geo;
pub mod geocode;
pub mod ingest;
pub mod itinerary;
pub mod location;
pub mod models;
pub mod queries;
pub mod schema;
pub mod sftp;
pub mod storage;
pub mod store;

// Re-export the proximity threshold for convenience
pub use constants::PLACE_MATCH_RADIUS_KM;
