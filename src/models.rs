use serde::{Deserialize, Serialize};

/// One contiguous country-level stay in the itinerary.
///
/// Timestamps are epoch milliseconds (UTC). A `None` departure means the
/// stay is ongoing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub arrival_ms: i64,
    pub departure_ms: Option<i64>,
    pub is_current: bool,
}

/// A city-level point of interest nested under a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: i64,
    pub segment_id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    pub first_visited_ms: i64,
    pub last_visited_ms: i64,
}

/// Kind of captured artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Photo,
    Video,
    Audio,
    Text,
}

impl MediaType {
    /// Column value stored in the media table
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Photo => "photo",
            MediaType::Video => "video",
            MediaType::Audio => "audio",
            MediaType::Text => "text",
        }
    }

    /// Infer the media type from a file name's extension.
    ///
    /// Unrecognized extensions fall back to photo, matching capture sources
    /// that omit a usable content type.
    pub fn from_file_name(file_name: &str) -> Self {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "mp4" | "mov" | "m4v" | "webm" | "avi" => MediaType::Video,
            "mp3" | "m4a" | "aac" | "ogg" | "opus" | "wav" | "flac" => MediaType::Audio,
            _ => MediaType::Photo,
        }
    }
}

/// A media row ready for insertion (id assigned by the database).
#[derive(Debug, Clone)]
pub struct NewMedia {
    pub user_id: String,
    pub media_type: MediaType,
    pub storage_path: Option<String>,
    pub description: Option<String>,
    pub taken_at_ms: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub segment_id: Option<i64>,
    pub place_id: Option<i64>,
    pub location_name: Option<String>,
}
