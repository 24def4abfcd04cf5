use serde::Deserialize;
use std::path::PathBuf;

fn default_media_dir() -> PathBuf {
    PathBuf::from("media")
}

/// Journal configuration file structure
#[derive(Debug, Deserialize)]
pub struct JournalConfig {
    /// Path to the SQLite journal database
    pub database_path: PathBuf,
    /// Local directory for stored media binaries (default: media)
    #[serde(default = "default_media_dir")]
    pub media_dir: PathBuf,
    /// Base URL under which stored media paths are publicly reachable
    pub public_base_url: String,
    /// Upload media binaries to SFTP instead of the local media_dir (default: false)
    pub upload_to_sftp: Option<bool>,
    /// SFTP configuration (maps to [sftp] section in TOML)
    pub sftp: Option<SftpUploadConfig>,
    /// Reverse geocoder configuration (maps to [geocoder] section in TOML)
    pub geocoder: GeocoderConfig,
}

/// SFTP upload configuration (maps to [sftp] section in TOML)
#[derive(Debug, Clone, Deserialize)]
pub struct SftpUploadConfig {
    /// SFTP server hostname or IP address
    pub host: String,
    /// SFTP server port (default: 22)
    #[serde(default = "default_sftp_port")]
    pub port: u16,
    /// SFTP username for authentication
    pub username: String,
    /// Credential profile name to look up the password from ~/.config/travel_moments/credentials.toml
    pub credential_profile: String,
    /// Remote directory path where media files land (e.g. /uploads/media)
    pub remote_dir: PathBuf,
}

fn default_sftp_port() -> u16 {
    22
}

/// Reverse geocoder configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderConfig {
    /// Provider endpoint; defaults to the Mapbox places endpoint
    pub endpoint: Option<String>,
    /// Credential profile name to look up the access token
    pub credential_profile: String,
}

impl JournalConfig {
    /// Validate the storage configuration
    ///
    /// If `upload_to_sftp` is true, ensures that the `sftp` configuration
    /// section exists.
    pub fn validate(&self) -> Result<(), String> {
        if self.upload_to_sftp.unwrap_or(false) && self.sftp.is_none() {
            return Err(
                "upload_to_sftp is enabled but [sftp] section is missing in config".to_string(),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parses() {
        let config: JournalConfig = toml::from_str(
            r#"
            database_path = "journal.sqlite"
            public_base_url = "https://cdn.example.com/media"

            [geocoder]
            credential_profile = "mapbox"
            "#,
        )
        .unwrap();
        assert_eq!(config.media_dir, PathBuf::from("media"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sftp_flag_requires_section() {
        let config: JournalConfig = toml::from_str(
            r#"
            database_path = "journal.sqlite"
            public_base_url = "https://cdn.example.com/media"
            upload_to_sftp = true

            [geocoder]
            credential_profile = "mapbox"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
