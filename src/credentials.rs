use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Credentials file structure
///
/// Format:
/// ```toml
/// [sftp.profile_name]
/// password = "your_sftp_password_here"
///
/// [geocoder.profile_name]
/// token = "your_geocoder_access_token_here"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Credentials {
    #[serde(default)]
    pub sftp: HashMap<String, PasswordProfile>,
    #[serde(default)]
    pub geocoder: HashMap<String, TokenProfile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordProfile {
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenProfile {
    pub token: String,
}

/// Get the default credentials file path: ~/.config/travel_moments/credentials.toml
pub fn get_credentials_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
        .join(".config")
        .join("travel_moments")
        .join("credentials.toml")
}

/// Load credentials from the default location
/// Returns None if the file doesn't exist
pub fn load_credentials() -> Result<Option<Credentials>, Box<dyn std::error::Error + Send + Sync>> {
    let creds_path = get_credentials_path();

    if !creds_path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&creds_path)?;
    let credentials: Credentials = toml::from_str(&content)?;

    Ok(Some(credentials))
}

/// Get the SFTP password for a profile
pub fn get_sftp_password(credentials: &Option<Credentials>, profile: &str) -> Result<String, String> {
    match credentials {
        Some(creds) => creds
            .sftp
            .get(profile)
            .map(|p| p.password.clone())
            .ok_or_else(|| {
                format!(
                    "Credential profile '[sftp.{}]' not found in credentials file",
                    profile
                )
            }),
        None => Err(format!(
            "Credentials file not found. Expected at: {}",
            get_credentials_path().display()
        )),
    }
}

/// Get the geocoder access token for a profile
pub fn get_geocoder_token(
    credentials: &Option<Credentials>,
    profile: &str,
) -> Result<String, String> {
    match credentials {
        Some(creds) => creds
            .geocoder
            .get(profile)
            .map(|p| p.token.clone())
            .ok_or_else(|| {
                format!(
                    "Credential profile '[geocoder.{}]' not found in credentials file",
                    profile
                )
            }),
        None => Err(format!(
            "Credentials file not found. Expected at: {}",
            get_credentials_path().display()
        )),
    }
}
