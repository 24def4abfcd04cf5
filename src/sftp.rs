//! Minimal SFTP uploader for pushing media binaries to a remote host.

use ssh2::{Session, Sftp};
use std::error::Error as StdError;
use std::fmt;
use std::io::Write;
use std::net::TcpStream;
use std::path::{Path, PathBuf};

/// SFTP-specific errors
#[derive(Debug)]
pub enum SftpError {
    /// Failed to establish TCP connection
    ConnectionFailed(String),
    /// SSH authentication failed
    AuthenticationFailed(String),
    /// Remote file operation failed
    RemoteFileError(PathBuf, String),
    /// Directory creation failed
    DirectoryError(PathBuf, String),
    /// File size mismatch after upload
    SizeMismatch { expected: u64, actual: u64 },
    /// SSH2 library error
    Ssh2Error(ssh2::Error),
}

impl fmt::Display for SftpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SftpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            SftpError::AuthenticationFailed(msg) => write!(f, "Authentication failed: {}", msg),
            SftpError::RemoteFileError(path, msg) => {
                write!(f, "Remote file error '{}': {}", path.display(), msg)
            }
            SftpError::DirectoryError(path, msg) => {
                write!(f, "Directory error '{}': {}", path.display(), msg)
            }
            SftpError::SizeMismatch { expected, actual } => {
                write!(
                    f,
                    "Size mismatch: expected {} bytes, got {} bytes",
                    expected, actual
                )
            }
            SftpError::Ssh2Error(err) => write!(f, "SSH2 error: {}", err),
        }
    }
}

impl StdError for SftpError {}

impl From<ssh2::Error> for SftpError {
    fn from(err: ssh2::Error) -> Self {
        SftpError::Ssh2Error(err)
    }
}

pub type Result<T> = std::result::Result<T, SftpError>;

/// Connection parameters; password auth only
#[derive(Debug, Clone)]
pub struct SftpConfig {
    /// Hostname or IP address
    pub host: String,
    /// Port number (default: 22)
    pub port: u16,
    /// Username for authentication
    pub username: String,
    /// Password resolved from the credentials file
    pub password: String,
}

/// SFTP client holding one authenticated session
pub struct SftpClient {
    _session: Session,
    sftp: Sftp,
}

impl SftpClient {
    /// Connect and authenticate
    pub fn connect(config: &SftpConfig) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port);
        let tcp = TcpStream::connect(&addr).map_err(|e| {
            SftpError::ConnectionFailed(format!("Failed to connect to {}: {}", addr, e))
        })?;

        let mut session = Session::new()?;
        session.set_tcp_stream(tcp);
        session.handshake()?;
        session
            .userauth_password(&config.username, &config.password)
            .map_err(|e| {
                SftpError::AuthenticationFailed(format!(
                    "Password authentication failed for user '{}': {}",
                    config.username, e
                ))
            })?;
        if !session.authenticated() {
            return Err(SftpError::AuthenticationFailed(
                "Authentication failed (session not authenticated)".to_string(),
            ));
        }

        let sftp = session.sftp()?;
        Ok(Self {
            _session: session,
            sftp,
        })
    }

    /// Create a directory recursively, like `mkdir -p`
    pub fn mkdir_p(&self, path: &Path) -> Result<()> {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if self.sftp.mkdir(&current, 0o755).is_err() {
                // Creation fails when the directory already exists; only a
                // missing or non-directory path is fatal
                match self.sftp.stat(&current) {
                    Ok(stat) if stat.is_dir() => {}
                    Ok(_) => {
                        return Err(SftpError::DirectoryError(
                            current.clone(),
                            "Path exists but is not a directory".to_string(),
                        ));
                    }
                    Err(e) => {
                        return Err(SftpError::DirectoryError(
                            current.clone(),
                            format!("Failed to create directory: {}", e),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Upload a byte buffer to `remote_path`, creating parent directories.
    ///
    /// Writes to a `.tmpupload` sibling first and renames into place after a
    /// size check, so readers never observe a partial file.
    pub fn upload_bytes(&self, bytes: &[u8], remote_path: &Path) -> Result<()> {
        let temp_path = PathBuf::from(format!("{}.tmpupload", remote_path.display()));

        if let Some(parent) = remote_path.parent() {
            if !parent.as_os_str().is_empty() {
                self.mkdir_p(parent)?;
            }
        }

        let mut remote_file = self.sftp.create(&temp_path).map_err(|e| {
            SftpError::RemoteFileError(
                temp_path.clone(),
                format!("Failed to create remote file: {}", e),
            )
        })?;
        remote_file.write_all(bytes).map_err(|e| {
            SftpError::RemoteFileError(
                temp_path.clone(),
                format!("Failed to write to remote file: {}", e),
            )
        })?;
        remote_file.flush().map_err(|e| {
            SftpError::RemoteFileError(
                temp_path.clone(),
                format!("Failed to flush remote file: {}", e),
            )
        })?;
        drop(remote_file);

        let stat = self.sftp.stat(&temp_path).map_err(|e| {
            SftpError::RemoteFileError(
                temp_path.clone(),
                format!("Failed to stat remote file after upload: {}", e),
            )
        })?;
        let remote_size = stat.size.unwrap_or(0);
        if remote_size != bytes.len() as u64 {
            let _ = self.sftp.unlink(&temp_path);
            return Err(SftpError::SizeMismatch {
                expected: bytes.len() as u64,
                actual: remote_size,
            });
        }

        self.sftp.rename(&temp_path, remote_path, None).map_err(|e| {
            SftpError::RemoteFileError(
                remote_path.to_path_buf(),
                format!("Failed to rename temp file to final path: {}", e),
            )
        })
    }
}
