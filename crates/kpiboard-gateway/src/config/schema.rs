use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;
use kpiboard_core::error::{KpiError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub storage: StorageSection,

    #[serde(default)]
    pub admin: AdminSection,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            storage: StorageSection::default(),
            admin: AdminSection::default(),
        }
    }
}

impl BoardConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(KpiError::UnsupportedVersion);
        }
        self.server.validate()?;
        self.storage.validate()?;
        self.admin.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Page served at `/`.
    #[serde(default = "default_index_file")]
    pub index_file: PathBuf,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            index_file: default_index_file(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            KpiError::BadRequest(format!("server.listen must be a valid socket address: {}", self.listen))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_index_file() -> PathBuf {
    PathBuf::from("templates/index.html")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    #[serde(default = "default_metrics_file")]
    pub metrics_file: PathBuf,

    #[serde(default = "default_uploads_root")]
    pub uploads_root: PathBuf,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            metrics_file: default_metrics_file(),
            uploads_root: default_uploads_root(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl StorageSection {
    pub fn validate(&self) -> Result<()> {
        if self.metrics_file.as_os_str().is_empty() {
            return Err(KpiError::BadRequest("storage.metrics_file must not be empty".into()));
        }
        if self.uploads_root.as_os_str().is_empty() {
            return Err(KpiError::BadRequest("storage.uploads_root must not be empty".into()));
        }
        if !(1024..=1 << 30).contains(&self.max_upload_bytes) {
            return Err(KpiError::BadRequest(
                "storage.max_upload_bytes must be between 1024 and 1073741824".into(),
            ));
        }
        Ok(())
    }
}

fn default_metrics_file() -> PathBuf {
    PathBuf::from("metrics.json")
}
fn default_uploads_root() -> PathBuf {
    PathBuf::from("uploads")
}
fn default_max_upload_bytes() -> usize {
    50 << 20
}

/// The single shared admin credential.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminSection {
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
}

impl fmt::Debug for AdminSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSection")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Default for AdminSection {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
        }
    }
}

impl AdminSection {
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(KpiError::BadRequest("admin.username and admin.password must not be empty".into()));
        }
        if self.username.contains(':') {
            return Err(KpiError::BadRequest("admin.username must not contain ':'".into()));
        }
        Ok(())
    }
}

fn default_username() -> String {
    "admin".into()
}
fn default_password() -> String {
    "secret".into()
}
