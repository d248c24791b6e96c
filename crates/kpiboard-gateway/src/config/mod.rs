//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io;

use kpiboard_core::error::{KpiError, Result};

pub use schema::{AdminSection, BoardConfig, ServerSection, StorageSection};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "KPIBOARD_CONFIG";
/// Default config path.
pub const DEFAULT_CONFIG_PATH: &str = "kpiboard.yaml";

pub fn load_from_file(path: &str) -> Result<BoardConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| KpiError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

/// Like [`load_from_file`], but a missing file means "all defaults".
pub fn load_or_default(path: &str) -> Result<BoardConfig> {
    match fs::read_to_string(path) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!(path, "config file not found; using defaults");
            let cfg = BoardConfig::default();
            cfg.validate()?;
            Ok(cfg)
        }
        Err(e) => Err(KpiError::Internal(format!("read config failed: {e}"))),
    }
}

pub fn load_from_str(s: &str) -> Result<BoardConfig> {
    let cfg: BoardConfig = serde_yaml::from_str(s)
        .map_err(|e| KpiError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Replace the listen port (the `PORT` environment variable).
pub fn apply_port_override(cfg: &mut BoardConfig, port: Option<&str>) -> Result<()> {
    let Some(port) = port.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(());
    };
    let port: u16 = port
        .parse()
        .map_err(|_| KpiError::BadRequest(format!("PORT must be a valid port number: {port}")))?;
    let mut addr = cfg.server.listen_addr()?;
    addr.set_port(port);
    cfg.server.listen = addr.to_string();
    Ok(())
}
