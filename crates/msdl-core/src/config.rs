use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Options for one download run; immutable once the service is built.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Maximum simultaneous chunk fetches.
    pub connections: usize,
    /// Per-HTTP-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Verify the staged file's MD5 against the sources' ETag when one is
    /// advertised.
    pub check_integrity: bool,
    /// Final destination path; the staging file lives next to it.
    pub destination_path: PathBuf,
    /// Suppress per-chunk and completion progress output.
    pub quiet: bool,
}

/// Flag defaults loaded from `~/.config/msdl/config.toml`. CLI flags
/// override these per invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MsdlConfig {
    /// Default maximum number of concurrent connections.
    pub connections: usize,
    /// Default per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for MsdlConfig {
    fn default() -> Self {
        Self {
            connections: 5,
            timeout_seconds: 10,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("msdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MsdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MsdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: MsdlConfig = toml::from_str(&data)?;
    Ok(cfg)
}
