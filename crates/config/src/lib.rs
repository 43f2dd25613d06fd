pub mod schema;
pub mod watcher;

pub use schema::{SeriesConfig, SeriesTable, SourceConfig, StripConfig, ThemeConfig, ViewConfig};
pub use watcher::ConfigWatcher;

use std::path::{Path, PathBuf};
use strip_core::{Result, StripError};

/// Load configuration from a TOML file.  Returns `StripConfig::default()` if
/// the file doesn't exist so the chart always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<StripConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(StripConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| StripError::Config(format!("cannot read '{}': {e}", path.display())))?;

    parse(&raw)
}

/// Parse a config document.
pub fn parse(raw: &str) -> Result<StripConfig> {
    toml::from_str(raw).map_err(|e| StripError::Config(format!("TOML parse error: {e}")))
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("strip").join("strip.toml")
}
