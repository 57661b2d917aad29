use std::path::Path;

use anyhow::{Context, Result};
use bgi_nls::Encoding;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "bgi-tool.toml";

/// Logger configuration; `RUST_LOG` still wins when set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: LevelFilter,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self { level: LevelFilter::Info }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ToolConfig {
    /// Encoding of the shipped string sections.
    pub source_nls: Encoding,
    /// Encoding written into rebuilt scripts.
    pub target_nls: Encoding,
    /// Sub-folder, next to each input, receiving rebuilt scripts.
    pub rebuild_dir: String,
    pub logger: LoggerConfig,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            source_nls: Encoding::ShiftJis,
            target_nls: Encoding::Utf8,
            rebuild_dir: "rebuild".to_string(),
            logger: LoggerConfig::default(),
        }
    }
}

impl ToolConfig {
    /// An explicit path must exist; otherwise `bgi-tool.toml` is used if present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::read(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config: {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parse config: {}", path.display()))
    }
}
