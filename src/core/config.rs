use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::core::error::{Error, ErrorKind, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mapper: MapperConfig,
    pub search: SearchConfig,
    pub sync: SyncConfig,
    pub store: StoreConfig,
}

impl Config {
    /// Loads a JSON config file; missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            Error::with_source(
                ErrorKind::Parse,
                format!("invalid config {}: {}", path.display(), e),
                e,
            )
        })
    }
}

/// Document mapper switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub fail_on_unknown_properties: bool,
    pub accept_single_value_as_array: bool,
    pub validate_field_types: bool,   // check values against declared FieldType
    pub indent_output: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        MapperConfig {
            fail_on_unknown_properties: false,
            accept_single_value_as_array: true,
            validate_field_types: false,
            indent_output: false,   // index payload size matters
        }
    }
}

impl MapperConfig {
    /// Rejects unknown fields, bare scalars in sequence positions and values
    /// that do not match the declared field type.
    pub fn strict() -> Self {
        MapperConfig {
            fail_on_unknown_properties: true,
            accept_single_value_as_array: false,
            validate_field_types: true,
            indent_output: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_limit: usize,   // hits per free-text query
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            default_limit: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub divergence_capacity: usize,  // oldest entries dropped beyond this
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            divergence_capacity: 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncMode {
    Immediate,  // fsync after every append
    None,       // let the OS flush
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub journal_dir: PathBuf,
    pub sync_mode: SyncMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            journal_dir: PathBuf::from("./data"),
            sync_mode: SyncMode::Immediate,
        }
    }
}
