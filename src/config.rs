//! Settings loaded from an optional JSON file, then overridden from the command line.

use crate::charts::MapOptions;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid config '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory holding the `accident_<year>.csv.bz2` files.
    pub data_dir: PathBuf,
    pub map: MapSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            map: MapSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapSettings {
    pub width: u32,
    pub height: u32,
    pub point_radius: u32,
    pub outline: Option<PathBuf>,
}

impl Default for MapSettings {
    fn default() -> Self {
        let defaults = MapOptions::default();
        Self {
            width: defaults.width,
            height: defaults.height,
            point_radius: defaults.point_radius,
            outline: defaults.outline,
        }
    }
}

impl MapSettings {
    pub fn to_options(&self, output: PathBuf) -> MapOptions {
        MapOptions {
            output,
            width: self.width,
            height: self.height,
            point_radius: self.point_radius,
            outline: self.outline.clone(),
        }
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }
}
