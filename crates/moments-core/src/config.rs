//! Library configuration.
//!
//! A [`Config`] is a plain value handed to the services that need it; there
//! is no process-wide instance. Documents are JSON and every field is
//! optional:
//!
//! ```json
//! { "timezone": "Europe/Berlin", "layout": { "max_columns": 24 } }
//! ```

use std::fs;
use std::path::Path;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{MomentsError, Result};
use crate::layout::LayoutConfig;
use crate::tz::parse_tz;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// IANA timezone name all calendar boundaries are computed in.
    pub timezone: String,
    pub layout: LayoutConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Config {
    /// Parse and validate a JSON config document.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(input)
            .map_err(|e| MomentsError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            MomentsError::InvalidConfig(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    /// The configured timezone.
    pub fn timezone(&self) -> Result<Tz> {
        parse_tz(&self.timezone)
    }

    pub fn validate(&self) -> Result<()> {
        self.timezone()?;
        self.layout.validate()
    }
}
