//! Configuration baked into the firmware image.
//!
//! `build.rs` re-runs when `FIREALARM_CONFIG_JSON` changes; when the
//! variable is set at build time its JSON document replaces the compiled
//! defaults.  Invalid documents are rejected, not patched.

use log::info;

use crate::app::ports::ConfigPort;
use crate::config::{AlarmConfig, ConfigError};

/// JSON override captured at build time, if any.
pub const BUILD_CONFIG_JSON: Option<&str> = option_env!("FIREALARM_CONFIG_JSON");

pub struct EmbeddedConfig {
    json: Option<&'static str>,
}

impl EmbeddedConfig {
    pub const fn new(json: Option<&'static str>) -> Self {
        Self { json }
    }

    /// The override captured when this firmware was built.
    pub const fn from_build() -> Self {
        Self::new(BUILD_CONFIG_JSON)
    }
}

impl ConfigPort for EmbeddedConfig {
    fn load(&self) -> Result<AlarmConfig, ConfigError> {
        match self.json {
            Some(doc) => {
                let config = AlarmConfig::from_json(doc.as_bytes())?;
                info!("Config: build-time override applied");
                Ok(config)
            }
            None => {
                info!("Config: compiled defaults");
                Ok(AlarmConfig::default())
            }
        }
    }
}
