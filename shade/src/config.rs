//! Engine configuration, read from TOML.

use std::path::Path;

use derive_more::Display;
use derive_more::Error;
use derive_more::From;
use serde::Deserialize;
use serde::Serialize;

use crate::cpu::ENTRY_POINT;

/// What the bus does when an access lands somewhere with no backing storage: the unusable
/// 0xFEA0..0xFF00 range, a ROM bank past the end of the cartridge, or external RAM that the
/// cartridge does not have.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessPolicy {
    /// Reads return 0xFF and writes are dropped. A warning is logged either way.
    #[default]
    Sentinel,
    /// Same as `Sentinel`, but the step that made the access halts with a bus fault.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub unhandled_access: AccessPolicy,
    /// Where the CPU starts executing.
    #[serde(default = "default_entry_point")]
    pub entry_point: u16,
}

fn default_entry_point() -> u16 {
    ENTRY_POINT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unhandled_access: AccessPolicy::default(),
            entry_point: ENTRY_POINT,
        }
    }
}

#[derive(Debug, Display, Error, From)]
pub enum ConfigError {
    #[display("could not read config: {_0}")]
    Io(std::io::Error),
    #[display("could not parse config: {_0}")]
    Parse(toml::de::Error),
}

impl Config {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(src)?)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}
