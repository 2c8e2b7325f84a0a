use std::{io, path::Path};

use serde::{Deserialize, Serialize};

/// Configuration for the command-line front end.
///
/// Holds defaults that apply when the corresponding command-line options
/// are not given. Stored as TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Collection description used when none is given explicitly.
    pub description: String,

    /// Suffix appended to the input file stem to form the default output
    /// file name.
    ///
    /// For example, `api.md` becomes `api.postman_collection.json`.
    pub output_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            description: default_description(),
            output_suffix: default_output_suffix(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Ok(toml::from_str(&content)?)
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(ConfigError::Write)
    }
}

/// Errors that can occur when loading or saving the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file")]
    Read(#[source] io::Error),
    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be serialized.
    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),
    /// The configuration file could not be written.
    #[error("failed to write config file")]
    Write(#[source] io::Error),
}

fn default_description() -> String {
    "Collection generated from Markdown".to_string()
}

fn default_output_suffix() -> String {
    ".postman_collection.json".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_description")]
        description: String,

        #[serde(default = "default_output_suffix")]
        output_suffix: String,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                description,
                output_suffix,
            } => Self {
                description,
                output_suffix,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            description: config.description,
            output_suffix: config.output_suffix,
        }
    }
}
