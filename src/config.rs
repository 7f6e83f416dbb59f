//! Runtime settings: where workflows are stored and how the engine is run.
//!
//! Every field has a default, so an empty or partial settings file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Overrides `engine.artifact` when set.
pub const ENGINE_ENV_VAR: &str = "MINIFLOW_ENGINE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub store: StoreSettings,
    pub engine: EngineSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Key of the persisted workflow list; the file is `<data_dir>/<key>.json`.
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub program: String,
    /// Arguments placed before the artifact path.
    pub args: Vec<String>,
    pub artifact: PathBuf,
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("miniflow"))
        .unwrap_or_else(|| PathBuf::from(".miniflow"))
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Settings {
            engine: EngineSettings {
                artifact: data_dir.join("engine.jar"),
                ..EngineSettings::default()
            },
            store: StoreSettings::default(),
            data_dir,
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            key: "miniflow_workflows".into(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            program: "java".into(),
            args: vec!["-jar".into()],
            artifact: PathBuf::from("engine.jar"),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, or defaults when `path` is `None`,
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Settings::default(),
        };
        if let Some(artifact) = std::env::var_os(ENGINE_ENV_VAR) {
            settings.engine.artifact = PathBuf::from(artifact);
        }
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.store.key))
    }
}
