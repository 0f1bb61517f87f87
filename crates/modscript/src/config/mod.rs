//! Engine configuration.
//!
//! Settings are split into one file per category. [`EngineSettings`]
//! aggregates them and merges partial patches from a `modscript.toml`
//! file, then from a JSON payload (the CLI's `--settings-json`). Unknown
//! keys are ignored and out-of-range values are clamped by `normalize()`.

pub(crate) mod logging;
pub(crate) mod rules;
pub(crate) mod store;

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use logging::LoggingSettingsPatch;
pub use logging::{LogLevel, LoggingSettings};
use rules::RulesSettingsPatch;
pub use rules::{DEFAULT_GAME, RulesSettings};
use serde::Deserialize;
use serde_json::Value;
use store::StoreSettingsPatch;
pub use store::{DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT, MIN_SEARCH_LIMIT, StoreSettings};
use thiserror::Error;
use tracing::debug;

pub const SETTINGS_SECTION_KEY: &str = "modscript";
pub const SETTINGS_FILENAME: &str = "modscript.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error reading {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("invalid settings file {path}: {error}")]
    Toml {
        path: PathBuf,
        error: toml::de::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineSettings {
    pub store: StoreSettings,
    pub logging: LoggingSettings,
    pub rules: RulesSettings,
}

impl EngineSettings {
    /// Applies a JSON payload, either bare or nested under
    /// [`SETTINGS_SECTION_KEY`]. A candidate that does not fit the settings
    /// shape is skipped.
    pub fn merged_with_payload(
        &self,
        payload: &Value,
    ) -> Self {
        let mut merged = self.clone();
        let scoped = payload.get(SETTINGS_SECTION_KEY);

        for candidate in std::iter::once(payload).chain(scoped) {
            match EngineSettingsPatch::deserialize(candidate) {
                Ok(patch) => merged.apply_patch(patch),
                Err(error) => debug!("[config] ignoring settings payload: {error}"),
            }
        }

        merged.normalize();
        merged
    }

    /// Parses `source` as JSON and merges it over `self`.
    pub fn with_json_overrides(
        &self,
        source: &str,
    ) -> Result<Self, SettingsError> {
        let payload: Value = serde_json::from_str(source)?;
        Ok(self.merged_with_payload(&payload))
    }

    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        let patch: EngineSettingsPatch = toml::from_str(source)?;
        let mut settings = Self::default();
        settings.apply_patch(patch);
        settings.normalize();
        Ok(settings)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|error| SettingsError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_toml_str(&content).map_err(|error| match error {
            SettingsError::Parse(error) => SettingsError::Toml {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Settings for work rooted at `start`: the nearest `modscript.toml`
    /// in `start` or its ancestors, or defaults when there is none.
    pub fn discover(start: &Path) -> Result<Self, SettingsError> {
        match find_settings_file(start) {
            Some(path) => Self::from_toml_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Discovered settings with optional JSON overrides applied on top.
    pub fn load(
        start: &Path,
        json_overrides: Option<&str>,
    ) -> Result<Self, SettingsError> {
        let settings = Self::discover(start)?;
        match json_overrides {
            Some(source) => settings.with_json_overrides(source),
            None => Ok(settings),
        }
    }

    fn apply_patch(
        &mut self,
        patch: EngineSettingsPatch,
    ) {
        if let Some(p) = patch.store {
            self.store.apply_patch(p);
        }
        if let Some(p) = patch.logging {
            self.logging.apply_patch(p);
        }
        if let Some(p) = patch.rules {
            self.rules.apply_patch(p);
        }
    }

    fn normalize(&mut self) {
        self.store.normalize();
        self.logging.normalize();
        self.rules.normalize();
    }
}

/// Walks parent directories from `start` looking for `modscript.toml`.
pub fn find_settings_file(start: &Path) -> Option<PathBuf> {
    let mut dir = if start.is_file() {
        start.parent()?
    } else {
        start
    };
    loop {
        let candidate = dir.join(SETTINGS_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct EngineSettingsPatch {
    store: Option<StoreSettingsPatch>,
    logging: Option<LoggingSettingsPatch>,
    rules: Option<RulesSettingsPatch>,
    #[serde(flatten)]
    _extra: HashMap<String, Value>,
}

#[cfg(test)]
#[path = "../../tests/src/config_tests.rs"]
mod tests;
