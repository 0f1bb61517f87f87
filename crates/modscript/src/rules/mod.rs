//! Game rulesets: which extraction strategy owns which paths.
//!
//! A ruleset is an ordered list of [`PathRule`]s. The first rule whose
//! criteria all match a file decides the strategy for that file; files no
//! rule claims fall through to the default per-statement strategy when
//! their extension is one of the ruleset's script extensions.
//!
//! Rulesets are plain values. The dispatcher holds one behind an `Arc`, so
//! several games can be handled in one process and tests can build their
//! own fixtures.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::definition::{extension, file_name, normalize_path, parent_directory};

const STELLARIS_RULESET: &str = include_str!("rulesets/stellaris.toml");
const GENERIC_RULESET: &str = include_str!("rulesets/generic.toml");

pub const BUILTIN_GAMES: &[&str] = &["stellaris", "generic"];

#[derive(Debug, Error)]
pub enum RulesetError {
    #[error("I/O error reading {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("invalid ruleset: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown game `{0}`")]
    UnknownGame(String),

    #[error("rule #{index} of ruleset `{ruleset}` has no directory, extension or file criteria")]
    EmptyRule {
        ruleset: String,
        index: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    WholeText,
    Localization,
    ChildObject,
    Overwritten,
    OverwrittenSingleFile,
    Defines,
    Key,
    Object,
}

/// Per-rule knobs consumed by the splitting strategies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyOptions {
    /// Fields naming an object, in order of preference.
    pub id_fields: Vec<String>,
    /// Nested block keys that become one definition each. Empty means any
    /// keyed block.
    pub child_keys: Vec<String>,
    /// Bare-value lists whose sorted members are appended to the id.
    pub locale_fields: Vec<String>,
    /// Fields joined with `-` to form the id, e.g. `from` and `to`.
    pub composite_id_fields: Vec<String>,
    /// Always treat top-level blocks as wrappers around the real objects.
    pub descend: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRule {
    pub strategy: StrategyKind,
    /// Directory prefixes relative to the mod root.
    #[serde(default)]
    pub directories: Vec<String>,
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Exact file names.
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(flatten)]
    pub options: StrategyOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRuleset {
    pub name: String,
    #[serde(default)]
    pub script_extensions: Vec<String>,
    #[serde(default)]
    pub rules: Vec<PathRule>,
}

impl PathRule {
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            directories: Vec::new(),
            extensions: Vec::new(),
            files: Vec::new(),
            options: StrategyOptions::default(),
        }
    }

    pub fn with_directories(
        mut self,
        directories: &[&str],
    ) -> Self {
        self.directories = directories.iter().map(|d| d.to_string()).collect();
        self.normalize();
        self
    }

    pub fn with_extensions(
        mut self,
        extensions: &[&str],
    ) -> Self {
        self.extensions = extensions.iter().map(|e| e.to_string()).collect();
        self.normalize();
        self
    }

    pub fn with_options(
        mut self,
        options: StrategyOptions,
    ) -> Self {
        self.options = options;
        self
    }

    fn has_criteria(&self) -> bool {
        !(self.directories.is_empty() && self.extensions.is_empty() && self.files.is_empty())
    }

    fn normalize(&mut self) {
        for dir in &mut self.directories {
            *dir = normalize_path(dir).to_ascii_lowercase();
        }
        for ext in &mut self.extensions {
            *ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        }
        for file in &mut self.files {
            *file = file.trim().to_ascii_lowercase();
        }
    }

    /// True when every non-empty criterion matches. `file` must already be
    /// normalized with `\` separators.
    pub fn matches(
        &self,
        file: &str,
    ) -> bool {
        if !self.directories.is_empty() {
            let dir = parent_directory(file).to_ascii_lowercase();
            let in_dir = self.directories.iter().any(|prefix| {
                dir == *prefix || (dir.starts_with(prefix.as_str()) && dir[prefix.len()..].starts_with('\\'))
            });
            if !in_dir {
                return false;
            }
        }
        if !self.extensions.is_empty() {
            let ext = extension(file);
            if !self.extensions.iter().any(|e| *e == ext) {
                return false;
            }
        }
        if !self.files.is_empty() {
            let name = file_name(file).to_ascii_lowercase();
            if !self.files.iter().any(|f| *f == name) {
                return false;
            }
        }
        true
    }
}

impl GameRuleset {
    pub fn new(
        name: impl Into<String>,
        script_extensions: &[&str],
        rules: Vec<PathRule>,
    ) -> Self {
        let mut ruleset = Self {
            name: name.into(),
            script_extensions: script_extensions.iter().map(|e| e.to_string()).collect(),
            rules,
        };
        ruleset.normalize();
        ruleset
    }

    /// Loads one of the rulesets compiled into the crate.
    pub fn builtin(game: &str) -> Result<Self, RulesetError> {
        let source = match game.trim().to_ascii_lowercase().as_str() {
            "stellaris" => STELLARIS_RULESET,
            "generic" => GENERIC_RULESET,
            _ => return Err(RulesetError::UnknownGame(game.to_string())),
        };
        Self::from_toml_str(source)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, RulesetError> {
        let mut ruleset: GameRuleset = toml::from_str(source)?;
        ruleset.normalize();
        ruleset.validate()?;
        Ok(ruleset)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, RulesetError> {
        let content = std::fs::read_to_string(path).map_err(|error| RulesetError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_toml_str(&content)
    }

    fn normalize(&mut self) {
        for ext in &mut self.script_extensions {
            *ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        }
        for rule in &mut self.rules {
            rule.normalize();
        }
    }

    fn validate(&self) -> Result<(), RulesetError> {
        match self.rules.iter().position(|rule| !rule.has_criteria()) {
            Some(index) => Err(RulesetError::EmptyRule {
                ruleset: self.name.clone(),
                index,
            }),
            None => Ok(()),
        }
    }

    /// First rule claiming `file`, with its position in the rule list.
    pub fn resolve(
        &self,
        file: &str,
    ) -> Option<(usize, &PathRule)> {
        let file = normalize_path(file);
        self.rules.iter().enumerate().find(|(_, rule)| rule.matches(&file))
    }

    pub fn rule(
        &self,
        index: usize,
    ) -> Option<&PathRule> {
        self.rules.get(index)
    }

    pub fn is_script_file(
        &self,
        file: &str,
    ) -> bool {
        let ext = extension(file);
        !ext.is_empty() && self.script_extensions.iter().any(|e| *e == ext)
    }
}

#[cfg(test)]
#[path = "../../tests/src/rules_tests.rs"]
mod tests;
