use std::{collections::HashMap, path::PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::rules::{GameRuleset, RulesetError};

pub const DEFAULT_GAME: &str = "stellaris";

#[derive(Debug, Clone, PartialEq)]
pub struct RulesSettings {
    /// Built-in ruleset name.
    pub game: String,
    /// Custom TOML ruleset; takes precedence over `game`.
    pub ruleset_path: Option<PathBuf>,
}

impl Default for RulesSettings {
    fn default() -> Self {
        Self {
            game: DEFAULT_GAME.to_string(),
            ruleset_path: None,
        }
    }
}

impl RulesSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: RulesSettingsPatch,
    ) {
        if let Some(v) = patch.game {
            self.game = v;
        }
        if let Some(v) = patch.ruleset_path {
            self.ruleset_path = Some(PathBuf::from(v));
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.game = self.game.trim().to_ascii_lowercase();
        if self.game.is_empty() {
            self.game = DEFAULT_GAME.to_string();
        }
        self.ruleset_path = self.ruleset_path.take().filter(|p| !p.as_os_str().is_empty());
    }

    pub fn load_ruleset(&self) -> Result<GameRuleset, RulesetError> {
        match &self.ruleset_path {
            Some(path) => GameRuleset::from_toml_file(path),
            None => GameRuleset::builtin(&self.game),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RulesSettingsPatch {
    pub(crate) game: Option<String>,
    pub(crate) ruleset_path: Option<String>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
