use std::{collections::HashMap, path::PathBuf};

use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_SEARCH_LIMIT: usize = 100;
pub const MIN_SEARCH_LIMIT: usize = 1;
pub const MAX_SEARCH_LIMIT: usize = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    pub build_hierarchy: bool,
    pub enable_search: bool,
    /// Persist definitions under this directory instead of memory.
    pub disk_path: Option<PathBuf>,
    pub search_limit: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            build_hierarchy: true,
            enable_search: false,
            disk_path: None,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl StoreSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: StoreSettingsPatch,
    ) {
        if let Some(v) = patch.build_hierarchy {
            self.build_hierarchy = v;
        }
        if let Some(v) = patch.enable_search {
            self.enable_search = v;
        }
        if let Some(v) = patch.disk_path {
            self.disk_path = Some(PathBuf::from(v));
        }
        if let Some(v) = patch.search_limit {
            self.search_limit = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.search_limit = self.search_limit.clamp(MIN_SEARCH_LIMIT, MAX_SEARCH_LIMIT);
        self.disk_path = self.disk_path.take().filter(|p| !p.as_os_str().is_empty());
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct StoreSettingsPatch {
    pub(crate) build_hierarchy: Option<bool>,
    pub(crate) enable_search: Option<bool>,
    pub(crate) disk_path: Option<String>,
    pub(crate) search_limit: Option<usize>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
