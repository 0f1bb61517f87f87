use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: LogLevel,
    /// Log file written next to stderr output, if any.
    pub file: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: None,
        }
    }
}

impl LoggingSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: LoggingSettingsPatch,
    ) {
        if let Some(v) = patch.level {
            self.level = v;
        }
        if let Some(v) = patch.file {
            self.file = Some(v);
        }
    }

    /// `EnvFilter` directive for the crate's own target. `verbose` raises
    /// the level to at least debug.
    pub fn filter_directive(
        &self,
        verbose: bool,
    ) -> String {
        let level = if verbose {
            self.level.max(LogLevel::Debug)
        } else {
            self.level
        };
        format!("modscript={}", level.as_filter())
    }

    pub(crate) fn normalize(&mut self) {
        self.file = self.file.take().map(|f| f.trim().to_string()).filter(|f| !f.is_empty());
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct LoggingSettingsPatch {
    pub(crate) level: Option<LogLevel>,
    pub(crate) file: Option<String>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
