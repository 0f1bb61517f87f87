//! Extraction dispatch: picks one strategy per file and turns its lines
//! into definitions.
//!
//! Strategies are held in a fixed priority order. A strategy claims a file
//! through [`ExtractionStrategy::can_parse`]; the dispatcher runs the first
//! claimant and never a second one. Selection is driven by the ruleset's
//! path rules, so for a given path and ruleset at most one strategy claims
//! the file.

mod defines;
mod default;
mod key;
mod localization;
mod object;
mod overwritten;
mod split;
mod whole_text;

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

pub use default::DefaultStrategy;
pub use defines::DefinesStrategy;
pub use key::KeyStrategy;
pub use localization::LocalizationStrategy;
pub use object::{ChildObjectStrategy, ObjectStrategy};
pub use overwritten::OverwrittenStrategy;
pub use whole_text::WholeTextStrategy;

use crate::{
    definition::{Definition, ParseFailure, ValueType, derive_type, file_name, normalize_path},
    rules::{GameRuleset, PathRule},
    syntax::{ParseError, parser::join_lines},
};

/// What a strategy sees when deciding whether it owns a file.
#[derive(Debug, Clone, Copy)]
pub struct CanParseArgs<'a> {
    /// Normalized mod-relative path.
    pub file: &'a str,
    pub lines: &'a [String],
    pub ruleset: &'a GameRuleset,
    /// Rule the ruleset resolved for `file`, if any.
    pub rule: Option<&'a PathRule>,
}

/// Shared immutable context handed to [`ExtractionStrategy::parse`].
#[derive(Debug, Clone, Copy)]
pub struct ParserArgs<'a> {
    pub file: &'a str,
    pub lines: &'a [String],
    pub ruleset: &'a GameRuleset,
    pub rule: Option<&'a PathRule>,
    pub mod_name: &'a str,
    pub content_sha: &'a str,
    pub dependencies: &'a [String],
    pub is_from_game: bool,
}

impl<'a> ParserArgs<'a> {
    pub fn can_parse_args(&self) -> CanParseArgs<'a> {
        CanParseArgs {
            file: self.file,
            lines: self.lines,
            ruleset: self.ruleset,
            rule: self.rule,
        }
    }

    /// Path-derived type key for definitions of this file.
    pub fn type_key(&self) -> String {
        derive_type(self.file)
    }

    /// A definition carrying this file's provenance.
    pub fn definition(
        &self,
        id: impl Into<String>,
        type_key: impl Into<String>,
        code: impl Into<String>,
        value_type: ValueType,
    ) -> Definition {
        let mut definition = Definition::new(id, type_key, code, value_type);
        definition.file = self.file.to_string();
        definition.mod_name = self.mod_name.to_string();
        definition.content_sha = self.content_sha.to_string();
        definition.dependencies = self.dependencies.to_vec();
        definition.is_from_game = self.is_from_game;
        definition
    }
}

pub trait ExtractionStrategy: Send + Sync {
    /// Recorded as `used_parser` on every produced definition.
    fn name(&self) -> &'static str;

    fn can_parse(
        &self,
        args: &CanParseArgs<'_>,
    ) -> bool;

    /// Carves the file into definitions. A structural failure is an error;
    /// the dispatcher turns it into "no definitions".
    fn parse(
        &self,
        args: &ParserArgs<'_>,
    ) -> Result<Vec<Definition>, ParseError>;
}

/// One file handed to the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct DispatchRequest {
    pub file: String,
    pub lines: Vec<String>,
    pub mod_name: String,
    pub content_sha: String,
    pub dependencies: Vec<String>,
    pub is_from_game: bool,
}

impl DispatchRequest {
    pub fn new(
        file: impl Into<String>,
        lines: Vec<String>,
        mod_name: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            lines,
            mod_name: mod_name.into(),
            ..Self::default()
        }
    }

    pub fn from_text(
        file: impl Into<String>,
        text: &str,
        mod_name: impl Into<String>,
    ) -> Self {
        Self::new(file, text.lines().map(str::to_string).collect(), mod_name)
    }

    pub fn with_content_sha(
        mut self,
        content_sha: impl Into<String>,
    ) -> Self {
        self.content_sha = content_sha.into();
        self
    }

    pub fn with_dependencies(
        mut self,
        dependencies: Vec<String>,
    ) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn from_game(mut self) -> Self {
        self.is_from_game = true;
        self
    }
}

/// Result of one dispatch, including which strategy ran.
#[derive(Debug, Clone, Default)]
pub struct DispatchOutcome {
    pub used_parser: Option<&'static str>,
    pub definitions: Vec<Definition>,
    pub error: Option<ParseError>,
}

impl DispatchOutcome {
    /// No strategy claimed the file, or the claimant produced nothing.
    pub fn is_undefined(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Resolved rules kept per path before the cache is dropped and refilled.
pub(crate) const RULE_CACHE_CAPACITY: usize = 4096;

pub struct Dispatcher {
    ruleset: Arc<GameRuleset>,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
    /// Normalized path -> index of the ruleset rule it resolved to.
    rule_cache: DashMap<String, Option<usize>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("ruleset", &self.ruleset.name)
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

impl Dispatcher {
    /// Dispatcher with the built-in strategies in priority order: game
    /// specializations, then the generic splitters, then whole-text, then
    /// the per-statement default.
    pub fn new(ruleset: Arc<GameRuleset>) -> Self {
        let strategies: Vec<Box<dyn ExtractionStrategy>> = vec![
            Box::new(LocalizationStrategy),
            Box::new(ChildObjectStrategy),
            Box::new(OverwrittenStrategy::multi_file()),
            Box::new(OverwrittenStrategy::single_file()),
            Box::new(DefinesStrategy),
            Box::new(KeyStrategy),
            Box::new(ObjectStrategy),
            Box::new(WholeTextStrategy),
            Box::new(DefaultStrategy),
        ];
        Self::with_strategies(ruleset, strategies)
    }

    pub fn with_strategies(
        ruleset: Arc<GameRuleset>,
        strategies: Vec<Box<dyn ExtractionStrategy>>,
    ) -> Self {
        Self {
            ruleset,
            strategies,
            rule_cache: DashMap::new(),
        }
    }

    pub fn ruleset(&self) -> &GameRuleset {
        &self.ruleset
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    fn resolve_rule(
        &self,
        file: &str,
    ) -> Option<&PathRule> {
        if let Some(cached) = self.rule_cache.get(file).map(|entry| *entry) {
            return cached.and_then(|index| self.ruleset.rule(index));
        }
        let index = self.ruleset.resolve(file).map(|(index, _)| index);
        if self.rule_cache.len() >= RULE_CACHE_CAPACITY {
            debug!("[dispatch] rule cache full ({} paths), clearing", self.rule_cache.len());
            self.rule_cache.clear();
        }
        self.rule_cache.insert(file.to_string(), index);
        index.and_then(|index| self.ruleset.rule(index))
    }

    /// Forgets the cached rule for `file`, e.g. after it was deleted.
    pub fn evict(
        &self,
        file: &str,
    ) {
        self.rule_cache.remove(&normalize_path(file));
    }

    /// Names of every strategy whose `can_parse` accepts the file. Used to
    /// check that selection is exclusive.
    pub fn claimants(
        &self,
        file: &str,
        lines: &[String],
    ) -> Vec<&'static str> {
        let file = normalize_path(file);
        let args = CanParseArgs {
            file: &file,
            lines,
            ruleset: &self.ruleset,
            rule: self.resolve_rule(&file),
        };
        self.strategies.iter().filter(|s| s.can_parse(&args)).map(|s| s.name()).collect()
    }

    /// First strategy in priority order that claims the file.
    pub fn select(
        &self,
        args: &CanParseArgs<'_>,
    ) -> Option<&dyn ExtractionStrategy> {
        self.strategies.iter().find(|s| s.can_parse(args)).map(|s| s.as_ref())
    }

    pub fn dispatch(
        &self,
        request: &DispatchRequest,
    ) -> Vec<Definition> {
        self.dispatch_with_outcome(request).definitions
    }

    pub fn dispatch_with_outcome(
        &self,
        request: &DispatchRequest,
    ) -> DispatchOutcome {
        let file = normalize_path(&request.file);
        let args = ParserArgs {
            file: &file,
            lines: &request.lines,
            ruleset: &self.ruleset,
            rule: self.resolve_rule(&file),
            mod_name: &request.mod_name,
            content_sha: &request.content_sha,
            dependencies: &request.dependencies,
            is_from_game: request.is_from_game,
        };

        let Some(strategy) = self.select(&args.can_parse_args()) else {
            debug!("[dispatch] no strategy for {file}");
            return DispatchOutcome::default();
        };

        match strategy.parse(&args) {
            Ok(mut definitions) => {
                for definition in &mut definitions {
                    definition.used_parser = strategy.name().to_string();
                }
                debug!("[dispatch] {} -> {} definition(s) via {}", file, definitions.len(), strategy.name());
                DispatchOutcome {
                    used_parser: Some(strategy.name()),
                    definitions,
                    error: None,
                }
            },
            Err(error) => {
                warn!("[dispatch] {} could not parse {}: {}", strategy.name(), file, error);
                DispatchOutcome {
                    used_parser: Some(strategy.name()),
                    definitions: Vec::new(),
                    error: Some(error),
                }
            },
        }
    }

    /// Like [`Dispatcher::dispatch`], but a structural failure yields a
    /// single `Invalid` definition describing where parsing stopped.
    pub fn dispatch_or_invalid(
        &self,
        request: &DispatchRequest,
    ) -> Vec<Definition> {
        let outcome = self.dispatch_with_outcome(request);
        let Some(error) = outcome.error else {
            return outcome.definitions;
        };

        let file = normalize_path(&request.file);
        let mut invalid =
            Definition::new(file_name(&file), derive_type(&file), join_lines(&request.lines), ValueType::Invalid);
        invalid.file = file;
        invalid.mod_name = request.mod_name.clone();
        invalid.content_sha = request.content_sha.clone();
        invalid.dependencies = request.dependencies.clone();
        invalid.is_from_game = request.is_from_game;
        invalid.used_parser = outcome.used_parser.unwrap_or_default().to_string();
        invalid.error = Some(ParseFailure {
            line: error.line(),
            column: error.column(),
            message: error.to_string(),
        });
        vec![invalid]
    }
}

#[cfg(test)]
#[path = "../../tests/src/dispatch/dispatcher_tests.rs"]
mod tests;
