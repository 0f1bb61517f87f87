use std::fmt;

use serde::{Deserialize, Serialize};

use super::utils::{parent_directory, type_and_id};

/// Closed category of an extracted unit, governing merge/compare treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueType {
    Object,
    Variable,
    SpecialVariable,
    Namespace,
    WholeTextFile,
    OverwrittenObject,
    OverwrittenObjectSingleFile,
    EmptyFile,
    Invalid,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Object => "Object",
            ValueType::Variable => "Variable",
            ValueType::SpecialVariable => "SpecialVariable",
            ValueType::Namespace => "Namespace",
            ValueType::WholeTextFile => "WholeTextFile",
            ValueType::OverwrittenObject => "OverwrittenObject",
            ValueType::OverwrittenObjectSingleFile => "OverwrittenObjectSingleFile",
            ValueType::EmptyFile => "EmptyFile",
            ValueType::Invalid => "Invalid",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conflict-resolution state. The only field mutated after indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResetType {
    #[default]
    None,
    Resolved,
    Ignored,
}

impl ResetType {
    pub fn is_default(self) -> bool {
        self == ResetType::None
    }
}

/// Location and message of a structural failure, carried by `Invalid`
/// definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseFailure {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// One extracted, typed, canonicalized unit of script content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// Object, key or variable name, or a synthesized composite key.
    pub id: String,
    /// Path-and-context-derived grouping key, e.g. `events\txt`.
    pub type_key: String,
    /// Canonical text of the unit.
    pub code: String,
    /// Enclosing object name when the unit is a nested fragment.
    pub code_tag: Option<String>,
    /// Opening-brace token of the enclosing object (`= {`).
    pub code_separator: Option<String>,
    pub value_type: ValueType,
    /// Mod-relative path with `\` separators.
    pub file: String,
    /// Physical path, when the caller knows it.
    pub disk_file: Option<String>,
    pub mod_name: String,
    pub dependencies: Vec<String>,
    pub content_sha: String,
    pub tags: Vec<String>,
    pub is_from_game: bool,
    pub is_placeholder: bool,
    pub reset_type: ResetType,
    /// Name of the extraction strategy that produced this unit.
    pub used_parser: String,
    pub error: Option<ParseFailure>,
}

/// Identity used by the store for replace/remove: `TypeAndId` is unique
/// only within one (`mod_name`, `file`) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DefinitionKey {
    pub mod_name: String,
    pub file: String,
    pub type_and_id: String,
}

impl Definition {
    pub fn new(
        id: impl Into<String>,
        type_key: impl Into<String>,
        code: impl Into<String>,
        value_type: ValueType,
    ) -> Self {
        Self {
            id: id.into(),
            type_key: type_key.into(),
            code: code.into(),
            code_tag: None,
            code_separator: None,
            value_type,
            file: String::new(),
            disk_file: None,
            mod_name: String::new(),
            dependencies: Vec::new(),
            content_sha: String::new(),
            tags: Vec::new(),
            is_from_game: false,
            is_placeholder: false,
            reset_type: ResetType::None,
            used_parser: String::new(),
            error: None,
        }
    }

    pub fn type_and_id(&self) -> String {
        type_and_id(&self.type_key, &self.id)
    }

    /// Directory immediately containing `file`.
    pub fn parent_directory(&self) -> &str {
        parent_directory(&self.file)
    }

    pub fn key(&self) -> DefinitionKey {
        DefinitionKey {
            mod_name: self.mod_name.clone(),
            file: self.file.clone(),
            type_and_id: self.type_and_id(),
        }
    }

    pub fn with_context(
        mut self,
        code_tag: impl Into<String>,
        code_separator: impl Into<String>,
    ) -> Self {
        self.code_tag = Some(code_tag.into());
        self.code_separator = Some(code_separator.into());
        self
    }

    pub fn with_reset_type(
        mut self,
        reset_type: ResetType,
    ) -> Self {
        self.reset_type = reset_type;
        self
    }
}
