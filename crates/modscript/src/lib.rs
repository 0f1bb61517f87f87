pub mod config;
pub mod definition;
pub mod dispatch;
pub mod index;
pub mod merge;
pub mod metadata;
pub mod rules;
pub mod syntax;

pub use config::EngineSettings;
pub use definition::{Definition, DefinitionKey, ResetType, ValueType};
pub use dispatch::{DispatchOutcome, DispatchRequest, Dispatcher, ExtractionStrategy};
pub use index::{IndexedDefinitions, IndexedDefinitionsBuilder, StoreError};
pub use merge::{CodeMerger, TemplateInstantiator, extract_script_path};
pub use rules::GameRuleset;
pub use syntax::{ParseError, format_code};
