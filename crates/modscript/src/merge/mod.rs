//! Text-level composition of script fragments: structural merges into an
//! existing object and `$name$` template instantiation. Both work on
//! canonical text and leave re-extraction to the dispatcher.

mod merger;
mod template;

pub use merger::CodeMerger;
pub use template::{INLINE_SCRIPTS_DIRECTORY, TemplateInstantiator, extract_script_path, inline_script_file};
