//! The atomic output unit of extraction and its path-derived keys.

mod model;
mod utils;

pub use model::{Definition, DefinitionKey, ParseFailure, ResetType, ValueType};
pub use utils::{
    PATH_SEPARATOR, TYPE_ID_SEPARATOR, derive_type, extension, file_name, file_stem, normalize_path, parent_directory,
    type_and_id,
};
