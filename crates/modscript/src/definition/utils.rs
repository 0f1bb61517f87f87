pub const PATH_SEPARATOR: char = '\\';
pub const TYPE_ID_SEPARATOR: &str = "-";

/// Converts `/` separators to `\` and trims leading/trailing separators.
pub fn normalize_path(path: &str) -> String {
    path.trim().replace('/', "\\").trim_matches(PATH_SEPARATOR).to_string()
}

/// Directory part of a normalized path; empty for files at the root.
pub fn parent_directory(path: &str) -> &str {
    path.rsplit_once(PATH_SEPARATOR).map_or("", |(dir, _)| dir)
}

/// File name (with extension) of a normalized path.
pub fn file_name(path: &str) -> &str {
    path.rsplit_once(PATH_SEPARATOR).map_or(path, |(_, name)| name)
}

/// File name without its last extension.
pub fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// Lowercased extension without the dot; empty when absent.
pub fn extension(path: &str) -> String {
    let name = file_name(path);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
        _ => String::new(),
    }
}

/// Grouping key for sibling definitions: lowercased directory plus
/// extension, e.g. `events\fake.txt` -> `events\txt`.
pub fn derive_type(path: &str) -> String {
    let normalized = normalize_path(path);
    let dir = parent_directory(&normalized).to_ascii_lowercase();
    let ext = extension(&normalized);
    match (dir.is_empty(), ext.is_empty()) {
        (true, _) => ext,
        (false, true) => dir,
        (false, false) => format!("{dir}{PATH_SEPARATOR}{ext}"),
    }
}

pub fn type_and_id(
    type_key: &str,
    id: &str,
) -> String {
    format!("{type_key}{TYPE_ID_SEPARATOR}{id}")
}

#[cfg(test)]
#[path = "../../tests/src/definition/utils_tests.rs"]
mod tests;
