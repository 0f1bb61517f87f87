use indexmap::IndexMap;
use tracing::debug;

use crate::syntax::{ScriptElement, find_value, parse_text, unquote};

/// Where inline script templates live, relative to the mod root.
pub const INLINE_SCRIPTS_DIRECTORY: &str = "common\\inline_scripts";

const SCRIPT_KEY: &str = "script";

/// Substitutes `$name$` placeholders in a template with values from an
/// invocation block such as
///
/// ```text
/// inline_script = {
///     script = buildings/hub
///     tier = delta
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateInstantiator;

impl TemplateInstantiator {
    /// Substitution parameters of an invocation: the keyed scalars of its
    /// leading block (or of the top level when it starts with a scalar), without
    /// `script`. Values are unquoted. Empty when the invocation does not
    /// parse.
    pub fn parameters(invocation: &str) -> IndexMap<String, String> {
        let Ok(document) = parse_text(invocation) else {
            return IndexMap::new();
        };
        let elements = match document.elements.first() {
            Some(ScriptElement::Node(node)) => node.children.as_slice(),
            _ => document.elements.as_slice(),
        };

        let mut parameters = IndexMap::new();
        for element in elements {
            let ScriptElement::Value(value) = element else {
                continue;
            };
            let Some(key) = value.key.as_deref() else {
                continue;
            };
            if key.eq_ignore_ascii_case(SCRIPT_KEY) {
                continue;
            }
            parameters.entry(key.to_string()).or_insert_with(|| unquote(&value.value).into_owned());
        }
        parameters
    }

    /// Instantiates `template` with the parameters of `invocation`.
    ///
    /// Unknown placeholders and stray `$` characters are left as written.
    /// A template without placeholders comes back unchanged.
    pub fn instantiate(
        template: &str,
        invocation: &str,
    ) -> String {
        let parameters = Self::parameters(invocation);
        if parameters.is_empty() || !template.contains('$') {
            return template.to_string();
        }
        let (text, replaced) = substitute(template, &parameters);
        debug!("[merge] substituted {replaced} placeholder(s) from {} parameter(s)", parameters.len());
        text
    }
}

fn is_parameter_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn substitute(
    template: &str,
    parameters: &IndexMap<String, String>,
) -> (String, usize) {
    let mut out = String::with_capacity(template.len());
    let mut replaced = 0;
    let mut rest = template;

    while let Some(start) = rest.find('$') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let value = after.find('$').and_then(|end| {
            let name = &after[..end];
            is_parameter_name(name).then(|| parameters.get(name)).flatten().map(|value| (value, end))
        });
        match value {
            Some((value, end)) => {
                out.push_str(value);
                replaced += 1;
                rest = &after[end + 1..];
            },
            None => {
                out.push('$');
                rest = after;
            },
        }
    }
    out.push_str(rest);
    (out, replaced)
}

/// The `script` value of an invocation, if any.
pub fn extract_script_path(invocation: &str) -> Option<String> {
    let document = parse_text(invocation).ok()?;
    find_value(&document, SCRIPT_KEY).filter(|path| !path.is_empty())
}

/// Mod-relative template file for an extracted script path.
pub fn inline_script_file(script_path: &str) -> String {
    let path = script_path.trim().replace('/', "\\");
    format!("{INLINE_SCRIPTS_DIRECTORY}\\{}.txt", path.trim_matches('\\'))
}

#[cfg(test)]
#[path = "../../tests/src/merge/template_tests.rs"]
mod tests;
