use once_cell::sync::Lazy;
use regex::Regex;

use super::{CanParseArgs, ExtractionStrategy, ParserArgs};
use crate::{
    definition::{Definition, TYPE_ID_SEPARATOR, ValueType},
    rules::StrategyKind,
    syntax::ParseError,
};

static HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\x{feff}?\s*(l_[A-Za-z_]+)\s*:\s*(#.*)?$").expect("valid localization header regex"));
static ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*([^#\s:"][^\s:"]*)\s*:\s*\d*\s*"(.*)"\s*(#.*)?$"#).expect("valid localization entry regex")
});

/// Localization tables: `l_<language>:` followed by `key:N "text"` lines.
/// Each entry is one object, typed per language.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalizationStrategy;

impl ExtractionStrategy for LocalizationStrategy {
    fn name(&self) -> &'static str {
        "localization"
    }

    fn can_parse(
        &self,
        args: &CanParseArgs<'_>,
    ) -> bool {
        args.rule.is_some_and(|rule| rule.strategy == StrategyKind::Localization) && header(args.lines).is_some()
    }

    fn parse(
        &self,
        args: &ParserArgs<'_>,
    ) -> Result<Vec<Definition>, ParseError> {
        let Some((header_index, tag)) = header(args.lines) else {
            return Ok(Vec::new());
        };
        let language = tag.trim_start_matches("l_");
        let type_key = format!("{}{TYPE_ID_SEPARATOR}{language}", args.type_key());

        let definitions = args.lines[header_index + 1..]
            .iter()
            .filter_map(|line| ENTRY.captures(line))
            .map(|captures| {
                let id = captures[1].to_string();
                let code = captures[0].trim().to_string();
                let mut definition =
                    args.definition(id.clone(), type_key.as_str(), code, ValueType::Object).with_context(tag, ":");
                definition.tags.push(id);
                definition
            })
            .collect();
        Ok(definitions)
    }
}

/// Index and tag (`l_english`) of the language header line.
fn header(lines: &[String]) -> Option<(usize, &str)> {
    lines.iter().enumerate().find_map(|(index, line)| {
        let trimmed = line.trim_start_matches('\u{feff}').trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }
        HEADER.captures(line).and_then(|captures| captures.get(1)).map(|tag| (index, tag.as_str()))
    })
}

#[cfg(test)]
#[path = "../../tests/src/dispatch/localization_tests.rs"]
mod tests;
