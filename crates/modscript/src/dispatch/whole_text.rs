use super::{CanParseArgs, ExtractionStrategy, ParserArgs};
use crate::{
    definition::{Definition, ValueType, file_name},
    rules::StrategyKind,
    syntax::{ParseError, format_lines, normalize_text},
};

/// Opaque blobs (shaders, inline script templates, free text): one
/// definition holding the whole file.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeTextStrategy;

impl ExtractionStrategy for WholeTextStrategy {
    fn name(&self) -> &'static str {
        "whole_text"
    }

    fn can_parse(
        &self,
        args: &CanParseArgs<'_>,
    ) -> bool {
        args.rule.is_some_and(|rule| rule.strategy == StrategyKind::WholeText)
    }

    fn parse(
        &self,
        args: &ParserArgs<'_>,
    ) -> Result<Vec<Definition>, ParseError> {
        // Script-shaped blobs get the script canonical form; everything else
        // only has whitespace normalized.
        let code = if args.ruleset.is_script_file(args.file) {
            format_lines(args.lines).unwrap_or_else(|_| normalize_text(args.lines))
        } else {
            normalize_text(args.lines)
        };
        let id = file_name(args.file).to_string();
        let mut definition = args.definition(id.clone(), args.type_key(), code, ValueType::WholeTextFile);
        definition.tags.push(id);
        Ok(vec![definition])
    }
}

#[cfg(test)]
#[path = "../../tests/src/dispatch/whole_text_tests.rs"]
mod tests;
