use super::{
    CanParseArgs, ExtractionStrategy, ParserArgs,
    split::{SplitMode, split_objects},
};
use crate::{
    definition::{Definition, ValueType},
    rules::StrategyKind,
    syntax::ParseError,
};

/// UI and graphics descriptions: one definition per typed child block
/// (`containerWindowType`, `spriteType`, `bitmapfont`, ...), plus every
/// `@name` assignment in the tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectStrategy;

impl ExtractionStrategy for ObjectStrategy {
    fn name(&self) -> &'static str {
        "object"
    }

    fn can_parse(
        &self,
        args: &CanParseArgs<'_>,
    ) -> bool {
        args.rule.is_some_and(|rule| rule.strategy == StrategyKind::Object)
    }

    fn parse(
        &self,
        args: &ParserArgs<'_>,
    ) -> Result<Vec<Definition>, ParseError> {
        split_objects(
            args,
            SplitMode {
                value_type: ValueType::Object,
                descend: false,
                nested_variables: true,
            },
        )
    }
}

/// Game specialization: every top-level block is a container and each
/// named child inside it is one object.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChildObjectStrategy;

impl ExtractionStrategy for ChildObjectStrategy {
    fn name(&self) -> &'static str {
        "child_object"
    }

    fn can_parse(
        &self,
        args: &CanParseArgs<'_>,
    ) -> bool {
        args.rule.is_some_and(|rule| rule.strategy == StrategyKind::ChildObject)
    }

    fn parse(
        &self,
        args: &ParserArgs<'_>,
    ) -> Result<Vec<Definition>, ParseError> {
        split_objects(
            args,
            SplitMode {
                value_type: ValueType::Object,
                descend: true,
                nested_variables: false,
            },
        )
    }
}

#[cfg(test)]
#[path = "../../tests/src/dispatch/object_tests.rs"]
mod tests;
