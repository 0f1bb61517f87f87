use super::{
    CanParseArgs, ExtractionStrategy, ParserArgs,
    split::{SplitMode, split_objects},
};
use crate::{
    definition::{Definition, ValueType},
    rules::StrategyKind,
    syntax::ParseError,
};

/// Directories where the last loaded definition replaces earlier ones
/// entirely. Splits like [`super::ObjectStrategy`] but tags results as
/// overwritten objects.
#[derive(Debug, Clone, Copy)]
pub struct OverwrittenStrategy {
    single_file: bool,
}

impl OverwrittenStrategy {
    pub fn multi_file() -> Self {
        Self {
            single_file: false,
        }
    }

    pub fn single_file() -> Self {
        Self {
            single_file: true,
        }
    }

    fn kind(&self) -> StrategyKind {
        if self.single_file {
            StrategyKind::OverwrittenSingleFile
        } else {
            StrategyKind::Overwritten
        }
    }

    fn value_type(&self) -> ValueType {
        if self.single_file {
            ValueType::OverwrittenObjectSingleFile
        } else {
            ValueType::OverwrittenObject
        }
    }
}

impl ExtractionStrategy for OverwrittenStrategy {
    fn name(&self) -> &'static str {
        if self.single_file {
            "overwritten_single_file"
        } else {
            "overwritten"
        }
    }

    fn can_parse(
        &self,
        args: &CanParseArgs<'_>,
    ) -> bool {
        args.rule.is_some_and(|rule| rule.strategy == self.kind())
    }

    fn parse(
        &self,
        args: &ParserArgs<'_>,
    ) -> Result<Vec<Definition>, ParseError> {
        split_objects(
            args,
            SplitMode {
                value_type: self.value_type(),
                descend: false,
                nested_variables: true,
            },
        )
    }
}

#[cfg(test)]
#[path = "../../tests/src/dispatch/overwritten_tests.rs"]
mod tests;
