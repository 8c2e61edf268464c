use thiserror::Error;

use crate::token::Position;

/// No lexer rule matched at the cursor.
///
/// This is the only failure of the whole parse pipeline. There is no
/// partial result: the caller gets the offending text and where it starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized token near {:?} at [{line}:{column}]", first_line(.remainder))]
pub struct SyntaxError {
    /// Everything from the cursor to the end of the source.
    pub remainder: String,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    pub fn new(remainder: impl Into<String>, position: Position) -> Self {
        Self {
            remainder: remainder.into(),
            line: position.line,
            column: position.column,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

fn first_line(remainder: &str) -> &str {
    remainder.split('\n').next().unwrap_or(remainder)
}
