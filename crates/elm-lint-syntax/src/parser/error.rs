//! Parse error types.

use thiserror::Error;

use crate::range::Position;

/// An error produced while lexing or parsing a source file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The lexer hit a character that cannot start any token.
    #[error("unexpected character at {position}")]
    UnexpectedCharacter {
        /// Where the character sits.
        position: Position,
    },

    /// The parser found a token it cannot use here.
    #[error("unexpected token {found} at {position}, expected {expected}")]
    UnexpectedToken {
        /// Description of the offending token.
        found: String,
        /// Description of what would have been accepted.
        expected: String,
        /// Where the token starts.
        position: Position,
    },

    /// The file ended in the middle of a construct.
    #[error("unexpected end of file, expected {expected}")]
    UnexpectedEof {
        /// Description of what would have been accepted.
        expected: String,
    },

    /// A literal could not be interpreted.
    #[error("invalid literal at {position}: {message}")]
    InvalidLiteral {
        /// What went wrong.
        message: String,
        /// Where the literal starts.
        position: Position,
    },
}
