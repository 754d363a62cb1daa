//! # elm-lint-syntax
//!
//! Elm source syntax for the elm-lint analysis engine: positions and
//! ranges, the AST, a lexer, a layout-sensitive parser and the operator
//! re-association pass.
//!
//! ## Example
//!
//! ```
//! use elm_lint_syntax::{parse, post_process};
//!
//! let file = post_process(parse("module Main exposing (main)\nmain = 42\n").unwrap());
//! assert_eq!(file.module_definition.value.module_name(), &vec!["Main".to_string()]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod ast;
mod lexer;
mod parser;
mod post_process;
pub mod range;

pub use parser::ParseError;
pub use post_process::post_process;
pub use range::{Position, Range};

use ast::File;

/// Parses one Elm source file into its AST.
///
/// # Errors
///
/// Returns a [`ParseError`] when the source does not lex or parse.
pub fn parse(source: &str) -> Result<File, ParseError> {
    let tokens = lexer::lex(source)?;
    parser::Parser::new(tokens).parse_file()
}
