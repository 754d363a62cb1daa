//! # elm-lint
//!
//! Static analysis for Elm source files. This facade crate re-exports the
//! rule framework and engines from `elm-lint-core`, the syntax layer from
//! `elm-lint-syntax` and the canonical rules from `elm-lint-rules`.
//!
//! ## Quick start
//!
//! ```
//! use elm_lint::{lint, Project, SourceFile};
//!
//! let rules = elm_lint::rules::presets::recommended();
//! let file = SourceFile::new(
//!     "src/Main.elm",
//!     "module Main exposing (main)\nmain = Debug.todo \"view\"\n",
//! );
//! let diagnostics = lint(&rules, &Project::new(), &file);
//! assert_eq!(diagnostics[0].rule_name, "NoDebug");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use elm_lint_core::*;

/// The syntax layer: AST, parser and ranges.
pub use elm_lint_syntax as syntax;

/// The canonical rules and presets.
pub use elm_lint_rules as rules;
