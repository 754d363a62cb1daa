//! # elm-lint-rules
//!
//! Canonical rules for the elm-lint analysis engine. Each rule module
//! exposes a `rule()` constructor and its stable `NAME`; [`presets`]
//! bundles them into ready-made sets.
//!
//! ## Example
//!
//! ```
//! use elm_lint_core::{lint, Project, SourceFile};
//!
//! let rules = elm_lint_rules::presets::recommended();
//! let file = SourceFile::new("A.elm", "module A exposing (a)\na = 1\n");
//! assert!(lint(&rules, &Project::new(), &file).is_empty());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod no_debug;
pub mod no_unused_type_constructors;
pub mod no_unused_variables;
pub mod presets;
