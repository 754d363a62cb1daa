//! # elm-lint-core
//!
//! The core framework of the elm-lint static-analysis engine:
//!
//! - [`Schema`] — the typestate builder composing a rule from optional
//!   visitor callbacks and a typed private context
//! - [`Rule`] — a sealed rule, its context type erased behind the
//!   analyzer closure
//! - [`lint`] — the per-file engine: parse, run every rule, tag and sort
//!   diagnostics
//! - [`apply_fixes`] — the fix engine: apply a batch of range-scoped
//!   edits back-to-front, with overlap detection and a re-parse check
//!
//! ## Example
//!
//! ```
//! use elm_lint_core::{lint, Diagnostic, Project, Schema, SourceFile};
//! use elm_lint_syntax::ast::{Expression, Node};
//!
//! let rule = Schema::new("NoFloats")
//!     .with_simple_expression_visitor(|node: &Node<Expression>| match node.value {
//!         Expression::Float(_) => vec![Diagnostic::new(
//!             "Avoid floats",
//!             vec!["Floats are imprecise.".to_string()],
//!             node.range,
//!         )],
//!         _ => Vec::new(),
//!     })
//!     .build();
//!
//! let file = SourceFile::new("A.elm", "module A exposing (a)\na = 0.1\n");
//! let diagnostics = lint(&[rule], &Project::new(), &file);
//! assert_eq!(diagnostics.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod diagnostic;
mod engine;
mod fix;
mod project;
mod rule;
mod traverse;

pub use diagnostic::{Diagnostic, LintDiagnostic};
pub use engine::{lint, SourceFile, PARSING_ERROR_RULE_NAME};
pub use fix::{apply_fixes, Fix, FixError};
pub use project::{ElmProject, ExposedModules, Project};
pub use rule::{Empty, Populated, Rule, Schema, VisitorEvent};
