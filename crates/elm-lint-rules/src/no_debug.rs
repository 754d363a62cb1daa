//! Rule that forbids `Debug` usage.
//!
//! `Debug.log` and `Debug.todo` are development aids; the compiler rejects
//! them in optimized builds, so they should never reach review.

use elm_lint_core::{Diagnostic, Rule, Schema};
use elm_lint_syntax::ast::{Expression, Node};

/// Name of this rule.
pub const NAME: &str = "NoDebug";

/// Reports every qualified reference into the `Debug` module.
#[must_use]
pub fn rule() -> Rule {
    Schema::new(NAME)
        .with_simple_expression_visitor(expression_visitor)
        .build()
}

fn expression_visitor(node: &Node<Expression>) -> Vec<Diagnostic> {
    match &node.value {
        Expression::FunctionOrValue(module_name, name)
            if module_name.len() == 1 && module_name[0] == "Debug" =>
        {
            vec![Diagnostic::new(
                format!("Remove the use of `Debug.{name}` before shipping to production"),
                vec![
                    "The `Debug` module is only meant for development. Compiling in optimized \
                     mode will fail while it is still used."
                        .to_string(),
                ],
                node.range,
            )]
        }
        _ => Vec::new(),
    }
}
