//! Rule that reports top-level values and `let` bindings that are never
//! referenced.
//!
//! A top-level value is spared when the module exposes it; a `let` binding
//! has no such escape hatch. Unused top-level declarations carry a removal
//! fix covering the whole declaration.

use std::collections::HashSet;

use elm_lint_core::{Diagnostic, Fix, Rule, Schema, VisitorEvent};
use elm_lint_syntax::ast::{
    Declaration, Exposing, Expression, LetDeclaration, Module, Node,
};
use elm_lint_syntax::range::Range;

/// Name of this rule.
pub const NAME: &str = "NoUnusedVariables";

#[derive(Debug, Clone, Default)]
struct Context {
    exposes_all: bool,
    exposed: HashSet<String>,
    top_level: Vec<TopLevelBinding>,
    used: HashSet<String>,
    scopes: Vec<Scope>,
}

#[derive(Debug, Clone)]
struct TopLevelBinding {
    name: String,
    name_range: Range,
    declaration_range: Range,
}

#[derive(Debug, Clone, Default)]
struct Scope {
    declared: Vec<(String, Range)>,
    used: HashSet<String>,
}

/// Reports unused top-level values and unused `let` bindings.
#[must_use]
pub fn rule() -> Rule {
    Schema::new(NAME)
        .with_initial_context(Context::default())
        .with_module_definition_visitor(module_definition_visitor)
        .with_declaration_list_visitor(declaration_list_visitor)
        .with_expression_visitor(expression_visitor)
        .with_final_evaluation(final_evaluation)
        .build()
}

fn module_definition_visitor(
    node: &Node<Module>,
    mut context: Context,
) -> (Vec<Diagnostic>, Context) {
    match node.value.exposing_list() {
        Exposing::All(_) => context.exposes_all = true,
        Exposing::Explicit(items) => {
            context.exposed = items
                .iter()
                .map(|item| item.value.name().to_string())
                .collect();
        }
    }
    (Vec::new(), context)
}

fn declaration_list_visitor(
    declarations: &[Node<Declaration>],
    mut context: Context,
) -> (Vec<Diagnostic>, Context) {
    for declaration in declarations {
        if let Declaration::Function(function) = &declaration.value {
            let name = function.name();
            context.top_level.push(TopLevelBinding {
                name: name.value.clone(),
                name_range: name.range,
                declaration_range: declaration.range,
            });
        }
    }
    (Vec::new(), context)
}

fn expression_visitor(
    event: VisitorEvent,
    node: &Node<Expression>,
    mut context: Context,
) -> (Vec<Diagnostic>, Context) {
    match event {
        VisitorEvent::OnEnter => {
            match &node.value {
                Expression::FunctionOrValue(module_name, name)
                    if module_name.is_empty()
                        && name.chars().next().is_some_and(char::is_lowercase) =>
                {
                    mark_used(&mut context, name);
                }
                Expression::RecordUpdate(base, _) => mark_used(&mut context, &base.value),
                Expression::Let(block) => {
                    let mut scope = Scope::default();
                    for binding in &block.declarations {
                        match &binding.value {
                            LetDeclaration::LetFunction(function) => {
                                let name = function.name();
                                scope.declared.push((name.value.clone(), name.range));
                            }
                            LetDeclaration::LetDestructuring(pattern, _) => {
                                scope.declared.extend(pattern.bound_variables());
                            }
                        }
                    }
                    context.scopes.push(scope);
                }
                _ => {}
            }
            (Vec::new(), context)
        }
        VisitorEvent::OnExit => {
            if !matches!(node.value, Expression::Let(_)) {
                return (Vec::new(), context);
            }
            let Some(scope) = context.scopes.pop() else {
                return (Vec::new(), context);
            };
            let diagnostics = scope
                .declared
                .iter()
                .filter(|(name, _)| !scope.used.contains(name))
                .map(|(name, range)| unused_diagnostic(name, *range, None))
                .collect();
            (diagnostics, context)
        }
    }
}

fn mark_used(context: &mut Context, name: &str) {
    for scope in context.scopes.iter_mut().rev() {
        if scope.declared.iter().any(|(declared, _)| declared == name) {
            scope.used.insert(name.to_string());
            return;
        }
    }
    context.used.insert(name.to_string());
}

fn final_evaluation(context: &Context) -> Vec<Diagnostic> {
    if context.exposes_all {
        return Vec::new();
    }
    context
        .top_level
        .iter()
        .filter(|binding| {
            !context.used.contains(&binding.name) && !context.exposed.contains(&binding.name)
        })
        .map(|binding| {
            unused_diagnostic(
                &binding.name,
                binding.name_range,
                Some(binding.declaration_range),
            )
        })
        .collect()
}

fn unused_diagnostic(name: &str, range: Range, removable: Option<Range>) -> Diagnostic {
    let diagnostic = Diagnostic::new(
        format!("`{name}` is not used"),
        vec![format!(
            "Remove `{name}` or use it. Unused code makes the module harder to read."
        )],
        range,
    );
    match removable {
        Some(declaration_range) => {
            diagnostic.with_fixes(vec![Fix::remove_range(declaration_range)])
        }
        None => diagnostic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elm_lint_core::{lint, LintDiagnostic, Project, SourceFile};

    fn check(source: &str) -> Vec<LintDiagnostic> {
        lint(
            &[rule()],
            &Project::new(),
            &SourceFile::new("A.elm", source),
        )
    }

    #[test]
    fn reports_unused_top_level_value_with_a_removal_fix() {
        let source = "module A exposing (a)\na = 1\nunused = 2\n";
        let diagnostics = check(source);
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics[0];
        assert_eq!(diagnostic.message, "`unused` is not used");
        let fixes = diagnostic.fixes.as_ref().expect("a removal fix");
        assert_eq!(fixes.len(), 1);
        assert_eq!(
            elm_lint_core::apply_fixes(fixes, source),
            Ok("module A exposing (a)\na = 1\n\n".to_string())
        );
    }

    #[test]
    fn exposed_values_are_never_unused() {
        let diagnostics = check("module A exposing (a, b)\na = 1\nb = 2\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn exposing_everything_spares_all_top_level_values() {
        let diagnostics = check("module A exposing (..)\na = 1\nb = 2\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn values_used_by_other_declarations_are_not_reported() {
        let source = "module A exposing (a)\na = helper 1\nhelper x = x\n";
        let diagnostics = check(source);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn reports_unused_let_bindings_without_fixes() {
        let source = "module A exposing (a)\n\
                      a =\n\
                      \x20   let\n\
                      \x20       x = 1\n\
                      \x20       y = 2\n\
                      \x20   in\n\
                      \x20   x\n";
        let diagnostics = check(source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "`y` is not used");
        assert_eq!(diagnostics[0].fixes, None);
    }

    #[test]
    fn reports_unused_names_bound_by_let_destructuring() {
        let source = "module A exposing (a)\n\
                      a =\n\
                      \x20   let\n\
                      \x20       ( x, y ) = ( 1, 2 )\n\
                      \x20   in\n\
                      \x20   x\n";
        let diagnostics = check(source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "`y` is not used");
    }

    #[test]
    fn record_updates_count_as_usage() {
        let source = "module A exposing (a)\n\
                      a =\n\
                      \x20   let\n\
                      \x20       base = { count = 0 }\n\
                      \x20   in\n\
                      \x20   { base | count = 1 }\n";
        let diagnostics = check(source);
        assert!(diagnostics.is_empty());
    }
}
