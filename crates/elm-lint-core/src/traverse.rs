//! The AST traversal driver.
//!
//! Runs one analyzer invocation: elm-json visitor, module definition,
//! imports, the declaration list, each declaration with its expressions,
//! and the final evaluation. Expressions are visited pre-order with a
//! matched exit event; child order follows the source, except that
//! right-associative operator applications visit the right operand first
//! so evaluation-order-dependent rules see operands in semantic order.

use elm_lint_syntax::ast::{
    Declaration, Expression, File, InfixDirection, LetDeclaration, Node,
};

use crate::diagnostic::Diagnostic;
use crate::project::Project;
use crate::rule::{VisitorEvent, VisitorSet};

/// Runs the visitor set over one file, threading the context through every
/// callback and collecting diagnostics in traversal order.
pub(crate) fn run<C>(
    visitors: &VisitorSet<C>,
    initial_context: C,
    project: &Project,
    file: &File,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut context = initial_context;

    if let Some(visitor) = &visitors.elm_json {
        context = visitor(project.elm_json(), context);
    }

    if let Some(visitor) = &visitors.module_definition {
        let (found, next) = visitor(&file.module_definition, context);
        diagnostics.extend(found);
        context = next;
    }

    if let Some(visitor) = &visitors.import {
        for import in &file.imports {
            let (found, next) = visitor(import, context);
            diagnostics.extend(found);
            context = next;
        }
    }

    if let Some(visitor) = &visitors.declaration_list {
        let (found, next) = visitor(&file.declarations, context);
        diagnostics.extend(found);
        context = next;
    }

    for declaration in &file.declarations {
        context = visit_declaration(visitors, declaration, &mut diagnostics, context);
    }

    if let Some(visitor) = &visitors.final_evaluation {
        diagnostics.extend(visitor(&context));
    }

    diagnostics
}

fn visit_declaration<C>(
    visitors: &VisitorSet<C>,
    declaration: &Node<Declaration>,
    diagnostics: &mut Vec<Diagnostic>,
    mut context: C,
) -> C {
    if let Some(visitor) = &visitors.declaration {
        let (found, next) = visitor(VisitorEvent::OnEnter, declaration, context);
        diagnostics.extend(found);
        context = next;
    }

    match &declaration.value {
        Declaration::Function(function) => {
            context = visit_expression(
                visitors,
                &function.declaration.value.expression,
                diagnostics,
                context,
            );
        }
        Declaration::Destructuring(_, expression) => {
            context = visit_expression(visitors, expression, diagnostics, context);
        }
        Declaration::TypeAlias(_)
        | Declaration::CustomType(_)
        | Declaration::Port(_)
        | Declaration::Infix(_) => {}
    }

    if let Some(visitor) = &visitors.declaration {
        let (found, next) = visitor(VisitorEvent::OnExit, declaration, context);
        diagnostics.extend(found);
        context = next;
    }

    context
}

fn visit_expression<C>(
    visitors: &VisitorSet<C>,
    expression: &Node<Expression>,
    diagnostics: &mut Vec<Diagnostic>,
    mut context: C,
) -> C {
    if let Some(visitor) = &visitors.expression {
        let (found, next) = visitor(VisitorEvent::OnEnter, expression, context);
        diagnostics.extend(found);
        context = next;
    }

    match &expression.value {
        Expression::Application(items)
        | Expression::Tupled(items)
        | Expression::List(items) => {
            for item in items {
                context = visit_expression(visitors, item, diagnostics, context);
            }
        }
        Expression::Record(setters) | Expression::RecordUpdate(_, setters) => {
            for setter in setters {
                context = visit_expression(visitors, &setter.value.1, diagnostics, context);
            }
        }
        Expression::Parenthesized(inner)
        | Expression::Negation(inner)
        | Expression::RecordAccess(inner, _) => {
            context = visit_expression(visitors, inner, diagnostics, context);
        }
        Expression::If(condition, then_branch, else_branch) => {
            context = visit_expression(visitors, condition, diagnostics, context);
            context = visit_expression(visitors, then_branch, diagnostics, context);
            context = visit_expression(visitors, else_branch, diagnostics, context);
        }
        Expression::Let(block) => {
            for binding in &block.declarations {
                match &binding.value {
                    LetDeclaration::LetFunction(function) => {
                        context = visit_expression(
                            visitors,
                            &function.declaration.value.expression,
                            diagnostics,
                            context,
                        );
                    }
                    LetDeclaration::LetDestructuring(_, bound) => {
                        context = visit_expression(visitors, bound, diagnostics, context);
                    }
                }
            }
            context = visit_expression(visitors, &block.expression, diagnostics, context);
        }
        Expression::Case(block) => {
            context = visit_expression(visitors, &block.expression, diagnostics, context);
            for (_, body) in &block.cases {
                context = visit_expression(visitors, body, diagnostics, context);
            }
        }
        Expression::Lambda(lambda) => {
            context = visit_expression(visitors, &lambda.expression, diagnostics, context);
        }
        Expression::OperatorApplication(_, direction, left, right) => {
            let (first, second) = match direction {
                InfixDirection::Right => (right, left),
                InfixDirection::Left | InfixDirection::Non => (left, right),
            };
            context = visit_expression(visitors, first, diagnostics, context);
            context = visit_expression(visitors, second, diagnostics, context);
        }
        Expression::Unit
        | Expression::FunctionOrValue(_, _)
        | Expression::PrefixOperator(_)
        | Expression::Integer(_)
        | Expression::Hex(_)
        | Expression::Float(_)
        | Expression::StringLiteral(_)
        | Expression::CharLiteral(_)
        | Expression::RecordAccessFunction(_)
        | Expression::Glsl(_) => {}
    }

    if let Some(visitor) = &visitors.expression {
        let (found, next) = visitor(VisitorEvent::OnExit, expression, context);
        diagnostics.extend(found);
        context = next;
    }

    context
}
