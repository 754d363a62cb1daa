//! Rule that reports custom-type constructors that are never referenced.
//!
//! A constructor counts as used when it appears in an expression or in a
//! case pattern. Constructors of types the module exposes with `(..)` are
//! spared when the module itself is visible to package users, since
//! downstream code may construct them.

use std::collections::HashSet;

use elm_lint_core::{Diagnostic, ElmProject, Rule, Schema, VisitorEvent};
use elm_lint_syntax::ast::{
    Declaration, Exposing, Expression, Module, Node, Pattern, TopLevelExpose,
};
use elm_lint_syntax::range::Range;

/// Name of this rule.
pub const NAME: &str = "NoUnusedTypeConstructors";

#[derive(Debug, Clone, Default)]
struct Context {
    manifest: Option<ElmProject>,
    module_name: String,
    exposes_all: bool,
    open_types: HashSet<String>,
    constructors: Vec<DeclaredConstructor>,
    used: HashSet<String>,
}

#[derive(Debug, Clone)]
struct DeclaredConstructor {
    type_name: String,
    name: String,
    range: Range,
}

/// Reports constructors that nothing constructs or matches on.
#[must_use]
pub fn rule() -> Rule {
    Schema::new(NAME)
        .with_initial_context(Context::default())
        .with_elm_json_visitor(|elm_json, mut context: Context| {
            context.manifest = elm_json.cloned();
            context
        })
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
    context.module_name = node.value.module_name().join(".");
    match node.value.exposing_list() {
        Exposing::All(_) => context.exposes_all = true,
        Exposing::Explicit(items) => {
            for item in items {
                if let TopLevelExpose::TypeExpose {
                    name,
                    open: Some(_),
                } = &item.value
                {
                    context.open_types.insert(name.clone());
                }
            }
        }
    }
    (Vec::new(), context)
}

fn declaration_list_visitor(
    declarations: &[Node<Declaration>],
    mut context: Context,
) -> (Vec<Diagnostic>, Context) {
    for declaration in declarations {
        if let Declaration::CustomType(custom_type) = &declaration.value {
            for constructor in &custom_type.constructors {
                context.constructors.push(DeclaredConstructor {
                    type_name: custom_type.name.value.clone(),
                    name: constructor.value.name.value.clone(),
                    range: constructor.value.name.range,
                });
            }
        }
    }
    (Vec::new(), context)
}

fn expression_visitor(
    event: VisitorEvent,
    node: &Node<Expression>,
    mut context: Context,
) -> (Vec<Diagnostic>, Context) {
    if event == VisitorEvent::OnEnter {
        match &node.value {
            Expression::FunctionOrValue(_, name)
                if name.chars().next().is_some_and(char::is_uppercase) =>
            {
                context.used.insert(name.clone());
            }
            Expression::Case(block) => {
                for (pattern, _) in &block.cases {
                    collect_pattern_constructors(pattern, &mut context.used);
                }
            }
            _ => {}
        }
    }
    (Vec::new(), context)
}

fn collect_pattern_constructors(pattern: &Node<Pattern>, used: &mut HashSet<String>) {
    match &pattern.value {
        Pattern::Named { name, args, .. } => {
            used.insert(name.clone());
            for arg in args {
                collect_pattern_constructors(arg, used);
            }
        }
        Pattern::Tuple(items) | Pattern::List(items) => {
            for item in items {
                collect_pattern_constructors(item, used);
            }
        }
        Pattern::Cons(head, tail) => {
            collect_pattern_constructors(head, used);
            collect_pattern_constructors(tail, used);
        }
        Pattern::As(inner, _) | Pattern::Parenthesized(inner) => {
            collect_pattern_constructors(inner, used);
        }
        _ => {}
    }
}

fn final_evaluation(context: &Context) -> Vec<Diagnostic> {
    let module_is_public = context
        .manifest
        .as_ref()
        .is_some_and(|manifest| manifest.exposes_module(&context.module_name));

    context
        .constructors
        .iter()
        .filter(|constructor| {
            if context.used.contains(&constructor.name) {
                return false;
            }
            let constructors_are_public = context.exposes_all
                || context.open_types.contains(&constructor.type_name);
            !(constructors_are_public && module_is_public)
        })
        .map(|constructor| {
            Diagnostic::new(
                format!("Type constructor `{}` is not used", constructor.name),
                vec![format!(
                    "No code constructs or matches on `{}`. Remove it from `{}` or start \
                     using it.",
                    constructor.name, constructor.type_name
                )],
                constructor.range,
            )
        })
        .collect()
}
