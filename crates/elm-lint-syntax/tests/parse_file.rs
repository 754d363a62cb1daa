//! End-to-end parser tests over realistic Elm modules.

use elm_lint_syntax::ast::{
    Declaration, Exposing, Expression, LetDeclaration, Module, Pattern, TopLevelExpose,
};
use elm_lint_syntax::range::Position;
use elm_lint_syntax::{parse, post_process};

fn module_name(source: &str) -> String {
    parse(source)
        .expect("parses")
        .module_definition
        .value
        .module_name()
        .join(".")
}

#[test]
fn parses_normal_module_header() {
    let file = parse("module Json.Decode.Extra exposing (..)\n").expect("parses");
    assert_eq!(
        file.module_definition.value.module_name(),
        &vec![
            "Json".to_string(),
            "Decode".to_string(),
            "Extra".to_string()
        ]
    );
    assert!(matches!(
        file.module_definition.value,
        Module::Normal(_)
    ));
}

#[test]
fn parses_port_module_header() {
    assert!(matches!(
        parse("port module Worker exposing (send)\nport send : String -> Cmd msg\n")
            .expect("parses")
            .module_definition
            .value,
        Module::Port(_)
    ));
}

#[test]
fn parses_effect_module_header() {
    let source = "effect module Time where { subscription = MySub } exposing (every)\n\
                  every = 1\n";
    let file = parse(source).expect("parses");
    match file.module_definition.value {
        Module::Effect(data) => {
            assert_eq!(data.module_name.value, vec!["Time".to_string()]);
            assert_eq!(data.subscription.map(|n| n.value), Some("MySub".to_string()));
            assert_eq!(data.command, None);
        }
        other => panic!("expected an effect module, got {other:?}"),
    }
}

#[test]
fn module_name_is_read_from_any_flavor() {
    assert_eq!(module_name("module A.B exposing (..)\n"), "A.B");
    assert_eq!(
        module_name("port module Ports exposing (out)\nport out : String -> Cmd msg\n"),
        "Ports"
    );
}

#[test]
fn parses_imports_with_alias_and_exposing() {
    let source = "module Main exposing (main)\n\
                  import Html exposing (Html, text)\n\
                  import Json.Decode as Decode\n\
                  main = text \"hi\"\n";
    let file = parse(source).expect("parses");
    assert_eq!(file.imports.len(), 2);
    let html = &file.imports[0].value;
    assert_eq!(html.module_name.value, vec!["Html".to_string()]);
    match html.exposing_list.as_ref().map(|n| &n.value) {
        Some(Exposing::Explicit(items)) => {
            assert!(matches!(&items[0].value, TopLevelExpose::TypeOrAlias(n) if n == "Html"));
            assert!(matches!(&items[1].value, TopLevelExpose::Function(n) if n == "text"));
        }
        other => panic!("expected an explicit exposing list, got {other:?}"),
    }
    let decode = &file.imports[1].value;
    assert_eq!(
        decode.module_alias.as_ref().map(|n| n.value.clone()),
        Some(vec!["Decode".to_string()])
    );
}

#[test]
fn parses_type_exposing_with_constructors() {
    let source = "module Main exposing (Msg(..), update)\nupdate = 1\n";
    let file = parse(source).expect("parses");
    match file.module_definition.value.exposing_list() {
        Exposing::Explicit(items) => {
            assert!(matches!(
                &items[0].value,
                TopLevelExpose::TypeExpose { name, open: Some(_) } if name == "Msg"
            ));
        }
        other => panic!("expected an explicit exposing list, got {other:?}"),
    }
}

#[test]
fn parses_function_with_signature() {
    let source = "module Main exposing (add)\n\
                  add : Int -> Int -> Int\n\
                  add x y =\n    x + y\n";
    let file = parse(source).expect("parses");
    match &file.declarations[0].value {
        Declaration::Function(function) => {
            assert!(function.signature.is_some());
            assert_eq!(function.name().value, "add");
            assert_eq!(function.declaration.value.arguments.len(), 2);
        }
        other => panic!("expected a function, got {other:?}"),
    }
}

#[test]
fn signature_name_must_match_definition() {
    let source = "module Main exposing (a)\na : Int\nb = 1\n";
    assert!(parse(source).is_err());
}

#[test]
fn parses_custom_type_and_alias() {
    let source = "module Main exposing (..)\n\
                  type Msg\n    = Increment\n    | Decrement Int\n\
                  type alias Model =\n    { count : Int }\n";
    let file = parse(source).expect("parses");
    match &file.declarations[0].value {
        Declaration::CustomType(custom) => {
            assert_eq!(custom.name.value, "Msg");
            let names: Vec<_> = custom
                .constructors
                .iter()
                .map(|c| c.value.name.value.clone())
                .collect();
            assert_eq!(names, vec!["Increment".to_string(), "Decrement".to_string()]);
            assert_eq!(custom.constructors[1].value.arguments.len(), 1);
        }
        other => panic!("expected a custom type, got {other:?}"),
    }
    assert!(matches!(
        file.declarations[1].value,
        Declaration::TypeAlias(_)
    ));
}

#[test]
fn parses_let_with_aligned_bindings() {
    let source = "module Main exposing (a)\n\
                  a =\n\
                  \x20   let\n\
                  \x20       x =\n\
                  \x20           1\n\
                  \x20       ( y, _ ) = point\n\
                  \x20   in\n\
                  \x20   x + y\n";
    let file = parse(source).expect("parses");
    let body = match &file.declarations[0].value {
        Declaration::Function(function) => &function.declaration.value.expression.value,
        other => panic!("expected a function, got {other:?}"),
    };
    match body {
        Expression::Let(block) => {
            assert_eq!(block.declarations.len(), 2);
            assert!(matches!(
                block.declarations[0].value,
                LetDeclaration::LetFunction(_)
            ));
            assert!(matches!(
                block.declarations[1].value,
                LetDeclaration::LetDestructuring(_, _)
            ));
        }
        other => panic!("expected a let expression, got {other:?}"),
    }
}

#[test]
fn parses_case_with_aligned_arms() {
    let source = "module Main exposing (a)\n\
                  a x =\n\
                  \x20   case x of\n\
                  \x20       Just y ->\n\
                  \x20           y\n\
                  \n\
                  \x20       Nothing ->\n\
                  \x20           0\n";
    let file = parse(source).expect("parses");
    let body = match &file.declarations[0].value {
        Declaration::Function(function) => &function.declaration.value.expression.value,
        other => panic!("expected a function, got {other:?}"),
    };
    match body {
        Expression::Case(block) => {
            assert_eq!(block.cases.len(), 2);
            assert!(matches!(
                &block.cases[0].0.value,
                Pattern::Named { name, args, .. } if name == "Just" && args.len() == 1
            ));
        }
        other => panic!("expected a case expression, got {other:?}"),
    }
}

#[test]
fn parses_records_access_and_update() {
    let source = "module Main exposing (..)\n\
                  init = { count = 0, name = \"x\" }\n\
                  bump model = { model | count = model.count + 1 }\n\
                  names = List.map .name\n";
    let file = parse(source).expect("parses");
    assert_eq!(file.declarations.len(), 3);
    let bump = match &file.declarations[1].value {
        Declaration::Function(function) => &function.declaration.value.expression.value,
        other => panic!("expected a function, got {other:?}"),
    };
    match bump {
        Expression::RecordUpdate(base, setters) => {
            assert_eq!(base.value, "model");
            assert_eq!(setters.len(), 1);
        }
        other => panic!("expected a record update, got {other:?}"),
    }
}

#[test]
fn parses_qualified_references_and_pipelines() {
    let source = "module Main exposing (a)\n\
                  a =\n\
                  \x20   [ 1, 2 ]\n\
                  \x20       |> List.map double\n\
                  \x20       |> List.sum\n";
    let file = post_process(parse(source).expect("parses"));
    let body = match &file.declarations[0].value {
        Declaration::Function(function) => &function.declaration.value.expression.value,
        other => panic!("expected a function, got {other:?}"),
    };
    match body {
        Expression::OperatorApplication(op, _, _, right) => {
            assert_eq!(op, "|>");
            assert_eq!(
                right.value,
                Expression::FunctionOrValue(vec!["List".to_string()], "sum".to_string())
            );
        }
        other => panic!("expected a pipeline, got {other:?}"),
    }
}

#[test]
fn parses_lambda_if_and_negation() {
    let source = "module Main exposing (a)\n\
                  a = \\x -> if x > 0 then -x else x\n";
    let file = parse(source).expect("parses");
    let body = match &file.declarations[0].value {
        Declaration::Function(function) => &function.declaration.value.expression.value,
        other => panic!("expected a function, got {other:?}"),
    };
    match body {
        Expression::Lambda(lambda) => match &lambda.expression.value {
            Expression::If(_, then_branch, _) => {
                assert!(matches!(then_branch.value, Expression::Negation(_)));
            }
            other => panic!("expected an if expression, got {other:?}"),
        },
        other => panic!("expected a lambda, got {other:?}"),
    }
}

#[test]
fn parses_top_level_destructuring() {
    let source = "module Main exposing (..)\n( left, right ) = split\n";
    let file = parse(source).expect("parses");
    assert!(matches!(
        file.declarations[0].value,
        Declaration::Destructuring(_, _)
    ));
}

#[test]
fn node_ranges_cover_their_source() {
    let source = "module Main exposing (a)\na = Debug.log \"x\" 1\n";
    let file = parse(source).expect("parses");
    let declaration = &file.declarations[0];
    assert_eq!(declaration.range.start, Position::new(2, 1));
    assert_eq!(declaration.range.end, Position::new(2, 20));
    match &declaration.value {
        Declaration::Function(function) => {
            let body = &function.declaration.value.expression;
            assert_eq!(body.range.start, Position::new(2, 5));
            match &body.value {
                Expression::Application(operands) => {
                    assert_eq!(operands[0].range.start, Position::new(2, 5));
                    assert_eq!(operands[0].range.end, Position::new(2, 14));
                }
                other => panic!("expected an application, got {other:?}"),
            }
        }
        other => panic!("expected a function, got {other:?}"),
    }
}

#[test]
fn rejects_unclosed_parenthesis() {
    assert!(parse("module A exposing (a)\na = (\n").is_err());
}

#[test]
fn rejects_source_without_module_header() {
    assert!(parse("a = 1\n").is_err());
}
