//! Traversal contract: every node reaches each configured visitor exactly
//! once per event, verified by a rule whose context counts visit events
//! keyed by node location.

use std::collections::HashMap;

use elm_lint_core::{Diagnostic, Project, Rule, Schema, VisitorEvent};
use elm_lint_syntax::range::Range;
use elm_lint_syntax::{parse, post_process};

#[derive(Debug, Clone, Default)]
struct Counts {
    declaration_events: HashMap<(String, &'static str), usize>,
    expression_events: HashMap<(String, &'static str), usize>,
}

fn event_key(range: Range, event: VisitorEvent) -> (String, &'static str) {
    let label = match event {
        VisitorEvent::OnEnter => "enter",
        VisitorEvent::OnExit => "exit",
    };
    (format!("{range:?}"), label)
}

/// Reports one diagnostic per node that was visited a number of times
/// other than exactly once per event.
fn counting_rule() -> Rule {
    Schema::new("VisitEachNodeOnce")
        .with_initial_context(Counts::default())
        .with_declaration_visitor(|event, node, mut counts: Counts| {
            *counts
                .declaration_events
                .entry(event_key(node.range, event))
                .or_insert(0) += 1;
            (Vec::new(), counts)
        })
        .with_expression_visitor(|event, node, mut counts: Counts| {
            *counts
                .expression_events
                .entry(event_key(node.range, event))
                .or_insert(0) += 1;
            (Vec::new(), counts)
        })
        .with_final_evaluation(|counts: &Counts| {
            counts
                .declaration_events
                .iter()
                .chain(counts.expression_events.iter())
                .filter(|(_, &count)| count != 1)
                .map(|((location, event), count)| {
                    Diagnostic::new(
                        format!("{location} saw {count} {event} events"),
                        vec!["Each node must be visited exactly once per event.".to_string()],
                        Range::zero(),
                    )
                })
                .collect()
        })
        .build()
}

fn check(source: &str) {
    let file = post_process(parse(source).expect("parses"));
    let diagnostics = counting_rule().analyze(&Project::new(), &file);
    assert_eq!(diagnostics, vec![], "node visited more than once per event");
}

#[test]
fn every_node_in_a_small_module_is_visited_once() {
    check("module A exposing (a)\na = 1 + 2\n");
}

#[test]
fn every_node_in_a_nested_module_is_visited_once() {
    let source = "module Main exposing (main)\n\
                  import List\n\
                  type Msg\n\
                  \x20   = Tick\n\
                  main =\n\
                  \x20   let\n\
                  \x20       double n = n * 2\n\
                  \x20       ( lo, hi ) = ( 1, 10 )\n\
                  \x20   in\n\
                  \x20   case List.map double [ lo, hi ] of\n\
                  \x20       [ a, b ] ->\n\
                  \x20           { result = a + b, ready = True }\n\
                  \n\
                  \x20       other ->\n\
                  \x20           { result = 0, ready = False }\n";
    check(source);
}

#[test]
fn operator_chains_visit_every_operand_once() {
    check("module A exposing (a)\na = 1 + 2 * 3 |> f << g\n");
}
