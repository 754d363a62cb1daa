//! Fix-engine scenarios and algebraic properties.

use elm_lint::syntax::range::{Position, Range};
use elm_lint::{apply_fixes, Fix, FixError};
use proptest::prelude::*;

fn range(r1: usize, c1: usize, r2: usize, c2: usize) -> Range {
    Range::new(Position::new(r1, c1), Position::new(r2, c2))
}

#[test]
fn removal_on_a_single_line() {
    let source = "module A exposing (a)\na = Debug.log \"foo\" 1\n";
    let fixes = [Fix::remove_range(range(2, 5, 2, 20))];
    assert_eq!(
        apply_fixes(&fixes, source),
        Ok("module A exposing (a)\na =  1\n".to_string())
    );
}

#[test]
fn insertion_then_replacement_in_either_order() {
    let source = "module A exposing (a)\na = 1\n";
    let fixes = [
        Fix::replace_range_by(range(2, 1, 2, 2), "someVar"),
        Fix::insert_at(Position::new(2, 5), "Debug.log \"foo\" "),
    ];
    let reversed = [fixes[1].clone(), fixes[0].clone()];
    let expected = "module A exposing (a)\nsomeVar = Debug.log \"foo\" 1\n";
    assert_eq!(apply_fixes(&fixes, source), Ok(expected.to_string()));
    assert_eq!(apply_fixes(&reversed, source), Ok(expected.to_string()));
}

#[test]
fn colliding_fixes_are_rejected() {
    let source = "module A exposing (a)\na = Debug.log \"foo\" 1\n";
    let fixes = [
        Fix::remove_range(range(2, 1, 2, 10)),
        Fix::replace_range_by(range(2, 5, 2, 15), "x"),
    ];
    assert_eq!(
        apply_fixes(&fixes, source),
        Err(FixError::HasCollisionsInFixRanges)
    );
}

const PROPERTY_SOURCE: &str = "module A exposing (a)\na = 1\nb = 2\nc = 3\n";

/// One fix confined to the given row, so fixes on distinct rows never
/// overlap and never share a start position.
fn arb_fix(row: usize) -> impl Strategy<Value = Fix> {
    let removal = (1usize..5).prop_flat_map(move |start| {
        ((start + 1)..=6).prop_map(move |end| {
            Fix::remove_range(range(row, start, row, end))
        })
    });
    let replacement = (1usize..5, "[a-z]{1,4}").prop_flat_map(move |(start, text)| {
        ((start + 1)..=6).prop_map(move |end| {
            Fix::replace_range_by(range(row, start, row, end), text.clone())
        })
    });
    let insertion = (1usize..=6, "[a-z]{1,4}")
        .prop_map(move |(column, text)| Fix::insert_at(Position::new(row, column), text));
    prop_oneof![removal, replacement, insertion]
}

proptest! {
    #[test]
    fn non_overlapping_batches_are_order_independent(
        on_row_2 in arb_fix(2),
        on_row_3 in arb_fix(3),
        on_row_4 in arb_fix(4),
    ) {
        let forward = [on_row_2.clone(), on_row_3.clone(), on_row_4.clone()];
        let backward = [on_row_4, on_row_3, on_row_2];
        prop_assert_eq!(
            apply_fixes(&forward, PROPERTY_SOURCE),
            apply_fixes(&backward, PROPERTY_SOURCE)
        );
    }

    #[test]
    fn successful_results_reparse_and_differ_from_the_input(
        on_row_2 in arb_fix(2),
        on_row_3 in arb_fix(3),
    ) {
        if let Ok(result) = apply_fixes(&[on_row_2, on_row_3], PROPERTY_SOURCE) {
            prop_assert!(elm_lint::syntax::parse(&result).is_ok());
            prop_assert_ne!(result, PROPERTY_SOURCE);
        }
    }

    #[test]
    fn merge_is_commutative_and_idempotent(
        (r1, c1, r2, c2) in (1usize..9, 1usize..9, 1usize..9, 1usize..9),
        (r3, c3, r4, c4) in (1usize..9, 1usize..9, 1usize..9, 1usize..9),
    ) {
        let a = normalize(range(r1, c1, r2, c2));
        let b = normalize(range(r3, c3, r4, c4));
        prop_assert_eq!(a.merge(&b), b.merge(&a));
        prop_assert_eq!(a.merge(&a), a);
    }
}

/// Swaps the endpoints when the generated pair is backwards.
fn normalize(r: Range) -> Range {
    if r.end < r.start {
        Range::new(r.end, r.start)
    } else {
        r
    }
}
