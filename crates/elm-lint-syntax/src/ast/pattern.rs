//! Pattern nodes.
//!
//! Patterns are not visited by the traversal driver, but rules inspect
//! them directly — case arms, let destructurings and lambda arguments all
//! bind names through patterns.

use serde::{Deserialize, Serialize};

use super::{ModuleName, Node};
use crate::range::Range;

/// An Elm pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    /// `_`
    Wildcard,
    /// `()`
    Unit,
    /// `'a'`
    Char(char),
    /// `"s"`
    String(String),
    /// `42`
    Int(i64),
    /// `0x2A`
    Hex(i64),
    /// `( a, b )`
    Tuple(Vec<Node<Pattern>>),
    /// `{ x, y }`
    Record(Vec<Node<String>>),
    /// `head :: tail`
    Cons(Box<Node<Pattern>>, Box<Node<Pattern>>),
    /// `[ a, b ]`
    List(Vec<Node<Pattern>>),
    /// A variable binding.
    Var(String),
    /// A constructor pattern: `Just x`, `Maybe.Nothing`.
    Named {
        /// Qualification, empty when unqualified.
        module_name: ModuleName,
        /// The constructor name.
        name: String,
        /// Sub-patterns, left to right.
        args: Vec<Node<Pattern>>,
    },
    /// `pattern as name`
    As(Box<Node<Pattern>>, Node<String>),
    /// `(pattern)`
    Parenthesized(Box<Node<Pattern>>),
}

impl Node<Pattern> {
    /// Every variable the pattern binds, with the range of the binding
    /// occurrence, in source order. Record patterns bind each listed
    /// field; `as` aliases bind the alias name.
    #[must_use]
    pub fn bound_variables(&self) -> Vec<(String, Range)> {
        let mut out = Vec::new();
        collect_bound(self, &mut out);
        out
    }
}

fn collect_bound(node: &Node<Pattern>, out: &mut Vec<(String, Range)>) {
    match &node.value {
        Pattern::Var(name) => out.push((name.clone(), node.range)),
        Pattern::Record(fields) => {
            for field in fields {
                out.push((field.value.clone(), field.range));
            }
        }
        Pattern::Tuple(items) | Pattern::List(items) => {
            for item in items {
                collect_bound(item, out);
            }
        }
        Pattern::Cons(head, tail) => {
            collect_bound(head, out);
            collect_bound(tail, out);
        }
        Pattern::Named { args, .. } => {
            for arg in args {
                collect_bound(arg, out);
            }
        }
        Pattern::As(inner, alias) => {
            collect_bound(inner, out);
            out.push((alias.value.clone(), alias.range));
        }
        Pattern::Parenthesized(inner) => collect_bound(inner, out),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::Position;

    fn node(pattern: Pattern) -> Node<Pattern> {
        Node::new(Range::zero(), pattern)
    }

    fn names(pattern: Pattern) -> Vec<String> {
        node(pattern)
            .bound_variables()
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }

    #[test]
    fn var_binds_itself() {
        assert_eq!(names(Pattern::Var("x".to_string())), vec!["x"]);
    }

    #[test]
    fn wildcard_and_literals_bind_nothing() {
        assert!(names(Pattern::Wildcard).is_empty());
        assert!(names(Pattern::Int(3)).is_empty());
        assert!(names(Pattern::Unit).is_empty());
    }

    #[test]
    fn tuple_binds_components() {
        let pattern = Pattern::Tuple(vec![
            node(Pattern::Var("a".to_string())),
            node(Pattern::Wildcard),
            node(Pattern::Var("b".to_string())),
        ]);
        assert_eq!(names(pattern), vec!["a", "b"]);
    }

    #[test]
    fn constructor_args_and_alias_bind() {
        let pattern = Pattern::As(
            Box::new(node(Pattern::Named {
                module_name: vec![],
                name: "Just".to_string(),
                args: vec![node(Pattern::Var("inner".to_string()))],
            })),
            Node::new(
                Range::new(Position::new(1, 10), Position::new(1, 15)),
                "whole".to_string(),
            ),
        );
        assert_eq!(names(pattern), vec!["inner", "whole"]);
    }

    #[test]
    fn record_pattern_binds_fields() {
        let pattern = Pattern::Record(vec![
            Node::new(Range::zero(), "x".to_string()),
            Node::new(Range::zero(), "y".to_string()),
        ]);
        assert_eq!(names(pattern), vec!["x", "y"]);
    }
}
