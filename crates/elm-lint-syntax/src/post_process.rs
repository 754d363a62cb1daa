//! Operator re-association.
//!
//! The parser emits operator chains left-folded with a placeholder
//! associativity. This pass rebuilds every chain using the precedence and
//! associativity table of the Elm core operators, extended by any `infix`
//! declarations found in the file, so that rules that care about
//! evaluation order see operands grouped the way the compiler groups them.

use std::collections::HashMap;

use crate::ast::{Declaration, Expression, File, InfixDirection, LetDeclaration, Node};

/// Precedence and associativity for one operator.
#[derive(Debug, Clone, Copy)]
struct OperatorInfo {
    precedence: u8,
    direction: InfixDirection,
}

struct OperatorTable {
    operators: HashMap<String, OperatorInfo>,
}

impl OperatorTable {
    fn core() -> Self {
        let mut operators = HashMap::new();
        let entries: &[(&str, u8, InfixDirection)] = &[
            ("<|", 0, InfixDirection::Right),
            ("|>", 0, InfixDirection::Left),
            ("||", 2, InfixDirection::Right),
            ("&&", 3, InfixDirection::Right),
            ("==", 4, InfixDirection::Non),
            ("/=", 4, InfixDirection::Non),
            ("<", 4, InfixDirection::Non),
            (">", 4, InfixDirection::Non),
            ("<=", 4, InfixDirection::Non),
            (">=", 4, InfixDirection::Non),
            ("++", 5, InfixDirection::Right),
            ("::", 5, InfixDirection::Right),
            ("+", 6, InfixDirection::Left),
            ("-", 6, InfixDirection::Left),
            ("*", 7, InfixDirection::Left),
            ("/", 7, InfixDirection::Left),
            ("//", 7, InfixDirection::Left),
            ("^", 8, InfixDirection::Right),
            ("<<", 9, InfixDirection::Right),
            (">>", 9, InfixDirection::Left),
        ];
        for (op, precedence, direction) in entries {
            operators.insert(
                (*op).to_string(),
                OperatorInfo {
                    precedence: *precedence,
                    direction: *direction,
                },
            );
        }
        Self { operators }
    }

    fn lookup(&self, op: &str) -> OperatorInfo {
        // Operators from modules the analyzer has not seen default to the
        // tightest left-associative binding.
        self.operators.get(op).copied().unwrap_or(OperatorInfo {
            precedence: 9,
            direction: InfixDirection::Left,
        })
    }
}

/// Finalizes operator associativities across the whole file.
#[must_use]
pub fn post_process(mut file: File) -> File {
    let mut table = OperatorTable::core();
    for declaration in &file.declarations {
        if let Declaration::Infix(infix) = &declaration.value {
            table.operators.insert(
                infix.operator.value.clone(),
                OperatorInfo {
                    precedence: infix.precedence.value,
                    direction: infix.direction.value,
                },
            );
        }
    }
    for declaration in &mut file.declarations {
        rewrite_declaration(declaration, &table);
    }
    file
}

fn rewrite_declaration(declaration: &mut Node<Declaration>, table: &OperatorTable) {
    match &mut declaration.value {
        Declaration::Function(function) => {
            rewrite_expression(&mut function.declaration.value.expression, table);
        }
        Declaration::Destructuring(_, expression) => rewrite_expression(expression, table),
        _ => {}
    }
}

fn rewrite_expression(node: &mut Node<Expression>, table: &OperatorTable) {
    if matches!(node.value, Expression::OperatorApplication(..)) {
        let owned = Node::new(
            node.range,
            std::mem::replace(&mut node.value, Expression::Unit),
        );
        let (mut first, rest) = flatten(owned);
        rewrite_expression(&mut first, table);
        let rest = rest
            .into_iter()
            .map(|(op, mut operand)| {
                rewrite_expression(&mut operand, table);
                (op, operand)
            })
            .collect::<Vec<_>>();
        *node = rebuild(first, rest, table);
        return;
    }
    match &mut node.value {
        Expression::Application(items)
        | Expression::Tupled(items)
        | Expression::List(items) => {
            for item in items {
                rewrite_expression(item, table);
            }
        }
        Expression::If(condition, then_branch, else_branch) => {
            rewrite_expression(condition, table);
            rewrite_expression(then_branch, table);
            rewrite_expression(else_branch, table);
        }
        Expression::Negation(inner)
        | Expression::Parenthesized(inner)
        | Expression::RecordAccess(inner, _) => rewrite_expression(inner, table),
        Expression::Record(setters) | Expression::RecordUpdate(_, setters) => {
            for setter in setters {
                rewrite_expression(&mut setter.value.1, table);
            }
        }
        Expression::Let(block) => {
            for binding in &mut block.declarations {
                match &mut binding.value {
                    LetDeclaration::LetFunction(function) => {
                        rewrite_expression(&mut function.declaration.value.expression, table);
                    }
                    LetDeclaration::LetDestructuring(_, expression) => {
                        rewrite_expression(expression, table);
                    }
                }
            }
            rewrite_expression(&mut block.expression, table);
        }
        Expression::Case(block) => {
            rewrite_expression(&mut block.expression, table);
            for (_, body) in &mut block.cases {
                rewrite_expression(body, table);
            }
        }
        Expression::Lambda(lambda) => rewrite_expression(&mut lambda.expression, table),
        _ => {}
    }
}

/// Unfolds the parser's left spine into the first operand and a list of
/// `(operator, operand)` pairs in source order.
fn flatten(node: Node<Expression>) -> (Node<Expression>, Vec<(String, Node<Expression>)>) {
    match node.value {
        Expression::OperatorApplication(op, _, left, right) => {
            let (first, mut rest) = flatten(*left);
            rest.push((op, *right));
            (first, rest)
        }
        _ => (node, Vec::new()),
    }
}

/// Rebuilds a chain with the loosest operator at the root. Ties between
/// equal-precedence operators split at the rightmost occurrence unless the
/// operator is right-associative.
fn rebuild(
    first: Node<Expression>,
    rest: Vec<(String, Node<Expression>)>,
    table: &OperatorTable,
) -> Node<Expression> {
    if rest.is_empty() {
        return first;
    }
    let mut root = 0;
    let mut root_info = table.lookup(&rest[0].0);
    for (index, (op, _)) in rest.iter().enumerate().skip(1) {
        let info = table.lookup(op);
        if info.precedence < root_info.precedence
            || (info.precedence == root_info.precedence
                && info.direction != InfixDirection::Right)
        {
            root = index;
            root_info = info;
        }
    }
    let mut rest = rest;
    let right_rest = rest.split_off(root + 1);
    let (op, right_first) = match rest.pop() {
        Some(pair) => pair,
        None => return first,
    };
    let left = rebuild(first, rest, table);
    let right = rebuild(right_first, right_rest, table);
    let range = left.range.merge(&right.range);
    Node::new(
        range,
        Expression::OperatorApplication(op, root_info.direction, Box::new(left), Box::new(right)),
    )
}
