//! Expression nodes.

use serde::{Deserialize, Serialize};

use super::{FunctionDeclaration, InfixDirection, ModuleName, Node, Pattern};

/// An Elm expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// `()`
    Unit,
    /// Function application, operands in source order: `f x y`.
    Application(Vec<Node<Expression>>),
    /// `a + b`, with the operator's associativity as resolved by
    /// post-processing.
    OperatorApplication(
        String,
        InfixDirection,
        Box<Node<Expression>>,
        Box<Node<Expression>>,
    ),
    /// A possibly-qualified reference: `List.map`, `Just`, `model`.
    FunctionOrValue(ModuleName, String),
    /// `if cond then a else b`
    If(
        Box<Node<Expression>>,
        Box<Node<Expression>>,
        Box<Node<Expression>>,
    ),
    /// `(+)`
    PrefixOperator(String),
    /// `42`
    Integer(i64),
    /// `0x2A`
    Hex(i64),
    /// `3.14`
    Float(f64),
    /// `-x`
    Negation(Box<Node<Expression>>),
    /// `"hello"`
    StringLiteral(String),
    /// `'a'`
    CharLiteral(char),
    /// `(a, b)`
    Tupled(Vec<Node<Expression>>),
    /// `(expr)`
    Parenthesized(Box<Node<Expression>>),
    /// `let … in …`
    Let(LetBlock),
    /// `case … of …`
    Case(CaseBlock),
    /// `\x -> …`
    Lambda(Lambda),
    /// `{ x = 1, y = 2 }`
    Record(Vec<Node<RecordSetter>>),
    /// `[1, 2, 3]`
    List(Vec<Node<Expression>>),
    /// `record.field`; the field name is not an expression child.
    RecordAccess(Box<Node<Expression>>, Node<String>),
    /// `.field`
    RecordAccessFunction(String),
    /// `{ model | count = 1 }`; the updated-record name is not an
    /// expression child.
    RecordUpdate(Node<String>, Vec<Node<RecordSetter>>),
    /// `[glsl| … |]`
    Glsl(String),
}

/// One `field = expression` entry of a record literal or update.
pub type RecordSetter = (Node<String>, Node<Expression>);

/// The bindings and body of a `let` expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetBlock {
    /// Bindings in source order.
    pub declarations: Vec<Node<LetDeclaration>>,
    /// The `in` body.
    pub expression: Box<Node<Expression>>,
}

/// A single binding inside a `let` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LetDeclaration {
    /// A named function or value binding.
    LetFunction(FunctionDeclaration),
    /// A pattern binding: `( x, y ) = point`.
    LetDestructuring(Node<Pattern>, Node<Expression>),
}

/// The scrutinee and arms of a `case` expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseBlock {
    /// The inspected expression.
    pub expression: Box<Node<Expression>>,
    /// Arms in source order.
    pub cases: Vec<Case>,
}

/// One arm of a `case` expression; the pattern is not an expression child.
pub type Case = (Node<Pattern>, Node<Expression>);

/// An anonymous function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lambda {
    /// Argument patterns; not expression children.
    pub args: Vec<Node<Pattern>>,
    /// The body.
    pub expression: Box<Node<Expression>>,
}
