//! Rule schemas and sealed rules.
//!
//! A rule is described by a [`Schema`]: a typed initial context plus a set
//! of optional visitor callbacks, built incrementally and then sealed with
//! [`Schema::build`]. Sealing erases the context type behind the analyzer
//! closure, so rules with different context types live in one `Vec<Rule>`.
//!
//! The builder is a typestate: [`Schema::with_initial_context`] exists
//! only while no visitor has been installed, and [`Schema::build`] only
//! once at least one has. Misuse does not compile.
//!
//! ## Example
//!
//! ```
//! use elm_lint_core::{Diagnostic, Schema};
//! use elm_lint_syntax::ast::{Expression, Node};
//!
//! let rule = Schema::new("NoHardcodedSecret")
//!     .with_simple_expression_visitor(|node: &Node<Expression>| match &node.value {
//!         Expression::StringLiteral(s) if s.starts_with("sk-") => vec![Diagnostic::new(
//!             "Do not hardcode secrets",
//!             vec!["Move the secret to configuration.".to_string()],
//!             node.range,
//!         )],
//!         _ => Vec::new(),
//!     })
//!     .build();
//! assert_eq!(rule.name(), "NoHardcodedSecret");
//! ```

use std::marker::PhantomData;

use elm_lint_syntax::ast::{Declaration, Expression, File, Import, Module, Node};

use crate::diagnostic::Diagnostic;
use crate::project::{ElmProject, Project};
use crate::traverse;

/// The event at which a declaration or expression visitor fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitorEvent {
    /// Before the node's children are visited.
    OnEnter,
    /// After the node's children are visited.
    OnExit,
}

pub(crate) type ElmJsonVisitor<C> = Box<dyn Fn(Option<&ElmProject>, C) -> C>;
pub(crate) type NodeVisitor<T, C> = Box<dyn Fn(&Node<T>, C) -> (Vec<Diagnostic>, C)>;
pub(crate) type ListVisitor<T, C> = Box<dyn Fn(&[Node<T>], C) -> (Vec<Diagnostic>, C)>;
pub(crate) type EventVisitor<T, C> = Box<dyn Fn(VisitorEvent, &Node<T>, C) -> (Vec<Diagnostic>, C)>;
pub(crate) type FinalEvaluation<C> = Box<dyn Fn(&C) -> Vec<Diagnostic>>;

pub(crate) struct VisitorSet<C> {
    pub elm_json: Option<ElmJsonVisitor<C>>,
    pub module_definition: Option<NodeVisitor<Module, C>>,
    pub import: Option<NodeVisitor<Import, C>>,
    pub declaration_list: Option<ListVisitor<Declaration, C>>,
    pub declaration: Option<EventVisitor<Declaration, C>>,
    pub expression: Option<EventVisitor<Expression, C>>,
    pub final_evaluation: Option<FinalEvaluation<C>>,
}

impl<C> VisitorSet<C> {
    fn empty() -> Self {
        Self {
            elm_json: None,
            module_definition: None,
            import: None,
            declaration_list: None,
            declaration: None,
            expression: None,
            final_evaluation: None,
        }
    }
}

/// Typestate marker: no visitor installed yet.
pub struct Empty;
/// Typestate marker: at least one visitor installed.
pub struct Populated;

/// An in-construction rule description.
pub struct Schema<Context = (), State = Empty> {
    name: String,
    initial_context: Context,
    visitors: VisitorSet<Context>,
    _state: PhantomData<State>,
}

impl Schema<(), Empty> {
    /// Starts a schema with unit context and no visitors.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(!name.is_empty(), "rule names must not be empty");
        Self {
            name,
            initial_context: (),
            visitors: VisitorSet::empty(),
            _state: PhantomData,
        }
    }

    /// Installs a typed initial context. Only available directly after
    /// [`Schema::new`]; once a visitor is installed the schema changes
    /// state and this method is gone.
    #[must_use]
    pub fn with_initial_context<C>(self, initial_context: C) -> Schema<C, Empty> {
        Schema {
            name: self.name,
            initial_context,
            visitors: VisitorSet::empty(),
            _state: PhantomData,
        }
    }
}

impl<C, S> Schema<C, S> {
    fn populated(self) -> Schema<C, Populated> {
        Schema {
            name: self.name,
            initial_context: self.initial_context,
            visitors: self.visitors,
            _state: PhantomData,
        }
    }

    /// Installs the elm-json visitor, run once before traversal starts.
    #[must_use]
    pub fn with_elm_json_visitor(
        mut self,
        visitor: impl Fn(Option<&ElmProject>, C) -> C + 'static,
    ) -> Schema<C, Populated> {
        self.visitors.elm_json = Some(Box::new(visitor));
        self.populated()
    }

    /// Installs the module-definition visitor.
    #[must_use]
    pub fn with_module_definition_visitor(
        mut self,
        visitor: impl Fn(&Node<Module>, C) -> (Vec<Diagnostic>, C) + 'static,
    ) -> Schema<C, Populated> {
        self.visitors.module_definition = Some(Box::new(visitor));
        self.populated()
    }

    /// Installs the import visitor, run per import in source order.
    #[must_use]
    pub fn with_import_visitor(
        mut self,
        visitor: impl Fn(&Node<Import>, C) -> (Vec<Diagnostic>, C) + 'static,
    ) -> Schema<C, Populated> {
        self.visitors.import = Some(Box::new(visitor));
        self.populated()
    }

    /// Installs the declaration-list visitor, run once on the full list.
    #[must_use]
    pub fn with_declaration_list_visitor(
        mut self,
        visitor: impl Fn(&[Node<Declaration>], C) -> (Vec<Diagnostic>, C) + 'static,
    ) -> Schema<C, Populated> {
        self.visitors.declaration_list = Some(Box::new(visitor));
        self.populated()
    }

    /// Installs the declaration visitor, fired on both events.
    #[must_use]
    pub fn with_declaration_visitor(
        mut self,
        visitor: impl Fn(VisitorEvent, &Node<Declaration>, C) -> (Vec<Diagnostic>, C) + 'static,
    ) -> Schema<C, Populated> {
        self.visitors.declaration = Some(Box::new(visitor));
        self.populated()
    }

    /// Installs the expression visitor, fired on both events.
    #[must_use]
    pub fn with_expression_visitor(
        mut self,
        visitor: impl Fn(VisitorEvent, &Node<Expression>, C) -> (Vec<Diagnostic>, C) + 'static,
    ) -> Schema<C, Populated> {
        self.visitors.expression = Some(Box::new(visitor));
        self.populated()
    }

    /// Installs the final evaluation, run on the context after traversal.
    #[must_use]
    pub fn with_final_evaluation(
        mut self,
        visitor: impl Fn(&C) -> Vec<Diagnostic> + 'static,
    ) -> Schema<C, Populated> {
        self.visitors.final_evaluation = Some(Box::new(visitor));
        self.populated()
    }

    /// Installs a module-definition visitor that does not touch context.
    #[must_use]
    pub fn with_simple_module_definition_visitor(
        self,
        visitor: impl Fn(&Node<Module>) -> Vec<Diagnostic> + 'static,
    ) -> Schema<C, Populated> {
        self.with_module_definition_visitor(move |node, context| (visitor(node), context))
    }

    /// Installs an import visitor that does not touch context.
    #[must_use]
    pub fn with_simple_import_visitor(
        self,
        visitor: impl Fn(&Node<Import>) -> Vec<Diagnostic> + 'static,
    ) -> Schema<C, Populated> {
        self.with_import_visitor(move |node, context| (visitor(node), context))
    }

    /// Installs a declaration visitor that does not touch context. Fires
    /// only on [`VisitorEvent::OnEnter`].
    #[must_use]
    pub fn with_simple_declaration_visitor(
        self,
        visitor: impl Fn(&Node<Declaration>) -> Vec<Diagnostic> + 'static,
    ) -> Schema<C, Populated> {
        self.with_declaration_visitor(move |event, node, context| match event {
            VisitorEvent::OnEnter => (visitor(node), context),
            VisitorEvent::OnExit => (Vec::new(), context),
        })
    }

    /// Installs an expression visitor that does not touch context. Fires
    /// only on [`VisitorEvent::OnEnter`].
    #[must_use]
    pub fn with_simple_expression_visitor(
        self,
        visitor: impl Fn(&Node<Expression>) -> Vec<Diagnostic> + 'static,
    ) -> Schema<C, Populated> {
        self.with_expression_visitor(move |event, node, context| match event {
            VisitorEvent::OnEnter => (visitor(node), context),
            VisitorEvent::OnExit => (Vec::new(), context),
        })
    }
}

impl<C: Clone + 'static> Schema<C, Populated> {
    /// Seals the schema into an immutable [`Rule`]. The initial context is
    /// cloned fresh for every analyzer invocation.
    #[must_use]
    pub fn build(self) -> Rule {
        let Schema {
            name,
            initial_context,
            visitors,
            ..
        } = self;
        Rule {
            name,
            analyzer: Box::new(move |project, file| {
                traverse::run(&visitors, initial_context.clone(), project, file)
            }),
        }
    }
}

/// A sealed rule: a stable name plus the analyzer closure. The rule's
/// context type exists only inside the closure.
pub struct Rule {
    name: String,
    analyzer: Box<dyn Fn(&Project, &File) -> Vec<Diagnostic>>,
}

impl Rule {
    /// The rule's name, stable for the life of the rule.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the rule against one parsed file.
    #[must_use]
    pub fn analyze(&self, project: &Project, file: &File) -> Vec<Diagnostic> {
        (self.analyzer)(project, file)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elm_lint_syntax::{parse, post_process};

    fn file(source: &str) -> File {
        post_process(parse(source).expect("parses"))
    }

    #[test]
    fn simple_visitor_rules_report_diagnostics() {
        let rule = Schema::new("NoString")
            .with_simple_expression_visitor(|node: &Node<Expression>| match &node.value {
                Expression::StringLiteral(_) => vec![Diagnostic::new(
                    "No strings",
                    vec!["Strings are forbidden here.".to_string()],
                    node.range,
                )],
                _ => Vec::new(),
            })
            .build();

        let diagnostics = rule.analyze(
            &Project::new(),
            &file("module A exposing (a)\na = \"hello\"\n"),
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message(), "No strings");
    }

    #[test]
    fn context_is_fresh_for_every_invocation() {
        let rule = Schema::new("CountExpressions")
            .with_initial_context(0usize)
            .with_expression_visitor(|event, _node, count: usize| match event {
                VisitorEvent::OnEnter => (Vec::new(), count + 1),
                VisitorEvent::OnExit => (Vec::new(), count),
            })
            .with_final_evaluation(|count: &usize| {
                vec![Diagnostic::new(
                    format!("{count} expressions"),
                    vec!["Counted.".to_string()],
                    elm_lint_syntax::Range::zero(),
                )]
            })
            .build();

        let parsed = file("module A exposing (a)\na = 1 + 2\n");
        let first = rule.analyze(&Project::new(), &parsed);
        let second = rule.analyze(&Project::new(), &parsed);
        assert_eq!(first, second);
        assert_eq!(first[0].message(), "3 expressions");
    }

    #[test]
    fn later_installs_overwrite_the_same_slot() {
        let rule = Schema::new("LastWins")
            .with_simple_expression_visitor(|node: &Node<Expression>| {
                vec![Diagnostic::new(
                    "first",
                    vec!["First installation.".to_string()],
                    node.range,
                )]
            })
            .with_simple_expression_visitor(|_node: &Node<Expression>| Vec::new())
            .build();

        let diagnostics = rule.analyze(&Project::new(), &file("module A exposing (a)\na = 1\n"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn rules_with_different_context_types_share_a_list() {
        let rules: Vec<Rule> = vec![
            Schema::new("UnitContext")
                .with_simple_expression_visitor(|_: &Node<Expression>| Vec::new())
                .build(),
            Schema::new("StringContext")
                .with_initial_context(String::new())
                .with_expression_visitor(|_, _, context: String| (Vec::new(), context))
                .build(),
        ];
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].name(), "UnitContext");
        assert_eq!(rules[1].name(), "StringContext");
    }
}
