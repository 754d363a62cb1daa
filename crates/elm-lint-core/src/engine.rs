//! The per-file lint engine.

use tracing::{debug, trace};

use elm_lint_syntax::range::Range;
use elm_lint_syntax::{parse, post_process};

use crate::diagnostic::LintDiagnostic;
use crate::project::Project;
use crate::rule::Rule;

/// The rule name carried by the synthetic parse-error diagnostic.
pub const PARSING_ERROR_RULE_NAME: &str = "ParsingError";

/// One file to analyze. The engine never touches the file system; callers
/// read the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path of the file, used in messages only.
    pub path: String,
    /// The file's source text.
    pub source: String,
}

impl SourceFile {
    /// Bundles a path and source text.
    #[must_use]
    pub fn new(path: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Runs every rule against one file and returns the diagnostics sorted by
/// range. Ties keep rule order.
///
/// A file that fails to parse yields exactly one synthetic diagnostic with
/// rule name [`PARSING_ERROR_RULE_NAME`], no module name and a zero range;
/// the engine itself never fails.
#[must_use]
pub fn lint(rules: &[Rule], project: &Project, file: &SourceFile) -> Vec<LintDiagnostic> {
    debug!(path = %file.path, rules = rules.len(), "linting file");

    let parsed = match parse(&file.source) {
        Ok(parsed) => post_process(parsed),
        Err(error) => {
            debug!(path = %file.path, %error, "file failed to parse");
            return vec![LintDiagnostic {
                rule_name: PARSING_ERROR_RULE_NAME.to_string(),
                module_name: None,
                message: format!("Could not parse file: {}", file.path),
                details: vec![
                    "I could not understand the content of this file, so I cannot analyze it."
                        .to_string(),
                ],
                range: Range::zero(),
                fixes: None,
            }];
        }
    };

    let module_name = parsed.module_definition.value.module_name().join(".");

    let mut diagnostics = Vec::new();
    for rule in rules {
        trace!(rule = rule.name(), "running rule");
        for diagnostic in rule.analyze(project, &parsed) {
            diagnostics.push(LintDiagnostic::tagged(
                rule.name(),
                Some(module_name.clone()),
                diagnostic,
            ));
        }
    }

    // Stable sort: diagnostics with identical ranges keep rule order.
    diagnostics.sort_by(|a, b| a.range.cmp(&b.range));
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Diagnostic;
    use crate::rule::Schema;
    use elm_lint_syntax::ast::{Expression, Node};
    use elm_lint_syntax::range::Position;

    fn flag_integers(name: &str) -> Rule {
        Schema::new(name)
            .with_simple_expression_visitor(|node: &Node<Expression>| match node.value {
                Expression::Integer(_) => vec![Diagnostic::new(
                    "No integer literals",
                    vec!["Use a named constant.".to_string()],
                    node.range,
                )],
                _ => Vec::new(),
            })
            .build()
    }

    #[test]
    fn tags_diagnostics_with_rule_and_module_name() {
        let rules = vec![flag_integers("NoInts")];
        let file = SourceFile::new("src/My/Module.elm", "module My.Module exposing (a)\na = 1\n");
        let diagnostics = lint(&rules, &Project::new(), &file);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_name, "NoInts");
        assert_eq!(diagnostics[0].module_name.as_deref(), Some("My.Module"));
    }

    #[test]
    fn parse_failure_yields_the_synthetic_diagnostic() {
        let rules = vec![flag_integers("NoInts")];
        let file = SourceFile::new("src/A.elm", "module A exposing (a)\na = (\n");
        let diagnostics = lint(&rules, &Project::new(), &file);
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics[0];
        assert_eq!(diagnostic.rule_name, PARSING_ERROR_RULE_NAME);
        assert_eq!(diagnostic.module_name, None);
        assert_eq!(
            diagnostic.range,
            Range::new(Position::new(0, 0), Position::new(0, 0))
        );
        assert!(diagnostic.message.contains("src/A.elm"));
        assert_eq!(diagnostic.fixes, None);
    }

    #[test]
    fn diagnostics_are_sorted_by_range_across_rules() {
        let late_then_early = Schema::new("LateThenEarly")
            .with_simple_expression_visitor(|node: &Node<Expression>| match node.value {
                Expression::Integer(2) => vec![Diagnostic::new(
                    "two",
                    vec!["Second literal.".to_string()],
                    node.range,
                )],
                _ => Vec::new(),
            })
            .build();
        let early = Schema::new("Early")
            .with_simple_expression_visitor(|node: &Node<Expression>| match node.value {
                Expression::Integer(1) => vec![Diagnostic::new(
                    "one",
                    vec!["First literal.".to_string()],
                    node.range,
                )],
                _ => Vec::new(),
            })
            .build();

        let file = SourceFile::new("A.elm", "module A exposing (a)\na = [ 1, 2 ]\n");
        let diagnostics = lint(&[late_then_early, early], &Project::new(), &file);
        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["one", "two"]);
    }

    #[test]
    fn ties_on_identical_ranges_keep_rule_order() {
        let first = flag_integers("First");
        let second = flag_integers("Second");
        let file = SourceFile::new("A.elm", "module A exposing (a)\na = 1\n");
        let diagnostics = lint(&[first, second], &Project::new(), &file);
        let rules: Vec<&str> = diagnostics.iter().map(|d| d.rule_name.as_str()).collect();
        assert_eq!(rules, vec!["First", "Second"]);
    }

    #[test]
    fn two_runs_produce_identical_output() {
        let file = SourceFile::new("A.elm", "module A exposing (a)\na = [ 1, 2, 3 ]\n");
        let rules = vec![flag_integers("NoInts")];
        assert_eq!(
            lint(&rules, &Project::new(), &file),
            lint(&rules, &Project::new(), &file)
        );
    }
}
