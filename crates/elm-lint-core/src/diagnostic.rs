//! Diagnostics reported by rules and by the lint engine.

use serde::{Deserialize, Serialize};

use elm_lint_syntax::range::Range;

use crate::fix::Fix;

/// A problem reported by a rule, before the lint engine tags it with rule
/// and module identity.
///
/// `details` is a non-empty list of paragraphs expanding on `message`;
/// callers are responsible for never passing an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    message: String,
    details: Vec<String>,
    range: Range,
    fixes: Option<Vec<Fix>>,
}

impl Diagnostic {
    /// Creates a diagnostic with no fixes.
    #[must_use]
    pub fn new(message: impl Into<String>, details: Vec<String>, range: Range) -> Self {
        debug_assert!(!details.is_empty(), "diagnostic details must not be empty");
        Self {
            message: message.into(),
            details,
            range,
            fixes: None,
        }
    }

    /// Replaces the diagnostic's fixes. An empty list clears them.
    #[must_use]
    pub fn with_fixes(mut self, fixes: Vec<Fix>) -> Self {
        self.fixes = if fixes.is_empty() { None } else { Some(fixes) };
        self
    }

    /// The headline message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The explanatory paragraphs.
    #[must_use]
    pub fn details(&self) -> &[String] {
        &self.details
    }

    /// Where the problem sits in the source file.
    #[must_use]
    pub fn range(&self) -> Range {
        self.range
    }

    /// Machine-applicable fixes, if the rule provided any.
    #[must_use]
    pub fn fixes(&self) -> Option<&[Fix]> {
        self.fixes.as_deref()
    }
}

/// A diagnostic as returned by the lint engine: the rule-level fields plus
/// rule and module identity.
///
/// `module_name` is absent only on the synthetic parse-error diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintDiagnostic {
    /// Name of the rule that produced the diagnostic.
    pub rule_name: String,
    /// Dotted name of the analyzed module.
    pub module_name: Option<String>,
    /// The headline message.
    pub message: String,
    /// The explanatory paragraphs.
    pub details: Vec<String>,
    /// Where the problem sits in the source file.
    pub range: Range,
    /// Machine-applicable fixes, if the rule provided any.
    pub fixes: Option<Vec<Fix>>,
}

impl LintDiagnostic {
    /// Tags a rule-level diagnostic with rule and module identity.
    #[must_use]
    pub fn tagged(
        rule_name: impl Into<String>,
        module_name: Option<String>,
        diagnostic: Diagnostic,
    ) -> Self {
        Self {
            rule_name: rule_name.into(),
            module_name,
            message: diagnostic.message,
            details: diagnostic.details,
            range: diagnostic.range,
            fixes: diagnostic.fixes,
        }
    }
}

impl std::fmt::Display for LintDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: [{}] {}",
            self.range.start.row, self.range.start.column, self.rule_name, self.message
        )?;
        if let Some(module_name) = &self.module_name {
            write!(f, " (in {module_name})")?;
        }
        Ok(())
    }
}
