//! Rule presets for common configurations.

use elm_lint_core::Rule;

use crate::{no_debug, no_unused_type_constructors, no_unused_variables};

/// The recommended rule set:
///
/// - `NoDebug` — forbids `Debug.*` references
/// - `NoUnusedVariables` — reports unused top-level values and let bindings
/// - `NoUnusedTypeConstructors` — reports unreferenced constructors
#[must_use]
pub fn recommended() -> Vec<Rule> {
    vec![
        no_debug::rule(),
        no_unused_variables::rule(),
        no_unused_type_constructors::rule(),
    ]
}

/// Every rule this crate ships.
#[must_use]
pub fn all_rules() -> Vec<Rule> {
    recommended()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommended_rules_have_stable_names() {
        let names: Vec<String> = recommended()
            .iter()
            .map(|rule| rule.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "NoDebug".to_string(),
                "NoUnusedVariables".to_string(),
                "NoUnusedTypeConstructors".to_string(),
            ]
        );
    }
}
