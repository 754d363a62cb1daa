//! The project descriptor handed to rules.
//!
//! The engine never interprets the manifest itself; it only forwards it to
//! rules that install an elm-json visitor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An opaque description of the project the analyzed file belongs to.
#[derive(Debug, Clone, Default)]
pub struct Project {
    elm_json: Option<ElmProject>,
}

impl Project {
    /// A project with no manifest attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A project carrying a parsed `elm.json`.
    #[must_use]
    pub fn with_elm_json(elm_json: ElmProject) -> Self {
        Self {
            elm_json: Some(elm_json),
        }
    }

    /// The parsed manifest, when one was attached.
    #[must_use]
    pub fn elm_json(&self) -> Option<&ElmProject> {
        self.elm_json.as_ref()
    }
}

/// The parsed contents of an `elm.json` manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElmProject {
    /// An application manifest.
    Application {
        /// Directories containing the application's sources.
        #[serde(rename = "source-directories", default)]
        source_directories: Vec<String>,
    },
    /// A package manifest.
    Package {
        /// The package name, e.g. `author/project`.
        name: String,
        /// The modules the package exposes to its users.
        #[serde(rename = "exposed-modules")]
        exposed_modules: ExposedModules,
    },
}

impl ElmProject {
    /// Parses a manifest from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error when the text is not a
    /// valid manifest.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether the given module is exposed to downstream users. Always
    /// false for applications, which expose nothing.
    #[must_use]
    pub fn exposes_module(&self, module_name: &str) -> bool {
        match self {
            ElmProject::Application { .. } => false,
            ElmProject::Package {
                exposed_modules, ..
            } => exposed_modules.contains(module_name),
        }
    }
}

/// The `exposed-modules` field, which is either a plain list or sections
/// headed by a documentation label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExposedModules {
    /// `"exposed-modules": ["A", "B"]`
    Plain(Vec<String>),
    /// `"exposed-modules": {"Primitives": ["A", "B"]}`
    Grouped(BTreeMap<String, Vec<String>>),
}

impl ExposedModules {
    /// Whether the module appears anywhere in the listing.
    #[must_use]
    pub fn contains(&self, module_name: &str) -> bool {
        match self {
            ExposedModules::Plain(modules) => modules.iter().any(|m| m == module_name),
            ExposedModules::Grouped(groups) => groups
                .values()
                .any(|modules| modules.iter().any(|m| m == module_name)),
        }
    }
}
