//! Document diagnostics.
//!
//! Export itself never fails on these findings. The CLI refuses to export a
//! document with `Severity::Error` diagnostics and prints warnings.

use crate::types::{FieldValue, LocalizedString, SurveyNode, XlsFormDocument};
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One validation finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Slash-separated path, e.g. `survey/location_info/region`
    pub location: String,
    pub message: String,
}

impl Diagnostic {
    fn error(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            location: location.into(),
            message: message.into(),
        }
    }

    fn warning(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            location: location.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}: {}", level, self.location, self.message)
    }
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("valid name regex"))
}

/// Check a document for structural and referential problems
pub fn validate_document(doc: &XlsFormDocument) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let declared: HashSet<&str> = doc.languages.iter().map(String::as_str).collect();

    if doc.settings.form_id.trim().is_empty() {
        diagnostics.push(Diagnostic::error("settings", "formId must not be empty"));
    }

    let mut list_names = HashSet::new();
    for list in &doc.choices {
        let location = format!("choices/{}", list.list_name);
        if !list_names.insert(list.list_name.as_str()) {
            diagnostics.push(Diagnostic::error(
                &location,
                format!("duplicate choice list '{}'", list.list_name),
            ));
        }
        let mut choice_names = HashSet::new();
        for choice in &list.choices {
            if !choice_names.insert(choice.name.as_str()) {
                diagnostics.push(Diagnostic::warning(
                    &location,
                    format!("duplicate choice name '{}'", choice.name),
                ));
            }
            check_languages(
                &format!("{}/{}", location, choice.name),
                "label",
                &choice.label,
                &declared,
                &mut diagnostics,
            );
        }
    }

    validate_nodes(doc, &doc.survey, "survey", &declared, &mut diagnostics);
    diagnostics
}

fn validate_nodes(
    doc: &XlsFormDocument,
    nodes: &[SurveyNode],
    path: &str,
    declared: &HashSet<&str>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut sibling_names = HashSet::new();

    for node in nodes {
        let location = format!("{}/{}", path, node.name);

        if !name_pattern().is_match(&node.name) {
            diagnostics.push(Diagnostic::error(
                &location,
                format!("'{}' is not a valid field name", node.name),
            ));
        }
        if !sibling_names.insert(node.name.as_str()) {
            diagnostics.push(Diagnostic::error(
                &location,
                format!("duplicate name '{}' among siblings", node.name),
            ));
        }

        if node.node_type.is_select() {
            match &node.list_name {
                None => diagnostics.push(Diagnostic::error(
                    &location,
                    format!("{} requires a listName", node.node_type),
                )),
                Some(list) if doc.choice_list(list).is_none() => {
                    diagnostics.push(Diagnostic::error(
                        &location,
                        format!("listName '{}' does not match any choice list", list),
                    ))
                }
                Some(_) => {}
            }
        }

        if node.node_type.is_container() && node.children.is_none() {
            diagnostics.push(Diagnostic::warning(
                &location,
                format!("{} has no children and exports as a plain row", node.node_type),
            ));
        }
        for (field, value) in node.fields() {
            if let FieldValue::Localized(value) = value {
                check_languages(&location, field, value, declared, diagnostics);
            }
        }

        if let Some(children) = &node.children {
            validate_nodes(doc, children, &location, declared, diagnostics);
        }
    }
}

fn check_languages(
    location: &str,
    field: &str,
    value: &LocalizedString,
    declared: &HashSet<&str>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for language in value.languages() {
        if !declared.contains(language) {
            diagnostics.push(Diagnostic::warning(
                location,
                format!(
                    "{} has text for undeclared language '{}', which will not be exported",
                    field, language
                ),
            ));
        }
    }
}
