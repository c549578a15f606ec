use crate::error::{XlsFormError, XlsFormResult};
use crate::types::XlsFormDocument;
use jsonschema::JSONSchema;
use serde_yaml::Value;
use std::path::Path;
use tracing::debug;

/// Parse an XLSForm document file (YAML, or JSON as a YAML subset).
///
/// The content is validated against the embedded JSON Schema before it is
/// deserialized, so structural mistakes are reported with their JSON path.
///
/// # Arguments
/// * `path` - Path to the document file
///
/// # Returns
/// * `Ok(XlsFormDocument)` - Successfully parsed document
/// * `Err(XlsFormError)` - IO, syntax or schema error with context
///
/// # Example
/// ```no_run
/// use xlsform_forge::parser::parse_document;
/// use std::path::Path;
///
/// let doc = parse_document(Path::new("form.yaml"))?;
/// println!("Form: {}", doc.settings.form_id);
/// println!("Questions: {}", doc.node_count());
/// # Ok::<(), xlsform_forge::error::XlsFormError>(())
/// ```
pub fn parse_document(path: &Path) -> XlsFormResult<XlsFormDocument> {
    let content = std::fs::read_to_string(path)?;
    let document = parse_document_str(&content)?;
    debug!(
        path = %path.display(),
        nodes = document.node_count(),
        "parsed document"
    );
    Ok(document)
}

/// Parse a document from YAML/JSON text
pub fn parse_document_str(content: &str) -> XlsFormResult<XlsFormDocument> {
    let yaml: Value = serde_yaml::from_str(content)?;
    validate_against_schema(&yaml)?;
    let document: XlsFormDocument = serde_yaml::from_value(yaml)?;
    Ok(document)
}

/// Validate a parsed YAML value against the embedded document schema
fn validate_against_schema(yaml: &Value) -> XlsFormResult<()> {
    let schema_str = include_str!("../../schema/xlsform-document.schema.json");
    let schema_value: serde_json::Value = serde_json::from_str(schema_str)?;

    let compiled_schema = JSONSchema::compile(&schema_value)
        .map_err(|e| XlsFormError::Validation(format!("Failed to compile schema: {}", e)))?;

    // Convert YAML to JSON for validation
    let json_value: serde_json::Value = serde_json::to_value(yaml)
        .map_err(|e| XlsFormError::Parse(format!("Failed to convert YAML to JSON: {}", e)))?;

    if let Err(errors) = compiled_schema.validate(&json_value) {
        let error_messages: Vec<String> = errors
            .map(|e| format!("  - {} (at {})", e, e.instance_path))
            .collect();
        return Err(XlsFormError::Validation(format!(
            "Schema validation failed:\n{}",
            error_messages.join("\n")
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LocalizedString, QuestionType};

    const MINIMAL: &str = r#"
survey:
  - id: q1
    type: select_one
    name: color
    label:
      English: Color?
      French: Couleur ?
    listName: colors
  - id: g1
    type: group
    name: grp
    label: Group
    children:
      - id: q2
        type: integer
        name: n
        label: N
        constraintMessage: Must be positive
choices:
  - listName: colors
    choices:
      - name: red
        label: Red
settings:
  formTitle: Colors
  formId: colors
languages: [English, French]
"#;

    #[test]
    fn test_parse_minimal_document() {
        let doc = parse_document_str(MINIMAL).unwrap();
        assert_eq!(doc.survey.len(), 2);
        assert_eq!(doc.survey[0].node_type, QuestionType::SelectOne);
        assert_eq!(doc.survey[0].list_name.as_deref(), Some("colors"));
        assert_eq!(doc.survey[0].label.get("French"), Some("Couleur ?"));
        let inner = &doc.survey[1].child_nodes()[0];
        assert_eq!(
            inner.constraint_message,
            Some(LocalizedString::Plain("Must be positive".to_string()))
        );
        assert_eq!(doc.languages, vec!["English", "French"]);
    }

    #[test]
    fn test_json_input_is_accepted() {
        let json = r#"{"survey": [], "settings": {"formTitle": "T", "formId": "t"}}"#;
        let doc = parse_document_str(json).unwrap();
        assert!(doc.survey.is_empty());
        assert!(doc.choices.is_empty());
        assert!(doc.languages.is_empty());
    }

    #[test]
    fn test_schema_rejects_unknown_type() {
        let bad = "survey:\n  - type: slider\n    name: s\nsettings:\n  formTitle: T\n  formId: t\n";
        let err = parse_document_str(bad).unwrap_err();
        assert!(matches!(err, XlsFormError::Validation(_)));
    }

    #[test]
    fn test_schema_rejects_missing_settings() {
        let err = parse_document_str("survey: []\n").unwrap_err();
        assert!(err.to_string().contains("Schema validation failed"));
    }

    #[test]
    fn test_schema_rejects_unknown_node_field() {
        let bad = "survey:\n  - type: text\n    name: s\n    lable: typo\nsettings:\n  formTitle: T\n  formId: t\n";
        assert!(parse_document_str(bad).is_err());
    }

    #[test]
    fn test_non_string_keys_are_parse_errors() {
        let err = parse_document_str("survey: []\nsettings:\n  formTitle: T\n  formId: t\n? [a, b]\n: c\n")
            .unwrap_err();
        assert!(matches!(err, XlsFormError::Parse(_)));
    }

    #[test]
    fn test_syntax_error_is_yaml_error() {
        let err = parse_document_str("survey: [").unwrap_err();
        assert!(matches!(err, XlsFormError::Yaml(_)));
    }
}
