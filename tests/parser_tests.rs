//! Document parsing, schema checks and YAML write-back

use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;
use xlsform_forge::core::find_node;
use xlsform_forge::parser::{parse_document, parse_document_str};
use xlsform_forge::writer::{document_to_yaml, write_document};
use xlsform_forge::{LocalizedString, QuestionType, XlsFormError};

#[test]
fn test_parse_field_survey() {
    let doc = parse_document(Path::new("test-data/field_survey.yaml")).unwrap();

    assert_eq!(doc.survey.len(), 5);
    assert_eq!(doc.node_count(), 7);
    assert_eq!(doc.settings.form_title, "Field Survey");
    assert_eq!(doc.settings.version.as_deref(), Some("2026-02-02"));
    assert_eq!(doc.languages, vec!["English (en)", "Spanish (es)"]);

    let region = find_node(&doc.survey, "q4").unwrap();
    assert_eq!(region.node_type, QuestionType::SelectOne);
    assert_eq!(region.list_name.as_deref(), Some("regions"));
    assert_eq!(region.label.get("Spanish (es)"), Some("Seleccionar región"));

    let regions = doc.choice_list("regions").unwrap();
    let names: Vec<&str> = regions.choices.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["north", "south", "east", "west"]);
}

#[test]
fn test_missing_ids_are_generated() {
    let doc = parse_document_str(
        "survey:\n  - type: text\n    name: a\n  - type: text\n    name: b\nsettings:\n  formTitle: T\n  formId: t\n",
    )
    .unwrap();
    assert!(!doc.survey[0].id.is_empty());
    assert_ne!(doc.survey[0].id, doc.survey[1].id);
    assert_eq!(doc.survey[0].label, LocalizedString::Plain(String::new()));
}

#[test]
fn test_every_question_type_parses() {
    for question_type in QuestionType::ALL {
        let yaml = format!(
            "survey:\n  - type: {}\n    name: q\nsettings:\n  formTitle: T\n  formId: t\n",
            question_type
        );
        let doc = parse_document_str(&yaml).unwrap();
        assert_eq!(doc.survey[0].node_type, question_type);
    }
}

#[test]
fn test_extra_and_media_fields() {
    let yaml = r#"
survey:
  - id: photo
    type: image
    name: photo
    label: Take a photo
    mediaImage: camera.png
    parameters: max-pixels=1024
    extra:
      body::accept: image/*
settings:
  formTitle: T
  formId: t
"#;
    let doc = parse_document_str(yaml).unwrap();
    let node = &doc.survey[0];
    assert_eq!(node.media_image.as_deref(), Some("camera.png"));
    assert_eq!(node.parameters.as_deref(), Some("max-pixels=1024"));
    assert_eq!(node.extra.get("body::accept").map(String::as_str), Some("image/*"));
}

#[test]
fn test_nonexistent_file() {
    let result = parse_document(Path::new("test-data/does_not_exist.yaml"));
    assert!(matches!(result, Err(XlsFormError::Io(_))));
}

#[test]
fn test_schema_error_mentions_location() {
    let bad = "survey:\n  - type: text\n    name: 5\nsettings:\n  formTitle: T\n  formId: t\n";
    let err = parse_document_str(bad).unwrap_err();
    assert!(err.to_string().contains("/survey/0/name"));
}

#[test]
fn test_written_fixture_round_trips() {
    let doc = parse_document(Path::new("test-data/field_survey.yaml")).unwrap();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("copy.yaml");

    write_document(&path, &doc).unwrap();
    assert_eq!(parse_document(&path).unwrap(), doc);

    let yaml = document_to_yaml(&doc).unwrap();
    assert!(yaml.contains("listName: regions"));
    assert!(yaml.contains("constraintMessage:"));
}
