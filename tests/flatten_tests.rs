//! Tree → rows → sheet conversion over whole documents

use pretty_assertions::assert_eq;
use std::path::Path;
use xlsform_forge::excel::{
    flatten_choices, flatten_settings, flatten_tree, rows_to_sheet, SurveyRow,
};
use xlsform_forge::parser::parse_document;
use xlsform_forge::{LocalizedString, QuestionType, SurveyNode, XlsFormDocument};

fn languages() -> Vec<String> {
    vec!["English (en)".to_string(), "Spanish (es)".to_string()]
}

fn bilingual(en: &str, es: &str) -> LocalizedString {
    LocalizedString::localized([("English (en)", en), ("Spanish (es)", es)])
}

fn field_survey() -> XlsFormDocument {
    parse_document(Path::new("test-data/field_survey.yaml")).unwrap()
}

fn type_column(rows: &[SurveyRow]) -> Vec<&str> {
    rows.iter().map(|r| r["type"].as_str()).collect()
}

#[test]
fn test_grouped_question_scenario() {
    let tree = vec![
        SurveyNode::new("q1", QuestionType::Text, "name", "What is your name?"),
        SurveyNode::new(
            "g1",
            QuestionType::Group,
            "location_info",
            bilingual("Location", "Ubicación"),
        )
        .with_children(vec![SurveyNode::new(
            "q2",
            QuestionType::Integer,
            "age",
            bilingual("Age", "Edad"),
        )]),
    ];

    let result = flatten_tree(&tree, &languages());

    assert_eq!(
        type_column(&result.rows),
        vec!["text", "begin_group", "integer", "end_group"]
    );
    assert_eq!(result.rows[2]["label::English (en)"], "Age");
    assert_eq!(result.rows[2]["label::Spanish (es)"], "Edad");
    assert_eq!(result.rows[3].len(), 2);
    assert_eq!(result.rows[3]["name"], "location_info");

    let indexed: Vec<(usize, &str)> = result
        .row_to_node
        .iter()
        .map(|(row, id)| (*row, id.as_str()))
        .collect();
    assert_eq!(indexed, vec![(0, "q1"), (1, "g1"), (2, "q2")]);
    assert_eq!(result.node_at(3), None);
}

#[test]
fn test_field_survey_rows() {
    let doc = field_survey();
    let result = flatten_tree(&doc.survey, &doc.languages);

    assert_eq!(
        type_column(&result.rows),
        vec![
            "text",
            "integer",
            "begin_group",
            "geopoint",
            "select_one regions",
            "end_group",
            "select_multiple services",
            "note",
        ]
    );
    assert_eq!(result.row_of("q4"), Some(4));
    assert_eq!(result.row_of("q5"), Some(6));
    assert!(!result.rows[4].contains_key("list_name"));

    let age = &result.rows[1];
    assert_eq!(age["required"], "yes");
    assert_eq!(age["constraint"], ". > 0 and . < 150");
    assert_eq!(age["constraint_message::Spanish (es)"], "La edad debe estar entre 1 y 149");
}

#[test]
fn test_every_declared_language_gets_a_column() {
    let doc = field_survey();
    let result = flatten_tree(&doc.survey, &doc.languages);

    for (row, node_id) in &result.row_to_node {
        for language in &doc.languages {
            let column = format!("label::{}", language);
            assert!(
                result.rows[*row].contains_key(&column),
                "row of {} lacks {}",
                node_id,
                column
            );
        }
        assert!(!result.rows[*row].contains_key("label"));
    }
}

#[test]
fn test_begin_and_end_rows_balance() {
    let doc = field_survey();
    let rows = flatten_tree(&doc.survey, &doc.languages).rows;

    let mut depth = 0i32;
    for row in &rows {
        let cell = &row["type"];
        if cell.starts_with("begin_") {
            depth += 1;
        } else if cell.starts_with("end_") {
            depth -= 1;
        }
        assert!(depth >= 0);
    }
    assert_eq!(depth, 0);
}

#[test]
fn test_survey_sheet_header_union() {
    let doc = field_survey();
    let sheet = rows_to_sheet(&flatten_tree(&doc.survey, &doc.languages).rows);

    assert_eq!(
        sheet.headers,
        vec![
            "type",
            "name",
            "label::English (en)",
            "label::Spanish (es)",
            "required",
            "constraint",
            "constraint_message::English (en)",
            "constraint_message::Spanish (es)",
        ]
    );
    assert_eq!(sheet.row_count(), 8);
    assert_eq!(sheet.cell(0, "required"), None);
    assert_eq!(sheet.cell(5, "label::English (en)"), None);
    assert_eq!(sheet.cell(7, "name"), Some("thank_you"));
}

#[test]
fn test_field_survey_choice_rows() {
    let doc = field_survey();
    let rows = flatten_choices(&doc.choices, &doc.languages);

    assert_eq!(rows.len(), 7);
    let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["list_name", "name", "label::English (en)", "label::Spanish (es)"]
    );
    assert_eq!(rows[3]["name"], "west");
    assert_eq!(rows[4]["list_name"], "services");
    assert_eq!(rows[6]["label::Spanish (es)"], "Comida");
}

#[test]
fn test_field_survey_settings_row() {
    let doc = field_survey();
    let rows = flatten_settings(&doc.settings);

    assert_eq!(rows.len(), 1);
    let sheet = rows_to_sheet(&rows);
    assert_eq!(
        sheet.headers,
        vec!["form_title", "form_id", "version", "default_language"]
    );
    assert_eq!(sheet.cell(0, "form_id"), Some("field_survey_v1"));
}

#[test]
fn test_extra_overrides_computed_column() {
    let node = SurveyNode::new("q", QuestionType::Text, "q", "Q").with_extra("appearance", "multiline");
    let mut with_appearance = node.clone();
    with_appearance.appearance = Some("minimal".to_string());

    let result = flatten_tree(&[with_appearance], &[]);
    assert_eq!(result.rows[0]["appearance"], "multiline");
}

#[test]
fn test_undeclared_language_dropped() {
    let node = SurveyNode::new(
        "q",
        QuestionType::Text,
        "q",
        LocalizedString::localized([("English (en)", "Q"), ("French (fr)", "Q fr")]),
    );
    let row = &flatten_tree(&[node], &languages()).rows[0];
    assert!(row.contains_key("label::English (en)"));
    assert!(!row.keys().any(|k| k.contains("French")));
}
