//! Spreadsheet rows → survey tree, choice lists and settings

use super::column_map::field_name;
use super::flattener::SurveyRow;
use super::localization::{is_localizable, split_localized_column};
use crate::error::{XlsFormError, XlsFormResult};
use crate::types::{
    new_node_id, Choice, ChoiceList, FormSettings, LocalizedString, QuestionType, SurveyNode,
};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Meaning of a survey `type` cell
#[derive(Debug, Clone, PartialEq, Eq)]
enum TypeCell {
    Begin(QuestionType),
    End(QuestionType),
    Question {
        node_type: QuestionType,
        list_name: Option<String>,
    },
}

fn parse_type_cell(cell: &str, row: usize) -> XlsFormResult<TypeCell> {
    let unknown = |t: &str| {
        XlsFormError::Import(format!("Row {}: unknown question type '{}'", row + 2, t))
    };

    for (prefix, is_begin) in [("begin_", true), ("begin ", true), ("end_", false), ("end ", false)] {
        if let Some(rest) = cell.strip_prefix(prefix) {
            let rest = rest.trim();
            let node_type = rest.parse::<QuestionType>().map_err(|_| unknown(rest))?;
            return Ok(if is_begin {
                TypeCell::Begin(node_type)
            } else {
                TypeCell::End(node_type)
            });
        }
    }

    let mut tokens = cell.split_whitespace();
    let head = tokens.next().unwrap_or_default();
    let node_type = head.parse::<QuestionType>().map_err(|_| unknown(head))?;
    let rest: Vec<&str> = tokens.collect();
    let list_name = (!rest.is_empty()).then(|| rest.join(" "));

    Ok(TypeCell::Question {
        node_type,
        list_name,
    })
}

/// Localizable field reassembled from its `base` / `base::language` columns
#[derive(Debug, Clone, PartialEq)]
struct LocalizedColumns {
    field: String,
    /// Source columns in row order, for fields the target does not own
    columns: Vec<(String, String)>,
    plain: Option<String>,
    languages: BTreeMap<String, String>,
}

impl LocalizedColumns {
    /// Per-language columns win over a bare column
    fn value(&self) -> LocalizedString {
        if self.languages.is_empty() {
            LocalizedString::Plain(self.plain.clone().unwrap_or_default())
        } else {
            LocalizedString::Localized(self.languages.clone())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Folded {
    Text {
        field: String,
        column: String,
        value: String,
    },
    Localized(LocalizedColumns),
}

/// Reverse-map a row's columns to internal field names, merging the columns
/// of each localizable field at the position of its first column.
fn fold_columns(row: &SurveyRow, skip: &[&str]) -> Vec<Folded> {
    let mut folded: Vec<Folded> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for (column, value) in row {
        if skip.contains(&column.as_str()) {
            continue;
        }
        let (field, language) = match split_localized_column(column) {
            Some((field, language)) => (field, Some(language)),
            None => (field_name(column), None),
        };
        if !is_localizable(field) {
            folded.push(Folded::Text {
                field: field.to_string(),
                column: column.clone(),
                value: value.clone(),
            });
            continue;
        }

        let slot = *slots.entry(field).or_insert_with(|| {
            folded.push(Folded::Localized(LocalizedColumns {
                field: field.to_string(),
                columns: Vec::new(),
                plain: None,
                languages: BTreeMap::new(),
            }));
            folded.len() - 1
        });
        if let Folded::Localized(group) = &mut folded[slot] {
            group.columns.push((column.clone(), value.clone()));
            match language {
                Some(language) => {
                    group.languages.insert(language.to_string(), value.clone());
                }
                None => group.plain = Some(value.clone()),
            }
        }
    }

    folded
}

fn node_from_row(row: &SurveyRow, node_type: QuestionType) -> SurveyNode {
    let mut node = SurveyNode {
        id: new_node_id(),
        node_type,
        ..Default::default()
    };

    for item in fold_columns(row, &["type"]) {
        match item {
            Folded::Text {
                field,
                column,
                value,
            } => {
                if !node.set_text_field(&field, value.clone()) {
                    node.extra.insert(column, value);
                }
            }
            Folded::Localized(group) => {
                if !node.set_localized_field(&group.field, group.value()) {
                    node.extra.extend(group.columns);
                }
            }
        }
    }

    node
}

fn attach(stack: &mut [SurveyNode], root: &mut Vec<SurveyNode>, node: SurveyNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.get_or_insert_with(Vec::new).push(node),
        None => root.push(node),
    }
}

/// Rebuild the survey forest from `begin_*` / `end_*` bracketed rows.
///
/// Rows without a `type` cell are skipped. Every imported node gets a fresh id.
pub fn unflatten_tree(rows: &[SurveyRow]) -> XlsFormResult<Vec<SurveyNode>> {
    let mut root = Vec::new();
    let mut stack: Vec<SurveyNode> = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let Some(type_cell) = row.get("type").map(|t| t.trim()).filter(|t| !t.is_empty()) else {
            continue;
        };

        match parse_type_cell(type_cell, index)? {
            TypeCell::Begin(node_type) => {
                let mut node = node_from_row(row, node_type);
                node.children = Some(Vec::new());
                stack.push(node);
            }
            TypeCell::End(node_type) => {
                let node = stack.pop().ok_or_else(|| {
                    XlsFormError::Import(format!(
                        "Row {}: end_{} without a matching begin",
                        index + 2,
                        node_type
                    ))
                })?;
                if node.node_type != node_type {
                    return Err(XlsFormError::Import(format!(
                        "Row {}: end_{} closes begin_{} '{}'",
                        index + 2,
                        node_type,
                        node.node_type,
                        node.name
                    )));
                }
                attach(&mut stack, &mut root, node);
            }
            TypeCell::Question {
                node_type,
                list_name,
            } => {
                let mut node = node_from_row(row, node_type);
                if list_name.is_some() {
                    node.list_name = list_name;
                }
                attach(&mut stack, &mut root, node);
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(XlsFormError::Import(format!(
            "begin_{} '{}' is never closed",
            open.node_type, open.name
        )));
    }

    debug!(rows = rows.len(), roots = root.len(), "rebuilt survey tree");
    Ok(root)
}

/// Group choice rows by `list_name`, lists in first-seen order
pub fn unflatten_choices(rows: &[SurveyRow]) -> XlsFormResult<Vec<ChoiceList>> {
    let mut lists: IndexMap<String, Vec<Choice>> = IndexMap::new();

    for (index, row) in rows.iter().enumerate() {
        let list_name = row.get("list_name").ok_or_else(|| {
            XlsFormError::Import(format!("choices row {}: missing list_name", index + 2))
        })?;

        let mut choice = Choice::default();
        for item in fold_columns(row, &["list_name"]) {
            match item {
                Folded::Text {
                    field,
                    column,
                    value,
                } => {
                    if field == "name" {
                        choice.name = value;
                    } else {
                        choice.extra.insert(column, value);
                    }
                }
                Folded::Localized(group) if group.field == "label" => choice.label = group.value(),
                Folded::Localized(group) => choice.extra.extend(group.columns),
            }
        }

        lists.entry(list_name.clone()).or_default().push(choice);
    }

    Ok(lists
        .into_iter()
        .map(|(list_name, choices)| ChoiceList::new(list_name, choices))
        .collect())
}

/// Settings from the first settings row. `form_id` is required; a missing
/// `form_title` falls back to the form id.
pub fn unflatten_settings(rows: &[SurveyRow]) -> XlsFormResult<FormSettings> {
    let row = rows
        .first()
        .ok_or_else(|| XlsFormError::Import("settings sheet has no data row".to_string()))?;

    let mut settings = FormSettings::default();
    let mut has_form_id = false;
    let mut has_title = false;
    for item in fold_columns(row, &[]) {
        match item {
            Folded::Text {
                field,
                column,
                value,
            } => {
                has_form_id |= field == "formId";
                has_title |= field == "formTitle";
                if !settings.set_field(&field, value.clone()) {
                    settings.extra.insert(column, value);
                }
            }
            Folded::Localized(group) => settings.extra.extend(group.columns),
        }
    }

    if !has_form_id {
        return Err(XlsFormError::Import(
            "settings sheet has no form_id".to_string(),
        ));
    }
    if !has_title {
        settings.form_title = settings.form_id.clone();
    }
    Ok(settings)
}

/// Declared languages discovered from `base::language` columns, first-seen order
pub fn discover_languages<'a>(rows: impl IntoIterator<Item = &'a SurveyRow>) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for row in rows {
        for column in row.keys() {
            if let Some((_, language)) = split_localized_column(column) {
                if !languages.iter().any(|l| l == language) {
                    languages.push(language.to_string());
                }
            }
        }
    }
    languages
}
