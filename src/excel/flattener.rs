//! Survey tree, choice lists and settings → spreadsheet rows

use super::column_map::column_name;
use super::localization::expand_localized;
use crate::types::{ChoiceList, FieldValue, FormSettings, SurveyNode};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use tracing::debug;

/// One spreadsheet row: column name → cell text.
///
/// Insertion order only matters for header discovery in [`super::rows_to_sheet`].
pub type SurveyRow = IndexMap<String, String>;

/// Flattened survey rows plus the row → node identity index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenResult {
    pub rows: Vec<SurveyRow>,
    /// 0-based row position → node id. Closing `end_*` rows are not indexed.
    pub row_to_node: BTreeMap<usize, String>,
}

impl FlattenResult {
    /// Node id behind a row, `None` for closing rows and out-of-range positions
    pub fn node_at(&self, row: usize) -> Option<&str> {
        self.row_to_node.get(&row).map(String::as_str)
    }

    /// First row emitted for a node id
    pub fn row_of(&self, node_id: &str) -> Option<usize> {
        self.row_to_node
            .iter()
            .find(|(_, id)| id.as_str() == node_id)
            .map(|(row, _)| *row)
    }
}

/// Flatten the survey forest depth-first.
///
/// Every node yields one row; containers additionally yield a closing
/// `end_<type>` row after their descendants.
pub fn flatten_tree(tree: &[SurveyNode], languages: &[String]) -> FlattenResult {
    let mut result = FlattenResult::default();
    walk(tree, languages, &mut result);
    debug!(
        rows = result.rows.len(),
        indexed = result.row_to_node.len(),
        "flattened survey tree"
    );
    result
}

fn walk(nodes: &[SurveyNode], languages: &[String], out: &mut FlattenResult) {
    for node in nodes {
        out.row_to_node.insert(out.rows.len(), node.id.clone());
        out.rows.push(node_row(node, languages));

        if let Some(children) = &node.children {
            walk(children, languages, out);
            out.rows.push(end_row(node));
        }
    }
}

fn node_row(node: &SurveyNode, languages: &[String]) -> SurveyRow {
    let mut row = SurveyRow::new();

    // select_one/select_multiple carry their list inside the type cell
    let compound_list = match &node.list_name {
        Some(list) if node.node_type.is_select() => Some(list.as_str()),
        _ => None,
    };

    let type_value = if node.is_container() {
        format!("begin_{}", node.node_type)
    } else if let Some(list) = compound_list {
        format!("{} {}", node.node_type, list)
    } else {
        node.node_type.to_string()
    };
    row.insert("type".to_string(), type_value);

    for (field, value) in node.fields() {
        if field == "listName" && compound_list.is_some() {
            continue;
        }
        match value {
            FieldValue::Localized(value) => row.extend(expand_localized(field, value, languages)),
            FieldValue::Text(text) => {
                row.insert(column_name(field).to_string(), text.to_string());
            }
        }
    }

    merge_extra(&mut row, &node.extra);
    row
}

fn end_row(node: &SurveyNode) -> SurveyRow {
    let mut row = SurveyRow::new();
    row.insert("type".to_string(), format!("end_{}", node.node_type));
    row.insert("name".to_string(), node.name.clone());
    row
}

fn merge_extra(row: &mut SurveyRow, extra: &IndexMap<String, String>) {
    for (column, value) in extra {
        row.insert(column.clone(), value.clone());
    }
}

/// One row per choice: `list_name`, `name`, expanded `label`, then extras
pub fn flatten_choices(choices: &[ChoiceList], languages: &[String]) -> Vec<SurveyRow> {
    let mut rows = Vec::new();

    for list in choices {
        for choice in &list.choices {
            let mut row = SurveyRow::new();
            row.insert(column_name("listName").to_string(), list.list_name.clone());
            row.insert("name".to_string(), choice.name.clone());
            row.extend(expand_localized("label", &choice.label, languages));
            merge_extra(&mut row, &choice.extra);
            rows.push(row);
        }
    }

    debug!(rows = rows.len(), lists = choices.len(), "flattened choices");
    rows
}

/// Exactly one row holding the present settings fields, then extras
pub fn flatten_settings(settings: &FormSettings) -> Vec<SurveyRow> {
    let mut row = SurveyRow::new();

    for (field, value) in settings.fields() {
        row.insert(column_name(field).to_string(), value.to_string());
    }
    merge_extra(&mut row, &settings.extra);

    vec![row]
}
