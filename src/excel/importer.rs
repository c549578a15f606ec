//! Excel importer implementation - Excel (.xlsx) → XLSForm document

use super::exporter::{NamedSheet, CHOICES_SHEET, SETTINGS_SHEET, SURVEY_SHEET};
use super::sheet::Sheet;
use super::unflattener::{discover_languages, unflatten_choices, unflatten_settings, unflatten_tree};
use crate::error::{XlsFormError, XlsFormResult};
use crate::types::XlsFormDocument;
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Excel importer for converting .xlsx workbooks to XLSForm documents
pub struct XlsFormImporter {
    bytes: Vec<u8>,
}

impl XlsFormImporter {
    /// Importer over an in-memory workbook
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Importer over a workbook file
    pub fn from_path<P: AsRef<Path>>(path: P) -> XlsFormResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Ok(Self::from_bytes(bytes))
    }

    /// Import the workbook as a document
    pub fn import(&self) -> XlsFormResult<XlsFormDocument> {
        let sheets = self.read_sheets()?;
        let document = document_from_sheets(&sheets)?;
        info!(
            form_id = %document.settings.form_id,
            nodes = document.node_count(),
            lists = document.choices.len(),
            "imported workbook"
        );
        Ok(document)
    }

    /// Read every worksheet in workbook order
    pub fn read_sheets(&self) -> XlsFormResult<Vec<NamedSheet>> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(self.bytes.as_slice()))
            .map_err(|e| XlsFormError::Import(format!("Failed to open Excel file: {}", e)))?;

        let mut sheets = Vec::new();
        for sheet_name in workbook.sheet_names().to_vec() {
            let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
                XlsFormError::Import(format!("Failed to read sheet '{}': {}", sheet_name, e))
            })?;
            let sheet = range_to_sheet(&range);
            debug!(sheet = %sheet_name, rows = sheet.row_count(), "read worksheet");
            sheets.push(NamedSheet::new(sheet_name, sheet));
        }

        Ok(sheets)
    }
}

/// Assemble a document from named sheets (sheet names match case-insensitively)
pub fn document_from_sheets(sheets: &[NamedSheet]) -> XlsFormResult<XlsFormDocument> {
    let find = |name: &str| {
        sheets
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .map(|s| s.sheet.to_rows())
    };

    let survey_rows = find(SURVEY_SHEET)
        .ok_or_else(|| XlsFormError::Import("workbook has no 'survey' sheet".to_string()))?;
    let choice_rows = find(CHOICES_SHEET).unwrap_or_default();
    let settings_rows = find(SETTINGS_SHEET)
        .ok_or_else(|| XlsFormError::Import("workbook has no 'settings' sheet".to_string()))?;

    Ok(XlsFormDocument {
        survey: unflatten_tree(&survey_rows)?,
        choices: unflatten_choices(&choice_rows)?,
        settings: unflatten_settings(&settings_rows)?,
        languages: discover_languages(survey_rows.iter().chain(&choice_rows)),
    })
}

fn range_to_sheet(range: &Range<Data>) -> Sheet {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Sheet::default();
    };

    Sheet {
        headers: header
            .iter()
            .map(|cell| cell_text(cell).unwrap_or_default())
            .collect(),
        data: rows
            .map(|cells| cells.iter().map(cell_text).collect())
            .collect(),
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
