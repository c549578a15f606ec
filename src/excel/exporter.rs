//! Excel exporter implementation

use super::flattener::{flatten_choices, flatten_settings, flatten_tree};
use super::sheet::{rows_to_sheet, Sheet};
use crate::error::{XlsFormError, XlsFormResult};
use crate::types::XlsFormDocument;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;
use tracing::{debug, info};

pub const SURVEY_SHEET: &str = "survey";
pub const CHOICES_SHEET: &str = "choices";
pub const SETTINGS_SHEET: &str = "settings";

/// A sheet with its worksheet name
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSheet {
    pub name: String,
    pub sheet: Sheet,
}

impl NamedSheet {
    pub fn new(name: impl Into<String>, sheet: Sheet) -> Self {
        Self {
            name: name.into(),
            sheet,
        }
    }
}

/// Excel exporter for XLSForm documents
pub struct XlsFormExporter<'a> {
    document: &'a XlsFormDocument,
}

impl<'a> XlsFormExporter<'a> {
    /// Create a new exporter over a document
    pub fn new(document: &'a XlsFormDocument) -> Self {
        Self { document }
    }

    /// Sheets in workbook order: `survey`, `choices` (only when it has rows), `settings`
    pub fn build_sheets(&self) -> Vec<NamedSheet> {
        let doc = self.document;
        let survey_rows = flatten_tree(&doc.survey, &doc.languages).rows;
        let choice_rows = flatten_choices(&doc.choices, &doc.languages);
        let settings_rows = flatten_settings(&doc.settings);

        let mut sheets = vec![NamedSheet::new(SURVEY_SHEET, rows_to_sheet(&survey_rows))];
        if !choice_rows.is_empty() {
            sheets.push(NamedSheet::new(CHOICES_SHEET, rows_to_sheet(&choice_rows)));
        }
        sheets.push(NamedSheet::new(
            SETTINGS_SHEET,
            rows_to_sheet(&settings_rows),
        ));
        sheets
    }

    /// Encode the workbook as .xlsx bytes
    pub fn to_bytes(&self) -> XlsFormResult<Vec<u8>> {
        let mut workbook = self.build_workbook()?;
        let bytes = workbook
            .save_to_buffer()
            .map_err(|e| XlsFormError::Export(format!("Failed to encode workbook: {}", e)))?;
        info!(
            form_id = %self.document.settings.form_id,
            bytes = bytes.len(),
            "exported workbook"
        );
        Ok(bytes)
    }

    /// Export the document to an Excel .xlsx file
    pub fn export(&self, output_path: &Path) -> XlsFormResult<()> {
        let mut workbook = self.build_workbook()?;
        workbook
            .save(output_path)
            .map_err(|e| XlsFormError::Export(format!("Failed to save Excel file: {}", e)))?;
        info!(path = %output_path.display(), "exported workbook");
        Ok(())
    }

    fn build_workbook(&self) -> XlsFormResult<Workbook> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        for named in self.build_sheets() {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&named.name).map_err(|e| {
                XlsFormError::Export(format!("Failed to set worksheet name: {}", e))
            })?;
            Self::write_sheet(worksheet, &named.sheet, &header_format)?;
            debug!(
                sheet = %named.name,
                columns = named.sheet.headers.len(),
                rows = named.sheet.row_count(),
                "wrote worksheet"
            );
        }

        Ok(workbook)
    }

    /// Header in row 0, data from row 1. Blank cells stay unwritten.
    fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet, header_format: &Format) -> XlsFormResult<()> {
        for (col_idx, header) in sheet.headers.iter().enumerate() {
            let col = column_index(col_idx)?;
            worksheet
                .write_string_with_format(0, col, header, header_format)
                .map_err(|e| XlsFormError::Export(format!("Failed to write header: {}", e)))?;
        }

        for (row_idx, cells) in sheet.data.iter().enumerate() {
            let row = u32::try_from(row_idx + 1)
                .map_err(|_| XlsFormError::Export("Too many rows for a worksheet".to_string()))?;
            for (col_idx, cell) in cells.iter().enumerate() {
                let Some(value) = cell.as_deref().filter(|v| !v.is_empty()) else {
                    continue;
                };
                worksheet
                    .write_string(row, column_index(col_idx)?, value)
                    .map_err(|e| XlsFormError::Export(format!("Failed to write cell: {}", e)))?;
            }
        }

        Ok(())
    }
}

fn column_index(idx: usize) -> XlsFormResult<u16> {
    u16::try_from(idx)
        .map_err(|_| XlsFormError::Export("Too many columns for a worksheet".to_string()))
}

/// Export a document to .xlsx bytes
pub fn export_to_xlsx(document: &XlsFormDocument) -> XlsFormResult<Vec<u8>> {
    XlsFormExporter::new(document).to_bytes()
}
