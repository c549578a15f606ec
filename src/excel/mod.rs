//! XLSForm spreadsheet conversion
//!
//! This module provides bidirectional tree ↔ workbook conversion:
//! - Export: document → survey/choices/settings rows → sheets → .xlsx
//! - Import: .xlsx → sheets → rows → document

pub mod column_map;
mod exporter;
pub mod flattener;
mod importer;
pub mod localization;
pub mod sheet;
pub mod unflattener;

pub use column_map::{column_name, field_name};
pub use exporter::{
    export_to_xlsx, NamedSheet, XlsFormExporter, CHOICES_SHEET, SETTINGS_SHEET, SURVEY_SHEET,
};
pub use flattener::{flatten_choices, flatten_settings, flatten_tree, FlattenResult, SurveyRow};
pub use importer::{document_from_sheets, XlsFormImporter};
pub use localization::expand_localized;
pub use sheet::{rows_to_sheet, Sheet};
pub use unflattener::{discover_languages, unflatten_choices, unflatten_settings, unflatten_tree};
