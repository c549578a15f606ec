//! XLSForm Forge - survey form trees ↔ XLSForm spreadsheets
//!
//! This library models a hierarchical survey form (questions, groups, repeats,
//! choice lists, settings, multi-language labels) and converts it to and from
//! the flat `survey` / `choices` / `settings` workbook convention.
//!
//! # Features
//!
//! - Copy-on-write tree editing (find, insert, remove, move nodes)
//! - Depth-first flattening with `begin_*` / `end_*` markers
//! - `label::Language` column fan-out for localized fields
//! - Excel export and import
//! - JSON Schema validated YAML/JSON documents
//!
//! # Example
//!
//! ```no_run
//! use xlsform_forge::excel::{export_to_xlsx, flatten_tree};
//! use xlsform_forge::parser::parse_document;
//! use std::path::Path;
//!
//! let doc = parse_document(Path::new("form.yaml"))?;
//!
//! let flattened = flatten_tree(&doc.survey, &doc.languages);
//! println!("Survey rows: {}", flattened.rows.len());
//!
//! let bytes = export_to_xlsx(&doc)?;
//! std::fs::write("form.xlsx", bytes)?;
//! # Ok::<(), xlsform_forge::error::XlsFormError>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod parser;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use error::{XlsFormError, XlsFormResult};
pub use types::{
    Choice, ChoiceList, FormSettings, LocalizedString, QuestionType, SurveyNode, XlsFormDocument,
};
