//! Rows ↔ header + grid

use super::flattener::SurveyRow;
use indexmap::IndexSet;

/// A sheet: one header row and a grid of optional cells, one slot per header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub data: Vec<Vec<Option<String>>>,
}

impl Sheet {
    /// No header and no data
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.data.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Cell by data row index and column name
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.headers.iter().position(|h| h == column)?;
        self.data.get(row)?.get(col)?.as_deref()
    }

    /// Back to rows. Blank cells and blank headers are omitted; rows without
    /// any cell are skipped.
    pub fn to_rows(&self) -> Vec<SurveyRow> {
        self.data
            .iter()
            .filter_map(|cells| {
                let row: SurveyRow = self
                    .headers
                    .iter()
                    .zip(cells)
                    .filter(|(header, _)| !header.is_empty())
                    .filter_map(|(header, cell)| {
                        let value = cell.as_ref().filter(|v| !v.is_empty())?;
                        Some((header.clone(), value.clone()))
                    })
                    .collect();
                (!row.is_empty()).then_some(row)
            })
            .collect()
    }
}

/// Build a sheet whose header is the first-seen union of all row keys.
///
/// Rows lacking a column get a blank slot. Empty input yields an empty sheet.
pub fn rows_to_sheet(rows: &[SurveyRow]) -> Sheet {
    if rows.is_empty() {
        return Sheet::default();
    }

    let headers: IndexSet<&str> = rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();

    let data: Vec<Vec<Option<String>>> = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|header| row.get(*header).cloned())
                .collect()
        })
        .collect();

    Sheet {
        headers: headers.into_iter().map(str::to_string).collect(),
        data,
    }
}
