//! Internal field name ↔ XLSForm column name table

/// `(internal field, spreadsheet column)` pairs. Unlisted names map to themselves.
pub const COLUMN_MAP: [(&str, &str); 10] = [
    ("listName", "list_name"),
    ("constraintMessage", "constraint_message"),
    ("choiceFilter", "choice_filter"),
    ("repeatCount", "repeat_count"),
    ("readonly", "read_only"),
    ("mediaImage", "media::image"),
    ("mediaAudio", "media::audio"),
    ("formTitle", "form_title"),
    ("formId", "form_id"),
    ("defaultLanguage", "default_language"),
];

/// Spreadsheet column for an internal field name
pub fn column_name(field: &str) -> &str {
    COLUMN_MAP
        .iter()
        .find(|(internal, _)| *internal == field)
        .map_or(field, |&(_, column)| column)
}

/// Internal field name for a spreadsheet column (inverse of [`column_name`])
pub fn field_name(column: &str) -> &str {
    COLUMN_MAP
        .iter()
        .find(|(_, external)| *external == column)
        .map_or(column, |&(internal, _)| internal)
}
