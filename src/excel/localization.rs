//! Localized value ↔ `base` / `base::language` columns

use super::column_map::{column_name, field_name};
use super::flattener::SurveyRow;
use crate::types::{LocalizedString, LOCALIZABLE_FIELDS};

/// Separator between a column base name and a language name
pub const LANGUAGE_SEPARATOR: &str = "::";

/// Expand one localizable field into its columns.
///
/// Plain strings produce a single bare column. Localized values produce one
/// `base::language` column per declared language present in the value, in
/// declared order. Keys for undeclared languages are dropped.
pub fn expand_localized(field: &str, value: &LocalizedString, languages: &[String]) -> SurveyRow {
    let base = column_name(field);
    let mut columns = SurveyRow::new();

    match value {
        LocalizedString::Plain(text) => {
            columns.insert(base.to_string(), text.clone());
        }
        LocalizedString::Localized(map) => {
            for language in languages {
                if let Some(text) = map.get(language) {
                    columns.insert(
                        format!("{}{}{}", base, LANGUAGE_SEPARATOR, language),
                        text.clone(),
                    );
                }
            }
        }
    }

    columns
}

/// True for internal fields whose values are `LocalizedString`s
pub fn is_localizable(field: &str) -> bool {
    LOCALIZABLE_FIELDS.contains(&field)
}

/// Split `label::English (en)` into `("label", "English (en)")`.
///
/// Returns `None` for bare columns and for `::` columns whose base is not a
/// localizable field (such as `media::image`).
pub fn split_localized_column(column: &str) -> Option<(&str, &str)> {
    let (base, language) = column.split_once(LANGUAGE_SEPARATOR)?;
    let field = field_name(base);
    if is_localizable(field) && !language.is_empty() {
        Some((field, language))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn langs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_string_single_column() {
        let row = expand_localized("label", &"Name?".into(), &langs(&["English", "French"]));
        assert_eq!(row.len(), 1);
        assert_eq!(row["label"], "Name?");
    }

    #[test]
    fn test_localized_follows_declared_order() {
        let value = LocalizedString::localized([("French", "Nom?"), ("English", "Name?")]);
        let row = expand_localized("label", &value, &langs(&["English", "French"]));
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["label::English", "label::French"]);
        assert!(!row.contains_key("label"));
    }

    #[test]
    fn test_missing_and_undeclared_languages_are_skipped() {
        let value = LocalizedString::localized([("English", "Hi"), ("German", "Hallo")]);
        let row = expand_localized("hint", &value, &langs(&["English", "Spanish"]));
        assert_eq!(row.len(), 1);
        assert_eq!(row["hint::English"], "Hi");
    }

    #[test]
    fn test_base_name_is_column_mapped() {
        let value = LocalizedString::localized([("es", "Mal")]);
        let row = expand_localized("constraintMessage", &value, &langs(&["es"]));
        assert_eq!(row["constraint_message::es"], "Mal");
    }

    #[test]
    fn test_split_localized_column() {
        assert_eq!(split_localized_column("label::English (en)"), Some(("label", "English (en)")));
        assert_eq!(
            split_localized_column("constraint_message::fr"),
            Some(("constraintMessage", "fr"))
        );
        assert_eq!(split_localized_column("media::image"), None);
        assert_eq!(split_localized_column("label"), None);
        assert_eq!(split_localized_column("label::"), None);
    }
}
