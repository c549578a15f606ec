use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Open column-name → value mapping carried by survey nodes, choices and settings.
///
/// Keys are emitted verbatim as spreadsheet columns, after all computed columns,
/// so they win on collision.
pub type ExtraFields = IndexMap<String, String>;

/// Generate a fresh opaque node identity
pub fn new_node_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

//==============================================================================
// Localized Strings
//==============================================================================

/// A label-like value: one plain string, or a language name → text mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedString {
    /// Single-language form
    Plain(String),
    /// Per-language values, keyed by the declared language name
    Localized(BTreeMap<String, String>),
}

impl LocalizedString {
    /// Build a localized value from `(language, text)` pairs
    pub fn localized<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        LocalizedString::Localized(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Text for a language; plain strings answer for every language
    pub fn get(&self, language: &str) -> Option<&str> {
        match self {
            LocalizedString::Plain(s) => Some(s),
            LocalizedString::Localized(map) => map.get(language).map(String::as_str),
        }
    }

    /// Language keys of a localized value (empty for plain strings)
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        let keys: Vec<&str> = match self {
            LocalizedString::Plain(_) => Vec::new(),
            LocalizedString::Localized(map) => map.keys().map(String::as_str).collect(),
        };
        keys.into_iter()
    }
}

impl Default for LocalizedString {
    fn default() -> Self {
        LocalizedString::Plain(String::new())
    }
}

impl From<&str> for LocalizedString {
    fn from(value: &str) -> Self {
        LocalizedString::Plain(value.to_string())
    }
}

impl From<String> for LocalizedString {
    fn from(value: String) -> Self {
        LocalizedString::Plain(value)
    }
}

//==============================================================================
// Question Types
//==============================================================================

/// Closed set of survey element types, including the implicit metadata types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuestionType {
    #[default]
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "decimal")]
    Decimal,
    #[serde(rename = "note")]
    Note,
    #[serde(rename = "select_one")]
    SelectOne,
    #[serde(rename = "select_multiple")]
    SelectMultiple,
    #[serde(rename = "geopoint")]
    Geopoint,
    #[serde(rename = "geotrace")]
    Geotrace,
    #[serde(rename = "geoshape")]
    Geoshape,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "dateTime")]
    DateTime,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "audio")]
    Audio,
    #[serde(rename = "video")]
    Video,
    #[serde(rename = "file")]
    File,
    #[serde(rename = "barcode")]
    Barcode,
    #[serde(rename = "calculate")]
    Calculate,
    #[serde(rename = "acknowledge")]
    Acknowledge,
    #[serde(rename = "range")]
    Range,
    #[serde(rename = "rank")]
    Rank,
    #[serde(rename = "group")]
    Group,
    #[serde(rename = "repeat")]
    Repeat,
    // Implicit metadata
    #[serde(rename = "start")]
    Start,
    #[serde(rename = "end")]
    End,
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "phonenumber")]
    PhoneNumber,
    #[serde(rename = "deviceid")]
    DeviceId,
    #[serde(rename = "username")]
    Username,
    #[serde(rename = "email")]
    Email,
}

impl QuestionType {
    pub const ALL: [QuestionType; 30] = [
        QuestionType::Text,
        QuestionType::Integer,
        QuestionType::Decimal,
        QuestionType::Note,
        QuestionType::SelectOne,
        QuestionType::SelectMultiple,
        QuestionType::Geopoint,
        QuestionType::Geotrace,
        QuestionType::Geoshape,
        QuestionType::Date,
        QuestionType::Time,
        QuestionType::DateTime,
        QuestionType::Image,
        QuestionType::Audio,
        QuestionType::Video,
        QuestionType::File,
        QuestionType::Barcode,
        QuestionType::Calculate,
        QuestionType::Acknowledge,
        QuestionType::Range,
        QuestionType::Rank,
        QuestionType::Group,
        QuestionType::Repeat,
        QuestionType::Start,
        QuestionType::End,
        QuestionType::Today,
        QuestionType::PhoneNumber,
        QuestionType::DeviceId,
        QuestionType::Username,
        QuestionType::Email,
    ];

    /// The spreadsheet spelling of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Text => "text",
            QuestionType::Integer => "integer",
            QuestionType::Decimal => "decimal",
            QuestionType::Note => "note",
            QuestionType::SelectOne => "select_one",
            QuestionType::SelectMultiple => "select_multiple",
            QuestionType::Geopoint => "geopoint",
            QuestionType::Geotrace => "geotrace",
            QuestionType::Geoshape => "geoshape",
            QuestionType::Date => "date",
            QuestionType::Time => "time",
            QuestionType::DateTime => "dateTime",
            QuestionType::Image => "image",
            QuestionType::Audio => "audio",
            QuestionType::Video => "video",
            QuestionType::File => "file",
            QuestionType::Barcode => "barcode",
            QuestionType::Calculate => "calculate",
            QuestionType::Acknowledge => "acknowledge",
            QuestionType::Range => "range",
            QuestionType::Rank => "rank",
            QuestionType::Group => "group",
            QuestionType::Repeat => "repeat",
            QuestionType::Start => "start",
            QuestionType::End => "end",
            QuestionType::Today => "today",
            QuestionType::PhoneNumber => "phonenumber",
            QuestionType::DeviceId => "deviceid",
            QuestionType::Username => "username",
            QuestionType::Email => "email",
        }
    }

    /// select_one / select_multiple, which reference a choice list
    pub fn is_select(&self) -> bool {
        matches!(self, QuestionType::SelectOne | QuestionType::SelectMultiple)
    }

    /// group / repeat
    pub fn is_container(&self) -> bool {
        matches!(self, QuestionType::Group | QuestionType::Repeat)
    }

    /// Implicit metadata types (start, end, today, ...)
    pub fn is_metadata(&self) -> bool {
        matches!(
            self,
            QuestionType::Start
                | QuestionType::End
                | QuestionType::Today
                | QuestionType::PhoneNumber
                | QuestionType::DeviceId
                | QuestionType::Username
                | QuestionType::Email
        )
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionType::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown question type '{}'", s))
    }
}

//==============================================================================
// Survey Tree
//==============================================================================

/// Borrowed value of a declared node/settings field, in declaration order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Localized(&'a LocalizedString),
}

/// One form element. Nodes with `children` are containers (group, repeat).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyNode {
    /// In-memory identity, never exported
    #[serde(default = "new_node_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: QuestionType,
    pub name: String,
    #[serde(default)]
    pub label: LocalizedString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint_message: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<String>,
    #[serde(rename = "default", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readonly: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice_filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_count: Option<String>,
    /// Choice list reference (select_one / select_multiple)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_audio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: ExtraFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SurveyNode>>,
}

/// Internal names of the fields that carry a `LocalizedString`
pub const LOCALIZABLE_FIELDS: [&str; 3] = ["label", "hint", "constraintMessage"];

impl SurveyNode {
    pub fn new(
        id: impl Into<String>,
        node_type: QuestionType,
        name: impl Into<String>,
        label: impl Into<LocalizedString>,
    ) -> Self {
        Self {
            id: id.into(),
            node_type,
            name: name.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    /// Builder: set the choice list reference
    pub fn with_list_name(mut self, list_name: impl Into<String>) -> Self {
        self.list_name = Some(list_name.into());
        self
    }

    /// Builder: make this node a container holding `children`
    pub fn with_children(mut self, children: Vec<SurveyNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Builder: add an extra column
    pub fn with_extra(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(column.into(), value.into());
        self
    }

    /// True when the node owns a children sequence (even an empty one)
    pub fn is_container(&self) -> bool {
        self.children.is_some()
    }

    /// Children of a container, or an empty slice for leaves
    pub fn child_nodes(&self) -> &[SurveyNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Declared exportable fields in declaration order, skipping `id`, `type`,
    /// `children`, `extra` and absent optionals
    pub fn fields(&self) -> Vec<(&'static str, FieldValue<'_>)> {
        let mut fields = vec![
            ("name", FieldValue::Text(&self.name)),
            ("label", FieldValue::Localized(&self.label)),
        ];
        if let Some(hint) = &self.hint {
            fields.push(("hint", FieldValue::Localized(hint)));
        }
        let scalars_before_message = [
            ("required", &self.required),
            ("relevant", &self.relevant),
            ("constraint", &self.constraint),
        ];
        push_text_fields(&mut fields, &scalars_before_message);
        if let Some(message) = &self.constraint_message {
            fields.push(("constraintMessage", FieldValue::Localized(message)));
        }
        let scalars = [
            ("appearance", &self.appearance),
            ("default", &self.default_value),
            ("readonly", &self.readonly),
            ("calculation", &self.calculation),
            ("choiceFilter", &self.choice_filter),
            ("repeatCount", &self.repeat_count),
            ("listName", &self.list_name),
            ("mediaImage", &self.media_image),
            ("mediaAudio", &self.media_audio),
            ("parameters", &self.parameters),
        ];
        push_text_fields(&mut fields, &scalars);
        fields
    }

    /// Set a scalar field by internal name. Returns false for unknown names.
    pub fn set_text_field(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "name" => {
                self.name = value;
                return true;
            }
            "required" => &mut self.required,
            "relevant" => &mut self.relevant,
            "constraint" => &mut self.constraint,
            "appearance" => &mut self.appearance,
            "default" => &mut self.default_value,
            "readonly" => &mut self.readonly,
            "calculation" => &mut self.calculation,
            "choiceFilter" => &mut self.choice_filter,
            "repeatCount" => &mut self.repeat_count,
            "listName" => &mut self.list_name,
            "mediaImage" => &mut self.media_image,
            "mediaAudio" => &mut self.media_audio,
            "parameters" => &mut self.parameters,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Set a localizable field by internal name. Returns false for unknown names.
    pub fn set_localized_field(&mut self, field: &str, value: LocalizedString) -> bool {
        match field {
            "label" => self.label = value,
            "hint" => self.hint = Some(value),
            "constraintMessage" => self.constraint_message = Some(value),
            _ => return false,
        }
        true
    }
}

fn push_text_fields<'a>(
    fields: &mut Vec<(&'static str, FieldValue<'a>)>,
    candidates: &[(&'static str, &'a Option<String>)],
) {
    for (name, value) in candidates {
        if let Some(value) = value {
            fields.push((name, FieldValue::Text(value)));
        }
    }
}

//==============================================================================
// Choices and Settings
//==============================================================================

/// One selectable option
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Choice {
    pub name: String,
    #[serde(default)]
    pub label: LocalizedString,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: ExtraFields,
}

impl Choice {
    pub fn new(name: impl Into<String>, label: impl Into<LocalizedString>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            extra: ExtraFields::new(),
        }
    }
}

/// A named, reusable set of choices
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceList {
    pub list_name: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl ChoiceList {
    pub fn new(list_name: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            list_name: list_name.into(),
            choices,
        }
    }
}

/// Form-level settings (one row in the `settings` sheet)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSettings {
    pub form_title: String,
    pub form_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: ExtraFields,
}

impl FormSettings {
    pub fn new(form_title: impl Into<String>, form_id: impl Into<String>) -> Self {
        Self {
            form_title: form_title.into(),
            form_id: form_id.into(),
            ..Default::default()
        }
    }

    /// Present fields by internal name, in declaration order, without `extra`
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![
            ("formTitle", self.form_title.as_str()),
            ("formId", self.form_id.as_str()),
        ];
        let optional = [
            ("version", &self.version),
            ("defaultLanguage", &self.default_language),
            ("style", &self.style),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                fields.push((name, value.as_str()));
            }
        }
        fields
    }

    /// Set a field by internal name. Returns false for unknown names.
    pub fn set_field(&mut self, field: &str, value: String) -> bool {
        match field {
            "formTitle" => self.form_title = value,
            "formId" => self.form_id = value,
            "version" => self.version = Some(value),
            "defaultLanguage" => self.default_language = Some(value),
            "style" => self.style = Some(value),
            _ => return false,
        }
        true
    }
}

//==============================================================================
// Document
//==============================================================================

/// Aggregate root: survey forest, choice lists, settings, declared languages
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct XlsFormDocument {
    pub survey: Vec<SurveyNode>,
    #[serde(default)]
    pub choices: Vec<ChoiceList>,
    pub settings: FormSettings,
    /// Declared language names; order drives localized column order
    #[serde(default)]
    pub languages: Vec<String>,
}

impl XlsFormDocument {
    pub fn new(settings: FormSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Look up a choice list by key
    pub fn choice_list(&self, list_name: &str) -> Option<&ChoiceList> {
        self.choices.iter().find(|list| list.list_name == list_name)
    }

    /// Total node count across the forest, containers included
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[SurveyNode]) -> usize {
            nodes.iter().map(|n| 1 + count(n.child_nodes())).sum()
        }
        count(&self.survey)
    }
}
