use thiserror::Error;

pub type XlsFormResult<T> = Result<T, XlsFormError>;

#[derive(Error, Debug)]
pub enum XlsFormError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("No such parent node: '{0}'")]
    NoSuchParent(String),

    #[error("Invalid move: {0}")]
    InvalidMove(String),
}
