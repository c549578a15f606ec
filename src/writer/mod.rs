//! Document serialization back to YAML

use crate::error::XlsFormResult;
use crate::types::XlsFormDocument;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Render a document as YAML text
pub fn document_to_yaml(document: &XlsFormDocument) -> XlsFormResult<String> {
    Ok(serde_yaml::to_string(document)?)
}

/// Write a document to a YAML file, replacing any existing content
pub fn write_document(path: &Path, document: &XlsFormDocument) -> XlsFormResult<()> {
    let yaml = document_to_yaml(document)?;
    fs::write(path, yaml)?;
    debug!(path = %path.display(), "wrote document");
    Ok(())
}
