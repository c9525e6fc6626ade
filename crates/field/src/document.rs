use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::common::error::FieldError;
use crate::decode::decode_job_spec;
use crate::jobspec::JobSpecification;

/// Text formats a job specification document can be written in.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DocumentFormat {
    #[default]
    Yaml,
    Toml,
    Json,
}

impl DocumentFormat {
    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            "toml" => Some(DocumentFormat::Toml),
            "json" => Some(DocumentFormat::Json),
            _ => None,
        }
    }
}

/// Parses text into format-neutral value trees, one per document.
/// A YAML stream may hold several `---` separated documents; empty ones are skipped.
pub fn parse_values(text: &str, format: DocumentFormat) -> crate::Result<Vec<Value>> {
    let values = match format {
        DocumentFormat::Yaml => {
            let mut values = Vec::new();
            for document in serde_yaml::Deserializer::from_str(text) {
                let value = Value::deserialize(document)?;
                if !value.is_null() {
                    values.push(value);
                }
            }
            values
        }
        DocumentFormat::Toml => vec![toml::from_str::<Value>(text)?],
        DocumentFormat::Json => vec![serde_json::from_str::<Value>(text)?],
    };
    if values.is_empty() {
        return Err(FieldError::DeserializationError(
            "the input does not contain any document".to_string(),
        ));
    }
    Ok(values)
}

/// Decodes every document contained in `text`.
pub fn load_documents(text: &str, format: DocumentFormat) -> crate::Result<Vec<JobSpecification>> {
    parse_values(text, format)?
        .iter()
        .map(decode_job_spec)
        .collect()
}

/// Decodes `text`, which must contain exactly one document.
pub fn load_document(text: &str, format: DocumentFormat) -> crate::Result<JobSpecification> {
    let mut specs = load_documents(text, format)?;
    if specs.len() != 1 {
        return Err(FieldError::DeserializationError(format!(
            "expected a single document, found {}",
            specs.len()
        )));
    }
    Ok(specs.remove(0))
}

/// Reads and decodes a file; without an explicit format it is derived from the extension
/// and defaults to YAML.
pub fn load_file(
    path: &Path,
    format: Option<DocumentFormat>,
) -> crate::Result<Vec<JobSpecification>> {
    let format = format
        .or_else(|| DocumentFormat::from_path(path))
        .unwrap_or_default();
    log::debug!("Loading {} as {:?}", path.display(), format);
    let text = std::fs::read_to_string(path)?;
    load_documents(&text, format)
}
