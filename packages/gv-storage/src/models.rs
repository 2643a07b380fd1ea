use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One phenotype-level entry of the search index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhenotypeRecord {
	pub gene_symbol: String,
	pub gene_name: String,
	pub description: String,
	#[serde(default)]
	pub is_curated: bool,
	pub phenotype_id: String,
	pub phenotype_name: String,
	pub phenotype_description: String,
	#[serde(default)]
	pub mgi_id: Option<String>,
	#[serde(default)]
	pub alleles: ListField,
	#[serde(default)]
	pub pubmed_refs: ListField,
	#[serde(default)]
	pub genetic_backgrounds: ListField,
}

/// A list-valued record field.
///
/// Structured payloads carry native lists. Flat payloads carry the list as a JSON-encoded
/// string that has to be decoded per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListField {
	Items(Vec<String>),
	Encoded(String),
}
impl ListField {
	pub fn encoded(raw: impl Into<String>) -> Self {
		Self::Encoded(raw.into())
	}

	/// Returns the list items. Encoded arrays may hold strings or numbers; numbers are
	/// rendered as text. Anything else is a decode error.
	pub fn decode(&self) -> Result<Vec<String>, DecodeError> {
		let raw = match self {
			Self::Items(items) => return Ok(items.clone()),
			Self::Encoded(raw) => raw,
		};

		if raw.trim().is_empty() {
			return Ok(Vec::new());
		}

		let values: Vec<Value> = serde_json::from_str(raw)?;
		let mut out = Vec::with_capacity(values.len());

		for value in values {
			match value {
				Value::String(text) => out.push(text),
				Value::Number(number) => out.push(number.to_string()),
				other => return Err(DecodeError::UnsupportedElement(other.to_string())),
			}
		}

		Ok(out)
	}
}
impl Default for ListField {
	fn default() -> Self {
		Self::Items(Vec::new())
	}
}
impl From<Vec<String>> for ListField {
	fn from(items: Vec<String>) -> Self {
		Self::Items(items)
	}
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
	#[error("Encoded list is not a JSON array: {0}")]
	Json(#[from] serde_json::Error),
	#[error("Encoded list contains an unsupported element: {0}")]
	UnsupportedElement(String),
}
