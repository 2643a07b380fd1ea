pub const DENSE_VECTOR_NAME: &str = "dense";

use std::collections::HashMap;

use qdrant_client::qdrant::{
	CountPointsBuilder, Query, QueryPointsBuilder, Value, value::Kind,
};

use crate::{
	Error, Result,
	models::{ListField, PhenotypeRecord},
};

/// How the collection scores points, and therefore how a score maps back to a distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceKind {
	/// Scores are Euclidean distances already.
	Euclid,
	Cosine,
	Dot,
}
impl DistanceKind {
	pub fn parse(raw: &str) -> Result<Self> {
		match raw {
			"euclid" => Ok(Self::Euclid),
			"cosine" => Ok(Self::Cosine),
			"dot" => Ok(Self::Dot),
			other => Err(Error::InvalidArgument(format!("Unknown qdrant distance {other:?}."))),
		}
	}

	pub fn score_to_distance(self, score: f32) -> f32 {
		match self {
			Self::Euclid => score.max(0.0),
			Self::Cosine | Self::Dot => (1.0 - score).max(0.0),
		}
	}
}

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
	pub distance: DistanceKind,
}
impl QdrantStore {
	pub fn new(cfg: &gv_config::Qdrant) -> Result<Self> {
		let distance = DistanceKind::parse(&cfg.distance)?;
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim, distance })
	}

	/// Nearest phenotype records to `vector`, closest first, paired with their distance.
	pub async fn search(&self, vector: Vec<f32>, limit: u64) -> Result<Vec<(PhenotypeRecord, f32)>> {
		if vector.len() != self.vector_dim as usize {
			return Err(Error::InvalidArgument(format!(
				"Query vector has {} dimensions, collection expects {}.",
				vector.len(),
				self.vector_dim
			)));
		}

		let request = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector))
			.using(DENSE_VECTOR_NAME)
			.with_payload(true)
			.limit(limit);
		let response = self.client.query(request).await?;

		Ok(response
			.result
			.into_iter()
			.map(|point| {
				(record_from_payload(&point.payload), self.distance.score_to_distance(point.score))
			})
			.collect())
	}

	pub async fn count(&self) -> Result<u64> {
		let response =
			self.client.count(CountPointsBuilder::new(self.collection.clone()).exact(true)).await?;

		Ok(response.result.map(|result| result.count).unwrap_or(0))
	}
}

/// Builds a record from a point payload. Missing fields decode as empty values.
pub fn record_from_payload(payload: &HashMap<String, Value>) -> PhenotypeRecord {
	PhenotypeRecord {
		gene_symbol: payload_string(payload, "gene_symbol").unwrap_or_default(),
		gene_name: payload_string(payload, "gene_name").unwrap_or_default(),
		description: payload_string(payload, "description").unwrap_or_default(),
		is_curated: payload_bool(payload, "is_curated").unwrap_or(false),
		phenotype_id: payload_string(payload, "phenotype_id").unwrap_or_default(),
		phenotype_name: payload_string(payload, "phenotype_name").unwrap_or_default(),
		phenotype_description: payload_string(payload, "phenotype_description")
			.unwrap_or_default(),
		mgi_id: payload_string(payload, "mgi_id").filter(|id| !id.trim().is_empty()),
		alleles: payload_list_field(payload, "alleles"),
		pubmed_refs: payload_list_field(payload, "pubmed_refs"),
		genetic_backgrounds: payload_list_field(payload, "genetic_backgrounds"),
	}
}

pub fn payload_string(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	let value = payload.get(key)?;

	match &value.kind {
		Some(Kind::StringValue(text)) => Some(text.to_string()),
		_ => None,
	}
}

pub fn payload_bool(payload: &HashMap<String, Value>, key: &str) -> Option<bool> {
	let value = payload.get(key)?;

	match &value.kind {
		Some(Kind::BoolValue(flag)) => Some(*flag),
		_ => None,
	}
}

/// Reads `key` as a native list, falling back to the flat `<key>_json` encoding.
pub fn payload_list_field(payload: &HashMap<String, Value>, key: &str) -> ListField {
	if let Some(Value { kind: Some(Kind::ListValue(list)) }) = payload.get(key) {
		let items = list
			.values
			.iter()
			.filter_map(|value| match &value.kind {
				Some(Kind::StringValue(text)) => Some(text.to_string()),
				Some(Kind::IntegerValue(number)) => Some(number.to_string()),
				_ => None,
			})
			.collect();

		return ListField::Items(items);
	}

	match payload_string(payload, &format!("{key}_json")) {
		Some(raw) => ListField::Encoded(raw),
		None => ListField::default(),
	}
}
