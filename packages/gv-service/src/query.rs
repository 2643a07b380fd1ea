use std::time::Instant;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gv_domain::{PlausibilityWarning, check_prompt, check_top_score, curated_genes};
use gv_storage::models::PhenotypeRecord;

use crate::{
	Error, GeneService, Result, SearchHit, aggregate, format::GeneResult, format_genes, rank,
};

/// Candidates requested per wanted gene, since several hits usually collapse into one gene.
pub const OVERSAMPLE_FACTOR: u32 = 3;
/// Genes whose fused score falls below this are not returned.
pub const MIN_AGGREGATE_SCORE: f32 = 0.01;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
	pub prompt: String,
	#[serde(default)]
	pub top_k: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMetadata {
	pub retrieval_time_ms: f64,
	pub embedding_model: String,
	pub top_k: u32,
	pub total_candidates: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
	pub query: String,
	pub genes: Vec<GeneResult>,
	pub total_results: usize,
	pub search_metadata: SearchMetadata,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub warning: Option<PlausibilityWarning>,
}

impl GeneService {
	/// Ranks genes whose knockout phenotypes best match `req.prompt`.
	///
	/// A plausibility warning never stops the search; it is attached to the result instead.
	pub async fn query(&self, req: QueryRequest) -> Result<QueryResult> {
		let started = Instant::now();
		let query_id = Uuid::new_v4();
		let top_k = self.resolve_top_k(&req)?;
		let mut warning = check_prompt(&req.prompt);

		if let Some(warning) = &warning {
			tracing::debug!(%query_id, message = %warning.message, "Prompt matched a plausibility rule.");
		}

		let hits = self
			.index
			.search(&req.prompt, top_k * OVERSAMPLE_FACTOR)
			.await
			.map_err(|err| Error::Search { message: err.to_string() })?;
		let total_candidates = hits.len();
		let candidates = normalize_distances(hits)
			.into_iter()
			.map(|(mut record, similarity)| {
				annotate_curated(&mut record);

				(record, similarity)
			})
			.collect::<Vec<_>>();
		let ranked = rank(aggregate(&candidates));
		let ranked_count = ranked.len();
		let kept: Vec<_> = ranked
			.into_iter()
			.filter(|gene| gene.aggregate_score >= MIN_AGGREGATE_SCORE)
			.take(top_k as usize)
			.collect();

		tracing::debug!(
			%query_id,
			candidates = total_candidates,
			genes = ranked_count,
			kept = kept.len(),
			"Aggregated search candidates."
		);

		let genes = format_genes(kept);

		if warning.is_none()
			&& let Some(top) = genes.first()
		{
			warning = check_top_score(top.aggregate_score);
		}

		let retrieval_time_ms = round2(started.elapsed().as_secs_f64() * 1_000.0);

		tracing::info!(
			%query_id,
			top_k,
			results = genes.len(),
			warned = warning.is_some(),
			retrieval_time_ms,
			"Query completed."
		);

		Ok(QueryResult {
			query: req.prompt,
			total_results: genes.len(),
			genes,
			search_metadata: SearchMetadata {
				retrieval_time_ms,
				embedding_model: self.cfg.providers.embedding.model.clone(),
				top_k,
				total_candidates,
			},
			warning,
		})
	}

	fn resolve_top_k(&self, req: &QueryRequest) -> Result<u32> {
		if req.prompt.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "prompt must be non-empty.".to_string() });
		}

		let max_top_k = self.cfg.query.max_top_k;
		let top_k = req.top_k.unwrap_or(self.cfg.query.default_top_k);

		if top_k == 0 || top_k > max_top_k {
			return Err(Error::InvalidRequest {
				message: format!("top_k must be between 1 and {max_top_k}."),
			});
		}

		Ok(top_k)
	}
}

/// Maps distances to similarities relative to the farthest hit of this result set.
pub fn normalize_distances(hits: Vec<SearchHit>) -> Vec<(PhenotypeRecord, f32)> {
	let max = hits.iter().map(|hit| hit.distance).fold(0.0_f32, f32::max);

	hits.into_iter()
		.map(|hit| {
			let similarity =
				if max > 0.0 { (1.0 - hit.distance / max).clamp(0.0, 1.0) } else { 1.0 };

			(hit.record, similarity)
		})
		.collect()
}

fn annotate_curated(record: &mut PhenotypeRecord) {
	let Some(gene) = curated_genes().get(record.gene_symbol.trim()) else {
		return;
	};

	record.is_curated = true;

	if record.gene_name.trim().is_empty() {
		record.gene_name = gene.name.to_string();
	}
	if record.description.trim().is_empty() {
		record.description = gene.description.to_string();
	}
}

fn round2(value: f64) -> f64 {
	(value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
	use gv_storage::models::PhenotypeRecord;

	use super::{annotate_curated, normalize_distances};
	use crate::SearchHit;

	fn hit(symbol: &str, distance: f32) -> SearchHit {
		SearchHit {
			record: PhenotypeRecord { gene_symbol: symbol.to_string(), ..Default::default() },
			distance,
		}
	}

	#[test]
	fn similarities_are_relative_to_farthest_hit() {
		let scored = normalize_distances(vec![hit("Lep", 0.5), hit("Tyr", 1.0), hit("Kit", 2.0)]);
		let similarities: Vec<f32> = scored.iter().map(|(_, similarity)| *similarity).collect();

		assert_eq!(similarities, vec![0.75, 0.5, 0.0]);
	}

	#[test]
	fn zero_distances_are_perfect_matches() {
		let scored = normalize_distances(vec![hit("Lep", 0.0), hit("Tyr", 0.0)]);

		assert!(scored.iter().all(|(_, similarity)| *similarity == 1.0));
	}

	#[test]
	fn curated_records_get_flag_and_display_fields() {
		let mut record = PhenotypeRecord { gene_symbol: "Tyr".to_string(), ..Default::default() };

		annotate_curated(&mut record);

		assert!(record.is_curated);
		assert_eq!(record.gene_name, "Tyrosinase");

		let mut unknown = PhenotypeRecord {
			gene_symbol: "Abc1".to_string(),
			gene_name: "kept".to_string(),
			..Default::default()
		};

		annotate_curated(&mut unknown);

		assert!(!unknown.is_curated);
		assert_eq!(unknown.gene_name, "kept");
	}
}
