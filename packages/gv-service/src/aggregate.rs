//! Collapses phenotype-level search hits into one accumulator per gene.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use gv_storage::models::{ListField, PhenotypeRecord};

use crate::rank::round4;

/// One phenotype hit attached to a gene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhenotypeMatch {
	pub phenotype_id: String,
	pub phenotype_name: String,
	pub phenotype_description: String,
	pub relevance_score: f32,
}

/// Per-gene accumulator for a single query.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneAggregate {
	pub gene_symbol: String,
	pub gene_name: String,
	pub description: String,
	pub is_curated: bool,
	pub mgi_ids: Vec<String>,
	pub alleles: Vec<String>,
	pub pubmed_refs: Vec<String>,
	pub genetic_backgrounds: Vec<String>,
	pub phenotypes: Vec<PhenotypeMatch>,
	/// Raw similarities in hit order. Only the ranker reads these.
	pub scores: Vec<f32>,
	/// Zero until the ranker assigns it.
	pub aggregate_score: f32,
}
impl GeneAggregate {
	fn seed(symbol: &str, record: &PhenotypeRecord) -> Self {
		Self {
			gene_symbol: symbol.to_string(),
			gene_name: record.gene_name.clone(),
			description: record.description.clone(),
			is_curated: record.is_curated,
			mgi_ids: Vec::new(),
			alleles: Vec::new(),
			pubmed_refs: Vec::new(),
			genetic_backgrounds: Vec::new(),
			phenotypes: Vec::new(),
			scores: Vec::new(),
			aggregate_score: 0.0,
		}
	}

	fn absorb(&mut self, record: &PhenotypeRecord, similarity: f32) {
		self.phenotypes.push(PhenotypeMatch {
			phenotype_id: record.phenotype_id.clone(),
			phenotype_name: record.phenotype_name.clone(),
			phenotype_description: record.phenotype_description.clone(),
			relevance_score: round4(similarity),
		});
		self.scores.push(similarity);

		if let Some(mgi_id) = record.mgi_id.as_deref().map(str::trim)
			&& !mgi_id.is_empty()
		{
			self.mgi_ids.push(mgi_id.to_string());
		}

		self.alleles.extend(decode_list(&record.alleles, "alleles", &self.gene_symbol));
		self.pubmed_refs.extend(decode_list(&record.pubmed_refs, "pubmed_refs", &self.gene_symbol));
		self.genetic_backgrounds.extend(decode_list(
			&record.genetic_backgrounds,
			"genetic_backgrounds",
			&self.gene_symbol,
		));
	}

	fn dedup(&mut self) {
		dedup_in_order(&mut self.mgi_ids);
		dedup_in_order(&mut self.alleles);
		dedup_in_order(&mut self.pubmed_refs);
		dedup_in_order(&mut self.genetic_backgrounds);
	}
}

/// Groups `(record, similarity)` pairs by gene symbol.
///
/// Genes come back in the order their first hit appeared. The first hit of a gene fixes its
/// name, description and curated flag. Records without a gene symbol are skipped.
pub fn aggregate(candidates: &[(PhenotypeRecord, f32)]) -> Vec<GeneAggregate> {
	let mut positions: HashMap<String, usize> = HashMap::new();
	let mut genes: Vec<GeneAggregate> = Vec::new();

	for (record, similarity) in candidates {
		let symbol = record.gene_symbol.trim();

		if symbol.is_empty() {
			tracing::debug!(phenotype_id = %record.phenotype_id, "Skipping record without gene symbol.");

			continue;
		}

		let position = match positions.get(symbol) {
			Some(position) => *position,
			None => {
				genes.push(GeneAggregate::seed(symbol, record));
				positions.insert(symbol.to_string(), genes.len() - 1);

				genes.len() - 1
			},
		};

		genes[position].absorb(record, *similarity);
	}

	for gene in &mut genes {
		gene.dedup();
	}

	genes
}

fn decode_list(field: &ListField, name: &str, gene_symbol: &str) -> Vec<String> {
	match field.decode() {
		Ok(items) => items,
		Err(err) => {
			tracing::debug!(gene_symbol, field = name, error = %err, "Ignoring malformed list field.");

			Vec::new()
		},
	}
}

fn dedup_in_order(items: &mut Vec<String>) {
	let mut seen = HashSet::new();

	items.retain(|item| seen.insert(item.clone()));
}
