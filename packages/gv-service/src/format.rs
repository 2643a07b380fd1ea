use serde::{Deserialize, Serialize};

use gv_domain::{ConfidenceLevel, confidence_level};

use crate::{aggregate::PhenotypeMatch, rank::cmp_f32_desc};

/// A ranked gene as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneResult {
	pub gene_symbol: String,
	pub gene_name: String,
	pub description: String,
	pub is_curated: bool,
	pub mgi_ids: Vec<String>,
	pub alleles: Vec<String>,
	pub phenotypes: Vec<PhenotypeMatch>,
	pub pubmed_refs: Vec<String>,
	pub genetic_backgrounds: Vec<String>,
	pub aggregate_score: f32,
	pub confidence_level: ConfidenceLevel,
}

/// Turns ranked aggregates into results, keeping their order.
pub fn format_genes(genes: Vec<crate::GeneAggregate>) -> Vec<GeneResult> {
	genes
		.into_iter()
		.map(|gene| {
			let mut phenotypes = gene.phenotypes;

			phenotypes.sort_by(|a, b| cmp_f32_desc(a.relevance_score, b.relevance_score));

			GeneResult {
				confidence_level: confidence_level(gene.aggregate_score),
				gene_symbol: gene.gene_symbol,
				gene_name: gene.gene_name,
				description: gene.description,
				is_curated: gene.is_curated,
				mgi_ids: gene.mgi_ids,
				alleles: gene.alleles,
				phenotypes,
				pubmed_refs: gene.pubmed_refs,
				genetic_backgrounds: gene.genetic_backgrounds,
				aggregate_score: gene.aggregate_score,
			}
		})
		.collect()
}
