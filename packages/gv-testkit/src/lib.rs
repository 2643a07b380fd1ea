//! Shared fixtures for the workspace test suites: a small phenotype corpus with a term-overlap
//! search, and a valid in-memory config.

use serde_json::Map;

use gv_config::{
	Config, EmbeddingProviderConfig, Providers, Qdrant, Query, Security, Service, Storage,
};
use gv_storage::models::{ListField, PhenotypeRecord};

const STOPWORDS: [&str; 9] = ["a", "an", "the", "with", "create", "make", "mouse", "mice", "that"];

pub fn test_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:8000".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage {
			qdrant: Qdrant {
				url: "http://127.0.0.1:6334".to_string(),
				collection: "gene_phenotypes_test".to_string(),
				vector_dim: 4,
				distance: "euclid".to_string(),
			},
		},
		providers: Providers {
			embedding: EmbeddingProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/embeddings".to_string(),
				model: "fixture-embedding".to_string(),
				dimensions: 4,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		query: Query::default(),
		security: Security::default(),
	}
}

/// In-memory corpus ranked by how many query terms a record's phenotype text contains.
pub struct FixtureCorpus {
	records: Vec<PhenotypeRecord>,
}
impl FixtureCorpus {
	pub fn new() -> Self {
		Self::with_records(fixture_records())
	}

	pub fn with_records(records: Vec<PhenotypeRecord>) -> Self {
		Self { records }
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// The `k` closest records with their distance in `(0, 1]`, closest first.
	///
	/// Distance is `(missed + 1) / (terms + 1)`. Ties keep corpus order.
	pub fn search(&self, query: &str, k: usize) -> Vec<(PhenotypeRecord, f32)> {
		let terms = terms(query);
		let mut scored: Vec<(usize, f32)> = self
			.records
			.iter()
			.enumerate()
			.map(|(idx, record)| {
				let text = terms_of_record(record);
				let missed = terms.iter().filter(|term| !text.contains(term)).count();

				(idx, (missed as f32 + 1.0) / (terms.len() as f32 + 1.0))
			})
			.collect();

		scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

		scored
			.into_iter()
			.take(k)
			.map(|(idx, distance)| (self.records[idx].clone(), distance))
			.collect()
	}
}
impl Default for FixtureCorpus {
	fn default() -> Self {
		Self::new()
	}
}

pub fn fixture_records() -> Vec<PhenotypeRecord> {
	vec![
		record(
			"Lep",
			"leptin",
			"MP:0001261",
			"obese",
			"increased fat mass and body weight",
			Some("MGI:104663"),
			ListField::Items(vec!["Lep<ob>".to_string()]),
			ListField::encoded("[\"8022999\", 7984236]"),
			ListField::Items(vec!["C57BL/6J".to_string()]),
		),
		record(
			"Lep",
			"leptin",
			"MP:0001433",
			"polyphagia",
			"excessive eating leading to fat accumulation",
			Some("MGI:104663"),
			ListField::Items(vec!["Lep<ob>".to_string(), "Lep<ob-2J>".to_string()]),
			ListField::encoded("[\"8022999\"]"),
			ListField::Items(vec!["C57BL/6J".to_string(), "involves: C57BL/6".to_string()]),
		),
		record(
			"Lepr",
			"leptin receptor",
			"MP:0001261",
			"obese",
			"increased fat mass with early onset",
			Some("MGI:104993"),
			ListField::Items(vec!["Lepr<db>".to_string()]),
			ListField::encoded("[\"8548812\"]"),
			ListField::Items(vec!["C57BLKS/J".to_string()]),
		),
		record(
			"Lepr",
			"leptin receptor",
			"MP:0002079",
			"increased circulating glucose level",
			"hyperglycemia accompanying fat deposition",
			Some("MGI:104993"),
			ListField::Items(vec!["Lepr<db>".to_string()]),
			ListField::default(),
			ListField::Items(vec!["C57BLKS/J".to_string()]),
		),
		record(
			"Cpe",
			"",
			"MP:0001261",
			"obese",
			"late onset fat accumulation",
			Some("MGI:101932"),
			ListField::encoded("[\"Cpe<fat>\"]"),
			ListField::encoded("[\"7663511\"]"),
			ListField::encoded("[\"HRS/J\"]"),
		),
		record(
			"Tyr",
			"tyrosinase",
			"MP:0005408",
			"hypopigmentation",
			"absence of pigment in coat, skin and eyes",
			Some("MGI:98880"),
			ListField::Items(vec!["Tyr<c>".to_string()]),
			ListField::encoded("[\"2105453\"]"),
			ListField::Items(vec!["BALB/c".to_string()]),
		),
		record(
			"Tyr",
			"tyrosinase",
			"MP:0002075",
			"abnormal coat pigmentation",
			"white coat",
			Some("MGI:98880"),
			ListField::Items(vec!["Tyr<c>".to_string(), "Tyr<c-2J>".to_string()]),
			ListField::default(),
			ListField::Items(vec!["BALB/c".to_string()]),
		),
		record(
			"Kit",
			"kit oncogene",
			"MP:0000373",
			"belly spot",
			"white spotting on the ventral coat",
			Some("MGI:96677"),
			ListField::Items(vec!["Kit<W>".to_string()]),
			ListField::default(),
			ListField::default(),
		),
		record(
			"Mc1r",
			"melanocortin 1 receptor",
			"MP:0000371",
			"diluted coat color",
			"yellow coat pigmentation",
			Some("MGI:99456"),
			ListField::Items(vec!["Mc1r<e>".to_string()]),
			ListField::default(),
			ListField::Items(vec!["C57BL/6J".to_string()]),
		),
		record(
			"Pax6",
			"paired box 6",
			"MP:0001293",
			"anophthalmia",
			"small or absent eyes",
			Some("MGI:97490"),
			ListField::Items(vec!["Pax6<Sey>".to_string()]),
			ListField::default(),
			ListField::default(),
		),
		record(
			"Mstn",
			"myostatin",
			"MP:0000751",
			"increased muscle mass",
			"muscle hypertrophy",
			Some("MGI:95691"),
			ListField::encoded("not json"),
			ListField::default(),
			ListField::default(),
		),
		record(
			"Abcd1",
			"ATP-binding cassette, sub-family D member 1",
			"MP:0001547",
			"abnormal lipid level",
			"altered plasma lipid profile",
			None,
			ListField::default(),
			ListField::default(),
			ListField::default(),
		),
		record(
			"",
			"",
			"MP:0000001",
			"orphan phenotype",
			"record without a gene symbol",
			None,
			ListField::default(),
			ListField::default(),
			ListField::default(),
		),
		record(
			"Hoxd13",
			"homeobox D13",
			"MP:0000565",
			"oligodactyly",
			"fewer than five digits",
			Some("MGI:96205"),
			ListField::Items(vec!["Hoxd13<spdh>".to_string()]),
			ListField::default(),
			ListField::default(),
		),
	]
}

#[allow(clippy::too_many_arguments)]
fn record(
	gene_symbol: &str,
	gene_name: &str,
	phenotype_id: &str,
	phenotype_name: &str,
	phenotype_description: &str,
	mgi_id: Option<&str>,
	alleles: ListField,
	pubmed_refs: ListField,
	genetic_backgrounds: ListField,
) -> PhenotypeRecord {
	PhenotypeRecord {
		gene_symbol: gene_symbol.to_string(),
		gene_name: gene_name.to_string(),
		description: String::new(),
		is_curated: false,
		phenotype_id: phenotype_id.to_string(),
		phenotype_name: phenotype_name.to_string(),
		phenotype_description: phenotype_description.to_string(),
		mgi_id: mgi_id.map(str::to_string),
		alleles,
		pubmed_refs,
		genetic_backgrounds,
	}
}

fn terms(text: &str) -> Vec<String> {
	text.to_lowercase()
		.split(|c: char| !c.is_alphanumeric())
		.filter(|term| !term.is_empty() && !STOPWORDS.contains(term))
		.map(str::to_string)
		.collect()
}

fn terms_of_record(record: &PhenotypeRecord) -> Vec<String> {
	terms(&format!("{} {}", record.phenotype_name, record.phenotype_description))
}
