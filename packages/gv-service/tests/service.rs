use std::sync::{
	Arc,
	atomic::{AtomicU32, Ordering},
};

use gv_domain::{ConfidenceLevel, WarningKind};
use gv_service::{BoxFuture, Error, GeneService, PhenotypeIndex, QueryRequest, SearchHit};
use gv_storage::models::PhenotypeRecord;
use gv_testkit::FixtureCorpus;

struct CorpusIndex {
	corpus: FixtureCorpus,
	requested_k: AtomicU32,
}
impl CorpusIndex {
	fn new() -> Self {
		Self { corpus: FixtureCorpus::new(), requested_k: AtomicU32::new(0) }
	}
}
impl PhenotypeIndex for CorpusIndex {
	fn search<'a>(
		&'a self,
		query: &'a str,
		k: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<SearchHit>>> {
		self.requested_k.store(k, Ordering::SeqCst);

		let hits = self
			.corpus
			.search(query, k as usize)
			.into_iter()
			.map(|(record, distance)| SearchHit { record, distance })
			.collect();

		Box::pin(async move { Ok(hits) })
	}

	fn count(&self) -> BoxFuture<'_, color_eyre::Result<u64>> {
		let count = self.corpus.len() as u64;

		Box::pin(async move { Ok(count) })
	}
}

struct StaticIndex {
	hits: Vec<SearchHit>,
}
impl PhenotypeIndex for StaticIndex {
	fn search<'a>(
		&'a self,
		_query: &'a str,
		_k: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<SearchHit>>> {
		let hits = self.hits.clone();

		Box::pin(async move { Ok(hits) })
	}

	fn count(&self) -> BoxFuture<'_, color_eyre::Result<u64>> {
		let count = self.hits.len() as u64;

		Box::pin(async move { Ok(count) })
	}
}

struct FailingIndex;
impl PhenotypeIndex for FailingIndex {
	fn search<'a>(
		&'a self,
		_query: &'a str,
		_k: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<SearchHit>>> {
		Box::pin(async move { Err(color_eyre::eyre::eyre!("index unavailable")) })
	}

	fn count(&self) -> BoxFuture<'_, color_eyre::Result<u64>> {
		Box::pin(async move { Err(color_eyre::eyre::eyre!("index unavailable")) })
	}
}

fn hit(symbol: &str, phenotype_id: &str, distance: f32) -> SearchHit {
	SearchHit {
		record: PhenotypeRecord {
			gene_symbol: symbol.to_string(),
			phenotype_id: phenotype_id.to_string(),
			..Default::default()
		},
		distance,
	}
}

fn service_with(index: Arc<dyn PhenotypeIndex>) -> GeneService {
	GeneService::with_index(gv_testkit::test_config(), index)
}

fn request(prompt: &str, top_k: Option<u32>) -> QueryRequest {
	QueryRequest { prompt: prompt.to_string(), top_k }
}

#[tokio::test]
async fn obesity_prompt_ranks_obesity_genes() {
	let index = Arc::new(CorpusIndex::new());
	let service = service_with(index.clone());
	let result = service.query(request("create a fat mouse", Some(3))).await.expect("query");
	let symbols: Vec<&str> = result.genes.iter().map(|gene| gene.gene_symbol.as_str()).collect();

	assert_eq!(symbols, vec!["Lep", "Lepr", "Cpe"]);
	assert_eq!(index.requested_k.load(Ordering::SeqCst), 9);
	assert_eq!(result.total_results, 3);
	assert_eq!(result.search_metadata.total_candidates, 9);
	assert_eq!(result.search_metadata.top_k, 3);
	assert_eq!(result.search_metadata.embedding_model, "fixture-embedding");
	assert!(result.search_metadata.retrieval_time_ms >= 0.0);
	assert!(result.warning.is_none());

	let lep = &result.genes[0];

	assert!((lep.aggregate_score - 0.6).abs() < 1e-4, "{}", lep.aggregate_score);
	assert_eq!(lep.confidence_level, ConfidenceLevel::High);
	assert!(lep.is_curated);
	assert_eq!(lep.mgi_ids, vec!["MGI:104663".to_string()]);
	assert_eq!(lep.alleles, vec!["Lep<ob>".to_string(), "Lep<ob-2J>".to_string()]);
	assert_eq!(lep.pubmed_refs, vec!["8022999".to_string(), "7984236".to_string()]);
	assert_eq!(lep.genetic_backgrounds.len(), 2);

	let cpe = &result.genes[2];

	assert!((cpe.aggregate_score - 0.55).abs() < 1e-4, "{}", cpe.aggregate_score);
	assert_eq!(cpe.gene_name, "Carboxypeptidase E");
	assert_eq!(cpe.alleles, vec!["Cpe<fat>".to_string()]);
}

#[tokio::test]
async fn implausible_prompt_still_returns_matches() {
	let service = service_with(Arc::new(CorpusIndex::new()));
	let result = service.query(request("pink coat", None)).await.expect("query");
	let warning = result.warning.expect("warning");

	assert_eq!(warning.kind, WarningKind::ImpossibleTrait);
	assert_eq!(warning.confidence_level, Some(ConfidenceLevel::Low));
	assert!(!warning.suggestions.is_empty());
	assert_eq!(result.genes[0].gene_symbol, "Tyr");
	assert_eq!(result.search_metadata.top_k, 5);
}

#[tokio::test]
async fn weak_top_score_gets_low_confidence_advisory() {
	let index = StaticIndex { hits: vec![hit("Abcd1", "MP:1", 0.985), hit("Pax6", "MP:2", 1.0)] };
	let service = service_with(Arc::new(index));
	let result = service.query(request("slightly unusual whiskers", None)).await.expect("query");
	let warning = result.warning.expect("warning");

	assert_eq!(result.genes.len(), 1);
	assert_eq!(result.genes[0].gene_symbol, "Abcd1");
	assert_eq!(result.genes[0].confidence_level, ConfidenceLevel::Low);
	assert_eq!(warning.kind, WarningKind::LowConfidence);
	assert!(warning.message.starts_with("Low confidence match (score: "));
}

#[tokio::test]
async fn genes_below_minimum_score_are_dropped() {
	// Similarity 0.008 fuses to 0.0088.
	let index = StaticIndex { hits: vec![hit("Kit", "MP:1", 0.992), hit("Pax6", "MP:2", 1.0)] };
	let service = service_with(Arc::new(index));
	let result = service.query(request("spotted belly", None)).await.expect("query");

	assert!(result.genes.is_empty());
	assert_eq!(result.total_results, 0);
	assert_eq!(result.search_metadata.total_candidates, 2);
	assert!(result.warning.is_none());
}

#[tokio::test]
async fn empty_index_is_not_an_error() {
	let service = service_with(Arc::new(StaticIndex { hits: Vec::new() }));
	let result = service.query(request("small eyes", Some(2))).await.expect("query");

	assert!(result.genes.is_empty());
	assert!(result.warning.is_none());

	let json = serde_json::to_value(&result).expect("serialize");

	assert!(json.get("warning").is_none());
	assert_eq!(json["total_results"], 0);
}

#[tokio::test]
async fn search_failure_is_reported() {
	let service = service_with(Arc::new(FailingIndex));
	let err = service.query(request("fat", None)).await.expect_err("search failure");

	match err {
		Error::Search { message } => assert!(message.contains("index unavailable")),
		other => panic!("Unexpected error: {other:?}"),
	}
}

#[tokio::test]
async fn rejects_invalid_requests() {
	let service = service_with(Arc::new(CorpusIndex::new()));

	for req in [request("   ", None), request("fat", Some(0)), request("fat", Some(21))] {
		let err = service.query(req).await.expect_err("invalid request");

		assert!(matches!(err, Error::InvalidRequest { .. }), "{err:?}");
	}

	let ok = service.query(request("fat", Some(20))).await;

	assert!(ok.is_ok());
}

#[tokio::test]
async fn counts_indexed_phenotypes() {
	let service = service_with(Arc::new(CorpusIndex::new()));

	assert_eq!(service.phenotypes_indexed().await.expect("count"), 14);

	let failing = service_with(Arc::new(FailingIndex));

	assert!(matches!(failing.phenotypes_indexed().await, Err(Error::Search { .. })));
}
