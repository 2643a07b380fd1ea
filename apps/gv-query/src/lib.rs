use std::{
	fmt::Write as _,
	fs,
	path::{Path, PathBuf},
};

use clap::Parser;
use color_eyre::eyre;
use serde::{Deserialize, Serialize};

use gv_domain::WarningKind;
use gv_service::{GeneService, QueryRequest, QueryResult};

const RULE: &str = "======================================================================";
const MAX_PHENOTYPES_SHOWN: usize = 3;
const MAX_ALLELES_SHOWN: usize = 3;
const MAX_MGI_IDS_SHOWN: usize = 2;
const MAX_BACKGROUNDS_SHOWN: usize = 2;
const MAX_DESCRIPTION_CHARS: usize = 100;

#[derive(Debug, Parser)]
#[command(
	version = gv_cli::VERSION,
	rename_all = "kebab",
	styles = gv_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[arg(long, value_name = "N")]
	pub top_k: Option<u32>,
	/// Print the raw query result as JSON.
	#[arg(long)]
	pub json: bool,
	/// Run every query of a JSON dataset and print a summary.
	#[arg(long, short = 'd', value_name = "FILE", conflicts_with = "prompt")]
	pub dataset: Option<PathBuf>,
	#[arg(value_name = "PROMPT", required_unless_present = "dataset")]
	pub prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Dataset {
	name: Option<String>,
	queries: Vec<DatasetQuery>,
}

#[derive(Debug, Deserialize)]
struct DatasetQuery {
	id: Option<String>,
	prompt: String,
	top_k: Option<u32>,
}

#[derive(Debug, Serialize)]
struct DatasetReport {
	dataset: DatasetInfo,
	summary: DatasetSummary,
	queries: Vec<QueryReport>,
}

#[derive(Debug, Serialize)]
struct DatasetInfo {
	name: String,
	query_count: usize,
}

#[derive(Debug, Serialize)]
struct DatasetSummary {
	warned_queries: usize,
	empty_queries: usize,
	latency_ms_p50: f64,
	latency_ms_p95: f64,
}

#[derive(Debug, Serialize)]
struct QueryReport {
	id: String,
	prompt: String,
	top_k: u32,
	genes: Vec<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	warning: Option<WarningKind>,
	latency_ms: f64,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = gv_config::load(&args.config)?;

	gv_cli::init_tracing(&config.service.log_level);

	let service = GeneService::new(config)?;

	if let Some(dataset_path) = &args.dataset {
		let dataset = load_dataset(dataset_path)?;
		let report = run_dataset(&service, dataset, args.top_k).await?;
		let json = serde_json::to_string_pretty(&report)?;

		println!("{json}");

		return Ok(());
	}

	let prompt = args.prompt.ok_or_else(|| eyre::eyre!("A prompt or --dataset is required."))?;
	let result = service.query(QueryRequest { prompt, top_k: args.top_k }).await?;

	if args.json {
		let json = serde_json::to_string_pretty(&result)?;

		println!("{json}");
	} else {
		print!("{}", render(&result));
	}

	Ok(())
}

fn load_dataset(path: &Path) -> color_eyre::Result<Dataset> {
	let raw = fs::read_to_string(path)?;
	let dataset: Dataset = serde_json::from_str(&raw)?;

	if dataset.queries.is_empty() {
		return Err(eyre::eyre!("Dataset must include at least one query."));
	}

	Ok(dataset)
}

async fn run_dataset(
	service: &GeneService,
	dataset: Dataset,
	top_k: Option<u32>,
) -> color_eyre::Result<DatasetReport> {
	let mut queries = Vec::with_capacity(dataset.queries.len());

	for (idx, query) in dataset.queries.into_iter().enumerate() {
		let id = query.id.unwrap_or_else(|| format!("q{}", idx + 1));
		let req = QueryRequest { prompt: query.prompt, top_k: query.top_k.or(top_k) };
		let result = service.query(req).await?;

		tracing::debug!(%id, results = result.total_results, "Dataset query completed.");

		queries.push(report_for(id, result));
	}

	Ok(DatasetReport {
		dataset: DatasetInfo {
			name: dataset.name.unwrap_or_else(|| "dataset".to_string()),
			query_count: queries.len(),
		},
		summary: summarize(&queries),
		queries,
	})
}

fn report_for(id: String, result: QueryResult) -> QueryReport {
	QueryReport {
		id,
		top_k: result.search_metadata.top_k,
		genes: result.genes.into_iter().map(|gene| gene.gene_symbol).collect(),
		warning: result.warning.map(|warning| warning.kind),
		latency_ms: result.search_metadata.retrieval_time_ms,
		prompt: result.query,
	}
}

fn summarize(queries: &[QueryReport]) -> DatasetSummary {
	let mut latencies: Vec<f64> = queries.iter().map(|query| query.latency_ms).collect();

	latencies.sort_by(|a, b| a.total_cmp(b));

	DatasetSummary {
		warned_queries: queries.iter().filter(|query| query.warning.is_some()).count(),
		empty_queries: queries.iter().filter(|query| query.genes.is_empty()).count(),
		latency_ms_p50: percentile(&latencies, 0.50),
		latency_ms_p95: percentile(&latencies, 0.95),
	}
}

fn percentile(values: &[f64], percentile: f64) -> f64 {
	if values.is_empty() {
		return 0.0;
	}

	let clamped = percentile.clamp(0.0, 1.0);
	let pos = clamped * (values.len() as f64 - 1.0);
	let lower = pos.floor() as usize;
	let upper = pos.ceil() as usize;

	if lower == upper {
		values[lower]
	} else {
		let weight = pos - lower as f64;

		values[lower] * (1.0 - weight) + values[upper] * weight
	}
}

/// Human-readable rendering of one query result.
pub fn render(result: &QueryResult) -> String {
	let mut out = String::new();

	// Writing into a String cannot fail.
	let _ = write_result(&mut out, result);

	out
}

fn write_result(out: &mut String, result: &QueryResult) -> std::fmt::Result {
	writeln!(out, "Found {} relevant genes", result.total_results)?;
	writeln!(out, "Query time: {:.1}ms", result.search_metadata.retrieval_time_ms)?;

	if let Some(warning) = &result.warning {
		writeln!(out)?;
		writeln!(out, "Warning: {}", warning.message)?;

		for suggestion in &warning.suggestions {
			writeln!(out, "  - {suggestion}")?;
		}
	}

	if result.genes.is_empty() {
		writeln!(out)?;
		writeln!(out, "No matching genes found.")?;

		return Ok(());
	}

	for (i, gene) in result.genes.iter().enumerate() {
		writeln!(out)?;
		writeln!(out, "{RULE}")?;
		writeln!(out, "{}. {} - {}", i + 1, gene.gene_symbol, gene.gene_name)?;
		writeln!(out, "{RULE}")?;
		writeln!(out, "Description: {}", gene.description)?;
		writeln!(
			out,
			"Relevance Score: {:.3} ({})",
			gene.aggregate_score,
			gene.confidence_level.as_str()
		)?;

		if !gene.mgi_ids.is_empty() {
			writeln!(out, "MGI ID: {}", head_joined(&gene.mgi_ids, MAX_MGI_IDS_SHOWN))?;
		}
		if !gene.alleles.is_empty() {
			writeln!(out, "Alleles: {}", head_joined(&gene.alleles, MAX_ALLELES_SHOWN))?;

			if gene.alleles.len() > MAX_ALLELES_SHOWN {
				writeln!(out, "         (+{} more)", gene.alleles.len() - MAX_ALLELES_SHOWN)?;
			}
		}

		writeln!(out)?;
		writeln!(out, "Top Phenotypes:")?;

		for (j, phenotype) in gene.phenotypes.iter().take(MAX_PHENOTYPES_SHOWN).enumerate() {
			let description: String =
				phenotype.phenotype_description.chars().take(MAX_DESCRIPTION_CHARS).collect();

			writeln!(out, "  {}. {}", j + 1, phenotype.phenotype_name)?;
			writeln!(out, "     ID: {}", phenotype.phenotype_id)?;
			writeln!(out, "     Description: {description}")?;
			writeln!(out, "     Relevance: {:.3}", phenotype.relevance_score)?;
		}

		if gene.phenotypes.len() > MAX_PHENOTYPES_SHOWN {
			writeln!(
				out,
				"  ... and {} more phenotypes",
				gene.phenotypes.len() - MAX_PHENOTYPES_SHOWN
			)?;
		}
		if !gene.pubmed_refs.is_empty() {
			writeln!(out)?;
			writeln!(out, "References: {} PubMed publications", gene.pubmed_refs.len())?;
		}
		if !gene.genetic_backgrounds.is_empty() {
			writeln!(
				out,
				"Tested in: {}",
				head_joined(&gene.genetic_backgrounds, MAX_BACKGROUNDS_SHOWN)
			)?;

			if gene.genetic_backgrounds.len() > MAX_BACKGROUNDS_SHOWN {
				writeln!(
					out,
					"           (+{} more backgrounds)",
					gene.genetic_backgrounds.len() - MAX_BACKGROUNDS_SHOWN
				)?;
			}
		}
	}

	Ok(())
}

fn head_joined(items: &[String], n: usize) -> String {
	items.iter().take(n).map(String::as_str).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
	use gv_domain::{ConfidenceLevel, PlausibilityWarning, WarningKind};
	use gv_service::{GeneResult, PhenotypeMatch, QueryResult, SearchMetadata};

	use super::{QueryReport, percentile, render, summarize};

	fn phenotype(id: &str, score: f32) -> PhenotypeMatch {
		PhenotypeMatch {
			phenotype_id: id.to_string(),
			phenotype_name: format!("{id} name"),
			phenotype_description: "x".repeat(150),
			relevance_score: score,
		}
	}

	fn result(warning: Option<PlausibilityWarning>) -> QueryResult {
		let gene = GeneResult {
			gene_symbol: "Lep".to_string(),
			gene_name: "Leptin".to_string(),
			description: "Hormone that regulates appetite".to_string(),
			is_curated: true,
			mgi_ids: vec!["MGI:104663".to_string()],
			alleles: (1..=5).map(|i| format!("Lep<a{i}>")).collect(),
			phenotypes: vec![
				phenotype("MP:1", 0.9),
				phenotype("MP:2", 0.8),
				phenotype("MP:3", 0.7),
				phenotype("MP:4", 0.6),
			],
			pubmed_refs: vec!["1".to_string(), "2".to_string()],
			genetic_backgrounds: vec!["A".to_string(), "B".to_string(), "C".to_string()],
			aggregate_score: 0.6,
			confidence_level: ConfidenceLevel::High,
		};

		QueryResult {
			query: "fat mouse".to_string(),
			total_results: 1,
			genes: vec![gene],
			search_metadata: SearchMetadata {
				retrieval_time_ms: 12.34,
				embedding_model: "model".to_string(),
				top_k: 5,
				total_candidates: 15,
			},
			warning,
		}
	}

	#[test]
	fn render_truncates_long_lists() {
		let text = render(&result(None));

		assert!(text.contains("1. Lep - Leptin"));
		assert!(text.contains("Alleles: Lep<a1>, Lep<a2>, Lep<a3>"));
		assert!(text.contains("(+2 more)"));
		assert!(text.contains("... and 1 more phenotypes"));
		assert!(!text.contains("MP:4 name"));
		assert!(text.contains("Tested in: A, B"));
		assert!(text.contains("(+1 more backgrounds)"));
		assert!(text.contains("References: 2 PubMed publications"));
		assert!(!text.contains(&"x".repeat(101)));
	}

	#[test]
	fn render_shows_warning() {
		let warning = PlausibilityWarning {
			kind: WarningKind::ImpossibleTrait,
			message: "Mice cannot grow wings.".to_string(),
			suggestions: vec!["Try limb development".to_string()],
			confidence_level: Some(ConfidenceLevel::Low),
		};
		let text = render(&result(Some(warning)));

		assert!(text.contains("Warning: Mice cannot grow wings."));
		assert!(text.contains("  - Try limb development"));
	}

	#[test]
	fn summary_counts_warnings_and_latency() {
		let reports = vec![
			QueryReport {
				id: "q1".to_string(),
				prompt: "fat".to_string(),
				top_k: 5,
				genes: vec!["Lep".to_string()],
				warning: None,
				latency_ms: 10.0,
			},
			QueryReport {
				id: "q2".to_string(),
				prompt: "pink mouse".to_string(),
				top_k: 5,
				genes: Vec::new(),
				warning: Some(WarningKind::ImpossibleTrait),
				latency_ms: 30.0,
			},
		];
		let summary = summarize(&reports);

		assert_eq!(summary.warned_queries, 1);
		assert_eq!(summary.empty_queries, 1);
		assert_eq!(summary.latency_ms_p50, 20.0);
	}

	#[test]
	fn percentile_of_empty_is_zero() {
		assert_eq!(percentile(&[], 0.5), 0.0);
		assert_eq!(percentile(&[4.0], 0.95), 4.0);
	}
}
