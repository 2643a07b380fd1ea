use std::cmp::Ordering;

use crate::aggregate::GeneAggregate;

/// Weight of the mean similarity in the fused score. The maximum gets the remainder.
pub const AVERAGE_WEIGHT: f32 = 0.7;
pub const MAX_WEIGHT: f32 = 0.3;
/// Each phenotype hit, up to [`MAX_COUNTED_PHENOTYPES`], lifts the score by this fraction.
pub const BREADTH_BONUS: f32 = 0.1;
pub const MAX_COUNTED_PHENOTYPES: usize = 5;

/// Fuses a gene's similarities into one score in `[0, 1]`, rounded to four decimals.
///
/// Returns `None` when there is nothing to fuse.
pub fn fused_score(scores: &[f32]) -> Option<f32> {
	if scores.is_empty() {
		return None;
	}

	let avg = scores.iter().sum::<f32>() / scores.len() as f32;
	let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
	let counted = scores.len().min(MAX_COUNTED_PHENOTYPES) as f32;
	let fused = (AVERAGE_WEIGHT * avg + MAX_WEIGHT * max) * (1.0 + BREADTH_BONUS * counted);

	Some(round4(fused.min(1.0)))
}

/// Scores every gene and orders them best first, ties broken by gene symbol.
///
/// Genes without any similarity are dropped.
pub fn rank(genes: Vec<GeneAggregate>) -> Vec<GeneAggregate> {
	let mut ranked: Vec<GeneAggregate> = genes
		.into_iter()
		.filter_map(|mut gene| {
			gene.aggregate_score = fused_score(&gene.scores)?;

			Some(gene)
		})
		.collect();

	ranked.sort_by(|a, b| {
		cmp_f32_desc(a.aggregate_score, b.aggregate_score)
			.then_with(|| a.gene_symbol.cmp(&b.gene_symbol))
	});

	ranked
}

/// Descending order with NaN last.
pub fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

pub(crate) fn round4(value: f32) -> f32 {
	(value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
	use super::{cmp_f32_desc, fused_score, rank};
	use crate::aggregate::GeneAggregate;

	fn gene(symbol: &str, scores: &[f32]) -> GeneAggregate {
		GeneAggregate {
			gene_symbol: symbol.to_string(),
			gene_name: String::new(),
			description: String::new(),
			is_curated: false,
			mgi_ids: Vec::new(),
			alleles: Vec::new(),
			pubmed_refs: Vec::new(),
			genetic_backgrounds: Vec::new(),
			phenotypes: Vec::new(),
			scores: scores.to_vec(),
			aggregate_score: 0.0,
		}
	}

	fn close(a: f32, b: f32) -> bool {
		(a - b).abs() < 1e-6
	}

	#[test]
	fn fuses_mean_max_and_breadth() {
		// avg 0.04, max 0.05: 0.7 * 0.04 + 0.3 * 0.05 = 0.043, times 1.2.
		let score = fused_score(&[0.05, 0.03]).unwrap_or_default();

		assert!(close(score, 0.0516), "{score}");
	}

	#[test]
	fn breadth_bonus_saturates_at_five_hits() {
		let five = fused_score(&[0.1; 5]).unwrap_or_default();
		let eight = fused_score(&[0.1; 8]).unwrap_or_default();

		assert!(close(five, 0.15));
		assert!(close(five, eight));
	}

	#[test]
	fn caps_at_one() {
		assert_eq!(fused_score(&[1.0, 1.0, 1.0]), Some(1.0));
	}

	#[test]
	fn empty_scores_have_no_fusion() {
		assert_eq!(fused_score(&[]), None);
	}

	#[test]
	fn orders_by_score_then_symbol() {
		let ranked = rank(vec![
			gene("Tyr", &[0.2]),
			gene("Kit", &[0.2]),
			gene("Lep", &[0.9, 0.8]),
			gene("Pax6", &[]),
		]);
		let symbols: Vec<&str> = ranked.iter().map(|gene| gene.gene_symbol.as_str()).collect();

		assert_eq!(symbols, vec!["Lep", "Kit", "Tyr"]);
		assert!(ranked.iter().all(|gene| (0.0..=1.0).contains(&gene.aggregate_score)));
	}

	#[test]
	fn nan_sorts_last() {
		let mut values = vec![0.1, f32::NAN, 0.5];

		values.sort_by(|a, b| cmp_f32_desc(*a, *b));

		assert_eq!(values[0], 0.5);
		assert!(values[2].is_nan());
	}
}
