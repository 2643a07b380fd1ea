//! Hand-maintained reference set of well-characterised monogenic genes.
//!
//! The table is built once per process and never mutated. It seeds display fields and the
//! `is_curated` flag on retrieved records, and backs the curated gene listing.

use std::{
	collections::{BTreeSet, HashMap},
	sync::LazyLock,
};

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CuratedGene {
	pub symbol: &'static str,
	pub name: &'static str,
	pub description: &'static str,
	pub traits: &'static [&'static str],
	/// Extra search phrases folded into the indexed text for this gene's phenotypes.
	pub phenotype_terms: &'static [&'static str],
	pub reason: &'static str,
}

#[derive(Debug)]
pub struct CuratedGenes {
	genes: &'static [CuratedGene],
	by_symbol: HashMap<&'static str, usize>,
}
impl CuratedGenes {
	fn build(genes: &'static [CuratedGene]) -> Self {
		let by_symbol = genes.iter().enumerate().map(|(idx, gene)| (gene.symbol, idx)).collect();

		Self { genes, by_symbol }
	}

	pub fn get(&self, symbol: &str) -> Option<&'static CuratedGene> {
		let genes = self.genes;

		self.by_symbol.get(symbol).map(|idx| &genes[*idx])
	}

	pub fn contains(&self, symbol: &str) -> bool {
		self.by_symbol.contains_key(symbol)
	}

	/// Genes in table order.
	pub fn iter(&self) -> std::slice::Iter<'static, CuratedGene> {
		self.genes.iter()
	}

	pub fn len(&self) -> usize {
		self.genes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.genes.is_empty()
	}

	/// Every phenotype search term across the table, sorted and unique.
	pub fn all_phenotype_terms(&self) -> Vec<&'static str> {
		let terms: BTreeSet<&'static str> =
			self.genes.iter().flat_map(|gene| gene.phenotype_terms.iter().copied()).collect();

		terms.into_iter().collect()
	}
}

static CURATED_GENES: LazyLock<CuratedGenes> = LazyLock::new(|| CuratedGenes::build(&TABLE));

pub fn curated_genes() -> &'static CuratedGenes {
	&CURATED_GENES
}

static TABLE: [CuratedGene; 10] = [
	CuratedGene {
		symbol: "Tyr",
		name: "Tyrosinase",
		description: "Enzyme required for melanin production. Mutations cause albinism - complete absence of pigmentation in fur, skin and eyes",
		traits: &["albinism", "coat color", "pigmentation", "white fur"],
		phenotype_terms: &[
			"albinism",
			"albino",
			"white",
			"pigmentation",
			"melanin",
			"coat color",
			"no pigmentation",
			"absent pigmentation",
		],
		reason: "Well-established monogenic trait for pigmentation",
	},
	CuratedGene {
		symbol: "Lep",
		name: "Leptin",
		description: "Hormone that regulates appetite and metabolism",
		traits: &["obesity", "increased body weight", "fat accumulation"],
		phenotype_terms: &[
			"obesity",
			"obese",
			"fat",
			"body weight",
			"increased body weight",
			"adipose",
		],
		reason: "Classic monogenic obesity model",
	},
	CuratedGene {
		symbol: "Lepr",
		name: "Leptin Receptor",
		description: "Receptor for leptin hormone",
		traits: &["obesity", "diabetes", "increased body weight"],
		phenotype_terms: &["obesity", "diabetes", "body weight", "metabolic", "adipose"],
		reason: "Monogenic obesity with metabolic dysfunction",
	},
	CuratedGene {
		symbol: "Cpe",
		name: "Carboxypeptidase E",
		description: "Enzyme involved in neuropeptide processing",
		traits: &["late-onset obesity", "increased body weight"],
		phenotype_terms: &["obesity", "body weight", "fat"],
		reason: "Late-onset obesity model",
	},
	CuratedGene {
		symbol: "Kit",
		name: "KIT Proto-Oncogene",
		description: "Receptor tyrosine kinase involved in melanocyte development. Causes white spotting pattern on fur.",
		traits: &["white spotting", "piebald", "coat color", "pigmentation"],
		phenotype_terms: &[
			"white spotting",
			"piebald",
			"coat color",
			"pigmentation",
			"white patches",
			"white fur",
			"white coat",
			"spotted",
			"patched fur",
		],
		reason: "Dominant white spotting phenotype",
	},
	CuratedGene {
		symbol: "Pax6",
		name: "Paired Box 6",
		description: "Transcription factor critical for eye development",
		traits: &["anophthalmia", "no eyes", "absent eyes", "eye defects"],
		phenotype_terms: &["anophthalmia", "eye", "absent eyes", "no eyes", "eye development"],
		reason: "Clear monogenic eye defect",
	},
	CuratedGene {
		symbol: "Hoxd13",
		name: "Homeobox D13",
		description: "Transcription factor involved in limb development",
		traits: &["polydactyly", "extra toes", "extra digits"],
		phenotype_terms: &["polydactyly", "extra toes", "extra digits", "digit number"],
		reason: "Synpolydactyly phenotype",
	},
	CuratedGene {
		symbol: "Mstn",
		name: "Myostatin",
		description: "Negative regulator of muscle growth",
		traits: &["increased muscle mass", "hypermuscular", "strong"],
		phenotype_terms: &[
			"muscle mass",
			"muscle hypertrophy",
			"increased muscle",
			"muscular",
			"strong",
		],
		reason: "Dramatic muscle mass increase",
	},
	CuratedGene {
		symbol: "Trp53",
		name: "Transformation Related Protein 53",
		description: "Tumor suppressor gene",
		traits: &["cancer susceptibility", "tumor development"],
		phenotype_terms: &["tumor", "cancer", "neoplasm", "tumor suppressor"],
		reason: "Well-known tumor suppressor",
	},
	CuratedGene {
		symbol: "Mc1r",
		name: "Melanocortin 1 Receptor",
		description: "Receptor that regulates melanin production. Controls coat color - mutations produce red, yellow, brown, or diluted pigmentation.",
		traits: &["coat color", "red/yellow pigmentation"],
		phenotype_terms: &[
			"coat color",
			"pigmentation",
			"melanin",
			"yellow fur",
			"red fur",
			"pink fur",
			"brown fur",
			"diluted coat color",
			"light colored fur",
			"pale fur",
			"red pigment",
			"yellow pigment",
			"pheomelanin",
		],
		reason: "Controls eumelanin vs pheomelanin production",
	},
];

#[cfg(test)]
mod tests {
	use super::curated_genes;

	#[test]
	fn table_is_keyed_by_symbol() {
		let table = curated_genes();

		assert_eq!(table.len(), 10);
		assert!(table.contains("Lep"));
		assert!(!table.contains("lep"));
		assert_eq!(table.get("Mstn").map(|gene| gene.name), Some("Myostatin"));
	}

	#[test]
	fn iteration_keeps_table_order() {
		let symbols: Vec<&str> = curated_genes().iter().map(|gene| gene.symbol).collect();

		assert_eq!(symbols.first(), Some(&"Tyr"));
		assert_eq!(symbols.last(), Some(&"Mc1r"));
	}

	#[test]
	fn phenotype_terms_are_sorted_and_unique() {
		let terms = curated_genes().all_phenotype_terms();
		let mut sorted = terms.clone();

		sorted.sort_unstable();
		sorted.dedup();

		assert_eq!(terms, sorted);
		assert!(terms.contains(&"obesity"));
	}
}
