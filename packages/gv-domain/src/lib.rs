pub mod confidence;
pub mod curated;
pub mod plausibility;

pub use confidence::{ConfidenceLevel, confidence_level};
pub use curated::{CuratedGene, CuratedGenes, curated_genes};
pub use plausibility::{
	PlausibilityRule, PlausibilityWarning, RuleCategory, WarningKind, check_prompt,
	check_top_score, rules,
};
