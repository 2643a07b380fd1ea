//! Keyword screening for trait requests that no single-gene modification can satisfy, plus the
//! score-based advisory attached to weak result sets.
//!
//! Rules are evaluated from one ordered table; the first match wins.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::confidence::ConfidenceLevel;

/// Top scores below this get the strong rephrasing advisory.
pub const VERY_LOW_SCORE: f32 = 0.01;
/// Top scores below this (and at least [`VERY_LOW_SCORE`]) get the softer advisory.
pub const LOW_SCORE: f32 = 0.02;
/// Color rules fire without a context word only for prompts of at most this many tokens.
pub const SHORT_PROMPT_MAX_TOKENS: usize = 2;

const COLOR_CONTEXT_WORDS: [&str; 5] = ["fur", "coat", "mouse", "color", "colored"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
	ImpossibleTrait,
	LowConfidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlausibilityWarning {
	#[serde(rename = "type")]
	pub kind: WarningKind,
	pub message: String,
	pub suggestions: Vec<String>,
	pub confidence_level: Option<ConfidenceLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCategory {
	ImpossibleColor,
	ImpossibleAnatomy,
	ImpossibleLimbCount,
	ImpossibleTrait,
}

#[derive(Debug)]
pub struct PlausibilityRule {
	pub category: RuleCategory,
	/// Lower-case phrase matched as a substring of the normalized prompt.
	pub keyword: &'static str,
	pub explanation: &'static str,
	/// Curated genes that produce the nearest achievable phenotype, if any.
	pub closest_genes: &'static [&'static str],
	pub alternatives: &'static [&'static str],
}
impl PlausibilityRule {
	fn matches(&self, prompt: &NormalizedPrompt) -> bool {
		if !prompt.text.contains(self.keyword) {
			return false;
		}

		match self.category {
			RuleCategory::ImpossibleColor => prompt.has_color_context || prompt.is_short,
			RuleCategory::ImpossibleAnatomy
			| RuleCategory::ImpossibleLimbCount
			| RuleCategory::ImpossibleTrait => true,
		}
	}

	fn warning(&self) -> PlausibilityWarning {
		PlausibilityWarning {
			kind: WarningKind::ImpossibleTrait,
			message: self.explanation.to_string(),
			suggestions: self.alternatives.iter().map(|s| s.to_string()).collect(),
			confidence_level: Some(ConfidenceLevel::Low),
		}
	}
}

struct NormalizedPrompt {
	text: String,
	has_color_context: bool,
	is_short: bool,
}
impl NormalizedPrompt {
	fn new(prompt: &str) -> Self {
		let text = prompt.nfkc().collect::<String>().to_lowercase();
		let has_color_context = COLOR_CONTEXT_WORDS.iter().any(|word| text.contains(word));
		let is_short = text.split_whitespace().count() <= SHORT_PROMPT_MAX_TOKENS;

		Self { text, has_color_context, is_short }
	}
}

/// Keyword pre-check. Returns the warning of the first rule that fires.
pub fn check_prompt(prompt: &str) -> Option<PlausibilityWarning> {
	let prompt = NormalizedPrompt::new(prompt);

	RULES.iter().find(|rule| rule.matches(&prompt)).map(PlausibilityRule::warning)
}

/// Post-check over the best returned gene's aggregate score.
pub fn check_top_score(score: f32) -> Option<PlausibilityWarning> {
	if score < VERY_LOW_SCORE {
		return Some(PlausibilityWarning {
			kind: WarningKind::LowConfidence,
			message: format!(
				"Very low confidence match (score: {score:.3}). The query may describe a trait not in the database, or it may not be achievable through monogenic modification. Results shown are the closest available matches."
			),
			suggestions: vec![
				"Try rephrasing with more specific phenotype terms".to_string(),
				"Use scientific terminology".to_string(),
				"Check if trait is biologically feasible in mice".to_string(),
			],
			confidence_level: Some(ConfidenceLevel::Low),
		});
	}
	if score < LOW_SCORE {
		return Some(PlausibilityWarning {
			kind: WarningKind::LowConfidence,
			message: format!(
				"Low confidence match (score: {score:.3}). The trait may be complex or involve multiple genes. Results shown are the closest single-gene matches."
			),
			suggestions: vec![
				"Try rephrasing with more specific terms".to_string(),
				"Use scientific phenotype terms".to_string(),
			],
			confidence_level: Some(ConfidenceLevel::Low),
		});
	}

	None
}

/// The full rule table in evaluation order.
pub fn rules() -> &'static [PlausibilityRule] {
	&RULES
}

const TWO_LEGS: &str = "Mice are quadrupeds with four legs. While mutations can cause limb loss, a natural 'two-legged' mouse standing upright is not achievable through single gene modification.";
const SIX_LEGS: &str = "Six legs (hexapod body plan) is an insect characteristic. Mammals have four limbs as a conserved tetrapod feature. No genetic modification can add extra limb pairs.";
const EIGHT_LEGS: &str = "Eight legs is an arachnid body plan. Mammals have the tetrapod four-limb body plan, which cannot be changed to eight limbs through gene modification.";

static RULES: [PlausibilityRule; 23] = [
	PlausibilityRule {
		category: RuleCategory::ImpossibleColor,
		keyword: "pink",
		explanation: "Pink fur cannot be produced in mice. Mice only produce two pigment types: eumelanin (black/brown) and pheomelanin (yellow/red). 'Pink' in mice refers to the pink eyes and skin visible in albino or hairless mice, not fur color.",
		closest_genes: &["Tyr", "Hr"],
		alternatives: &[
			"albino mouse (white fur, pink eyes)",
			"hairless mouse (visible pink skin)",
			"diluted coat color",
		],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleColor,
		keyword: "blue",
		explanation: "Blue fur is biologically impossible in mice. Mammalian melanocytes produce only eumelanin (black/brown) and pheomelanin (yellow/red) pigments. However, the 'dilute' mutation can create a blue-gray appearance.",
		closest_genes: &["Tyr", "Mc1r"],
		alternatives: &["diluted coat color (appears blue-gray)", "gray mouse", "light colored fur"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleColor,
		keyword: "green",
		explanation: "Green fur does not exist in mice. Mice cannot produce chlorophyll or other green pigments naturally.",
		closest_genes: &[],
		alternatives: &["yellow coat color", "agouti (yellow-brown banding)"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleColor,
		keyword: "purple",
		explanation: "Purple fur is impossible. Mice produce only black/brown (eumelanin) and yellow/red (pheomelanin) pigments.",
		closest_genes: &["Mc1r"],
		alternatives: &["diluted coat color", "dark coat color"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleColor,
		keyword: "rainbow",
		explanation: "Multi-color 'rainbow' patterns do not occur naturally in mice. Coat color is determined by melanin pigments, not structural coloration.",
		closest_genes: &["Kit"],
		alternatives: &["white spotting (piebald)", "mottled coat", "variegated coat color"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleColor,
		keyword: "neon",
		explanation: "Fluorescent or neon colors cannot be produced by natural mouse genetics.",
		closest_genes: &[],
		alternatives: &["yellow coat color", "white coat color"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleAnatomy,
		keyword: "wings",
		explanation: "Wings are not possible in mice. Mammals do not have the anatomical structures required for flight (no specialized forelimbs with flight feathers or membranes in mice).",
		closest_genes: &[],
		alternatives: &["elongated limbs", "skeletal modifications"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleAnatomy,
		keyword: "gills",
		explanation: "Gills are impossible in mice. Mice are terrestrial mammals that breathe air through lungs, not aquatic organisms. They lack the gill structures found in fish.",
		closest_genes: &[],
		alternatives: &["respiratory system changes", "lung modifications"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleAnatomy,
		keyword: "feathers",
		explanation: "Feathers are avian-specific structures. Mammals, including mice, have hair/fur, not feathers. This is a fundamental difference between birds and mammals.",
		closest_genes: &[],
		alternatives: &["fur texture changes", "hairless mouse"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleAnatomy,
		keyword: "scales",
		explanation: "Scales (like reptilian or fish scales) are not found in mice. While mice do have tail scales, these are epidermal structures very different from reptilian/fish scales.",
		closest_genes: &[],
		alternatives: &["skin texture changes", "tail morphology"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleAnatomy,
		keyword: "antenna",
		explanation: "Antennae are arthropod sensory structures. Mice have whiskers (vibrissae) for sensing, not antennae.",
		closest_genes: &[],
		alternatives: &["whisker length", "sensory hair modifications"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleAnatomy,
		keyword: "tentacles",
		explanation: "Tentacles are found in cephalopods and other invertebrates, not mammals. Mice have standard mammalian limb structure.",
		closest_genes: &[],
		alternatives: &["limb elongation", "digit modifications"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleLimbCount,
		keyword: "two legs",
		explanation: TWO_LEGS,
		closest_genes: &[],
		alternatives: &["limb reduction", "shortened limbs", "polydactyly"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleLimbCount,
		keyword: "2 legs",
		explanation: TWO_LEGS,
		closest_genes: &[],
		alternatives: &["limb reduction", "shortened limbs", "polydactyly"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleLimbCount,
		keyword: "six legs",
		explanation: SIX_LEGS,
		closest_genes: &[],
		alternatives: &["polydactyly (extra digits)", "limb duplication"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleLimbCount,
		keyword: "6 legs",
		explanation: SIX_LEGS,
		closest_genes: &[],
		alternatives: &["polydactyly (extra digits)", "limb duplication"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleLimbCount,
		keyword: "eight legs",
		explanation: EIGHT_LEGS,
		closest_genes: &[],
		alternatives: &["polydactyly (extra digits)", "limb morphology"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleLimbCount,
		keyword: "8 legs",
		explanation: EIGHT_LEGS,
		closest_genes: &[],
		alternatives: &["polydactyly (extra digits)", "limb morphology"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleLimbCount,
		keyword: "no legs",
		explanation: "While severe limb reduction is theoretically possible, complete absence of all four limbs in a viable mouse is extremely rare and not controlled by monogenic traits.",
		closest_genes: &[],
		alternatives: &["shortened limbs", "limb reduction", "digit abnormalities"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleTrait,
		keyword: "transparent",
		explanation: "Transparent or see-through tissue is not possible in mice naturally. Mice have opaque tissues and organs.",
		closest_genes: &[],
		alternatives: &["hairless mouse (visible skin)", "albino mouse"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleTrait,
		keyword: "glowing",
		explanation: "Natural bioluminescence does not exist in mice. While GFP transgenic mice exist in research, this is not a natural genetic modification.",
		closest_genes: &[],
		alternatives: &["white fur (appears to glow in certain light)", "albino"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleTrait,
		keyword: "metallic",
		explanation: "Metallic or reflective fur is not possible. Mammalian hair does not produce structural coloration like some bird feathers or insect exoskeletons.",
		closest_genes: &[],
		alternatives: &["glossy fur", "diluted coat color"],
	},
	PlausibilityRule {
		category: RuleCategory::ImpossibleTrait,
		keyword: "glitter",
		explanation: "Glittery or sparkly appearance is not possible in natural mouse fur. This would require structural coloration not found in mammals.",
		closest_genes: &[],
		alternatives: &["light colored fur", "white fur"],
	},
];
