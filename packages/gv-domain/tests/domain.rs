use gv_domain::{
	ConfidenceLevel, WarningKind, check_prompt, check_top_score, confidence_level, curated_genes,
	rules,
};

#[test]
fn pink_mouse_suggests_an_albino_alternative() {
	let warning = check_prompt("pink mouse").expect("Expected an impossible-trait warning.");

	assert_eq!(warning.kind, WarningKind::ImpossibleTrait);
	assert_eq!(warning.confidence_level, Some(ConfidenceLevel::Low));
	assert!(
		warning.suggestions.iter().any(|suggestion| suggestion.contains("albino mouse")),
		"Unexpected suggestions: {:?}",
		warning.suggestions
	);
}

#[test]
fn color_rule_fires_with_context_word_in_long_prompt() {
	let warning = check_prompt("mouse with pink eyes and albino fur");

	assert!(warning.is_some());
}

#[test]
fn color_rule_ignores_unrelated_mentions() {
	assert!(check_prompt("pink elephant story").is_none());
}

#[test]
fn bare_color_word_fires() {
	assert!(check_prompt("neon").is_some());
}

#[test]
fn anatomy_and_trait_rules_need_no_context() {
	for prompt in ["a creature with tentacles", "transparent skin please", "animal that has feathers"]
	{
		let warning = check_prompt(prompt).unwrap_or_else(|| panic!("Expected warning: {prompt}"));

		assert_eq!(warning.kind, WarningKind::ImpossibleTrait);
	}
}

#[test]
fn limb_phrases_match_numeral_and_spelled_forms() {
	let spelled = check_prompt("a mouse that walks on two legs").expect("Expected a warning.");
	let numeral = check_prompt("a mouse that walks on 2 legs").expect("Expected a warning.");

	assert_eq!(spelled.message, numeral.message);
	assert!(check_prompt("a rodent with 6 legs").is_some());
	assert!(check_prompt("a rodent with no legs").is_some());
}

#[test]
fn plausible_requests_pass() {
	for prompt in ["create a fat mouse", "albino mouse", "mouse without eyes", "strong muscular mouse"]
	{
		assert!(check_prompt(prompt).is_none(), "Unexpected warning for {prompt}");
	}
}

#[test]
fn post_check_thresholds() {
	let warning = check_top_score(0.009).expect("Expected a low-confidence warning.");

	assert_eq!(warning.kind, WarningKind::LowConfidence);
	assert!(check_top_score(0.03).is_none());
}

#[test]
fn warning_serializes_with_type_tag() {
	let warning = check_prompt("green mouse").expect("Expected a warning.");
	let json = serde_json::to_value(&warning).expect("Warning must serialize.");

	assert_eq!(json["type"], "impossible_trait");
	assert_eq!(json["confidence_level"], "low");
	assert!(json["suggestions"].is_array());
}

#[test]
fn confidence_levels_serialize_lowercase() {
	let json = serde_json::to_value(confidence_level(0.05)).expect("Level must serialize.");

	assert_eq!(json, "high");
}

#[test]
fn rule_closest_genes_reference_known_symbols() {
	let table = curated_genes();

	for rule in rules() {
		for symbol in rule.closest_genes {
			// Hr is a hairless-phenotype gene outside the curated set.
			assert!(table.contains(symbol) || *symbol == "Hr", "Unknown gene {symbol}");
		}
	}
}
