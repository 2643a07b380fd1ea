use serde::{Deserialize, Serialize};

pub const HIGH_CONFIDENCE: f32 = 0.04;
pub const MEDIUM_CONFIDENCE: f32 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
	High,
	Medium,
	Low,
}
impl ConfidenceLevel {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::High => "high",
			Self::Medium => "medium",
			Self::Low => "low",
		}
	}
}

/// Display label for an aggregate score. Never feeds back into ordering or filtering.
pub fn confidence_level(score: f32) -> ConfidenceLevel {
	if score >= HIGH_CONFIDENCE {
		ConfidenceLevel::High
	} else if score >= MEDIUM_CONFIDENCE {
		ConfidenceLevel::Medium
	} else {
		ConfidenceLevel::Low
	}
}
