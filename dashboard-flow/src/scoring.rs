//! Analysis strategies.
//!
//! The analyzer hands every completed generation to an [`AnalysisStrategy`],
//! which turns it into the verdict stored on the claim. [`PlaceholderStrategy`]
//! is a mock: it ignores the generated text and draws uniform random values.
//! Swap in [`ResponseStrategy`] or a real model-backed implementation to
//! replace it.

use rand::{Rng, seq::IndexedRandom};
use serde::Deserialize;
use tracing::{debug, info};

use crate::record::{AnalysisResult, Claim};

/// Verdict plus the claim's new processing progress
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub analysis: AnalysisResult,
    pub progress: u8,
}

pub trait AnalysisStrategy: Send + Sync {
    fn assess(&self, claim: &Claim, generated: &str) -> Assessment;
}

const CLAIM_ANALYSIS_PROMPT: &str = r#"Analyze the following insurance claim for fraud risk and processing recommendations.

Respond with ONLY this JSON (no explanation, no additional text):
{
  "risk_score": 35,
  "fraud_probability": 12,
  "recommendation": "short processing recommendation",
  "confidence": 92,
  "key_findings": ["finding one", "finding two"]
}

risk_score is 0-100, fraud_probability is 0-50, confidence is 85-99.
"#;

/// Prompt sent to the text generator for a claim
pub fn analysis_prompt(claim: &Claim) -> String {
    format!(
        "{CLAIM_ANALYSIS_PROMPT}\nClaim ID: {}\nClient: {}\nType: {}\nAmount: {}\nStatus: {}\nDescription: {}",
        claim.id, claim.client, claim.kind, claim.amount, claim.status, claim.description
    )
}

/// Processing recommendation for a risk score
pub fn recommendation_for(risk_score: u8) -> &'static str {
    match risk_score {
        0..=30 => "Approve for fast-track processing",
        31..=70 => "Request additional documentation before approval",
        _ => "Escalate to special investigations unit",
    }
}

const FINDINGS: [&str; 6] = [
    "Documentation complete and consistent",
    "Claim amount within expected range for incident type",
    "No prior claims flagged for this client",
    "Damage description matches reported incident",
    "Claim filed shortly after a policy change",
    "Similar claims recently reported from the same area",
];

/// Mock strategy drawing uniform random values: risk in [0, 100], fraud
/// probability in [0, 50], confidence in [85, 100). Progress advances by
/// 10 to 30 points, capped at 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderStrategy;

impl AnalysisStrategy for PlaceholderStrategy {
    fn assess(&self, claim: &Claim, _generated: &str) -> Assessment {
        let mut rng = rand::rng();
        let risk_score = rng.random_range(0..=100u8);
        let key_findings = FINDINGS
            .choose_multiple(&mut rng, 3)
            .map(|finding| finding.to_string())
            .collect();

        let analysis = AnalysisResult {
            risk_score,
            fraud_probability: rng.random_range(0..=50u8),
            recommendation: recommendation_for(risk_score).to_string(),
            confidence: rng.random_range(85..100u8),
            processing_time: format!("{:.1}s", rng.random_range(1.0..4.0f64)),
            key_findings,
            analyzed_at: None,
        };
        let progress = claim
            .progress
            .saturating_add(rng.random_range(10..=30u8))
            .min(100);

        debug!(claim_id = %claim.id, risk_score, "Placeholder assessment drawn");
        Assessment { analysis, progress }
    }
}

/// Deterministic strategy returning a preset verdict
#[derive(Debug, Clone)]
pub struct FixedStrategy {
    analysis: AnalysisResult,
    progress_step: u8,
}

impl FixedStrategy {
    pub fn new(analysis: AnalysisResult, progress_step: u8) -> Self {
        Self {
            analysis,
            progress_step,
        }
    }
}

impl AnalysisStrategy for FixedStrategy {
    fn assess(&self, claim: &Claim, _generated: &str) -> Assessment {
        Assessment {
            analysis: self.analysis.clone(),
            progress: claim.progress.saturating_add(self.progress_step).min(100),
        }
    }
}

#[derive(Deserialize)]
struct AnalysisResponse {
    risk_score: f64,
    fraud_probability: f64,
    recommendation: String,
    confidence: f64,
    #[serde(default)]
    key_findings: Vec<String>,
}

/// Attempts to parse a JSON verdict from the generated text, tolerating a
/// markdown code fence around it
fn parse_analysis_from_response(response: &str) -> Option<AnalysisResponse> {
    let trimmed = response.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);
    serde_json::from_str(body.trim()).ok()
}

fn clamp_percent(value: f64, min: u8, max: u8) -> u8 {
    if value.is_nan() {
        return min;
    }
    value.round().clamp(f64::from(min), f64::from(max)) as u8
}

/// Uses the model's JSON verdict when the generated text contains one,
/// clamped to the documented ranges, and the wrapped strategy otherwise.
/// Progress and processing time always come from the wrapped strategy.
#[derive(Debug, Clone, Default)]
pub struct ResponseStrategy<F> {
    fallback: F,
}

impl<F: AnalysisStrategy> ResponseStrategy<F> {
    pub fn new(fallback: F) -> Self {
        Self { fallback }
    }
}

impl<F: AnalysisStrategy> AnalysisStrategy for ResponseStrategy<F> {
    fn assess(&self, claim: &Claim, generated: &str) -> Assessment {
        let mut assessment = self.fallback.assess(claim, generated);
        let Some(parsed) = parse_analysis_from_response(generated) else {
            debug!(claim_id = %claim.id, "Generated text is not a verdict, using fallback");
            return assessment;
        };

        info!(claim_id = %claim.id, risk_score = parsed.risk_score, "Parsed model verdict");
        let analysis = &mut assessment.analysis;
        analysis.risk_score = clamp_percent(parsed.risk_score, 0, 100);
        analysis.fraud_probability = clamp_percent(parsed.fraud_probability, 0, 50);
        analysis.confidence = clamp_percent(parsed.confidence, 85, 99);
        if !parsed.recommendation.trim().is_empty() {
            analysis.recommendation = parsed.recommendation;
        }
        if !parsed.key_findings.is_empty() {
            analysis.key_findings = parsed.key_findings;
        }
        assessment
    }
}
