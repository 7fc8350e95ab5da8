//! Simulated claim analysis.
//!
//! A run moves a claim through `idle -> processing -> idle`. Starting a run
//! sets `ai_processing` synchronously. The run then calls the text generator
//! and waits the configured delay before storing the strategy's verdict. If
//! generation fails the flag is cleared right away and the previous analysis
//! is left untouched.
//!
//! At most one run per claim is in flight; a second start for the same claim
//! is rejected with [`DashboardError::AnalysisInFlight`]. Runs are not
//! cancelled when their handle is dropped.

use chrono::Utc;
use dashmap::{DashMap, mapref::entry::Entry};
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::{
    error::{DashboardError, Result},
    generate::{GenerateOptions, TextGenerator},
    record::{AnalysisResult, Claim},
    scoring::{AnalysisStrategy, analysis_prompt},
    store::InMemoryRecordStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisSettings {
    /// Wait between a successful generation and the verdict being stored
    pub delay: Duration,
    pub generate: GenerateOptions,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(3_000),
            generate: GenerateOptions::default(),
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Completed { analysis: AnalysisResult },
    Failed { reason: String },
    /// The claim was removed while the run was in flight
    Discarded,
}

/// Handle to a started run
#[derive(Debug)]
pub struct AnalysisHandle {
    pub claim_id: String,
    pub run_id: Uuid,
    join: JoinHandle<AnalysisOutcome>,
}

impl AnalysisHandle {
    pub async fn wait(self) -> AnalysisOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(e) => AnalysisOutcome::Failed {
                reason: format!("analysis task aborted: {e}"),
            },
        }
    }
}

/// Releases a claim when its run ends, including when the run unwinds:
/// the in-flight entry is removed and the processing flag cleared.
struct RunGuard {
    claim_id: String,
    claims: InMemoryRecordStore<Claim>,
    in_flight: Arc<DashMap<String, Uuid>>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.claims
            .update(&self.claim_id, |claim| claim.ai_processing = false);
        self.in_flight.remove(&self.claim_id);
    }
}

#[derive(Clone)]
pub struct ClaimAnalyzer {
    claims: InMemoryRecordStore<Claim>,
    generator: Arc<dyn TextGenerator>,
    strategy: Arc<dyn AnalysisStrategy>,
    settings: AnalysisSettings,
    in_flight: Arc<DashMap<String, Uuid>>,
}

impl ClaimAnalyzer {
    pub fn new(
        claims: InMemoryRecordStore<Claim>,
        generator: Arc<dyn TextGenerator>,
        strategy: Arc<dyn AnalysisStrategy>,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            claims,
            generator,
            strategy,
            settings,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    pub fn settings(&self) -> AnalysisSettings {
        self.settings
    }

    pub fn is_in_flight(&self, claim_id: &str) -> bool {
        self.in_flight.contains_key(claim_id)
    }

    /// Start an analysis run for a claim. Must be called inside a tokio runtime.
    pub fn start(&self, claim_id: &str) -> Result<AnalysisHandle> {
        let run_id = Uuid::new_v4();
        match self.in_flight.entry(claim_id.to_string()) {
            Entry::Occupied(_) => {
                return Err(DashboardError::AnalysisInFlight(claim_id.to_string()));
            }
            Entry::Vacant(slot) => {
                slot.insert(run_id);
            }
        }

        let snapshot = self.claims.update(claim_id, |claim| {
            claim.ai_processing = true;
            claim.clone()
        });
        let Some(snapshot) = snapshot else {
            self.in_flight.remove(claim_id);
            return Err(DashboardError::RecordNotFound(claim_id.to_string()));
        };

        info!(claim_id = %claim_id, run_id = %run_id, "Claim analysis started");

        let guard = RunGuard {
            claim_id: claim_id.to_string(),
            claims: self.claims.clone(),
            in_flight: self.in_flight.clone(),
        };
        let span = info_span!("claim_analysis", claim_id = %claim_id, run_id = %run_id);
        let analyzer = self.clone();
        let join = tokio::spawn(
            async move {
                let _guard = guard;
                analyzer.run(snapshot).await
            }
            .instrument(span),
        );

        Ok(AnalysisHandle {
            claim_id: claim_id.to_string(),
            run_id,
            join,
        })
    }

    async fn run(self, snapshot: Claim) -> AnalysisOutcome {
        let prompt = analysis_prompt(&snapshot);

        match self.generator.generate(&prompt, self.settings.generate).await {
            Ok(generated) => {
                tokio::time::sleep(self.settings.delay).await;
                self.apply(&snapshot.id, &generated)
            }
            Err(e) => {
                warn!(error = %e, "Claim analysis failed, keeping previous result");
                AnalysisOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn apply(&self, claim_id: &str, generated: &str) -> AnalysisOutcome {
        let applied = self.claims.update(claim_id, |claim| {
            let assessment = self.strategy.assess(claim, generated);
            let mut analysis = assessment.analysis;
            analysis.analyzed_at = Some(Utc::now());

            claim.progress = assessment.progress.max(claim.progress).min(100);
            claim.ai_analysis = Some(analysis.clone());
            claim.ai_processing = false;
            analysis
        });

        match applied {
            Some(analysis) => {
                info!(
                    risk_score = analysis.risk_score,
                    fraud_probability = analysis.fraud_probability,
                    confidence = analysis.confidence,
                    "Claim analysis completed"
                );
                AnalysisOutcome::Completed { analysis }
            }
            None => {
                warn!("Claim disappeared before analysis completed");
                AnalysisOutcome::Discarded
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        generate::CannedTextGenerator,
        record::ClaimStatus,
        scoring::{FixedStrategy, PlaceholderStrategy},
    };
    use async_trait::async_trait;

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str, _options: GenerateOptions) -> Result<String> {
            Err(DashboardError::GenerationFailed("upstream timeout".to_string()))
        }
    }

    struct PanickingGenerator;

    #[async_trait]
    impl TextGenerator for PanickingGenerator {
        async fn generate(&self, _prompt: &str, _options: GenerateOptions) -> Result<String> {
            panic!("generator crashed")
        }
    }

    fn previous_analysis() -> AnalysisResult {
        AnalysisResult {
            risk_score: 12,
            fraud_probability: 3,
            recommendation: "Approve for fast-track processing".to_string(),
            confidence: 97,
            processing_time: "1.2s".to_string(),
            key_findings: vec!["Documentation complete and consistent".to_string()],
            analyzed_at: None,
        }
    }

    fn claims() -> InMemoryRecordStore<Claim> {
        InMemoryRecordStore::from_records([Claim {
            id: "CLM-001".to_string(),
            client: "John Smith".to_string(),
            kind: "Auto Insurance".to_string(),
            amount: "$5,200".to_string(),
            status: ClaimStatus::Pending,
            date: "2024-01-15".to_string(),
            progress: 60,
            description: "Vehicle collision damage".to_string(),
            ai_processing: false,
            ai_analysis: Some(previous_analysis()),
        }])
    }

    fn analyzer(
        claims: &InMemoryRecordStore<Claim>,
        generator: Arc<dyn TextGenerator>,
        strategy: Arc<dyn AnalysisStrategy>,
    ) -> ClaimAnalyzer {
        ClaimAnalyzer::new(
            claims.clone(),
            generator,
            strategy,
            AnalysisSettings::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn flag_is_set_immediately_and_cleared_after_the_delay() {
        let claims = claims();
        let analyzer = analyzer(
            &claims,
            Arc::new(CannedTextGenerator::default()),
            Arc::new(PlaceholderStrategy),
        );
        let started = tokio::time::Instant::now();

        let handle = analyzer.start("CLM-001").unwrap();
        assert!(claims.get("CLM-001").unwrap().ai_processing);

        // let the run reach its timer before moving the clock
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(2_999)).await;
        tokio::task::yield_now().await;
        assert!(claims.get("CLM-001").unwrap().ai_processing);
        assert!(analyzer.is_in_flight("CLM-001"));

        let outcome = handle.wait().await;
        assert!(started.elapsed() >= Duration::from_millis(3_000));

        let claim = claims.get("CLM-001").unwrap();
        assert!(!claim.ai_processing);
        assert!(!analyzer.is_in_flight("CLM-001"));

        let AnalysisOutcome::Completed { analysis } = outcome else {
            panic!("expected a completed run, got {outcome:?}");
        };
        assert_eq!(claim.ai_analysis.as_ref(), Some(&analysis));
        assert!(analysis.risk_score <= 100);
        assert!(analysis.fraud_probability <= 50);
        assert!((85..100).contains(&analysis.confidence));
        assert!(analysis.analyzed_at.is_some());
        assert!(claim.progress > 60 && claim.progress <= 100);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_generation_keeps_previous_analysis() {
        let claims = claims();
        let analyzer = analyzer(
            &claims,
            Arc::new(FailingGenerator),
            Arc::new(PlaceholderStrategy),
        );

        let handle = analyzer.start("CLM-001").unwrap();
        assert!(claims.get("CLM-001").unwrap().ai_processing);

        let outcome = handle.wait().await;
        assert!(matches!(outcome, AnalysisOutcome::Failed { .. }));

        let claim = claims.get("CLM-001").unwrap();
        assert!(!claim.ai_processing);
        assert_eq!(claim.ai_analysis, Some(previous_analysis()));
        assert_eq!(claim.progress, 60);
        assert!(!analyzer.is_in_flight("CLM-001"));
    }

    #[tokio::test]
    async fn panicking_run_releases_the_claim() {
        let claims = claims();
        let analyzer = analyzer(
            &claims,
            Arc::new(PanickingGenerator),
            Arc::new(PlaceholderStrategy),
        );

        let outcome = analyzer.start("CLM-001").unwrap().wait().await;
        assert!(matches!(outcome, AnalysisOutcome::Failed { .. }));

        let claim = claims.get("CLM-001").unwrap();
        assert!(!claim.ai_processing);
        assert_eq!(claim.ai_analysis, Some(previous_analysis()));
        assert!(!analyzer.is_in_flight("CLM-001"));

        let again = analyzer.start("CLM-001").unwrap();
        assert!(matches!(again.wait().await, AnalysisOutcome::Failed { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_handle_does_not_cancel_the_run() {
        let claims = claims();
        let analyzer = analyzer(
            &claims,
            Arc::new(CannedTextGenerator::default()),
            Arc::new(PlaceholderStrategy),
        );

        drop(analyzer.start("CLM-001").unwrap());
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(3_001)).await;
        for _ in 0..10 {
            if !analyzer.is_in_flight("CLM-001") {
                break;
            }
            tokio::task::yield_now().await;
        }

        let claim = claims.get("CLM-001").unwrap();
        assert!(!claim.ai_processing);
        assert!(claim.ai_analysis.unwrap().analyzed_at.is_some());
        assert!(!analyzer.is_in_flight("CLM-001"));
    }

    #[tokio::test(start_paused = true)]
    async fn second_start_for_the_same_claim_is_rejected() {
        let claims = claims();
        let fixed = AnalysisResult {
            risk_score: 80,
            ..previous_analysis()
        };
        let analyzer = analyzer(
            &claims,
            Arc::new(CannedTextGenerator::default()),
            Arc::new(FixedStrategy::new(fixed, 50)),
        );

        let first = analyzer.start("CLM-001").unwrap();
        assert!(matches!(
            analyzer.start("CLM-001"),
            Err(DashboardError::AnalysisInFlight(id)) if id == "CLM-001"
        ));

        first.wait().await;
        assert_eq!(claims.get("CLM-001").unwrap().progress, 100);

        let again = analyzer.start("CLM-001").unwrap();
        let outcome = again.wait().await;
        assert!(matches!(outcome, AnalysisOutcome::Completed { analysis } if analysis.risk_score == 80));
        assert_eq!(claims.get("CLM-001").unwrap().progress, 100);
    }

    #[tokio::test]
    async fn unknown_claim_is_rejected_without_leaking_in_flight_state() {
        let claims = claims();
        let analyzer = analyzer(
            &claims,
            Arc::new(CannedTextGenerator::default()),
            Arc::new(PlaceholderStrategy),
        );

        assert!(matches!(
            analyzer.start("CLM-404"),
            Err(DashboardError::RecordNotFound(_))
        ));
        assert!(!analyzer.is_in_flight("CLM-404"));
    }

    #[tokio::test(start_paused = true)]
    async fn removed_claim_discards_the_result() {
        let claims = claims();
        let analyzer = analyzer(
            &claims,
            Arc::new(CannedTextGenerator::default()),
            Arc::new(PlaceholderStrategy),
        );

        let handle = analyzer.start("CLM-001").unwrap();
        claims.remove("CLM-001");

        assert_eq!(handle.wait().await, AnalysisOutcome::Discarded);
        assert!(!analyzer.is_in_flight("CLM-001"));
    }
}
