pub mod analysis;
pub mod auth;
pub mod badge;
pub mod error;
pub mod generate;
pub mod pages;
pub mod record;
pub mod scoring;
pub mod section;
pub mod seed;
pub mod shell;
pub mod store;
pub mod view_state;
pub mod workspace;

// Re-export commonly used types
pub use analysis::{AnalysisHandle, AnalysisOutcome, AnalysisSettings, ClaimAnalyzer};
pub use auth::{AuthCallback, AuthProvider, AuthState, LocalAuthProvider, Subscription, User};
pub use badge::{Badge, Icon, NEUTRAL_BADGE};
pub use error::{DashboardError, Result};
#[cfg(feature = "rig")]
pub use generate::OpenRouterGenerator;
pub use generate::{CannedTextGenerator, GenerateOptions, TextGenerator};
pub use pages::PageView;
pub use record::{
    AnalysisResult, Claim, ClaimStatus, Client, ClientStatus, Document, Policy, PolicyStatus,
    Record,
};
pub use scoring::{AnalysisStrategy, Assessment, FixedStrategy, PlaceholderStrategy, ResponseStrategy};
pub use section::{NavItem, Section};
pub use seed::Catalog;
pub use shell::{Screen, Shell};
pub use store::InMemoryRecordStore;
pub use view_state::ViewState;
pub use workspace::Workspace;

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::{sync::Arc, time::Duration};

    /// Generator that echoes a fixed JSON verdict, like a cooperative model would
    struct VerdictGenerator;

    #[async_trait]
    impl TextGenerator for VerdictGenerator {
        async fn generate(&self, prompt: &str, options: GenerateOptions) -> Result<String> {
            assert!(prompt.contains("Claim ID: CLM-001"));
            assert_eq!(options.max_tokens, 500);
            Ok(r#"{"risk_score": 22, "fraud_probability": 5, "recommendation": "Approve for fast-track processing", "confidence": 93, "key_findings": ["Police report attached"]}"#.to_string())
        }
    }

    fn operator() -> User {
        User {
            id: "operator".to_string(),
            name: "Back Office Operator".to_string(),
            email: "operator@insurance.local".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_signed_in_claim_analysis_flow() {
        let workspace = Workspace::new(
            Catalog::builtin().unwrap(),
            Arc::new(VerdictGenerator),
            Arc::new(ResponseStrategy::new(PlaceholderStrategy)),
            AnalysisSettings {
                delay: Duration::from_millis(1_500),
                ..AnalysisSettings::default()
            },
        );
        let provider = Arc::new(LocalAuthProvider::signed_out(operator()));
        let shell = Shell::mount(provider.clone(), workspace.clone());

        shell.login().await.unwrap();
        shell.navigate(Section::Claims);
        workspace.select(Section::Claims, "CLM-001").unwrap();

        let handle = workspace.analyze_claim("CLM-001").unwrap();
        let Screen::App(frame) = shell.render() else {
            panic!("expected the app frame");
        };
        let PageView::Claims(page) = &frame.page else {
            panic!("expected the claims page");
        };
        assert!(page.selected.as_ref().unwrap().claim.ai_processing);

        assert!(matches!(handle.wait().await, AnalysisOutcome::Completed { .. }));

        let claim = workspace.claim("CLM-001").unwrap();
        let analysis = claim.ai_analysis.unwrap();
        assert!(!claim.ai_processing);
        assert_eq!(analysis.risk_score, 22);
        assert_eq!(analysis.confidence, 93);
        assert_eq!(analysis.key_findings, vec!["Police report attached"]);
        assert!(claim.progress > 60);
    }

    #[tokio::test]
    async fn test_signed_out_shell_hides_records() {
        let workspace = Workspace::new(
            Catalog::builtin().unwrap(),
            Arc::new(CannedTextGenerator::default()),
            Arc::new(PlaceholderStrategy),
            AnalysisSettings::default(),
        );
        let provider = Arc::new(LocalAuthProvider::signed_out(operator()));
        let shell = Shell::mount(provider.clone(), workspace);
        shell.navigate(Section::Clients);

        let json = serde_json::to_string(&shell.render()).unwrap();
        assert!(!json.contains("CLI-001"));
        assert!(json.contains("Sign In to Continue"));

        drop(shell);
        assert_eq!(provider.listener_count(), 0);
    }
}
