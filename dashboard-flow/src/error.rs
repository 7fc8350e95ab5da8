use thiserror::Error;

use crate::section::Section;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Section does not hold selectable records: {0}")]
    SelectionUnsupported(Section),

    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    #[error("Analysis already in progress for claim: {0}")]
    AnalysisInFlight(String),

    #[error("Text generation failed: {0}")]
    GenerationFailed(String),

    #[error("Invalid seed data: {0}")]
    Seed(#[from] serde_yaml::Error),

    #[error("Auth provider error: {0}")]
    Auth(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
