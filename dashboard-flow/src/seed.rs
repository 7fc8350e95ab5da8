//! Literal seed data for every page.
//!
//! The catalog is parsed once at start-up from YAML embedded in the crate.
//! Records are copied into in-memory stores from here; everything else is
//! rendered as-is.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::Result,
    record::{Claim, Client, Document, Impact, InsightKind, Policy, Priority, Trend},
};

const BUILTIN_CATALOG: &str = include_str!("../seed/catalog.yaml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub change: String,
    pub trend: Trend,
    pub icon: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingTask {
    pub id: u32,
    pub title: String,
    pub priority: Priority,
    pub due_date: String,
}

/// A labelled progress bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressMetric {
    pub label: String,
    pub value: f64,
    pub display: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSeed {
    pub stats: Vec<StatCard>,
    pub upcoming_tasks: Vec<UpcomingTask>,
    pub performance: Vec<ProgressMetric>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub impact: Impact,
    pub confidence: u8,
    pub actionable: bool,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiMetric {
    pub title: String,
    pub icon: String,
    pub current: String,
    pub improvement: String,
    pub trend: Trend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub title: String,
    pub note: String,
    pub change: String,
    pub window: String,
    pub tone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAlert {
    pub title: String,
    pub detail: String,
    pub confidence: u8,
    pub tone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsSeed {
    pub insights: Vec<Insight>,
    pub metrics: Vec<AiMetric>,
    pub trends: Vec<ProgressMetric>,
    pub forecasts: Vec<Forecast>,
    pub risk_alerts: Vec<RiskAlert>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyFigure {
    pub month: String,
    pub policies: u32,
    pub claims: u32,
    pub revenue: u64,
}

/// Share of one insurance type in the policy portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyShare {
    pub name: String,
    pub value: u32,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportKind {
    pub title: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsSeed {
    pub metrics: Vec<StatCard>,
    pub monthly: Vec<MonthlyFigure>,
    pub policy_mix: Vec<PolicyShare>,
    pub available: Vec<ReportKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    pub id: String,
    pub label: String,
    pub input: String,
    #[serde(default)]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsToggle {
    pub key: String,
    pub label: String,
    pub description: String,
    pub enabled_by_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsGroup {
    pub key: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub fields: Vec<FormField>,
    #[serde(default)]
    pub toggles: Vec<SettingsToggle>,
    #[serde(default)]
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsSeed {
    pub groups: Vec<SettingsGroup>,
}

/// Every literal the dashboard renders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub claims: Vec<Claim>,
    pub policies: Vec<Policy>,
    pub clients: Vec<Client>,
    pub documents: Vec<Document>,
    pub dashboard: DashboardSeed,
    pub insights: InsightsSeed,
    pub reports: ReportsSeed,
    pub settings: SettingsSeed,
}

impl Catalog {
    /// The catalog shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    pub fn from_yaml(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn find_toggle(&self, key: &str) -> Option<&SettingsToggle> {
        self.settings
            .groups
            .iter()
            .flat_map(|group| group.toggles.iter())
            .find(|toggle| toggle.key == key)
    }
}
