//! Page view models.
//!
//! Each page is a pure function of the seed catalog, the record stores and
//! the view state. Badge and icon classes are resolved here so a renderer
//! only has to draw what it is given.

use serde::Serialize;

use crate::{
    badge::{Badge, Icon, claim_status_icon, insight_icon, trend_icon},
    record::{Claim, Client, Document, Policy, Record},
    section::Section,
    seed::{
        AiMetric, Catalog, Forecast, FormField, Insight, MonthlyFigure, PolicyShare,
        ProgressMetric, ReportKind, RiskAlert, StatCard, UpcomingTask,
    },
    store::InMemoryRecordStore,
    view_state::ViewState,
};

/// Number of claims shown in the dashboard's "Recent Claims" panel
pub const RECENT_CLAIMS: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct ClaimCard {
    #[serde(flatten)]
    pub claim: Claim,
    pub badge: &'static str,
    pub icon: Icon,
}

impl From<Claim> for ClaimCard {
    fn from(claim: Claim) -> Self {
        Self {
            badge: claim.status.badge_class(),
            icon: claim_status_icon(&claim.status),
            claim,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicyCard {
    #[serde(flatten)]
    pub policy: Policy,
    pub badge: &'static str,
}

impl From<Policy> for PolicyCard {
    fn from(policy: Policy) -> Self {
        Self {
            badge: policy.status.badge_class(),
            policy,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientCard {
    #[serde(flatten)]
    pub client: Client,
    pub badge: &'static str,
    pub initials: String,
}

impl From<Client> for ClientCard {
    fn from(client: Client) -> Self {
        Self {
            badge: client.status.badge_class(),
            initials: client.initials(),
            client,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentCard {
    #[serde(flatten)]
    pub document: Document,
}

impl From<Document> for DocumentCard {
    fn from(document: Document) -> Self {
        Self { document }
    }
}

/// A searchable list of record cards with an optional detail view
#[derive(Debug, Clone, Serialize)]
pub struct RecordPage<C> {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub search_placeholder: &'static str,
    pub search: Option<String>,
    /// Records in the store before filtering
    pub total: usize,
    pub cards: Vec<C>,
    pub selected: Option<C>,
}

fn record_page<R, C>(
    section: Section,
    subtitle: &'static str,
    search_placeholder: &'static str,
    store: &InMemoryRecordStore<R>,
    view: &ViewState,
) -> RecordPage<C>
where
    R: Record,
    C: From<R>,
{
    let search = view.search(section);
    let cards = match &search {
        Some(needle) => store.search(needle),
        None => store.list(),
    };
    let selected = view
        .selected(section)
        .and_then(|id| store.get(&id))
        .map(C::from);

    RecordPage {
        title: section.title(),
        subtitle,
        search_placeholder,
        search,
        total: store.len(),
        cards: cards.into_iter().map(C::from).collect(),
        selected,
    }
}

pub fn policies_page(store: &InMemoryRecordStore<Policy>, view: &ViewState) -> RecordPage<PolicyCard> {
    record_page(
        Section::Policies,
        "Manage and track all insurance policies",
        "Search policies...",
        store,
        view,
    )
}

pub fn claims_page(store: &InMemoryRecordStore<Claim>, view: &ViewState) -> RecordPage<ClaimCard> {
    record_page(
        Section::Claims,
        "Process and track insurance claims",
        "Search claims...",
        store,
        view,
    )
}

pub fn clients_page(store: &InMemoryRecordStore<Client>, view: &ViewState) -> RecordPage<ClientCard> {
    record_page(
        Section::Clients,
        "Manage client relationships and information",
        "Search clients...",
        store,
        view,
    )
}

pub fn documents_page(
    store: &InMemoryRecordStore<Document>,
    view: &ViewState,
) -> RecordPage<DocumentCard> {
    record_page(
        Section::Documents,
        "Manage and organize all insurance documents",
        "Search documents...",
        store,
        view,
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct StatView {
    #[serde(flatten)]
    pub stat: StatCard,
    pub trend_icon: Icon,
}

impl From<StatCard> for StatView {
    fn from(stat: StatCard) -> Self {
        Self {
            trend_icon: trend_icon(&stat.trend),
            stat,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: UpcomingTask,
    pub badge: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightView {
    #[serde(flatten)]
    pub insight: Insight,
    pub icon: Icon,
    pub impact_badge: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AiMetricView {
    #[serde(flatten)]
    pub metric: AiMetric,
    pub trend_icon: Icon,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightsPanel {
    pub insights: Vec<InsightView>,
    pub metrics: Vec<AiMetricView>,
    pub trends: Vec<ProgressMetric>,
    pub forecasts: Vec<Forecast>,
    pub risk_alerts: Vec<RiskAlert>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardPage {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub stats: Vec<StatView>,
    pub recent_claims: Vec<ClaimCard>,
    pub upcoming_tasks: Vec<TaskView>,
    pub performance: Vec<ProgressMetric>,
    pub ai_insights: InsightsPanel,
}

pub fn dashboard_page(catalog: &Catalog, claims: &InMemoryRecordStore<Claim>) -> DashboardPage {
    let seed = &catalog.dashboard;
    let insights = &catalog.insights;

    DashboardPage {
        title: Section::Dashboard.title(),
        subtitle: "Welcome back! Here's what's happening with your insurance business.",
        stats: seed.stats.iter().cloned().map(StatView::from).collect(),
        recent_claims: claims
            .list()
            .into_iter()
            .take(RECENT_CLAIMS)
            .map(ClaimCard::from)
            .collect(),
        upcoming_tasks: seed
            .upcoming_tasks
            .iter()
            .map(|task| TaskView {
                badge: task.priority.badge_class(),
                task: task.clone(),
            })
            .collect(),
        performance: seed.performance.clone(),
        ai_insights: InsightsPanel {
            insights: insights
                .insights
                .iter()
                .map(|insight| InsightView {
                    icon: insight_icon(&insight.kind),
                    impact_badge: insight.impact.badge_class(),
                    insight: insight.clone(),
                })
                .collect(),
            metrics: insights
                .metrics
                .iter()
                .map(|metric| AiMetricView {
                    trend_icon: trend_icon(&metric.trend),
                    metric: metric.clone(),
                })
                .collect(),
            trends: insights.trends.clone(),
            forecasts: insights.forecasts.clone(),
            risk_alerts: insights.risk_alerts.clone(),
        },
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportsPage {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub metrics: Vec<StatView>,
    pub monthly: Vec<MonthlyFigure>,
    pub policy_mix: Vec<PolicyShare>,
    pub available: Vec<ReportKind>,
}

pub fn reports_page(catalog: &Catalog) -> ReportsPage {
    let seed = &catalog.reports;
    ReportsPage {
        title: Section::Reports.title(),
        subtitle: "Analytics and insights for your insurance business",
        metrics: seed.metrics.iter().cloned().map(StatView::from).collect(),
        monthly: seed.monthly.clone(),
        policy_mix: seed.policy_mix.clone(),
        available: seed.available.clone(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToggleView {
    pub key: String,
    pub label: String,
    pub description: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingsGroupView {
    pub key: String,
    pub title: String,
    pub description: String,
    pub fields: Vec<FormField>,
    pub toggles: Vec<ToggleView>,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingsPage {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub groups: Vec<SettingsGroupView>,
}

/// Toggles show the user's override when there is one, else the seeded default
pub fn settings_page(catalog: &Catalog, view: &ViewState) -> SettingsPage {
    let groups = catalog
        .settings
        .groups
        .iter()
        .map(|group| SettingsGroupView {
            key: group.key.clone(),
            title: group.title.clone(),
            description: group.description.clone(),
            fields: group.fields.clone(),
            toggles: group
                .toggles
                .iter()
                .map(|toggle| ToggleView {
                    key: toggle.key.clone(),
                    label: toggle.label.clone(),
                    description: toggle.description.clone(),
                    enabled: view.toggle(&toggle.key).unwrap_or(toggle.enabled_by_default),
                })
                .collect(),
            actions: group.actions.clone(),
        })
        .collect();

    SettingsPage {
        title: Section::Settings.title(),
        subtitle: "Manage your account and application preferences",
        groups,
    }
}

/// The page drawn for the active section
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "section", content = "page", rename_all = "lowercase")]
pub enum PageView {
    Dashboard(DashboardPage),
    Policies(RecordPage<PolicyCard>),
    Claims(RecordPage<ClaimCard>),
    Clients(RecordPage<ClientCard>),
    Documents(RecordPage<DocumentCard>),
    Reports(ReportsPage),
    Settings(SettingsPage),
}

impl PageView {
    pub fn section(&self) -> Section {
        match self {
            PageView::Dashboard(_) => Section::Dashboard,
            PageView::Policies(_) => Section::Policies,
            PageView::Claims(_) => Section::Claims,
            PageView::Clients(_) => Section::Clients,
            PageView::Documents(_) => Section::Documents,
            PageView::Reports(_) => Section::Reports,
            PageView::Settings(_) => Section::Settings,
        }
    }
}
