use std::sync::Arc;
use tracing::debug;

use crate::{
    analysis::{AnalysisHandle, AnalysisSettings, ClaimAnalyzer},
    error::{DashboardError, Result},
    generate::TextGenerator,
    pages::{
        PageView, claims_page, clients_page, dashboard_page, documents_page, policies_page,
        reports_page, settings_page,
    },
    record::{Claim, Client, Document, Policy},
    scoring::AnalysisStrategy,
    section::Section,
    seed::Catalog,
    store::InMemoryRecordStore,
    view_state::ViewState,
};

/// Everything the pages read from: record stores seeded from the catalog,
/// the local view state and the claim analyzer. Cloning shares all of it.
#[derive(Clone)]
pub struct Workspace {
    claims: InMemoryRecordStore<Claim>,
    policies: InMemoryRecordStore<Policy>,
    clients: InMemoryRecordStore<Client>,
    documents: InMemoryRecordStore<Document>,
    catalog: Arc<Catalog>,
    view: ViewState,
    analyzer: ClaimAnalyzer,
}

impl Workspace {
    pub fn new(
        catalog: Catalog,
        generator: Arc<dyn TextGenerator>,
        strategy: Arc<dyn AnalysisStrategy>,
        settings: AnalysisSettings,
    ) -> Self {
        let claims = InMemoryRecordStore::from_records(catalog.claims.clone());
        let analyzer = ClaimAnalyzer::new(claims.clone(), generator, strategy, settings);

        Self {
            policies: InMemoryRecordStore::from_records(catalog.policies.clone()),
            clients: InMemoryRecordStore::from_records(catalog.clients.clone()),
            documents: InMemoryRecordStore::from_records(catalog.documents.clone()),
            catalog: Arc::new(catalog),
            view: ViewState::new(),
            claims,
            analyzer,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn claims(&self) -> &InMemoryRecordStore<Claim> {
        &self.claims
    }

    pub fn analyzer(&self) -> &ClaimAnalyzer {
        &self.analyzer
    }

    pub fn render(&self, section: Section) -> PageView {
        match section {
            Section::Dashboard => PageView::Dashboard(dashboard_page(&self.catalog, &self.claims)),
            Section::Policies => PageView::Policies(policies_page(&self.policies, &self.view)),
            Section::Claims => PageView::Claims(claims_page(&self.claims, &self.view)),
            Section::Clients => PageView::Clients(clients_page(&self.clients, &self.view)),
            Section::Documents => PageView::Documents(documents_page(&self.documents, &self.view)),
            Section::Reports => PageView::Reports(reports_page(&self.catalog)),
            Section::Settings => PageView::Settings(settings_page(&self.catalog, &self.view)),
        }
    }

    fn has_record(&self, section: Section, id: &str) -> Result<bool> {
        match section {
            Section::Policies => Ok(self.policies.contains(id)),
            Section::Claims => Ok(self.claims.contains(id)),
            Section::Clients => Ok(self.clients.contains(id)),
            Section::Documents => Ok(self.documents.contains(id)),
            other => Err(DashboardError::SelectionUnsupported(other)),
        }
    }

    /// Open the detail view for a record, replacing the section's previous selection
    pub fn select(&self, section: Section, id: &str) -> Result<()> {
        if !self.has_record(section, id)? {
            return Err(DashboardError::RecordNotFound(id.to_string()));
        }
        let previous = self.view.select(section, id);
        debug!(section = %section, record_id = %id, previous = ?previous, "Record selected");
        Ok(())
    }

    /// Close the detail view. Sections without records never hold a selection.
    pub fn dismiss(&self, section: Section) -> Option<String> {
        self.view.dismiss(section)
    }

    pub fn set_search(&self, section: Section, text: &str) -> Result<()> {
        if !section.has_records() {
            return Err(DashboardError::SelectionUnsupported(section));
        }
        self.view.set_search(section, text);
        Ok(())
    }

    pub fn set_toggle(&self, key: &str, enabled: bool) -> Result<()> {
        if self.catalog.find_toggle(key).is_none() {
            return Err(DashboardError::UnknownSetting(key.to_string()));
        }
        self.view.set_toggle(key, enabled);
        debug!(key = %key, enabled, "Setting toggled");
        Ok(())
    }

    pub fn claim(&self, id: &str) -> Result<Claim> {
        self.claims
            .get(id)
            .ok_or_else(|| DashboardError::RecordNotFound(id.to_string()))
    }

    pub fn analyze_claim(&self, id: &str) -> Result<AnalysisHandle> {
        self.analyzer.start(id)
    }
}
