use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DashboardError;

/// Identifier of the page the shell currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Dashboard,
    Policies,
    Claims,
    Clients,
    Documents,
    Reports,
    Settings,
}

impl Section {
    /// Sidebar order
    pub const ALL: [Section; 7] = [
        Section::Dashboard,
        Section::Policies,
        Section::Claims,
        Section::Clients,
        Section::Documents,
        Section::Reports,
        Section::Settings,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Policies => "policies",
            Section::Claims => "claims",
            Section::Clients => "clients",
            Section::Documents => "documents",
            Section::Reports => "reports",
            Section::Settings => "settings",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Policies => "Policies",
            Section::Claims => "Claims",
            Section::Clients => "Clients",
            Section::Documents => "Documents",
            Section::Reports => "Reports",
            Section::Settings => "Settings",
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            Section::Dashboard => "/",
            Section::Policies => "/policies",
            Section::Claims => "/claims",
            Section::Clients => "/clients",
            Section::Documents => "/documents",
            Section::Reports => "/reports",
            Section::Settings => "/settings",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Section::Dashboard => "home",
            Section::Policies => "shield",
            Section::Claims => "clipboard-list",
            Section::Clients => "users",
            Section::Documents => "folder-open",
            Section::Reports => "bar-chart-3",
            Section::Settings => "settings",
        }
    }

    /// Whether the section lists records that can be selected for a detail view
    pub fn has_records(&self) -> bool {
        matches!(
            self,
            Section::Policies | Section::Claims | Section::Clients | Section::Documents
        )
    }

    /// Lenient lookup used by the sidebar: unknown identifiers land on the dashboard
    pub fn from_id_or_default(id: &str) -> Self {
        id.parse().unwrap_or_default()
    }
}

impl FromStr for Section {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_lowercase();
        Section::ALL
            .into_iter()
            .find(|section| section.id() == id)
            .ok_or_else(|| DashboardError::UnknownSection(s.to_string()))
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// One entry of the sidebar navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub section: Section,
    pub title: &'static str,
    pub url: &'static str,
    pub icon: &'static str,
    pub active: bool,
}

/// Sidebar items with the active one flagged
pub fn sidebar(active: Section) -> Vec<NavItem> {
    Section::ALL
        .into_iter()
        .map(|section| NavItem {
            section,
            title: section.title(),
            url: section.url(),
            icon: section.icon(),
            active: section == active,
        })
        .collect()
}
