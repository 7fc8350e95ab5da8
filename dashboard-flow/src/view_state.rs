use dashmap::DashMap;
use std::sync::Arc;

use crate::section::Section;

/// Local UI state of every page: the selected record, the search text and
/// any settings toggles the user flipped.
///
/// Each section holds at most one selection. Cloning shares the state.
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    selections: Arc<DashMap<Section, String>>,
    searches: Arc<DashMap<Section, String>>,
    toggles: Arc<DashMap<String, bool>>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a record, replacing any previous selection in the section.
    /// Returns the identifier that was selected before.
    pub fn select(&self, section: Section, record_id: impl Into<String>) -> Option<String> {
        self.selections.insert(section, record_id.into())
    }

    pub fn selected(&self, section: Section) -> Option<String> {
        self.selections.get(&section).map(|id| id.clone())
    }

    /// Clear the selection when the detail view is dismissed
    pub fn dismiss(&self, section: Section) -> Option<String> {
        self.selections.remove(&section).map(|(_, id)| id)
    }

    /// Blank text clears the search
    pub fn set_search(&self, section: Section, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            self.searches.remove(&section);
        } else {
            self.searches.insert(section, text.to_string());
        }
    }

    pub fn search(&self, section: Section) -> Option<String> {
        self.searches.get(&section).map(|text| text.clone())
    }

    pub fn set_toggle(&self, key: impl Into<String>, enabled: bool) {
        self.toggles.insert(key.into(), enabled);
    }

    /// The user's override for a toggle, if any
    pub fn toggle(&self, key: &str) -> Option<bool> {
        self.toggles.get(key).map(|enabled| *enabled)
    }

    pub fn clear(&self) {
        self.selections.clear();
        self.searches.clear();
        self.toggles.clear();
    }
}
