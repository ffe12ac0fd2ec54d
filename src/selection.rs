use serde::Serialize;

use crate::error::ReportError;
use crate::model::TestPreview;

/// Which test the details pane shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "id", rename_all = "lowercase")]
pub enum Selection {
    Unselected,
    Selected(String),
}

#[derive(Debug)]
pub struct SelectionState {
    current: Selection,
    // Latches after the first automatic or explicit pick.
    settled: bool,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self {
            current: Selection::Unselected,
            settled: false,
        }
    }

    pub fn current(&self) -> &Selection {
        &self.current
    }

    pub fn selected_id(&self) -> Option<&str> {
        match &self.current {
            Selection::Selected(id) => Some(id.as_str()),
            Selection::Unselected => None,
        }
    }

    /// Auto-select the first preview, once, when nothing was picked yet.
    /// Returns the id when the transition fired.
    pub fn on_previews_loaded(&mut self, previews: &[TestPreview]) -> Option<String> {
        if self.settled {
            return None;
        }
        let first = previews.first()?;
        self.settled = true;
        self.current = Selection::Selected(first.id.clone());
        Some(first.id.clone())
    }

    /// Explicit pick of an id present in the collection.
    pub fn select(&mut self, id: &str, previews: &[TestPreview]) -> Result<(), ReportError> {
        if !previews.iter().any(|p| p.id == id) {
            return Err(ReportError::NotFound(id.to_string()));
        }
        self.settled = true;
        self.current = Selection::Selected(id.to_string());
        Ok(())
    }
}
