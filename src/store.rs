use std::collections::BTreeMap;

use crate::model::{Report, TestPreview, TestStatus};

/// Lowercase, collapse whitespace runs to one space, trim the ends.
pub fn normalize(s: &str) -> String {
    s.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Previews whose normalized title contains the normalized term, in order.
/// An empty or whitespace-only term matches everything.
pub fn filter<'a>(previews: &'a [TestPreview], term: &str) -> Vec<&'a TestPreview> {
    filter_with_status(previews, term, None)
}

pub fn filter_with_status<'a>(
    previews: &'a [TestPreview],
    term: &str,
    status: Option<TestStatus>,
) -> Vec<&'a TestPreview> {
    let needle = normalize(term);
    previews
        .iter()
        .filter(|p| status.map_or(true, |s| p.status == s))
        .filter(|p| needle.is_empty() || normalize(&p.title).contains(&needle))
        .collect()
}

/// The loaded preview collection. Replaced wholesale on every load.
#[derive(Debug, Default)]
pub struct TestPreviewStore {
    report: Option<Report>,
    last_error: Option<String>,
}

impl TestPreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, report: Report) {
        self.report = Some(report);
        self.last_error = None;
    }

    /// Record a failed load; the previous collection stays visible.
    pub fn record_error(&mut self, error: String) {
        self.last_error = Some(error);
    }

    pub fn is_loaded(&self) -> bool {
        self.report.is_some()
    }

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn previews(&self) -> &[TestPreview] {
        self.report.as_ref().map(|r| r.results.as_slice()).unwrap_or(&[])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.previews().iter().any(|p| p.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&TestPreview> {
        self.previews().iter().find(|p| p.id == id)
    }

    pub fn filter(&self, term: &str, status: Option<TestStatus>) -> Vec<&TestPreview> {
        filter_with_status(self.previews(), term, status)
    }

    /// Number of previews per status, derived from the collection itself.
    pub fn status_counts(&self) -> BTreeMap<TestStatus, usize> {
        let mut counts = BTreeMap::new();
        for preview in self.previews() {
            *counts.entry(preview.status).or_insert(0) += 1;
        }
        counts
    }
}
