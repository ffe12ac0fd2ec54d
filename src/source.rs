//! Where report resources are read from.
//!
//! A source performs exactly one read per call and knows nothing about
//! JSONP or the report schema; that lives in [`crate::loader`].

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::{ReportLocation, ViewerConfig, REMOTE_FETCH_TIMEOUT_SECS};
use crate::error::ReportError;

pub type SharedSource = Arc<dyn ReportSource>;

#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Read the resource at `relative_path` (always `/`-separated).
    async fn fetch(&self, relative_path: &str) -> Result<Bytes, ReportError>;

    /// Human readable origin, for logs and the page footer.
    fn describe(&self) -> String;
}

/// Build the source the config points at.
pub fn from_config(config: &ViewerConfig) -> Result<SharedSource, ReportError> {
    match &config.location {
        ReportLocation::Dir(dir) => Ok(Arc::new(FsSource::new(dir.clone()))),
        ReportLocation::Url(url) => Ok(Arc::new(HttpSource::new(url)?)),
    }
}

/// Reads resources from a local report directory.
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, relative_path: &str) -> Result<PathBuf, ReportError> {
        let relative = Path::new(relative_path);
        // Ids come from URLs; never let them walk out of the report root.
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if relative_path.is_empty() || escapes {
            return Err(ReportError::fetch(relative_path, "invalid resource path"));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ReportSource for FsSource {
    async fn fetch(&self, relative_path: &str) -> Result<Bytes, ReportError> {
        let path = self.resolve(relative_path)?;
        debug!("Reading {:?}", path);
        tokio::fs::read(&path)
            .await
            .map(Bytes::from)
            .map_err(|e| ReportError::fetch(relative_path, e))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Reads resources relative to a remote base URL.
pub struct HttpSource {
    base: url::Url,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base: &str) -> Result<Self, ReportError> {
        // A base without a trailing slash would drop its last segment on join.
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        };
        let base = url::Url::parse(&normalized).map_err(|e| ReportError::fetch(base, e))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REMOTE_FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| ReportError::fetch(base.as_str(), e))?;
        Ok(Self { base, client })
    }

    pub fn resource_url(&self, relative_path: &str) -> Result<url::Url, ReportError> {
        self.base
            .join(relative_path)
            .map_err(|e| ReportError::fetch(relative_path, e))
    }
}

#[async_trait]
impl ReportSource for HttpSource {
    async fn fetch(&self, relative_path: &str) -> Result<Bytes, ReportError> {
        let url = self.resource_url(relative_path)?;
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ReportError::fetch(relative_path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::fetch(relative_path, status));
        }

        response
            .bytes()
            .await
            .map_err(|e| ReportError::fetch(relative_path, e))
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fs_source_reads_file() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("qase-report-jsonp")).unwrap();
        std::fs::write(dir.path().join("qase-report-jsonp/report.jsonp"), "cb({});").unwrap();

        let source = FsSource::new(dir.path());
        let bytes = source.fetch("qase-report-jsonp/report.jsonp").await.unwrap();
        assert_eq!(&bytes[..], b"cb({});");
    }

    #[tokio::test]
    async fn test_fs_source_missing_file_is_fetch_error() {
        let dir = TempDir::new().unwrap();
        let source = FsSource::new(dir.path());
        let err = source.fetch("qase-report-jsonp/report.jsonp").await.unwrap_err();
        assert!(matches!(err, ReportError::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_fs_source_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let source = FsSource::new(dir.path());
        let err = source
            .fetch("qase-report-jsonp/results/../../secret.jsonp")
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::Fetch { .. }));
    }

    #[test]
    fn test_http_source_joins_relative_paths() {
        let source = HttpSource::new("http://reports.local/run-7").unwrap();
        let url = source.resource_url("qase-report-jsonp/report.jsonp").unwrap();
        assert_eq!(
            url.as_str(),
            "http://reports.local/run-7/qase-report-jsonp/report.jsonp"
        );
    }

    #[test]
    fn test_http_source_rejects_bad_base() {
        assert!(HttpSource::new("not a url").is_err());
    }
}
