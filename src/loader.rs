use bytes::Bytes;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::{attachment_path, report_path, result_path};
use crate::error::ReportError;
use crate::jsonp;
use crate::model::{Report, Test};
use crate::source::ReportSource;

/// One read of `path`, abandoned early if `cancel` fires first.
pub async fn fetch(
    source: &dyn ReportSource,
    path: &str,
    cancel: Option<&CancellationToken>,
) -> Result<Bytes, ReportError> {
    match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("Fetch of {} cancelled", path);
                    Err(ReportError::Cancelled)
                }
                result = source.fetch(path) => result,
            }
        }
        None => source.fetch(path).await,
    }
}

/// Fetch a JSONP resource and deserialize the embedded JSON.
pub async fn load_jsonp<T: DeserializeOwned>(
    source: &dyn ReportSource,
    path: &str,
    cancel: Option<&CancellationToken>,
) -> Result<T, ReportError> {
    let bytes = fetch(source, path, cancel).await?;
    let text = std::str::from_utf8(&bytes).map_err(|e| ReportError::parse(path, e))?;
    jsonp::parse(text).map_err(|reason| {
        warn!("Malformed payload at {}: {}", path, reason);
        ReportError::parse(path, reason)
    })
}

pub async fn load_report(
    source: &dyn ReportSource,
    cancel: Option<&CancellationToken>,
) -> Result<Report, ReportError> {
    load_jsonp(source, &report_path(), cancel).await
}

pub async fn load_test(
    source: &dyn ReportSource,
    test_id: &str,
    cancel: Option<&CancellationToken>,
) -> Result<Test, ReportError> {
    let path = result_path(test_id);
    let test: Test = load_jsonp(source, &path, cancel).await?;
    if test.id != test_id {
        warn!(
            "Result file {} carries id {:?}, expected {:?}",
            path, test.id, test_id
        );
    }
    Ok(test)
}

/// Raw attachment bytes; attachments are served as-is, never parsed.
pub async fn load_attachment(
    source: &dyn ReportSource,
    attachment_id: &str,
    file_name: &str,
) -> Result<Bytes, ReportError> {
    fetch(source, &attachment_path(attachment_id, file_name), None).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct MapSource(HashMap<String, String>);

    #[async_trait]
    impl ReportSource for MapSource {
        async fn fetch(&self, relative_path: &str) -> Result<Bytes, ReportError> {
            self.0
                .get(relative_path)
                .map(|s| Bytes::from(s.clone()))
                .ok_or_else(|| ReportError::fetch(relative_path, "404 Not Found"))
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    /// Never resolves; only cancellation can end the fetch.
    struct PendingSource;

    #[async_trait]
    impl ReportSource for PendingSource {
        async fn fetch(&self, _relative_path: &str) -> Result<Bytes, ReportError> {
            std::future::pending().await
        }

        fn describe(&self) -> String {
            "pending".to_string()
        }
    }

    fn source(entries: &[(&str, &str)]) -> MapSource {
        MapSource(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_load_report() {
        let src = source(&[(
            "qase-report-jsonp/report.jsonp",
            r#"qaseJsonp({"title":"Run","results":[{"id":"a","title":"A","status":"passed","duration":1,"thread":"t"}]});"#,
        )]);
        let report = load_report(&src, None).await.unwrap();
        assert_eq!(report.title, "Run");
        assert_eq!(report.results.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_resource_is_fetch_error() {
        let src = source(&[]);
        let err = load_test(&src, "nope", None).await.unwrap_err();
        assert!(matches!(err, ReportError::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_parse_error() {
        let src = source(&[("qase-report-jsonp/report.jsonp", "qaseJsonp({broken);")]);
        let err = load_report(&src, None).await.unwrap_err();
        assert!(matches!(err, ReportError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_cancelled_fetch() {
        let token = CancellationToken::new();
        token.cancel();
        let err = load_report(&PendingSource, Some(&token)).await.unwrap_err();
        assert!(matches!(err, ReportError::Cancelled));
    }

    #[tokio::test]
    async fn test_load_attachment_uses_id_prefixed_name() {
        let src = source(&[("qase-report-jsonp/attachments/x1-log.txt", "hello")]);
        let bytes = load_attachment(&src, "x1", "log.txt").await.unwrap();
        assert_eq!(&bytes[..], b"hello");
    }
}
