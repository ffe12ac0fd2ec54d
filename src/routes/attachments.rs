use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use crate::config::{ATTACHMENTS_DIR, REPORT_ROOT};
use crate::error::ReportError;
use crate::loader;
use crate::state::SharedState;

/// GET /qase-report-jsonp/attachments/{file} — raw attachment bytes.
///
/// `file` is `{attachmentId}-{fileName}`, exactly as linked from the page.
pub async fn attachment(
    State(state): State<SharedState>,
    Path(file): Path<String>,
) -> Result<Response, ReportError> {
    if file.contains('/') || file.contains('\\') {
        return Err(ReportError::NotFound(file));
    }
    let path = format!("{}/{}/{}", REPORT_ROOT, ATTACHMENTS_DIR, file);
    debug!("Serving attachment {}", path);
    let bytes = loader::fetch(state.source.as_ref(), &path, None)
        .await
        .map_err(|e| match e {
            ReportError::Fetch { .. } => ReportError::NotFound(file.clone()),
            other => other,
        })?;

    let mime = mime_guess::from_path(&file)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    Ok(([(CONTENT_TYPE, mime)], bytes).into_response())
}
