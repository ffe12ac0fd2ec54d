use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to fetch {path}: {reason}")]
    Fetch { path: String, reason: String },

    #[error("Failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("Test not found: {0}")]
    NotFound(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    pub fn fetch(path: impl Into<String>, reason: impl ToString) -> Self {
        ReportError::Fetch {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(path: impl Into<String>, reason: impl ToString) -> Self {
        ReportError::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ReportError::Fetch { .. } => StatusCode::BAD_GATEWAY,
            ReportError::Parse { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ReportError::NotFound(_) => StatusCode::NOT_FOUND,
            ReportError::Cancelled => StatusCode::CONFLICT,
            ReportError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.to_string(),
        });

        (self.status_code(), axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ReportError::fetch("a", "gone").status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ReportError::parse("a", "bad").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ReportError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_display_includes_path() {
        let err = ReportError::fetch("qase-report-jsonp/report.jsonp", "404 Not Found");
        assert_eq!(
            err.to_string(),
            "Failed to fetch qase-report-jsonp/report.jsonp: 404 Not Found"
        );
    }
}
