#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use qase_report_viewer::config::{ReportLocation, ViewerConfig, DEFAULT_BIND_ADDR};
use qase_report_viewer::error::ReportError;
use qase_report_viewer::source::{FsSource, ReportSource};
use qase_report_viewer::state::ViewerState;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::sync::oneshot;

pub fn report_json() -> Value {
    json!({
        "title": "Nightly regression",
        "execution": {
            "start_time": 1_700_000_000_000i64,
            "end_time": 1_700_000_090_000i64,
            "duration": 90_000,
            "cumulative_duration": 120_000
        },
        "stats": { "total": 3, "passed": 1, "failed": 1, "skipped": 1 },
        "results": [
            { "id": "a", "title": "User can log in", "status": "passed", "duration": 1200, "thread": "worker-1" },
            { "id": "b", "title": "User can log out", "status": "failed", "duration": 3400, "thread": "worker-2" },
            { "id": "c", "title": "Admin dashboard loads", "status": "skipped", "duration": 0, "thread": null }
        ],
        "threads": ["worker-1", "worker-2"]
    })
}

pub fn test_json(id: &str, title: &str, status: &str) -> Value {
    let stacktrace = if status == "failed" {
        json!("AssertionError: expected logout button")
    } else {
        Value::Null
    };
    json!({
        "id": id,
        "title": title,
        "execution": {
            "start_time": 1_700_000_000_000i64,
            "end_time": 1_700_000_001_200i64,
            "status": status,
            "duration": 1200,
            "stacktrace": stacktrace,
            "thread": "worker-1"
        },
        "fields": { "description": format!("Checks that {}", title.to_lowercase()) },
        "steps": [
            {
                "id": format!("{}-s1", id),
                "step_type": "text",
                "execution": { "start_time": 0, "end_time": 0, "status": "passed", "duration": 300 },
                "parent_id": null,
                "data": { "action": "Open the login page", "expected_result": "Form is visible" },
                "attachments": [],
                "steps": [
                    {
                        "id": format!("{}-s1-1", id),
                        "step_type": "text",
                        "execution": { "start_time": 0, "end_time": 0, "status": "passed", "duration": 100 },
                        "parent_id": format!("{}-s1", id),
                        "data": { "action": "Wait for network idle", "expected_result": null },
                        "attachments": [
                            { "id": format!("{}-shot", id), "file_name": "page.png", "mime_type": "image/png", "file_path": "/tmp/page.png" }
                        ],
                        "steps": []
                    }
                ]
            }
        ],
        "attachments": [
            { "id": format!("{}-log", id), "file_name": "log.txt", "mime_type": "text/plain", "file_path": "/tmp/log.txt" }
        ]
    })
}

pub fn jsonp(value: &Value) -> String {
    format!("qaseJsonp({});", value)
}

/// Write a complete report (previews, two detail records, attachments) to a
/// fresh temp dir. Test `c` deliberately has no detail record.
pub fn write_fixture_report() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_report_into(dir.path());
    dir
}

pub fn write_report_into(root: &Path) {
    let base = root.join("qase-report-jsonp");
    std::fs::create_dir_all(base.join("results")).unwrap();
    std::fs::create_dir_all(base.join("attachments")).unwrap();

    std::fs::write(base.join("report.jsonp"), jsonp(&report_json())).unwrap();
    std::fs::write(
        base.join("results/a.jsonp"),
        jsonp(&test_json("a", "User can log in", "passed")),
    )
    .unwrap();
    std::fs::write(
        base.join("results/b.jsonp"),
        jsonp(&test_json("b", "User can log out", "failed")),
    )
    .unwrap();

    for id in ["a", "b"] {
        std::fs::write(base.join(format!("attachments/{}-log-log.txt", id)), "log line\n").unwrap();
        std::fs::write(base.join(format!("attachments/{}-shot-page.png", id)), [0x89, b'P', b'N', b'G']).unwrap();
    }
}

pub fn config_for(dir: &Path) -> ViewerConfig {
    ViewerConfig {
        location: ReportLocation::Dir(dir.to_path_buf()),
        port: 0,
        bind: DEFAULT_BIND_ADDR.to_string(),
        export_dir: None,
        log_file: None,
    }
}

pub fn fs_state(dir: &Path) -> ViewerState {
    ViewerState::new(config_for(dir), Arc::new(FsSource::new(dir)))
}

/// In-memory source whose reads can be held back until released, to force
/// a chosen resolution order.
pub struct GatedSource {
    files: HashMap<String, String>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
}

impl GatedSource {
    pub fn new(files: HashMap<String, String>) -> Self {
        Self {
            files,
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Hold reads of `path` until the returned sender fires.
    pub fn gate(&self, path: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(path.to_string(), rx);
        tx
    }
}

#[async_trait]
impl ReportSource for GatedSource {
    async fn fetch(&self, relative_path: &str) -> Result<Bytes, ReportError> {
        let gate = self.gates.lock().unwrap().remove(relative_path);
        if let Some(rx) = gate {
            let _ = rx.await;
        }
        self.files
            .get(relative_path)
            .map(|s| Bytes::from(s.clone()))
            .ok_or_else(|| ReportError::fetch(relative_path, "404 Not Found"))
    }

    fn describe(&self) -> String {
        "gated".to_string()
    }
}

pub fn gated_files() -> HashMap<String, String> {
    let mut files = HashMap::new();
    files.insert(
        "qase-report-jsonp/report.jsonp".to_string(),
        jsonp(&report_json()),
    );
    files.insert(
        "qase-report-jsonp/results/a.jsonp".to_string(),
        jsonp(&test_json("a", "User can log in", "passed")),
    );
    files.insert(
        "qase-report-jsonp/results/b.jsonp".to_string(),
        jsonp(&test_json("b", "User can log out", "failed")),
    );
    files
}

pub fn unused_dir() -> PathBuf {
    PathBuf::from("/tmp/qase-report-viewer-unused")
}
