mod helpers;

use helpers::{fs_state, write_fixture_report, write_report_into};
use qase_report_viewer::export::export;
use tempfile::TempDir;

#[tokio::test]
async fn test_export_writes_pages_assets_and_attachments() {
    let report = write_fixture_report();
    let out = TempDir::new().unwrap();
    let state = fs_state(report.path());

    let summary = export(&state, out.path()).await.unwrap();
    // index + one page per preview
    assert_eq!(summary.pages, 4);
    assert_eq!(summary.failed_tests, vec!["c".to_string()]);
    assert_eq!(summary.attachments, 4);

    let index = std::fs::read_to_string(out.path().join("index.html")).unwrap();
    assert!(index.contains(r#"<article class="detail" data-test-id="a">"#));
    assert!(index.contains(r#"href="test-b.html""#));
    assert!(index.contains(r#"href="assets/report.css""#));
    assert!(!index.contains("<base"));

    let page_b = std::fs::read_to_string(out.path().join("test-b.html")).unwrap();
    assert!(page_b.contains("AssertionError: expected logout button"));
    assert!(page_b.contains(r#"<li class="preview preview--active" data-title="User can log out""#));

    let page_c = std::fs::read_to_string(out.path().join("test-c.html")).unwrap();
    assert!(page_c.contains("Could not load test details"));

    assert!(out.path().join("assets/report.css").exists());
    assert!(out.path().join("assets/report.js").exists());
    let log = std::fs::read_to_string(
        out.path().join("qase-report-jsonp/attachments/b-log-log.txt"),
    )
    .unwrap();
    assert_eq!(log, "log line\n");
}

#[tokio::test]
async fn test_export_into_report_dir_skips_attachment_copy() {
    let dir = TempDir::new().unwrap();
    write_report_into(dir.path());
    let state = fs_state(dir.path());

    let summary = export(&state, dir.path()).await.unwrap();
    assert_eq!(summary.attachments, 0);
    assert!(dir.path().join("index.html").exists());
    assert!(dir
        .path()
        .join("qase-report-jsonp/attachments/a-log-log.txt")
        .exists());
}

#[tokio::test]
async fn test_export_without_report_fails() {
    let empty = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let state = fs_state(empty.path());
    assert!(export(&state, out.path()).await.is_err());
}
