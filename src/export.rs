//! Static HTML export: `index.html`, one page per test, the embedded
//! assets, and every referenced attachment.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::{attachment_path, ATTACHMENTS_DIR, REPORT_ROOT};
use crate::detail::DetailState;
use crate::error::ReportError;
use crate::loader;
use crate::model::{Report, TestPreview};
use crate::render::assets::{self, SCRIPT, STYLESHEET};
use crate::render::{render_page, static_page_name, LinkStyle, PageView};
use crate::state::ViewerState;
use crate::store::TestPreviewStore;

#[derive(Debug, Default)]
pub struct ExportSummary {
    pub pages: usize,
    pub attachments: usize,
    /// Tests whose detail could not be loaded; their pages show the error.
    pub failed_tests: Vec<String>,
}

pub async fn export(state: &ViewerState, out_dir: &Path) -> Result<ExportSummary, ReportError> {
    state.load().await?;
    tokio::fs::create_dir_all(out_dir.join("assets")).await?;

    for name in [STYLESHEET, SCRIPT] {
        if let Some((bytes, _)) = assets::get(name) {
            tokio::fs::write(out_dir.join("assets").join(name), bytes).await?;
        }
    }

    let copy_attachments = !same_dir(state.config.report_dir().map(PathBuf::as_path), out_dir);
    if copy_attachments {
        tokio::fs::create_dir_all(out_dir.join(REPORT_ROOT).join(ATTACHMENTS_DIR)).await?;
    }

    let previews = state.previews.read().await;
    let report = previews.report().cloned().unwrap_or_default();
    let origin = state.source.describe();
    let mut summary = ExportSummary::default();
    let mut first_detail: Option<DetailState> = None;

    for preview in previews.previews() {
        let result = loader::load_test(state.source.as_ref(), &preview.id, None).await;
        match &result {
            Ok(test) if copy_attachments => {
                summary.attachments += copy_test_attachments(state, test, out_dir).await;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Exporting {} without details: {}", preview.id, e);
                summary.failed_tests.push(preview.id.clone());
            }
        }
        let detail = DetailState::from_result(&preview.id, result);

        let html = page_html(&report, &previews, preview, &detail, &origin);
        tokio::fs::write(out_dir.join(static_page_name(&preview.id)), html).await?;
        summary.pages += 1;

        if first_detail.is_none() {
            first_detail = Some(detail);
        }
    }

    let index_detail = first_detail.unwrap_or(DetailState::Idle);
    let index = match previews.previews().first() {
        Some(first) => page_html(&report, &previews, first, &index_detail, &origin),
        None => render_page(&PageView {
            links: LinkStyle::Static,
            report: Some(&report),
            list_error: None,
            previews: vec![],
            counts: previews.status_counts(),
            search: "",
            status: None,
            selected_id: None,
            detail: &index_detail,
            follows_selection: false,
            origin: &origin,
        }),
    };
    tokio::fs::write(out_dir.join("index.html"), index).await?;
    summary.pages += 1;

    info!(
        "Exported {} pages and {} attachments to {:?}",
        summary.pages, summary.attachments, out_dir
    );
    Ok(summary)
}

fn page_html(
    report: &Report,
    previews: &TestPreviewStore,
    selected: &TestPreview,
    detail: &DetailState,
    origin: &str,
) -> String {
    render_page(&PageView {
        links: LinkStyle::Static,
        report: Some(report),
        list_error: None,
        previews: previews.previews().iter().collect(),
        counts: previews.status_counts(),
        search: "",
        status: None,
        selected_id: Some(&selected.id),
        detail,
        follows_selection: false,
        origin,
    })
}

async fn copy_test_attachments(
    state: &ViewerState,
    test: &crate::model::Test,
    out_dir: &Path,
) -> usize {
    let mut copied = 0;
    for attachment in test.all_attachments() {
        let relative = attachment_path(&attachment.id, &attachment.file_name);
        let bytes =
            match loader::load_attachment(state.source.as_ref(), &attachment.id, &attachment.file_name)
                .await
            {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Skipping attachment {}: {}", relative, e);
                    continue;
                }
            };
        match tokio::fs::write(out_dir.join(&relative), &bytes).await {
            Ok(()) => copied += 1,
            Err(e) => warn!("Failed to write attachment {}: {}", relative, e),
        }
    }
    copied
}

fn same_dir(report_dir: Option<&Path>, out_dir: &Path) -> bool {
    match report_dir {
        Some(dir) => match (dir.canonicalize(), out_dir.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        },
        None => false,
    }
}
