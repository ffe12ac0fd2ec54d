//! HTML rendering of the report.
//!
//! Everything here is a pure function of already-loaded data; no component
//! fetches or mutates state.

pub mod assets;
pub mod components;
pub mod page;

pub use page::{render_page, PageView};

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode one URL path segment or query value.
pub fn encode_component(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

/// How pages link to each other, which differs between the live viewer and
/// a static export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// Served by the viewer; pages carry `<base href="/">`.
    Server,
    /// Flat directory of `.html` files opened from disk.
    Static,
}

impl LinkStyle {
    pub fn base_href(&self) -> Option<&'static str> {
        match self {
            LinkStyle::Server => Some("/"),
            LinkStyle::Static => None,
        }
    }

    pub fn index_href(&self) -> &'static str {
        match self {
            LinkStyle::Server => "./",
            LinkStyle::Static => "index.html",
        }
    }

    pub fn test_href(&self, id: &str, search: &str, status: Option<&str>) -> String {
        match self {
            LinkStyle::Server => {
                let mut href = format!("tests/{}", encode_component(id));
                let mut query = Vec::new();
                if !search.trim().is_empty() {
                    query.push(format!("search={}", encode_component(search)));
                }
                if let Some(status) = status {
                    query.push(format!("status={}", encode_component(status)));
                }
                if !query.is_empty() {
                    href.push('?');
                    href.push_str(&query.join("&"));
                }
                href
            }
            LinkStyle::Static => static_page_name(id),
        }
    }

    pub fn asset_href(&self, name: &str) -> String {
        format!("assets/{}", name)
    }

    /// Live viewers push re-render notifications; static pages do not.
    pub fn live_updates(&self) -> bool {
        matches!(self, LinkStyle::Server)
    }
}

/// File name of a test's page in a static export.
pub fn static_page_name(id: &str) -> String {
    format!("test-{}.html", encode_component(id))
}
