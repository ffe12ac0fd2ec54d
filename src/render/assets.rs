use rust_embed::RustEmbed;

/// Stylesheet and script shipped inside the binary.
#[derive(RustEmbed)]
#[folder = "static/"]
pub struct Assets;

pub const STYLESHEET: &str = "report.css";
pub const SCRIPT: &str = "report.js";

/// Bytes and content type of an embedded asset.
pub fn get(name: &str) -> Option<(Vec<u8>, String)> {
    let file = Assets::get(name)?;
    let mime = mime_guess::from_path(name)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    Some((file.data.into_owned(), mime))
}
