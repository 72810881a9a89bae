//! Vendor download-index resolver.
//!
//! Some vendor sites never link their disk images directly. Instead the
//! download page embeds a JSON index of release files inside escaped script
//! text, one entry per architecture:
//!
//! ```text
//! ... \"files\":[{\"filename\":\"App-Arm64.dmg\",\"arch\":\"Arm64\"}, ...] ...
//! ```
//!
//! The fragment is not valid JSON where it sits: the quotes are escaped and
//! the array has no enclosing object. [`resolve`] extracts it by pattern
//! match, repairs it (unescape quotes, wrap in an object), and parses the
//! result properly. All of that stays behind this module's interface so a
//! structured parse can replace the extraction without touching callers.
//!
//! The index names files, never full URLs; downloads are served from a
//! fixed base path that is hardcoded here rather than discovered from the
//! page. If the vendor moves hosting this produces dead URLs with no
//! detection until the download itself fails.

use regex::Regex;
use serde::Deserialize;

use crate::ResolvedArtifact;
use crate::arch::ArchTag;
use crate::error::{Error, Result};
use crate::http;

/// Base path the vendor serves release files from. See module docs for why
/// this is a literal.
const DOWNLOAD_BASE: &str = "https://downloads.statusboard.app/mac/";

/// The repaired download index.
#[derive(Debug, Deserialize)]
struct DownloadIndex {
    files: Vec<IndexEntry>,
}

/// One file entry in the vendor index.
#[derive(Debug, Clone, Deserialize)]
struct IndexEntry {
    filename: String,
    arch: String,
}

/// Resolve a disk image from a vendor page embedding its download index as
/// escaped JSON.
pub fn resolve(page_url: &str, arch: ArchTag) -> Result<ResolvedArtifact> {
    let body = http::fetch_text(page_url)?;
    let index = extract_index(&body)?;
    let entry = pick_entry(&index, arch)?;
    Ok(ResolvedArtifact {
        url: format!("{}{}", DOWNLOAD_BASE, entry.filename),
        filename: entry.filename.clone(),
    })
}

/// Extract and repair the escaped `files` fragment from raw page markup.
fn extract_index(body: &str) -> Result<DownloadIndex> {
    let re = Regex::new(r#"\\"files\\":\[.*?\]"#).unwrap();
    let fragment = re
        .find(body)
        .ok_or_else(|| Error::InvalidResponse("page embeds no download index".to_string()))?
        .as_str();
    let repaired = format!("{{{}}}", fragment.replace("\\\"", "\""));
    let index: DownloadIndex = serde_json::from_str(&repaired)?;
    Ok(index)
}

/// Exact-tag selection: the host's vendor tag, then "Universal", then the
/// first entry unconditionally.
fn pick_entry(index: &DownloadIndex, arch: ArchTag) -> Result<&IndexEntry> {
    let by_tag = |tag: &str| index.files.iter().find(|entry| entry.arch == tag);
    if let Some(entry) = by_tag(arch.vendor_tag()) {
        return Ok(entry);
    }
    if let Some(entry) = by_tag("Universal") {
        return Ok(entry);
    }
    index
        .files
        .first()
        .ok_or_else(|| Error::NoCandidate("vendor index lists no files".to_string()))
}
