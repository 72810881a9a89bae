//! Latest-release resolver for GitHub-hosted applications.
//!
//! Queries the public releases API for an `owner/repo` locator, filters the
//! release assets down to disk images, and picks the best match for the
//! host architecture. When no asset name satisfies a preference keyword the
//! first disk image asset wins; a release with no disk image at all is a
//! [`Error::NoCandidate`].

use serde::Deserialize;

use crate::ResolvedArtifact;
use crate::arch::ArchTag;
use crate::error::{Error, Result};
use crate::http;
use crate::prefer;

const API_BASE: &str = "https://api.github.com";

/// Release metadata returned by the GitHub API. Only the fields we read.
#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    assets: Vec<Asset>,
}

/// A single release asset.
#[derive(Debug, Clone, Deserialize)]
struct Asset {
    name: String,
    browser_download_url: String,
}

/// Resolve the latest-release disk image for `owner/repo`.
pub fn resolve(repo: &str, arch: ArchTag) -> Result<ResolvedArtifact> {
    let url = format!("{}/repos/{}/releases/latest", API_BASE, repo);
    let release: Release = http::fetch_agent()
        .get(&url)
        .header("Accept", "application/vnd.github+json")
        .header("User-Agent", http::USER_AGENT)
        .call()?
        .body_mut()
        .read_json()?;
    pick_asset(&release, arch)
}

fn pick_asset(release: &Release, arch: ArchTag) -> Result<ResolvedArtifact> {
    let images: Vec<&Asset> = release
        .assets
        .iter()
        .filter(|asset| asset.name.to_lowercase().ends_with(".dmg"))
        .collect();

    let Some(first) = images.first() else {
        return Err(Error::NoCandidate(format!(
            "release {} has no disk image assets",
            release.tag_name
        )));
    };

    let chosen = prefer::pick_preferred(&images, arch, |asset| asset.name.as_str())
        .copied()
        .unwrap_or(first);

    Ok(ResolvedArtifact {
        url: chosen.browser_download_url.clone(),
        filename: chosen.name.clone(),
    })
}
