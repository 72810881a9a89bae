//! Web-page resolver: scan a download page for disk image links.
//!
//! Primary pass: every `href` ending in the disk image extension,
//! absolutized against the page URL and run through the architecture
//! preference. When the page has no direct links at all, a secondary pass
//! probes hrefs whose path mentions "download", "api", or "release" — one
//! request each, redirects not followed — and examines where they would
//! redirect to. Last resort: the first direct link, unfiltered.

use regex::Regex;
use url::Url;

use crate::ResolvedArtifact;
use crate::arch::ArchTag;
use crate::error::{Error, Result};
use crate::http;
use crate::prefer;

/// Path fragments marking hrefs worth probing when the page has no direct
/// disk image links.
const PROBE_HINTS: [&str; 3] = ["download", "api", "release"];

/// Resolve a disk image download from a vendor download page.
pub fn resolve(page_url: &str, arch: ArchTag) -> Result<ResolvedArtifact> {
    let body = http::fetch_text(page_url)?;
    resolve_in_markup(page_url, &body, arch, |url| {
        http::redirect_target(url).ok().flatten()
    })
}

/// Resolution over already-fetched markup. The redirect probe is injected
/// so the fallback chain runs in tests without a network.
fn resolve_in_markup<F>(
    page_url: &str,
    body: &str,
    arch: ArchTag,
    probe: F,
) -> Result<ResolvedArtifact>
where
    F: Fn(&str) -> Option<String>,
{
    let base = Url::parse(page_url)
        .map_err(|err| Error::InvalidResponse(format!("bad page url {}: {}", page_url, err)))?;

    let hrefs = extract_hrefs(body);
    let direct: Vec<String> = hrefs
        .iter()
        .filter(|href| is_image_url(href))
        .filter_map(|href| base.join(href).ok())
        .map(|url| url.to_string())
        .collect();

    if let Some(url) = prefer::pick_preferred(&direct, arch, |u| u.as_str()) {
        return Ok(ResolvedArtifact::from_url(url));
    }

    if direct.is_empty()
        && let Some(url) = probe_hinted_links(&base, &hrefs, arch, probe)
    {
        return Ok(ResolvedArtifact::from_url(&url));
    }

    // Final fallback: first direct link with no preference filtering.
    if let Some(url) = direct.first() {
        return Ok(ResolvedArtifact::from_url(url));
    }

    Err(Error::NoCandidate(format!(
        "no disk image links found on {}",
        page_url
    )))
}

/// Probe hinted hrefs in document order. The first redirect landing on a
/// disk image that satisfies the architecture preference wins immediately;
/// failing that, the first disk image redirect of any kind. Dead or
/// redirect-less links are skipped, not fatal.
fn probe_hinted_links<F>(base: &Url, hrefs: &[String], arch: ArchTag, probe: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut first_any: Option<String> = None;
    for href in hrefs {
        if !has_probe_hint(href) {
            continue;
        }
        let Ok(absolute) = base.join(href) else {
            continue;
        };
        let Some(location) = probe(absolute.as_str()) else {
            continue;
        };
        if !is_image_url(&location) {
            continue;
        }
        if prefer::matches_any(&location, arch) {
            return Some(location);
        }
        if first_any.is_none() {
            first_any = Some(location);
        }
    }
    first_any
}

fn has_probe_hint(href: &str) -> bool {
    let path = href.split(['?', '#']).next().unwrap_or(href).to_lowercase();
    PROBE_HINTS.iter().any(|hint| path.contains(hint))
}

fn is_image_url(link: &str) -> bool {
    let path = link.split(['?', '#']).next().unwrap_or(link);
    path.to_lowercase().ends_with(".dmg")
}

/// All href targets in the markup, document order, quotes of either kind.
fn extract_hrefs(body: &str) -> Vec<String> {
    let re = Regex::new(r#"(?i)href\s*=\s*["']([^"']+)["']"#).unwrap();
    re.captures_iter(body)
        .map(|caps| caps[1].to_string())
        .collect()
}
