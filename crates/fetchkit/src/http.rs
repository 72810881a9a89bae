//! HTTP plumbing shared by the resolvers.
//!
//! Every call is synchronous with a bounded timeout, so one unreachable
//! host cannot hang a run. Nothing here retries: a failed call is reported
//! once and the caller moves on.

use std::fs::File;
use std::io;
use std::path::Path;
use std::time::Duration;

use ureq::Agent;

use crate::error::Result;

/// Connect timeout for every request.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Overall deadline for metadata fetches (release JSON, page markup).
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Overall deadline for artifact downloads. Disk images run to hundreds of
/// megabytes, so this is generous while still bounded.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(900);

/// Largest page or metadata body we are willing to read.
const MAX_FETCH_SIZE: u64 = 10 * 1024 * 1024;

/// Largest artifact we are willing to download.
const MAX_DOWNLOAD_SIZE: u64 = 2 * 1024 * 1024 * 1024;

/// User-Agent sent with every request. Some release hosts reject requests
/// without one.
pub(crate) const USER_AGENT: &str = "fetchkit";

/// Agent for metadata fetches: short deadlines, redirects followed.
pub(crate) fn fetch_agent() -> Agent {
    Agent::config_builder()
        .timeout_connect(Some(CONNECT_TIMEOUT))
        .timeout_global(Some(FETCH_TIMEOUT))
        .build()
        .new_agent()
}

/// Agent for redirect probes: redirects are not followed so the Location
/// header can be inspected, and non-2xx statuses are not errors.
fn probe_agent() -> Agent {
    Agent::config_builder()
        .timeout_connect(Some(CONNECT_TIMEOUT))
        .timeout_global(Some(FETCH_TIMEOUT))
        .max_redirects(0)
        .max_redirects_will_error(false)
        .http_status_as_error(false)
        .build()
        .new_agent()
}

/// Agent for artifact downloads: long but still bounded deadline.
fn download_agent() -> Agent {
    Agent::config_builder()
        .timeout_connect(Some(CONNECT_TIMEOUT))
        .timeout_global(Some(DOWNLOAD_TIMEOUT))
        .build()
        .new_agent()
}

/// Fetch a URL and return the body as text.
pub fn fetch_text(url: &str) -> Result<String> {
    let mut response = fetch_agent()
        .get(url)
        .header("User-Agent", USER_AGENT)
        .call()?;
    let body = response
        .body_mut()
        .with_config()
        .limit(MAX_FETCH_SIZE)
        .read_to_string()?;
    Ok(body)
}

/// Issue a single request without following redirects and return the
/// redirect target, or `None` when the response was not a redirect.
pub fn redirect_target(url: &str) -> Result<Option<String>> {
    let response = probe_agent()
        .get(url)
        .header("User-Agent", USER_AGENT)
        .call()?;
    if !response.status().is_redirection() {
        return Ok(None);
    }
    let location = response
        .headers()
        .get("Location")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    Ok(location)
}

/// Download `url` to `dest`, streaming the body to disk.
///
/// Returns the number of bytes written.
pub fn download_to(url: &str, dest: &Path) -> Result<u64> {
    let mut response = download_agent()
        .get(url)
        .header("User-Agent", USER_AGENT)
        .call()?;
    let mut reader = response
        .body_mut()
        .with_config()
        .limit(MAX_DOWNLOAD_SIZE)
        .reader();
    let mut file = File::create(dest)?;
    let written = io::copy(&mut reader, &mut file)?;
    Ok(written)
}
