//! Disk image installs: download, mount, copy the bundle out, detach.
//!
//! The detach runs on every exit path once the image is attached, copy
//! failure included. Downloads live in a `rigup-` prefixed temp
//! directory that is removed when the install returns.

use anyhow::{Context, Result, bail};
use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use fetchkit::ResolvedArtifact;

use crate::install::InstallContext;
use crate::paths;
use crate::runner;
use crate::ui;

pub fn install(artifact: &ResolvedArtifact, ctx: &InstallContext) -> Result<()> {
    let staging = paths::staging_dir()?;
    let image = staging.path().join(&artifact.filename);

    let bytes = fetchkit::http::download_to(&artifact.url, &image)?;
    ui::dim(&format!(
        "downloaded {} ({})",
        artifact.filename,
        ui::format_size(bytes)
    ));

    install_image(&image, ctx)
}

/// Mount an image, copy its bundle, and always detach. Also used for
/// images found inside extracted archives.
pub fn install_image(image: &Path, ctx: &InstallContext) -> Result<()> {
    let mount_point = attach(image)?;
    debug!("mounted {} at {}", image.display(), mount_point.display());
    let copied = find_bundle(&mount_point).and_then(|bundle| copy_app(&bundle, ctx));
    detach(&mount_point);
    copied
}

/// Copy an `.app` bundle into the applications directory with `ditto`,
/// which preserves extended attributes and code signatures.
pub fn copy_app(bundle: &Path, ctx: &InstallContext) -> Result<()> {
    let name = bundle
        .file_name()
        .context("bundle path has no file name")?
        .to_string_lossy()
        .into_owned();
    let dest = Path::new(ctx.applications_dir).join(&name);

    let Some(sudo) = ctx.sudo else {
        bail!("privileged copy of {} requested without sudo", name);
    };
    let src = bundle.to_string_lossy();
    let dst = dest.to_string_lossy();
    if !sudo.run_status("ditto", &[&src, &dst])? {
        bail!("copy to {} failed", dest.display());
    }
    ui::dim(&format!("copied {} to {}", name, ctx.applications_dir));
    Ok(())
}

// ============================================================================
// hdiutil plumbing
// ============================================================================

#[derive(Debug, Deserialize)]
struct AttachResult {
    #[serde(rename = "system-entities")]
    system_entities: Vec<SystemEntity>,
}

#[derive(Debug, Deserialize)]
struct SystemEntity {
    #[serde(rename = "mount-point")]
    mount_point: Option<String>,
}

fn attach(image: &Path) -> Result<PathBuf> {
    let image = image.to_str().context("image path is not valid UTF-8")?;
    let stdout = runner::run_capture_bytes(
        "hdiutil",
        &[
            "attach",
            "-plist",
            "-nobrowse",
            "-readonly",
            "-mountrandom",
            "/tmp",
            image,
        ],
    )
    .context("hdiutil attach failed")?;
    parse_mount_point(&stdout)
}

// Only partition entries carry a mount point; the first one is the
// mounted volume.
fn parse_mount_point(plist_bytes: &[u8]) -> Result<PathBuf> {
    let attach: AttachResult =
        plist::from_bytes(plist_bytes).context("Could not parse hdiutil attach output")?;
    attach
        .system_entities
        .into_iter()
        .find_map(|entity| entity.mount_point)
        .map(PathBuf::from)
        .context("disk image produced no mount point")
}

fn detach(mount_point: &Path) {
    let mount = mount_point.to_string_lossy();
    if runner::run_quiet("hdiutil", &["detach", &mount]) {
        return;
    }
    warn!("hdiutil detach failed for {}, forcing unmount", mount);
    if !runner::run_quiet("diskutil", &["unmount", "force", &mount]) {
        ui::warn(&format!("could not unmount {}", mount));
    }
}

/// First `.app` bundle at the top level of the mounted volume, by name.
fn find_bundle(dir: &Path) -> Result<PathBuf> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Could not read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();
    entries
        .into_iter()
        .find(|path| path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("app")))
        .with_context(|| format!("no .app bundle at the top of {}", dir.display()))
}
