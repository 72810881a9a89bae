//! Compressed archive installs: zip and tar.gz.
//!
//! Vendors ship archives holding either a bare `.app` bundle or a disk
//! image one level in; both shapes are handled.

use anyhow::{Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use fetchkit::ResolvedArtifact;

use crate::install::{InstallContext, dmg};
use crate::paths;
use crate::ui;

pub fn install(artifact: &ResolvedArtifact, ctx: &InstallContext) -> Result<()> {
    let staging = paths::staging_dir()?;
    let archive = staging.path().join(&artifact.filename);

    let bytes = fetchkit::http::download_to(&artifact.url, &archive)?;
    ui::dim(&format!(
        "downloaded {} ({})",
        artifact.filename,
        ui::format_size(bytes)
    ));

    let contents = staging.path().join("contents");
    fs::create_dir(&contents)?;
    extract(&archive, &contents)?;

    match find_payload(&contents)? {
        Payload::Bundle(bundle) => dmg::copy_app(&bundle, ctx),
        Payload::Image(image) => dmg::install_image(&image, ctx),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Payload {
    Bundle(PathBuf),
    Image(PathBuf),
}

fn extract(archive: &Path, dest: &Path) -> Result<()> {
    let name = archive
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    if name.ends_with(".zip") {
        let file = fs::File::open(archive)?;
        let mut zip = zip::ZipArchive::new(file)?;
        zip.extract(dest)?;
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        let file = fs::File::open(archive)?;
        let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(file));
        tar.unpack(dest)?;
    } else {
        bail!("unsupported archive format: {}", name);
    }
    Ok(())
}

/// A bundle anywhere in the tree wins; otherwise fall back to the first
/// nested disk image.
fn find_payload(dir: &Path) -> Result<Payload> {
    let mut image = None;
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if entry.file_type().is_dir()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("app"))
        {
            return Ok(Payload::Bundle(path.to_path_buf()));
        }
        if image.is_none()
            && entry.file_type().is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("dmg"))
        {
            image = Some(path.to_path_buf());
        }
    }
    match image {
        Some(path) => Ok(Payload::Image(path)),
        None => bail!("archive holds neither an app bundle nor a disk image"),
    }
}
