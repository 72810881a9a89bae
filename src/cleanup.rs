//! Stale staging sweep.
//!
//! Staging directories are dropped when an install finishes, but an
//! aborted run (power loss, ctrl-c during a download) can strand them.
//! `--cleanup` removes anything under the system temp dir that carries
//! the staging prefix.

use anyhow::Result;
use log::debug;
use std::fs;
use std::path::Path;

use crate::paths;
use crate::ui;

/// Remove leftover staging directories from prior aborted runs.
pub fn sweep() -> Result<()> {
    let removed = sweep_dir(&std::env::temp_dir())?;
    if removed == 0 {
        ui::dim("no stale staging directories");
    } else {
        ui::success(&format!("removed {} stale staging directories", removed));
    }
    Ok(())
}

fn sweep_dir(dir: &Path) -> Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let Ok(entry) = entry else { continue };
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.starts_with(paths::STAGING_PREFIX) || !path.is_dir() {
            continue;
        }
        match fs::remove_dir_all(&path) {
            Ok(()) => {
                debug!("removed {}", path.display());
                removed += 1;
            }
            // Another run may be using it right now; leave it alone.
            Err(e) => debug!("could not remove {}: {}", path.display(), e),
        }
    }
    Ok(removed)
}
