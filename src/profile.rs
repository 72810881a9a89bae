//! Shell profile reconciliation: one managed block, appended once.
//!
//! The sentinel markers are the only idempotence signal. Once the begin
//! marker is anywhere in the profile the block counts as applied, even
//! if the user edited the lines in between; their edits win.

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::ui;

const BEGIN_MARKER: &str = "# >>> rigup managed block >>>";
const END_MARKER: &str = "# <<< rigup managed block <<<";

// Wires up what the provisioner installs: user-local binaries on PATH
// and asdf shims when asdf is around.
const BLOCK_BODY: &str = r#"export PATH="$HOME/.local/bin:$PATH"
command -v brew >/dev/null && [ -f "$(brew --prefix asdf)/libexec/asdf.sh" ] && . "$(brew --prefix asdf)/libexec/asdf.sh"
"#;

/// Append the managed block to the profile unless it is already there.
/// A timestamped backup is written before the first-ever append.
pub fn reconcile(profile: &Path) -> Result<()> {
    let existing = match fs::read_to_string(profile) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("Could not read {}", profile.display()));
        }
    };

    if existing.contains(BEGIN_MARKER) {
        ui::dim("shell profile already managed");
        return Ok(());
    }

    if !existing.is_empty() {
        let backup = backup_path(profile);
        fs::copy(profile, &backup)
            .with_context(|| format!("Could not back up {}", profile.display()))?;
        ui::dim(&format!("profile backed up to {}", backup.display()));
    }

    let mut content = existing;
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push('\n');
    content.push_str(&managed_block());

    fs::write(profile, content)
        .with_context(|| format!("Could not write {}", profile.display()))?;
    ui::success("shell profile updated");
    Ok(())
}

fn managed_block() -> String {
    format!("{}\n{}{}\n", BEGIN_MARKER, BLOCK_BODY, END_MARKER)
}

fn backup_path(profile: &Path) -> PathBuf {
    let stamp = Utc::now().format("%Y%m%d-%H%M%S");
    let name = profile
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "profile".to_string());
    profile.with_file_name(format!("{}.{}.bak", name, stamp))
}
