//! Parser for the install directive line format.
//!
//! One desired-installed unit per line:
//!
//! ```text
//! category=name::method::payload::target_path
//! ```
//!
//! The `::` delimiter was chosen because it never collides with the shell
//! metacharacters that show up inside payloads. Payloads may still contain
//! `::` themselves: the grammar is right-biased, so the segment after the
//! *last* delimiter is the target path and everything between the second
//! delimiter and that final split stays in the payload.
//!
//! A malformed line is a warning for the caller to log, never a fatal
//! error; parsing of the remaining lines continues.

use anyhow::{Result, bail};

/// Installation backend selected by a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Installs this tool performs itself: scripted, downloaded, archived.
    Custom,
    /// Homebrew packages.
    Brew,
    /// asdf-managed tool versions.
    Asdf,
    /// Mac App Store titles.
    Mas,
}

impl Category {
    fn from_token(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "custom" => Some(Self::Custom),
            "brew" => Some(Self::Brew),
            "asdf" => Some(Self::Asdf),
            "mas" => Some(Self::Mas),
            _ => None,
        }
    }

    /// Canonical lowercase token for this category.
    pub fn token(self) -> &'static str {
        match self {
            Self::Custom => "custom",
            Self::Brew => "brew",
            Self::Asdf => "asdf",
            Self::Mas => "mas",
        }
    }
}

/// Category-specific action tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// Run the payload as a shell command.
    Run,
    /// Install a disk image from a direct download URL.
    Dmg,
    /// Resolve a disk image from the latest GitHub release of `owner/repo`.
    DmgGithub,
    /// Resolve a disk image by scanning a download page for links.
    DmgWeb,
    /// Resolve a disk image from a vendor's embedded download index.
    DmgVendor,
    /// Download and extract a compressed archive.
    Zip,
    /// Cannot be automated; reported and skipped every run.
    Manual,
    /// The backend's own install action (brew, asdf, mas).
    Install,
    /// Unrecognized tag, preserved verbatim so the run can report the skip.
    Unknown(String),
}

impl Method {
    /// Map a method token for `category`. Methods are category-specific:
    /// a token another category would accept still parses, but as
    /// [`Method::Unknown`] so the orchestrator records the skip.
    fn from_token(category: Category, token: &str) -> Self {
        let lowered = token.to_lowercase();
        if lowered == "manual" {
            return Self::Manual;
        }
        match category {
            Category::Custom => match lowered.as_str() {
                "run" => Self::Run,
                "dmg" => Self::Dmg,
                "dmg-github" => Self::DmgGithub,
                "dmg-web" => Self::DmgWeb,
                "dmg-vendor" => Self::DmgVendor,
                "zip" => Self::Zip,
                _ => Self::Unknown(token.to_string()),
            },
            Category::Brew | Category::Asdf | Category::Mas => match lowered.as_str() {
                "install" => Self::Install,
                _ => Self::Unknown(token.to_string()),
            },
        }
    }

    /// Canonical token for this method; unknown tags come back verbatim.
    pub fn token(&self) -> &str {
        match self {
            Self::Run => "run",
            Self::Dmg => "dmg",
            Self::DmgGithub => "dmg-github",
            Self::DmgWeb => "dmg-web",
            Self::DmgVendor => "dmg-vendor",
            Self::Zip => "zip",
            Self::Manual => "manual",
            Self::Install => "install",
            Self::Unknown(token) => token,
        }
    }
}

/// One parsed configuration line: a single desired-installed unit.
///
/// Immutable once parsed. Re-parsing the same text always yields the same
/// directive sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallDirective {
    /// Backend that handles this directive.
    pub category: Category,
    /// Logical identifier: logging, presence lookups, store queries.
    pub name: String,
    /// Action tag, category-specific.
    pub method: Method,
    /// Meaning depends on the method: shell command, URL, repo locator,
    /// version string, or store identifier.
    pub payload: String,
    /// Filesystem location used to test presence. Empty for methods with
    /// backend-native presence queries.
    pub target_path: String,
}

impl InstallDirective {
    /// Whether this directive's presence test needs a filesystem target.
    ///
    /// brew and asdf installs query their own installed sets; manual and
    /// unrecognized directives never reach a presence check that matters.
    pub fn requires_target(&self) -> bool {
        match self.method {
            Method::Manual | Method::Unknown(_) => false,
            Method::Install => self.category == Category::Mas,
            _ => true,
        }
    }

    /// Serialize back to the line format. Parsing a canonical line and
    /// re-serializing it reproduces the original text exactly.
    pub fn to_line(&self) -> String {
        format!(
            "{}={}::{}::{}::{}",
            self.category.token(),
            self.name,
            self.method.token(),
            self.payload,
            self.target_path
        )
    }
}

/// Parse a single configuration line.
///
/// Returns `Ok(None)` for blank and comment lines, and `Err` with the
/// reason for malformed lines — the caller logs those as warnings and
/// keeps going.
pub fn parse_line(line: &str) -> Result<Option<InstallDirective>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let Some((category_token, rest)) = line.split_once('=') else {
        bail!("missing '=' between category and name");
    };
    let Some(category) = Category::from_token(category_token) else {
        bail!("unknown category '{}'", category_token);
    };
    let Some((name, rest)) = rest.split_once("::") else {
        bail!("missing '::' after name");
    };
    if name.is_empty() {
        bail!("empty name");
    }
    let Some((method_token, rest)) = rest.split_once("::") else {
        bail!("missing '::' after method");
    };
    // Right-biased split: the last segment is the target path, so payloads
    // keep any interior '::' intact.
    let Some((payload, target_path)) = rest.rsplit_once("::") else {
        bail!("expected four '::'-separated fields");
    };

    let directive = InstallDirective {
        category,
        name: name.to_string(),
        method: Method::from_token(category, method_token),
        payload: payload.to_string(),
        target_path: target_path.to_string(),
    };

    if directive.requires_target() && directive.target_path.is_empty() {
        bail!(
            "method '{}' requires a target path",
            directive.method.token()
        );
    }

    Ok(Some(directive))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(line: &str) -> InstallDirective {
        parse_line(line).unwrap().expect("expected a directive")
    }

    #[test]
    fn test_parse_custom_run() {
        let d = parse_one("custom=colima::run::brew install colima::/opt/homebrew/bin/colima");
        assert_eq!(d.category, Category::Custom);
        assert_eq!(d.name, "colima");
        assert_eq!(d.method, Method::Run);
        assert_eq!(d.payload, "brew install colima");
        assert_eq!(d.target_path, "/opt/homebrew/bin/colima");
    }

    #[test]
    fn test_parse_custom_dmg_github() {
        let d = parse_one("custom=wezterm::dmg-github::wez/wezterm::/Applications/WezTerm.app");
        assert_eq!(d.method, Method::DmgGithub);
        assert_eq!(d.payload, "wez/wezterm");
    }

    #[test]
    fn test_parse_brew_install() {
        let d = parse_one("brew=fzf::install::fzf::/usr/local/bin/fzf");
        assert_eq!(d.category, Category::Brew);
        assert_eq!(d.method, Method::Install);
        assert_eq!(d.target_path, "/usr/local/bin/fzf");
    }

    #[test]
    fn test_parse_brew_install_empty_target_allowed() {
        let d = parse_one("brew=ripgrep::install::ripgrep::");
        assert_eq!(d.target_path, "");
    }

    #[test]
    fn test_parse_asdf_install_empty_target_allowed() {
        let d = parse_one("asdf=python::install::3.12.1::");
        assert_eq!(d.category, Category::Asdf);
        assert_eq!(d.payload, "3.12.1");
    }

    #[test]
    fn test_parse_mas_requires_target() {
        let err = parse_line("mas=WireGuard::install::WireGuard::").unwrap_err();
        assert!(err.to_string().contains("target path"));
    }

    #[test]
    fn test_parse_mas_with_target() {
        let d = parse_one("mas=WireGuard::install::WireGuard::/Applications/WireGuard.app");
        assert_eq!(d.category, Category::Mas);
        assert_eq!(d.method, Method::Install);
    }

    #[test]
    fn test_payload_keeps_shell_pipe() {
        let d = parse_one(
            "custom=rustup::run::curl https://sh.rustup.rs | sh -s -- -y::~/.cargo/bin/rustup",
        );
        assert_eq!(d.payload, "curl https://sh.rustup.rs | sh -s -- -y");
        assert_eq!(d.target_path, "~/.cargo/bin/rustup");
    }

    #[test]
    fn test_payload_keeps_interior_delimiter() {
        let d = parse_one("custom=odd::run::echo a::b::/tmp/odd");
        assert_eq!(d.payload, "echo a::b");
        assert_eq!(d.target_path, "/tmp/odd");
    }

    #[test]
    fn test_payload_may_contain_equals() {
        let d = parse_one("custom=envy::run::FOO=1 ./install.sh::/tmp/envy");
        assert_eq!(d.name, "envy");
        assert_eq!(d.payload, "FOO=1 ./install.sh");
    }

    #[test]
    fn test_category_is_case_insensitive() {
        let d = parse_one("Brew=fzf::install::fzf::");
        assert_eq!(d.category, Category::Brew);
    }

    #[test]
    fn test_blank_and_comment_lines_yield_nothing() {
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("   ").unwrap().is_none());
        assert!(parse_line("# a comment").unwrap().is_none());
    }

    #[test]
    fn test_missing_equals_is_an_error() {
        let err = parse_line("foo::bar").unwrap_err();
        assert!(err.to_string().contains("missing '='"));
    }

    #[test]
    fn test_unknown_category_is_an_error() {
        let err = parse_line("pip=requests::install::requests::").unwrap_err();
        assert!(err.to_string().contains("unknown category"));
    }

    #[test]
    fn test_too_few_fields_is_an_error() {
        let err = parse_line("custom=tool::run::only-three-fields").unwrap_err();
        assert!(err.to_string().contains("four"));
    }

    #[test]
    fn test_empty_name_is_an_error() {
        let err = parse_line("custom=::run::cmd::/tmp/x").unwrap_err();
        assert!(err.to_string().contains("empty name"));
    }

    #[test]
    fn test_manual_method_any_category() {
        let d = parse_one("custom=xcode::manual::install from the App Store first::");
        assert_eq!(d.method, Method::Manual);
        let d = parse_one("brew=weird::manual::pinned by hand::");
        assert_eq!(d.method, Method::Manual);
    }

    #[test]
    fn test_unknown_method_is_preserved() {
        let d = parse_one("custom=tool::pkg::https://example.com/t.pkg::/Applications/T.app");
        assert_eq!(d.method, Method::Unknown("pkg".to_string()));
    }

    #[test]
    fn test_method_from_other_category_is_unknown() {
        let d = parse_one("brew=tool::dmg::https://example.com/t.dmg::/Applications/T.app");
        assert_eq!(d.method, Method::Unknown("dmg".to_string()));
    }

    #[test]
    fn test_round_trip_reproduces_line() {
        let lines = [
            "custom=wezterm::dmg-github::wez/wezterm::/Applications/WezTerm.app",
            "custom=rustup::run::curl https://sh.rustup.rs | sh -s -- -y::~/.cargo/bin/rustup",
            "brew=fzf::install::fzf::/usr/local/bin/fzf",
            "asdf=python::install::3.12.1::",
            "mas=WireGuard::install::WireGuard::/Applications/WireGuard.app",
            "custom=odd::run::echo a::b::/tmp/odd",
        ];
        for line in lines {
            assert_eq!(parse_one(line).to_line(), line, "round trip for {line}");
        }
    }

    #[test]
    fn test_reparse_is_deterministic() {
        let line = "custom=wezterm::dmg-github::wez/wezterm::/Applications/WezTerm.app";
        assert_eq!(parse_one(line), parse_one(line));
    }
}
