//! Host architecture detection and tagging.
//!
//! Vendors publish per-architecture builds. The resolvers match candidate
//! names against a canonical tag derived once per run from the host CPU.
//!
//! # Example
//!
//! ```
//! use fetchkit::ArchTag;
//!
//! let arch = ArchTag::detect();
//! println!("matching against: {}", arch.token());
//! ```

use std::fmt;

/// Canonical architecture tag used as a matching key by the resolvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchTag {
    /// Apple silicon (aarch64).
    Arm64,
    /// Intel.
    X86_64,
    /// Architecture-independent builds, also the fallback for hosts we do
    /// not recognize.
    Universal,
}

impl ArchTag {
    /// Detect the host architecture.
    ///
    /// Unrecognized architectures map to [`ArchTag::Universal`] so matching
    /// still has a usable key instead of failing outright.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_env_arch(std::env::consts::ARCH)
    }

    fn from_env_arch(arch: &str) -> Self {
        match arch {
            "aarch64" => Self::Arm64,
            "x86_64" => Self::X86_64,
            _ => Self::Universal,
        }
    }

    /// The token looked for inside asset names and URLs.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::Arm64 => "arm64",
            Self::X86_64 => "x86_64",
            Self::Universal => "universal",
        }
    }

    /// The architecture value used by vendor download indexes.
    #[must_use]
    pub fn vendor_tag(self) -> &'static str {
        match self {
            Self::Arm64 => "Arm64",
            Self::X86_64 => "X64",
            Self::Universal => "Universal",
        }
    }
}

impl fmt::Display for ArchTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}
