//! Font registry: resolve a platform identifier to a Korean-capable font.
//!
//! Translated output is frequently in a non-Latin script, and the built-in
//! PDF base fonts cannot render it. This module maps a closed set of
//! platforms to the standard CJK-capable system font on each, checked once at
//! pipeline start. A font that cannot be found on disk yields a descriptor
//! flagged `registered: false` rather than an error: missing fonts are a
//! cosmetic degradation, and the assembler substitutes a built-in fallback
//! instead of aborting a run that already paid for its API calls.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Closed set of platforms the registry knows font locations for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Detect the platform the binary was compiled for.
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Platform::Windows => "windows",
            Platform::MacOs => "macos",
            Platform::Linux => "linux",
        };
        f.write_str(s)
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" | "win" => Ok(Platform::Windows),
            "macos" | "mac" | "darwin" => Ok(Platform::MacOs),
            "linux" => Ok(Platform::Linux),
            other => Err(format!(
                "unknown platform '{other}' (expected windows, macos, or linux)"
            )),
        }
    }
}

/// A resolved font for non-Latin text rendering.
///
/// `registered: false` means the font file was not found on disk; callers
/// must check the flag before drawing non-Latin output and fall back to a
/// built-in font rather than fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDescriptor {
    pub platform: Platform,
    pub family: &'static str,
    pub path: PathBuf,
    pub registered: bool,
}

/// Standard CJK-capable font per platform.
fn font_entry(platform: Platform) -> (&'static str, &'static str) {
    match platform {
        Platform::Windows => ("Malgun Gothic", r"C:\Windows\Fonts\malgun.ttf"),
        Platform::MacOs => (
            "Apple SD Gothic Neo",
            "/System/Library/Fonts/AppleSDGothicNeo.ttc",
        ),
        Platform::Linux => (
            "NanumGothic",
            "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
        ),
    }
}

/// Resolve a font for the given platform, or the detected one when `None`.
///
/// Never fails: a missing font file is reported via `registered: false`
/// and a warning, and the descriptor still carries the expected path so the
/// user can see what was looked for.
pub fn register(override_platform: Option<Platform>) -> FontDescriptor {
    let platform = override_platform.unwrap_or_else(Platform::detect);
    let (family, path) = font_entry(platform);
    register_at(platform, family, Path::new(path))
}

fn register_at(platform: Platform, family: &'static str, path: &Path) -> FontDescriptor {
    let registered = path.exists();
    if registered {
        debug!("Registered font '{}' from {}", family, path.display());
    } else {
        warn!(
            "Font '{}' not found at {}; non-Latin PDF output will use a fallback font",
            family,
            path.display()
        );
    }
    FontDescriptor {
        platform,
        family,
        path: path.to_path_buf(),
        registered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parse_roundtrip() {
        for p in [Platform::Windows, Platform::MacOs, Platform::Linux] {
            assert_eq!(p.to_string().parse::<Platform>().unwrap(), p);
        }
        assert_eq!("darwin".parse::<Platform>().unwrap(), Platform::MacOs);
        assert!("beos".parse::<Platform>().is_err());
    }

    #[test]
    fn every_platform_has_a_font_entry() {
        for p in [Platform::Windows, Platform::MacOs, Platform::Linux] {
            let (family, path) = font_entry(p);
            assert!(!family.is_empty());
            assert!(!path.is_empty());
        }
    }

    #[test]
    fn missing_font_yields_unregistered_descriptor() {
        let desc = register_at(
            Platform::Linux,
            "NanumGothic",
            Path::new("/nonexistent/NanumGothic.ttf"),
        );
        assert!(!desc.registered);
        assert_eq!(desc.family, "NanumGothic");
        assert_eq!(desc.path, PathBuf::from("/nonexistent/NanumGothic.ttf"));
    }

    #[test]
    fn existing_font_yields_registered_descriptor() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let desc = register_at(Platform::Linux, "NanumGothic", tmp.path());
        assert!(desc.registered);
    }

    #[test]
    fn override_takes_precedence_over_detection() {
        let desc = register(Some(Platform::Windows));
        assert_eq!(desc.platform, Platform::Windows);
        assert_eq!(desc.family, "Malgun Gothic");
    }
}
