//! Router configuration, kept in `config.json` next to the settings.

use crate::Result;
use crate::decision::StaleProfilePolicy;
use crate::family::BrowserFamily;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Helpers that register for `https` but are not browsers
pub const BUILTIN_EXCLUSIONS: &[&str] = &[
    "handoff",
    "com.hegenberg.BetterTouchTool",
    "com.browserosaurus",
    "com.parallels.desktop.appstore",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Only handlers installed under these directories become browsers.
    /// A leading `~` stands for the home directory.
    pub search_directories: Vec<PathBuf>,
    /// App ids excluded on top of the built-in list
    pub excluded_apps: Vec<String>,
    /// App id always offered, even when discovery misses it
    pub fallback_browser: Option<String>,
    /// Families expanded into one catalog entry per profile
    pub profile_families: Vec<BrowserFamily>,
    pub stale_profile_policy: StaleProfilePolicy,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            search_directories: default_search_directories(),
            excluded_apps: Vec::new(),
            fallback_browser: Some(default_fallback_browser().to_string()),
            profile_families: vec![BrowserFamily::Chrome],
            stale_profile_policy: StaleProfilePolicy::default(),
        }
    }
}

impl RouterConfig {
    /// Read the config file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        tracing::debug!("Reading config from: {}", path.display());
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Search directories with `~` expanded
    pub fn search_directories(&self, home: &Path) -> Vec<PathBuf> {
        self.search_directories
            .iter()
            .map(|dir| match dir.strip_prefix("~") {
                Ok(rest) => home.join(rest),
                Err(_) => dir.clone(),
            })
            .collect()
    }

    pub fn exclusions(&self) -> HashSet<&str> {
        BUILTIN_EXCLUSIONS
            .iter()
            .copied()
            .chain(self.excluded_apps.iter().map(String::as_str))
            .collect()
    }

    pub fn expands_profiles(&self, family: BrowserFamily) -> bool {
        self.profile_families.contains(&family)
    }
}

fn default_search_directories() -> Vec<PathBuf> {
    #[cfg(target_os = "macos")]
    return vec![PathBuf::from("/Applications"), PathBuf::from("~/Applications")];

    #[cfg(not(target_os = "macos"))]
    return [
        "/usr/bin",
        "/usr/local/bin",
        "/opt",
        "/snap/bin",
        "/var/lib/flatpak/exports/bin",
        "~/.local/bin",
        "~/.local/share/flatpak/exports/bin",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect();
}

fn default_fallback_browser() -> &'static str {
    #[cfg(target_os = "macos")]
    return "com.apple.Safari";

    #[cfg(not(target_os = "macos"))]
    return "firefox";
}
