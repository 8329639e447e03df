//! Browser families that keep several user profiles side by side.
//!
//! Chromium-based browsers store every profile in its own directory under a
//! shared user-data directory, and accept `--profile-directory=<dir>` to pick
//! one at launch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserFamily {
    Chrome,
    Edge,
}

impl BrowserFamily {
    pub const ALL: [BrowserFamily; 2] = [BrowserFamily::Chrome, BrowserFamily::Edge];

    /// Application identities (bundle ids, desktop ids) belonging to this family
    pub fn app_ids(&self) -> &'static [&'static str] {
        match self {
            BrowserFamily::Chrome => &["com.google.Chrome", "google-chrome"],
            BrowserFamily::Edge => &["com.microsoft.edgemac", "com.microsoft.Edge", "microsoft-edge"],
        }
    }

    pub fn from_app_id(app_id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|family| family.app_ids().contains(&app_id))
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "chrome" => Some(BrowserFamily::Chrome),
            "edge" => Some(BrowserFamily::Edge),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserFamily::Chrome => "chrome",
            BrowserFamily::Edge => "edge",
        }
    }

    /// User-data directory of this family under the given home directory
    pub fn data_dir(&self, home: &Path) -> PathBuf {
        home.join(self.relative_data_dir())
    }

    fn relative_data_dir(&self) -> &'static str {
        #[cfg(target_os = "macos")]
        return match self {
            BrowserFamily::Chrome => "Library/Application Support/Google/Chrome",
            BrowserFamily::Edge => "Library/Application Support/Microsoft Edge",
        };

        #[cfg(not(target_os = "macos"))]
        return match self {
            BrowserFamily::Chrome => ".config/google-chrome",
            BrowserFamily::Edge => ".config/microsoft-edge",
        };
    }

    /// The metadata file listing this family's profiles
    pub fn local_state_path(&self, home: &Path) -> PathBuf {
        self.data_dir(home).join("Local State")
    }
}

impl fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True if the application keeps selectable profiles
pub fn is_multi_profile(app_id: &str) -> bool {
    BrowserFamily::from_app_id(app_id).is_some()
}
