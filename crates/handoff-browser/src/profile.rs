use crate::{Error, Result};
use handoff_core::{BrowserFamily, Profile};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Reads the profiles a Chromium-family browser keeps for the current user.
///
/// Profiles come from the `profile.info_cache` map in the browser's
/// `Local State` file. A missing or unreadable file means "no profiles",
/// never an error.
pub struct ProfileProvider {
    home: PathBuf,
}

impl ProfileProvider {
    /// Look for profiles under the given home directory
    pub fn new(home: PathBuf) -> Self {
        Self { home }
    }

    pub fn for_current_user() -> Result<Self> {
        let home = dirs::home_dir().ok_or(Error::HomeNotFound)?;
        Ok(Self::new(home))
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Profiles of `family`, sorted by name
    pub fn profiles(&self, family: BrowserFamily) -> Vec<Profile> {
        let data_dir = family.data_dir(&self.home);
        tracing::debug!("Getting {} profiles from {}", family, data_dir.display());

        if !data_dir.is_dir() {
            tracing::debug!("{} data directory not found", family);
            return Vec::new();
        }

        let local_state = family.local_state_path(&self.home);
        let content = match std::fs::read_to_string(&local_state) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("Cannot read {}: {}", local_state.display(), e);
                return Vec::new();
            }
        };

        match parse_local_state(&content, &data_dir) {
            Some(profiles) => {
                tracing::debug!("Found {} {} profiles", profiles.len(), family);
                for profile in &profiles {
                    tracing::debug!("  {} ({}) at {}", profile.name, profile.id, profile.directory_path.display());
                }
                profiles
            }
            None => {
                tracing::warn!("Failed to parse {} profile data in {}", family, local_state.display());
                Vec::new()
            }
        }
    }
}

/// Parse a `Local State` document. `None` if it is not the expected shape.
pub fn parse_local_state(content: &str, data_dir: &Path) -> Option<Vec<Profile>> {
    let json: Value = serde_json::from_str(content).ok()?;
    let info_cache = json.get("profile")?.get("info_cache")?.as_object()?;

    let mut profiles: Vec<Profile> = info_cache
        .iter()
        .filter_map(|(dir_name, info)| {
            let name = info.get("name")?.as_str()?;
            Some(Profile::new(dir_name.clone(), name, data_dir.join(dir_name)))
        })
        .collect();

    profiles.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    Some(profiles)
}
