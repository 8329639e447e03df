use super::Profile;
use crate::{Error, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// One launchable browser target: an application, or one profile of it.
///
/// The identity is derived from the profile id (when present) or the
/// executable path, and stays stable across rescans.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    #[serde(rename = "id")]
    identity: String,
    #[serde(rename = "url")]
    executable_path: PathBuf,
    #[serde(rename = "bundleId", skip_serializing_if = "Option::is_none")]
    app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<Profile>,
}

impl CatalogEntry {
    pub fn new(executable_path: impl Into<PathBuf>, app_id: Option<String>, profile: Option<Profile>) -> Self {
        let executable_path = executable_path.into();
        let identity = match &profile {
            Some(profile) => profile.id.clone(),
            None => executable_path.to_string_lossy().into_owned(),
        };

        Self {
            identity,
            executable_path,
            app_id,
            profile,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn executable_path(&self) -> &Path {
        &self.executable_path
    }

    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Display label: the file stem of the executable, plus the profile name
    pub fn label(&self) -> String {
        let app = self
            .executable_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.executable_path.display().to_string());

        match &self.profile {
            Some(profile) => format!("{} ({})", app, profile.name),
            None => app,
        }
    }
}

impl PartialEq for CatalogEntry {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for CatalogEntry {}

impl Hash for CatalogEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

/// Ordered snapshot of launchable browsers. Identities are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, rejecting duplicate identities
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.identity()) {
                return Err(Error::DuplicateIdentity(entry.identity().to_string()));
            }
        }
        Ok(Self { entries })
    }

    /// Build a catalog, keeping the first entry for each identity
    pub fn dedup_entries(entries: Vec<CatalogEntry>) -> Self {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|entry| {
                let fresh = seen.insert(entry.identity().to_string());
                if !fresh {
                    tracing::warn!(
                        "Dropping catalog entry with duplicate identity '{}' ({})",
                        entry.identity(),
                        entry.executable_path().display()
                    );
                }
                fresh
            })
            .collect();
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn find(&self, identity: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.identity() == identity)
    }

    pub fn contains_executable(&self, path: &Path) -> bool {
        self.entries.iter().any(|e| e.executable_path() == path)
    }

    /// Move an entry to a new position, shifting the ones in between
    pub fn move_entry(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.entries.len();
        for index in [from, to] {
            if index >= len {
                return Err(Error::CatalogIndex { index, len });
            }
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        Ok(())
    }
}
