use super::{CatalogEntry, Profile, Rule};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Where a request ends up: a whole application, or one profile of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Target {
    Plain {
        executable_path: PathBuf,
    },
    Profiled {
        executable_path: PathBuf,
        profile: Profile,
    },
}

impl Target {
    pub fn new(executable_path: PathBuf, profile: Option<Profile>) -> Self {
        match profile {
            Some(profile) => Target::Profiled {
                executable_path,
                profile,
            },
            None => Target::Plain { executable_path },
        }
    }

    pub fn executable_path(&self) -> &Path {
        match self {
            Target::Plain { executable_path } | Target::Profiled { executable_path, .. } => {
                executable_path
            }
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Target::Plain { .. } => None,
            Target::Profiled { profile, .. } => Some(profile),
        }
    }
}

impl From<&Rule> for Target {
    fn from(rule: &Rule) -> Self {
        Target::new(rule.target_executable_path.clone(), rule.target_profile.clone())
    }
}

impl From<&CatalogEntry> for Target {
    fn from(entry: &CatalogEntry) -> Self {
        Target::new(entry.executable_path().to_path_buf(), entry.profile().cloned())
    }
}

/// A target together with the identity of the application that runs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTarget {
    pub app_id: String,
    pub target: Target,
}

impl ResolvedTarget {
    pub fn new(app_id: impl Into<String>, target: Target) -> Self {
        Self {
            app_id: app_id.into(),
            target,
        }
    }
}
