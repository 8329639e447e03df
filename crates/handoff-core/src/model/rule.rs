use super::Profile;
use serde::Serialize;
use std::path::PathBuf;

/// A user rule: URLs matching `pattern` open in the target application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Rule {
    #[serde(rename = "regex")]
    pub pattern: String,
    #[serde(rename = "app")]
    pub target_executable_path: PathBuf,
    #[serde(rename = "chromeProfile", skip_serializing_if = "Option::is_none")]
    pub target_profile: Option<Profile>,
}

impl Rule {
    pub fn new(pattern: impl Into<String>, target_executable_path: impl Into<PathBuf>) -> Self {
        Self {
            pattern: pattern.into(),
            target_executable_path: target_executable_path.into(),
            target_profile: None,
        }
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.target_profile = Some(profile);
        self
    }
}
