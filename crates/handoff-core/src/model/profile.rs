use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// A browser profile as stored by a multi-profile browser.
///
/// `id` is the profile directory name the browser itself uses (`Default`,
/// `Profile 2`, ...). Equality and hashing only look at `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(rename = "path")]
    pub directory_path: PathBuf,
}

impl Profile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, directory_path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            directory_path: directory_path.into(),
        }
    }
}

impl PartialEq for Profile {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Profile {}

impl Hash for Profile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_profiles_equal_by_id_only() {
        let a = Profile::new("Profile 2", "Work", "/old/Profile 2");
        let b = Profile::new("Profile 2", "Renamed", "/new/Profile 2");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
    }

    #[test]
    fn test_profile_serializes_path_field() {
        let profile = Profile::new("Default", "Personal", "/data/Default");
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["id"], "Default");
        assert_eq!(json["name"], "Personal");
        assert_eq!(json["path"], "/data/Default");
    }
}
