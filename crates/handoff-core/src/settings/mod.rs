//! The aggregate settings snapshot and its persistence.

pub mod codec;
pub mod store;

pub use codec::{ImportReport, SectionReport};
pub use store::{MemoryStore, SettingsKey, SettingsStore};

use crate::Result;
use crate::chooser;
use crate::model::{Catalog, CompanionApp};
use crate::rules::RuleStore;
use serde::Serialize;
use std::collections::BTreeMap;

/// Shortcut key (app id, optionally `_<profile id>`) to a key character
pub type ShortcutMap = BTreeMap<String, String>;

/// App id to the flag that opens it in private mode
pub type PrivateArgs = BTreeMap<String, String>;

/// Catalog identities hidden from the chooser. Keeps insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HiddenSet {
    identities: Vec<String>,
}

impl HiddenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the identity was already hidden
    pub fn insert(&mut self, identity: impl Into<String>) -> bool {
        let identity = identity.into();
        if self.contains(&identity) {
            return false;
        }
        self.identities.push(identity);
        true
    }

    pub fn remove(&mut self, identity: &str) -> bool {
        let before = self.identities.len();
        self.identities.retain(|i| i != identity);
        self.identities.len() != before
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.identities.iter().any(|i| i == identity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.identities.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

impl FromIterator<String> for HiddenSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = HiddenSet::new();
        for identity in iter {
            set.insert(identity);
        }
        set
    }
}

/// Everything the user configures, as one snapshot.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub rules: RuleStore,
    pub catalog: Catalog,
    pub hidden: HiddenSet,
    pub shortcuts: ShortcutMap,
    pub private_args: PrivateArgs,
    pub apps: Vec<CompanionApp>,
}

/// What a rescan kept and dropped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RescanSummary {
    pub entries: usize,
    pub dropped_hidden: Vec<String>,
    pub dropped_shortcuts: Vec<String>,
    pub dropped_private_args: Vec<String>,
}

impl Settings {
    /// Load every key from the store. Unreadable keys load as empty.
    pub fn load(store: &impl SettingsStore) -> Result<Self> {
        let mut settings = Settings::default();
        for key in SettingsKey::ALL {
            let Some(value) = store.get(key)? else {
                continue;
            };
            match codec::decode_section(&mut settings, key, &value) {
                Some(report) if report.skipped > 0 => {
                    tracing::warn!("Dropped {} unreadable {} records", report.skipped, key);
                }
                Some(_) => {}
                None => tracing::warn!("Stored '{}' is unreadable, starting empty", key),
            }
        }
        tracing::debug!(
            "Loaded {} rules and {} browsers",
            settings.rules.len(),
            settings.catalog.len()
        );
        Ok(settings)
    }

    pub fn save(&self, store: &mut impl SettingsStore) -> Result<()> {
        for key in SettingsKey::ALL {
            store.set(key, codec::encode_section(self, key))?;
        }
        Ok(())
    }

    /// Persist a single key
    pub fn save_key(&self, store: &mut impl SettingsStore, key: SettingsKey) -> Result<()> {
        store.set(key, codec::encode_section(self, key))
    }

    /// Replace the catalog and carry hidden state, shortcuts and private
    /// arguments over to the entries that still exist.
    pub fn apply_rescan(&mut self, catalog: Catalog) -> RescanSummary {
        let hidden: HiddenSet = catalog
            .iter()
            .filter(|entry| self.hidden.contains(entry.identity()))
            .map(|entry| entry.identity().to_string())
            .collect();

        let shortcuts: ShortcutMap = catalog
            .iter()
            .map(chooser::shortcut_key)
            .filter_map(|key| self.shortcuts.get(&key).map(|s| (key, s.clone())))
            .collect();

        let private_args: PrivateArgs = catalog
            .iter()
            .filter_map(|entry| entry.app_id())
            .filter_map(|app_id| {
                self.private_args
                    .get(app_id)
                    .map(|arg| (app_id.to_string(), arg.clone()))
            })
            .collect();

        let summary = RescanSummary {
            entries: catalog.len(),
            dropped_hidden: self
                .hidden
                .iter()
                .filter(|id| !hidden.contains(id))
                .map(str::to_string)
                .collect(),
            dropped_shortcuts: self
                .shortcuts
                .keys()
                .filter(|k| !shortcuts.contains_key(*k))
                .cloned()
                .collect(),
            dropped_private_args: self
                .private_args
                .keys()
                .filter(|k| !private_args.contains_key(*k))
                .cloned()
                .collect(),
        };

        tracing::info!(
            "Catalog rebuilt with {} entries ({} hidden, {} shortcuts, {} private args kept)",
            catalog.len(),
            hidden.len(),
            shortcuts.len(),
            private_args.len()
        );

        self.catalog = catalog;
        self.hidden = hidden;
        self.shortcuts = shortcuts;
        self.private_args = private_args;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CatalogEntry, Profile, Rule};

    fn chrome(profile: &str) -> CatalogEntry {
        CatalogEntry::new(
            "/opt/google/chrome/chrome",
            Some("google-chrome".to_string()),
            Some(Profile::new(profile, profile, format!("/chrome/{}", profile))),
        )
    }

    fn firefox() -> CatalogEntry {
        CatalogEntry::new("/usr/bin/firefox", Some("firefox".to_string()), None)
    }

    fn configured() -> Settings {
        let mut settings = Settings {
            catalog: Catalog::from_entries(vec![firefox(), chrome("Default"), chrome("Profile 1")])
                .unwrap(),
            ..Default::default()
        };
        settings.hidden.insert("Profile 1");
        settings.hidden.insert("/usr/bin/firefox");
        settings
            .shortcuts
            .insert("google-chrome_Profile 1".to_string(), "w".to_string());
        settings.shortcuts.insert("firefox".to_string(), "f".to_string());
        settings
            .private_args
            .insert("firefox".to_string(), "--private-window".to_string());
        settings
            .private_args
            .insert("google-chrome".to_string(), "--incognito".to_string());
        settings
    }

    #[test]
    fn test_rescan_without_changes_keeps_everything() {
        let mut settings = configured();
        let before = settings.clone();

        let summary = settings.apply_rescan(before.catalog.clone());

        assert_eq!(settings.catalog, before.catalog);
        let ids: Vec<_> = settings.catalog.iter().map(|e| e.identity()).collect();
        let before_ids: Vec<_> = before.catalog.iter().map(|e| e.identity()).collect();
        assert_eq!(ids, before_ids);
        assert_eq!(settings.shortcuts, before.shortcuts);
        assert_eq!(settings.private_args, before.private_args);
        assert_eq!(settings.hidden.len(), before.hidden.len());
        assert!(summary.dropped_hidden.is_empty());
        assert!(summary.dropped_shortcuts.is_empty());
        assert!(summary.dropped_private_args.is_empty());
    }

    #[test]
    fn test_rescan_drops_state_of_vanished_entries() {
        let mut settings = configured();
        let new_catalog = Catalog::from_entries(vec![chrome("Default"), chrome("Profile 2")]).unwrap();

        let summary = settings.apply_rescan(new_catalog);

        assert!(settings.hidden.is_empty());
        assert!(settings.shortcuts.is_empty());
        assert_eq!(settings.private_args.len(), 1);
        assert_eq!(settings.private_args["google-chrome"], "--incognito");
        assert_eq!(summary.dropped_hidden.len(), 2);
        assert_eq!(summary.dropped_private_args, vec!["firefox".to_string()]);
    }

    #[test]
    fn test_rescan_leaves_rules_alone() {
        let mut settings = configured();
        settings.rules.append(Rule::new("x", "/gone/app"));
        settings.apply_rescan(Catalog::new());
        assert_eq!(settings.rules.len(), 1);
    }

    #[test]
    fn test_store_round_trip_preserves_rule_order() {
        let mut settings = configured();
        for pattern in ["z", "a", "m", "a"] {
            settings.rules.append(Rule::new(pattern, "/usr/bin/firefox"));
        }
        settings.apps.push(CompanionApp {
            host: "zoom.us".to_string(),
            app: "/usr/bin/zoom".into(),
            scheme_override: Some("zoommtg".to_string()),
        });

        let mut store = MemoryStore::new();
        settings.save(&mut store).unwrap();
        let loaded = Settings::load(&store).unwrap();

        assert_eq!(loaded.rules, settings.rules);
        assert_eq!(loaded.catalog, settings.catalog);
        assert_eq!(loaded.hidden, settings.hidden);
        assert_eq!(loaded.apps, settings.apps);
    }

    #[test]
    fn test_load_tolerates_corrupt_key() {
        let mut store = MemoryStore::new();
        store.set(SettingsKey::Rules, serde_json::json!("garbage")).unwrap();
        store
            .set(SettingsKey::Shortcuts, serde_json::json!({"firefox": "f"}))
            .unwrap();

        let loaded = Settings::load(&store).unwrap();
        assert!(loaded.rules.is_empty());
        assert_eq!(loaded.shortcuts.len(), 1);
    }

    #[test]
    fn test_hidden_set_is_unique_and_ordered() {
        let mut hidden = HiddenSet::new();
        assert!(hidden.insert("b"));
        assert!(hidden.insert("a"));
        assert!(!hidden.insert("b"));
        assert_eq!(hidden.iter().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(hidden.remove("b"));
        assert!(!hidden.remove("b"));
    }
}
