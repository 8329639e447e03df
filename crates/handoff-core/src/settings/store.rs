use crate::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Named values in the settings store. Each is read and written on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsKey {
    Rules,
    Browsers,
    HiddenBrowsers,
    Shortcuts,
    PrivateArgs,
    Apps,
}

impl SettingsKey {
    pub const ALL: [SettingsKey; 6] = [
        SettingsKey::Rules,
        SettingsKey::Browsers,
        SettingsKey::HiddenBrowsers,
        SettingsKey::Shortcuts,
        SettingsKey::PrivateArgs,
        SettingsKey::Apps,
    ];

    /// Sections carried by an exported settings document
    pub const EXPORTED: [SettingsKey; 5] = [
        SettingsKey::Rules,
        SettingsKey::Browsers,
        SettingsKey::HiddenBrowsers,
        SettingsKey::Shortcuts,
        SettingsKey::PrivateArgs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsKey::Rules => "rules",
            SettingsKey::Browsers => "browsers",
            SettingsKey::HiddenBrowsers => "hiddenBrowsers",
            SettingsKey::Shortcuts => "shortcuts",
            SettingsKey::PrivateArgs => "privateArgs",
            SettingsKey::Apps => "apps",
        }
    }
}

impl fmt::Display for SettingsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-value storage for settings. There is no transaction across keys.
pub trait SettingsStore {
    fn get(&self, key: SettingsKey) -> Result<Option<Value>>;

    fn set(&mut self, key: SettingsKey, value: Value) -> Result<()>;

    /// Remove every stored value
    fn clear(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<SettingsKey, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: SettingsKey) -> Result<Option<Value>> {
        Ok(self.values.get(&key).cloned())
    }

    fn set(&mut self, key: SettingsKey, value: Value) -> Result<()> {
        self.values.insert(key, value);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.values.clear();
        Ok(())
    }
}
