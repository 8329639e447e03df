//! JSON encoding of settings, shared by the store and by import/export.
//!
//! Every record is encoded and decoded on its own. A record that is missing
//! required fields is skipped and counted; the rest of its section still
//! loads. A section that is absent (or not the expected container type)
//! leaves the in-memory collection alone; a present section replaces it.

use super::store::SettingsKey;
use super::{HiddenSet, Settings};
use crate::model::{Catalog, CatalogEntry, CompanionApp, Profile, Rule};
use crate::rules::RuleStore;
use crate::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Outcome of decoding one section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionReport {
    pub key: &'static str,
    pub imported: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub sections: Vec<SectionReport>,
}

impl ImportReport {
    pub fn section(&self, key: SettingsKey) -> Option<&SectionReport> {
        self.sections.iter().find(|s| s.key == key.as_str())
    }

    pub fn skipped(&self) -> usize {
        self.sections.iter().map(|s| s.skipped).sum()
    }
}

/// Export the settings as a pretty-printed JSON document
pub fn export_string(settings: &Settings) -> Result<String> {
    Ok(serde_json::to_string_pretty(&export(settings))?)
}

pub fn export(settings: &Settings) -> Value {
    let mut doc = Map::new();
    doc.insert("version".to_string(), json!(env!("CARGO_PKG_VERSION")));
    doc.insert("exportedAt".to_string(), json!(chrono::Utc::now().to_rfc3339()));

    for key in SettingsKey::EXPORTED {
        doc.insert(key.as_str().to_string(), encode_section(settings, key));
    }

    tracing::info!(
        "Exported {} rules, {} browsers, {} hidden browsers",
        settings.rules.len(),
        settings.catalog.len(),
        settings.hidden.len()
    );

    Value::Object(doc)
}

/// Import a settings document, replacing each section it carries
pub fn import_str(content: &str, settings: &mut Settings) -> Result<ImportReport> {
    let doc: Value = serde_json::from_str(content)?;
    import(&doc, settings)
}

pub fn import(doc: &Value, settings: &mut Settings) -> Result<ImportReport> {
    let Some(doc) = doc.as_object() else {
        return Err(Error::InvalidDocument(
            "expected a JSON object at the top level".to_string(),
        ));
    };

    let mut report = ImportReport::default();
    for key in SettingsKey::EXPORTED {
        let Some(value) = doc.get(key.as_str()) else {
            tracing::debug!("Settings document has no '{}' section", key);
            continue;
        };
        if let Some(section) = decode_section(settings, key, value) {
            tracing::info!(
                "Imported {} {} ({} skipped)",
                section.imported,
                key,
                section.skipped
            );
            report.sections.push(section);
        }
    }

    Ok(report)
}

/// Encode one section. Records that fail to encode are skipped.
pub fn encode_section(settings: &Settings, key: SettingsKey) -> Value {
    match key {
        SettingsKey::Rules => encode_records(settings.rules.iter(), key),
        SettingsKey::Browsers => encode_records(settings.catalog.iter(), key),
        SettingsKey::HiddenBrowsers => encode_records(
            settings
                .hidden
                .iter()
                .filter_map(|identity| settings.catalog.find(identity)),
            key,
        ),
        SettingsKey::Shortcuts => encode_string_map(&settings.shortcuts),
        SettingsKey::PrivateArgs => encode_string_map(&settings.private_args),
        SettingsKey::Apps => encode_records(settings.apps.iter(), key),
    }
}

fn encode_string_map(map: &BTreeMap<String, String>) -> Value {
    Value::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

fn encode_records<'a, T, I>(records: I, key: SettingsKey) -> Value
where
    T: Serialize + 'a,
    I: Iterator<Item = &'a T>,
{
    let encoded = records
        .enumerate()
        .filter_map(|(index, record)| match serde_json::to_value(record) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Skipping {} record {}: {}", key, index, e);
                None
            }
        })
        .collect();
    Value::Array(encoded)
}

/// Decode one section into `settings`.
///
/// Returns `None` and leaves `settings` unchanged if the value is not the
/// container type the section needs.
pub fn decode_section(settings: &mut Settings, key: SettingsKey, value: &Value) -> Option<SectionReport> {
    let (imported, skipped) = match key {
        SettingsKey::Rules => {
            let (rules, skipped) = decode_list(value, key, decode_rule)?;
            let imported = rules.len();
            settings.rules = RuleStore::from_rules(rules);
            (imported, skipped)
        }
        SettingsKey::Browsers => {
            let (entries, skipped) = decode_list(value, key, decode_entry)?;
            settings.catalog = Catalog::dedup_entries(entries);
            (settings.catalog.len(), skipped)
        }
        SettingsKey::HiddenBrowsers => {
            let (entries, skipped) = decode_list(value, key, decode_entry)?;
            settings.hidden = entries
                .iter()
                .map(|entry| entry.identity().to_string())
                .collect::<HiddenSet>();
            (settings.hidden.len(), skipped)
        }
        SettingsKey::Shortcuts => {
            let (map, skipped) = decode_string_map(value, key)?;
            let imported = map.len();
            settings.shortcuts = map;
            (imported, skipped)
        }
        SettingsKey::PrivateArgs => {
            let (map, skipped) = decode_string_map(value, key)?;
            let imported = map.len();
            settings.private_args = map;
            (imported, skipped)
        }
        SettingsKey::Apps => {
            let (apps, skipped) = decode_list(value, key, |v| {
                serde_json::from_value::<CompanionApp>(v.clone()).ok()
            })?;
            let imported = apps.len();
            settings.apps = apps;
            (imported, skipped)
        }
    };

    Some(SectionReport {
        key: key.as_str(),
        imported,
        skipped,
    })
}

fn decode_list<T>(
    value: &Value,
    key: SettingsKey,
    decode: impl Fn(&Value) -> Option<T>,
) -> Option<(Vec<T>, usize)> {
    let Some(items) = value.as_array() else {
        tracing::warn!("Ignoring '{}': expected a list", key);
        return None;
    };

    let mut decoded = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for (index, item) in items.iter().enumerate() {
        match decode(item) {
            Some(record) => decoded.push(record),
            None => {
                tracing::warn!("Skipping invalid {} record {}", key, index);
                skipped += 1;
            }
        }
    }
    Some((decoded, skipped))
}

fn decode_string_map(value: &Value, key: SettingsKey) -> Option<(BTreeMap<String, String>, usize)> {
    let Some(object) = value.as_object() else {
        tracing::warn!("Ignoring '{}': expected an object", key);
        return None;
    };

    let mut map = BTreeMap::new();
    let mut skipped = 0;
    for (name, value) in object {
        match value.as_str() {
            Some(s) => {
                map.insert(name.clone(), s.to_string());
            }
            None => {
                tracing::warn!("Skipping non-string {} value for '{}'", key, name);
                skipped += 1;
            }
        }
    }
    Some((map, skipped))
}

/// A rule needs `regex` and `app`; a malformed `chromeProfile` is dropped
pub fn decode_rule(value: &Value) -> Option<Rule> {
    let pattern = value.get("regex")?.as_str()?;
    let app = value.get("app")?.as_str()?;

    let mut rule = Rule::new(pattern, app);
    rule.target_profile = value.get("chromeProfile").and_then(decode_profile);
    Some(rule)
}

/// A browser needs `id` and `url`. The identity is recomputed, not trusted.
pub fn decode_entry(value: &Value) -> Option<CatalogEntry> {
    value.get("id")?.as_str()?;
    let path = value.get("url")?.as_str()?;
    let app_id = value
        .get("bundleId")
        .and_then(Value::as_str)
        .map(str::to_string);
    let profile = value.get("profile").and_then(decode_profile);

    Some(CatalogEntry::new(PathBuf::from(path), app_id, profile))
}

pub fn decode_profile(value: &Value) -> Option<Profile> {
    let id = value.get("id")?.as_str()?;
    let name = value.get("name")?.as_str()?;
    let path = value.get("path")?.as_str()?;
    Some(Profile::new(id, name, path))
}
