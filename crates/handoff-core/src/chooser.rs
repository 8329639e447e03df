//! Data the interactive chooser works with when no rule decides.

use crate::model::{Catalog, CatalogEntry, CompanionApp};
use crate::settings::{HiddenSet, ShortcutMap};
use url::Url;

/// Shortcut map key for an entry: the app id, suffixed with `_<profile id>`
/// for profile entries. Entries without an app id fall back to their path.
pub fn shortcut_key(entry: &CatalogEntry) -> String {
    let app = entry
        .app_id()
        .map(str::to_string)
        .unwrap_or_else(|| entry.executable_path().to_string_lossy().into_owned());

    match entry.profile() {
        Some(profile) => format!("{}_{}", app, profile.id),
        None => app,
    }
}

/// Catalog entries in display order, minus the hidden ones
pub fn visible_entries<'a>(catalog: &'a Catalog, hidden: &HiddenSet) -> Vec<&'a CatalogEntry> {
    catalog
        .iter()
        .filter(|entry| !hidden.contains(entry.identity()))
        .collect()
}

/// Companion apps registered for the first URL's host that are not browsers
/// already in the catalog
pub fn companion_apps_for<'a>(
    urls: &[Url],
    apps: &'a [CompanionApp],
    catalog: &Catalog,
) -> Vec<&'a CompanionApp> {
    let Some(host) = urls.first().and_then(Url::host_str) else {
        return Vec::new();
    };

    apps.iter()
        .filter(|app| app.host == host && !catalog.contains_executable(&app.app))
        .collect()
}

/// Find the entry a user picked: by identity, by 1-based position, or by
/// its assigned shortcut character.
pub fn select_entry<'a>(
    catalog: &'a Catalog,
    shortcuts: &ShortcutMap,
    selector: &str,
) -> Option<&'a CatalogEntry> {
    if let Some(entry) = catalog.find(selector) {
        return Some(entry);
    }

    if let Ok(position) = selector.parse::<usize>() {
        if let Some(entry) = position.checked_sub(1).and_then(|i| catalog.get(i)) {
            return Some(entry);
        }
    }

    catalog.iter().find(|entry| {
        shortcuts
            .get(&shortcut_key(entry))
            .is_some_and(|key| key.eq_ignore_ascii_case(selector))
    })
}
