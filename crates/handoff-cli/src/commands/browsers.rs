use super::position;
use crate::{Home, OutputFormat, print_json};
use anyhow::{Result, anyhow};
use handoff_core::chooser::{select_entry, shortcut_key};
use handoff_core::{Settings, SettingsKey};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrowserRow {
    position: usize,
    id: String,
    label: String,
    executable_path: String,
    app_id: Option<String>,
    hidden: bool,
    shortcut: Option<String>,
    private_arg: Option<String>,
}

fn rows(settings: &Settings) -> Vec<BrowserRow> {
    settings
        .catalog
        .iter()
        .enumerate()
        .map(|(i, entry)| BrowserRow {
            position: i + 1,
            id: entry.identity().to_string(),
            label: entry.label(),
            executable_path: entry.executable_path().display().to_string(),
            app_id: entry.app_id().map(str::to_string),
            hidden: settings.hidden.contains(entry.identity()),
            shortcut: settings.shortcuts.get(&shortcut_key(entry)).cloned(),
            private_arg: entry.app_id().and_then(|id| settings.private_args.get(id)).cloned(),
        })
        .collect()
}

pub fn list(home: &Home, format: OutputFormat) -> Result<()> {
    let (_store, settings) = home.load_with_catalog()?;
    let rows = rows(&settings);

    match format {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Table => {
            println!("Position,Id,Label,Path,Hidden,Shortcut,Private Argument");
            for row in &rows {
                println!(
                    "{},{},{},{},{},{},{}",
                    row.position,
                    row.id,
                    row.label,
                    row.executable_path,
                    row.hidden,
                    row.shortcut.as_deref().unwrap_or(""),
                    row.private_arg.as_deref().unwrap_or("")
                );
            }
        }
        OutputFormat::Pretty => {
            use console::style;

            if rows.is_empty() {
                println!("No browsers found.");
                return Ok(());
            }
            for row in &rows {
                let label = if row.hidden {
                    style(format!("{} (hidden)", row.label)).dim()
                } else {
                    style(row.label.clone()).green()
                };
                let shortcut = row
                    .shortcut
                    .as_deref()
                    .map(|s| format!(" [{}]", s))
                    .unwrap_or_default();
                println!("{:>3}. {}{}", row.position, label, style(shortcut).yellow());
                println!("       {}", style(&row.id).dim());
                if let Some(arg) = &row.private_arg {
                    println!("       private: {}", arg);
                }
            }
        }
    }
    Ok(())
}

pub fn rescan(home: &Home, format: OutputFormat) -> Result<()> {
    let (mut store, mut settings) = home.load()?;
    let summary = home.rescan(&mut store, &mut settings)?;

    match format {
        OutputFormat::Json => print_json(&summary)?,
        _ => {
            println!("✅ Found {} browsers", summary.entries);
            for id in &summary.dropped_hidden {
                println!("  No longer hidden (gone): {}", id);
            }
            for key in &summary.dropped_shortcuts {
                println!("  Shortcut dropped: {}", key);
            }
            for app_id in &summary.dropped_private_args {
                println!("  Private argument dropped: {}", app_id);
            }
        }
    }
    Ok(())
}

pub fn set_hidden(home: &Home, identity: &str, hidden: bool) -> Result<()> {
    let (mut store, mut settings) = home.load_with_catalog()?;
    if settings.catalog.find(identity).is_none() {
        return Err(anyhow!("Browser '{}' not found. See 'handoff browsers list'.", identity));
    }

    let changed = if hidden {
        settings.hidden.insert(identity)
    } else {
        settings.hidden.remove(identity)
    };
    if changed {
        settings.save_key(&mut store, SettingsKey::HiddenBrowsers)?;
    }

    println!("✅ {} is {}", identity, if hidden { "hidden" } else { "shown" });
    Ok(())
}

pub fn move_browser(home: &Home, from: usize, to: usize) -> Result<()> {
    let (from, to) = (position(from)?, position(to)?);
    let (mut store, mut settings) = home.load_with_catalog()?;

    settings.catalog.move_entry(from, to)?;
    settings.save_key(&mut store, SettingsKey::Browsers)?;
    println!("✅ Browser moved from {} to {}", from + 1, to + 1);
    Ok(())
}

pub fn private_arg(home: &Home, app_id: &str, arg: Option<&str>) -> Result<()> {
    let (mut store, mut settings) = home.load()?;

    match arg.map(str::trim).filter(|a| !a.is_empty()) {
        Some(arg) => {
            settings.private_args.insert(app_id.to_string(), arg.to_string());
            println!("✅ {} opens private windows with {}", app_id, arg);
        }
        None => {
            settings.private_args.remove(app_id);
            println!("✅ Private argument for {} cleared", app_id);
        }
    }
    settings.save_key(&mut store, SettingsKey::PrivateArgs)?;
    Ok(())
}

pub fn shortcut(home: &Home, browser: &str, key: Option<&str>) -> Result<()> {
    let (mut store, mut settings) = home.load_with_catalog()?;

    let entry = select_entry(&settings.catalog, &settings.shortcuts, browser)
        .ok_or_else(|| anyhow!("Browser '{}' not found. See 'handoff browsers list'.", browser))?;
    let map_key = shortcut_key(entry);
    let label = entry.label();

    match key.filter(|k| !k.is_empty()) {
        Some(key) => {
            if key.chars().count() != 1 {
                return Err(anyhow!("Shortcut must be a single character, got '{}'", key));
            }
            settings.shortcuts.insert(map_key, key.to_string());
            println!("✅ {} is bound to '{}'", label, key);
        }
        None => {
            settings.shortcuts.remove(&map_key);
            println!("✅ Shortcut for {} cleared", label);
        }
    }
    settings.save_key(&mut store, SettingsKey::Shortcuts)?;
    Ok(())
}
