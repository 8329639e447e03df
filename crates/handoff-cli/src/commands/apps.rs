use super::position;
use crate::{Home, OutputFormat, print_json};
use anyhow::{Result, anyhow};
use handoff_core::{CompanionApp, SettingsKey};
use std::path::PathBuf;

pub fn list(home: &Home, format: OutputFormat) -> Result<()> {
    let (_store, settings) = home.load()?;

    match format {
        OutputFormat::Json => print_json(&settings.apps)?,
        OutputFormat::Table => {
            println!("Position,Host,App,Scheme");
            for (i, app) in settings.apps.iter().enumerate() {
                println!(
                    "{},{},{},{}",
                    i + 1,
                    app.host,
                    app.app.display(),
                    app.scheme_override.as_deref().unwrap_or("")
                );
            }
        }
        OutputFormat::Pretty => {
            use console::style;

            if settings.apps.is_empty() {
                println!("No companion apps.");
            }
            for (i, app) in settings.apps.iter().enumerate() {
                let scheme = app
                    .scheme_override
                    .as_deref()
                    .map(|s| format!(" (as {}://)", s))
                    .unwrap_or_default();
                println!(
                    "{:>3}. {}  ->  {}{}",
                    i + 1,
                    style(&app.host).cyan(),
                    app.app.display(),
                    scheme
                );
            }
        }
    }
    Ok(())
}

pub fn add(home: &Home, host: String, app: PathBuf, scheme: Option<String>) -> Result<()> {
    let (mut store, mut settings) = home.load()?;

    settings.apps.push(CompanionApp {
        host: host.to_ascii_lowercase(),
        app,
        scheme_override: scheme.filter(|s| !s.is_empty()),
    });
    settings.save_key(&mut store, SettingsKey::Apps)?;
    println!("✅ App {} added for {}", settings.apps.len(), host);
    Ok(())
}

pub fn remove(home: &Home, index: usize) -> Result<()> {
    let index = position(index)?;
    let (mut store, mut settings) = home.load()?;

    if index >= settings.apps.len() {
        return Err(anyhow!("App {} not found", index + 1));
    }
    let removed = settings.apps.remove(index);
    settings.save_key(&mut store, SettingsKey::Apps)?;
    println!("✅ App for {} removed", removed.host);
    Ok(())
}
