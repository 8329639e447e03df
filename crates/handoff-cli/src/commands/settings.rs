//! Settings export, import and reset.
//!
//! The exported document carries the rules, browsers, hidden browsers,
//! shortcuts and private arguments. Importing replaces each section the
//! document has and leaves the others alone.

use crate::{Home, OutputFormat, print_json};
use anyhow::{Context, Result, anyhow};
use handoff_core::settings::codec;
use handoff_core::SettingsStore;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

pub fn export(home: &Home, file: &Path) -> Result<()> {
    let (_store, settings) = home.load()?;
    let content = codec::export_string(&settings)?;

    fs::write(file, content).with_context(|| format!("Failed to write {}", file.display()))?;
    println!(
        "✅ Exported {} rules and {} browsers to {}",
        settings.rules.len(),
        settings.catalog.len(),
        file.display()
    );
    Ok(())
}

pub fn import(home: &Home, file: &Path, format: OutputFormat) -> Result<()> {
    let content =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let (mut store, mut settings) = home.load()?;

    let report = codec::import_str(&content, &mut settings)
        .with_context(|| format!("Cannot import {}", file.display()))?;
    settings.save(&mut store)?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        _ => {
            println!("✅ Imported {}", file.display());
            for section in &report.sections {
                let skipped = if section.skipped > 0 {
                    format!(" ({} skipped)", section.skipped)
                } else {
                    String::new()
                };
                println!("  {:<16} {}{}", section.key, section.imported, skipped);
            }
        }
    }
    Ok(())
}

pub fn reset(home: &Home, force: bool) -> Result<()> {
    if !force {
        print!("⚠️  This will delete all rules and browser settings.\nType 'reset' to confirm: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if input.trim() != "reset" {
            return Err(anyhow!("Reset cancelled"));
        }
    }

    let mut store = home.store()?;
    store.clear()?;
    println!("✅ Settings reset");
    Ok(())
}
