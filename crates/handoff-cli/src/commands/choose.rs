//! `handoff choose`: what the chooser would offer for a set of URLs.

use crate::{Home, OutputFormat, print_json};
use anyhow::Result;
use handoff_core::chooser::{self, companion_apps_for, visible_entries};
use handoff_core::Settings;
use serde::Serialize;
use url::Url;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub position: usize,
    pub id: String,
    pub label: String,
    pub shortcut: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanionCandidate {
    pub app: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct Choices {
    pub browsers: Vec<Candidate>,
    pub apps: Vec<CompanionCandidate>,
}

pub fn execute(home: &Home, urls: &[Url], format: OutputFormat) -> Result<()> {
    let (_store, settings) = home.load_with_catalog()?;
    let choices = choices(&settings, urls);

    match format {
        OutputFormat::Json => print_json(&choices)?,
        OutputFormat::Table => output_table(&choices),
        OutputFormat::Pretty => output_pretty(&choices, urls),
    }
    Ok(())
}

/// Visible browsers in catalog order, then companion apps for the first host
pub fn choices(settings: &Settings, urls: &[Url]) -> Choices {
    let browsers = visible_entries(&settings.catalog, &settings.hidden)
        .into_iter()
        .map(|entry| Candidate {
            position: settings
                .catalog
                .iter()
                .position(|e| e.identity() == entry.identity())
                .map_or(0, |i| i + 1),
            id: entry.identity().to_string(),
            label: entry.label(),
            shortcut: settings.shortcuts.get(&chooser::shortcut_key(entry)).cloned(),
        })
        .collect();

    let apps = companion_apps_for(urls, &settings.apps, &settings.catalog)
        .into_iter()
        .filter_map(|app| {
            urls.first().map(|url| CompanionCandidate {
                app: app.app.display().to_string(),
                url: app.rewrite(url).to_string(),
            })
        })
        .collect();

    Choices { browsers, apps }
}

pub(crate) fn output_pretty(choices: &Choices, urls: &[Url]) {
    use console::style;

    if let Some(first) = urls.first() {
        println!("{} {}", style("Open").bold(), style(first).cyan());
        if urls.len() > 1 {
            println!("  and {} more", urls.len() - 1);
        }
        println!();
    }

    if choices.browsers.is_empty() {
        println!("{}", style("No browsers found. Run 'handoff browsers rescan'.").yellow());
    }
    for browser in &choices.browsers {
        let shortcut = browser
            .shortcut
            .as_deref()
            .map(|s| format!("[{}]", s))
            .unwrap_or_default();
        println!(
            "  {:>2}. {:<40} {}",
            browser.position,
            browser.label,
            style(shortcut).yellow()
        );
    }

    if !choices.apps.is_empty() {
        println!("\n{}", style("Apps").bold());
        for app in &choices.apps {
            println!("  {} {}", app.app, style(&app.url).dim());
        }
    }

    println!(
        "\n{}",
        style("Open with: handoff launch --browser <N|ID|KEY> <URL>...").dim()
    );
}

fn output_table(choices: &Choices) {
    println!("Kind,Position,Id,Label,Shortcut");
    for b in &choices.browsers {
        println!(
            "browser,{},{},{},{}",
            b.position,
            b.id,
            b.label,
            b.shortcut.as_deref().unwrap_or("")
        );
    }
    for app in &choices.apps {
        println!("app,,{},{},", app.app, app.url);
    }
}
