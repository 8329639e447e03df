//! Rule management commands.
//!
//! Rules are matched in list order and the first match wins, so positions
//! matter. Positions shown and accepted here start at 1.
//!
//! # Examples
//!
//! ```bash
//! # Send GitHub links to the work profile of Chrome
//! handoff rules add 'github\.com' --app /usr/bin/google-chrome --profile "Profile 1"
//!
//! # Check what a pattern would catch
//! handoff rules test 'github\.com/.*/pull' https://github.com/a/b/pull/1
//!
//! # Give the first rule priority over everything else
//! handoff rules move 3 1
//! ```

use super::position;
use crate::{Home, OutputFormat, print_json};
use anyhow::{Context, Result, anyhow};
use handoff_browser::ProfileProvider;
use handoff_core::{AppResolver, BrowserFamily, Profile, Rule, Settings, SettingsKey, family, pattern};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RuleRow<'a> {
    position: usize,
    #[serde(flatten)]
    rule: &'a Rule,
    valid_pattern: bool,
    installed: bool,
}

/// List rules, marking broken patterns and missing applications
pub fn list(home: &Home, format: OutputFormat) -> Result<()> {
    let (_store, settings) = home.load()?;
    let resolver = home.installed_apps()?;

    let invalid: Vec<usize> = settings.rules.validate().into_iter().map(|(i, _)| i).collect();
    let rows: Vec<RuleRow> = settings
        .rules
        .iter()
        .enumerate()
        .map(|(i, rule)| RuleRow {
            position: i + 1,
            rule,
            valid_pattern: !invalid.contains(&i),
            installed: resolver.is_installed(&rule.target_executable_path),
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Table => {
            println!("Position,Pattern,App,Profile,Valid,Installed");
            for row in &rows {
                println!(
                    "{},{},{},{},{},{}",
                    row.position,
                    row.rule.pattern,
                    row.rule.target_executable_path.display(),
                    row.rule.target_profile.as_ref().map(|p| p.id.as_str()).unwrap_or(""),
                    row.valid_pattern,
                    row.installed
                );
            }
        }
        OutputFormat::Pretty => {
            use console::style;

            if rows.is_empty() {
                println!("No rules. Add one with 'handoff rules add <PATTERN> --app <PATH>'.");
                return Ok(());
            }
            for row in &rows {
                let profile = row
                    .rule
                    .target_profile
                    .as_ref()
                    .map(|p| format!(" ({})", p.name))
                    .unwrap_or_default();
                let mut marks = Vec::new();
                if !row.valid_pattern {
                    marks.push(style("[invalid pattern]").red().to_string());
                }
                if !row.installed {
                    marks.push(style("[not installed]").yellow().to_string());
                }
                println!(
                    "{:>3}. {}  ->  {}{} {}",
                    row.position,
                    style(&row.rule.pattern).cyan(),
                    row.rule.target_executable_path.display(),
                    profile,
                    marks.join(" ")
                );
            }
        }
    }
    Ok(())
}

pub fn add(home: &Home, pattern: &str, app: PathBuf, profile: Option<&str>) -> Result<()> {
    pattern::compile(pattern)?;
    let (mut store, mut settings) = home.load()?;

    let mut rule = Rule::new(pattern, app);
    if let Some(id) = profile {
        check_profile_support(home, &rule.target_executable_path)?;
        rule = rule.with_profile(find_profile(&settings, id)?);
    }

    settings.rules.append(rule);
    settings.save_key(&mut store, SettingsKey::Rules)?;
    println!("✅ Rule {} added", settings.rules.len());
    Ok(())
}

/// Fields to change on an existing rule
#[derive(Debug, Default)]
pub struct RuleUpdate {
    pub pattern: Option<String>,
    pub app: Option<PathBuf>,
    pub profile: Option<String>,
    pub no_profile: bool,
}

pub fn update(home: &Home, index: usize, changes: RuleUpdate) -> Result<()> {
    let index = position(index)?;
    let (mut store, mut settings) = home.load()?;

    let mut rule = settings
        .rules
        .get(index)
        .cloned()
        .ok_or_else(|| anyhow!("Rule {} not found", index + 1))?;

    if let Some(pattern) = changes.pattern {
        pattern::compile(&pattern)?;
        rule.pattern = pattern;
    }
    let app_changed = changes.app.is_some();
    if let Some(app) = changes.app {
        rule.target_executable_path = app;
    }
    if changes.no_profile {
        rule.target_profile = None;
    } else if let Some(id) = changes.profile {
        check_profile_support(home, &rule.target_executable_path)?;
        rule.target_profile = Some(find_profile(&settings, &id)?);
    } else if app_changed && rule.target_profile.is_some() {
        check_profile_support(home, &rule.target_executable_path)?;
    }

    settings.rules.update(index, rule)?;
    settings.save_key(&mut store, SettingsKey::Rules)?;
    println!("✅ Rule {} updated", index + 1);
    Ok(())
}

pub fn remove(home: &Home, index: usize) -> Result<()> {
    let index = position(index)?;
    let (mut store, mut settings) = home.load()?;

    let removed = settings.rules.remove(index)?;
    settings.save_key(&mut store, SettingsKey::Rules)?;
    println!("✅ Rule '{}' removed", removed.pattern);
    Ok(())
}

pub fn move_rule(home: &Home, from: usize, to: usize) -> Result<()> {
    let (from, to) = (position(from)?, position(to)?);
    let (mut store, mut settings) = home.load()?;

    settings.rules.move_rule(from, to)?;
    settings.save_key(&mut store, SettingsKey::Rules)?;
    println!("✅ Rule moved from {} to {}", from + 1, to + 1);
    Ok(())
}

/// Show which of `urls` a pattern matches
pub fn test(pattern: &str, urls: &[String], format: OutputFormat) -> Result<()> {
    let matched = pattern::matching(pattern, urls)?;

    match format {
        OutputFormat::Json => print_json(&matched)?,
        OutputFormat::Table => {
            println!("URL,Matches");
            for url in urls {
                println!("{},{}", url, matched.contains(&url.as_str()));
            }
        }
        OutputFormat::Pretty => {
            use console::style;
            for url in urls {
                if matched.contains(&url.as_str()) {
                    println!("  {} {}", style("[match]").green(), url);
                } else {
                    println!("  {} {}", style("[no match]").dim(), url);
                }
            }
        }
    }
    Ok(())
}

/// Profiles only take effect for browsers launched with `--profile-directory`
fn check_profile_support(home: &Home, app: &Path) -> Result<()> {
    let app_id = home
        .installed_apps()?
        .app_id(app)
        .ok_or_else(|| anyhow!("{} is not installed, so no profile can be set for it", app.display()))?;

    if !family::is_multi_profile(&app_id) {
        return Err(anyhow!(
            "{} ({}) does not support profiles. Supported: {}",
            app.display(),
            app_id,
            BrowserFamily::ALL
                .iter()
                .flat_map(|f| f.app_ids().iter().copied())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    Ok(())
}

/// A profile by id: from the catalog first, then from the browsers on disk
fn find_profile(settings: &Settings, id: &str) -> Result<Profile> {
    if let Some(profile) = settings
        .catalog
        .iter()
        .filter_map(|entry| entry.profile())
        .find(|profile| profile.id == id)
    {
        return Ok(profile.clone());
    }

    let provider = ProfileProvider::for_current_user().context("Cannot look up browser profiles")?;
    BrowserFamily::ALL
        .into_iter()
        .flat_map(|family| provider.profiles(family))
        .find(|profile| profile.id == id)
        .ok_or_else(|| anyhow!("Profile '{}' not found. See 'handoff profiles'.", id))
}
