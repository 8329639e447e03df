//! `handoff open`: the entry point the desktop hands links to.

use crate::{Home, OutputFormat, print_json};
use anyhow::Result;
use handoff_browser::{Launcher, ProcessLauncher};
use handoff_core::{
    AppResolver, Decision, DecisionEngine, LaunchSpec, NoDecisionReason, RouterConfig, Settings,
};
use serde::Serialize;
use url::Url;

#[derive(Debug, Serialize)]
pub struct OpenOutcome {
    pub decision: Decision,
    pub launch: Option<LaunchSpec>,
    pub dry_run: bool,
}

pub fn execute(home: &Home, urls: &[Url], dry_run: bool, format: OutputFormat) -> Result<()> {
    tracing::info!("Opening {} URL(s)", urls.len());

    let config = home.config()?;
    let (_store, settings) = home.load_with_catalog()?;
    let resolver = home.installed_apps()?;

    let outcome = route(&settings, &config, resolver, urls, dry_run);
    if !dry_run {
        dispatch(&outcome, &ProcessLauncher::new());
    }

    match format {
        OutputFormat::Json => print_json(&outcome)?,
        OutputFormat::Table => output_table(&outcome),
        OutputFormat::Pretty => output_pretty(&outcome, &settings, urls),
    }
    Ok(())
}

/// Decide where `urls` go and how the target is started
pub fn route(
    settings: &Settings,
    config: &RouterConfig,
    resolver: impl AppResolver,
    urls: &[Url],
    dry_run: bool,
) -> OpenOutcome {
    let mut engine = DecisionEngine::new(resolver).with_policy(config.stale_profile_policy);
    let decision = engine.decide(urls, &settings.rules, &settings.catalog);

    let launch = decision
        .target()
        .map(|target| LaunchSpec::build(target, false, urls, &settings.private_args));

    OpenOutcome {
        decision,
        launch,
        dry_run,
    }
}

/// Start the routed target, if there is one
pub fn dispatch(outcome: &OpenOutcome, launcher: &impl Launcher) {
    if let Some(spec) = &outcome.launch {
        launcher.launch(spec);
    }
}

pub fn describe(reason: &NoDecisionReason) -> String {
    match reason {
        NoDecisionReason::NoUrls => "no URLs given".to_string(),
        NoDecisionReason::NoMatchingRule => "no rule matches".to_string(),
        NoDecisionReason::TargetMissing {
            rule_index,
            executable_path,
        } => format!(
            "rule {} matches but {} is not installed",
            rule_index + 1,
            executable_path.display()
        ),
        NoDecisionReason::ProfileUnavailable {
            rule_index,
            profile_id,
        } => format!(
            "rule {} matches but profile '{}' is no longer available",
            rule_index + 1,
            profile_id
        ),
    }
}

fn output_pretty(outcome: &OpenOutcome, settings: &Settings, urls: &[Url]) {
    use console::style;

    match &outcome.decision {
        Decision::Route { rule_index, target } => {
            let verb = if outcome.dry_run { "Would open" } else { "Opened" };
            let profile = target
                .target
                .profile()
                .map(|p| format!(" ({})", p.name))
                .unwrap_or_default();
            println!(
                "{} with {}{} {}",
                verb,
                style(target.target.executable_path().display()).green(),
                profile,
                style(format!("[rule {}]", rule_index + 1)).dim()
            );
            if let Some(spec) = &outcome.launch {
                if !spec.arguments.is_empty() {
                    println!("  Arguments: {}", spec.arguments.join(" "));
                }
            }
        }
        Decision::NoDecision { reason } => {
            println!("{}", style(format!("No browser chosen: {}", describe(reason))).yellow());
            println!();
            super::choose::output_pretty(&super::choose::choices(settings, urls), urls);
        }
    }
}

fn output_table(outcome: &OpenOutcome) {
    println!("Decision,Rule,Executable,Profile,Arguments");
    match &outcome.decision {
        Decision::Route { rule_index, target } => println!(
            "route,{},{},{},{}",
            rule_index + 1,
            target.target.executable_path().display(),
            target.target.profile().map(|p| p.id.as_str()).unwrap_or(""),
            outcome
                .launch
                .as_ref()
                .map(|spec| spec.arguments.join(" "))
                .unwrap_or_default()
        ),
        Decision::NoDecision { reason } => println!("none,,,,{}", describe(reason)),
    }
}
