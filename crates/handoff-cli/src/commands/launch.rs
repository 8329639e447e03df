use crate::{Home, OutputFormat, print_json};
use anyhow::{Result, anyhow};
use handoff_browser::{Launcher, ProcessLauncher};
use handoff_core::chooser::select_entry;
use handoff_core::{AppResolver, LaunchSpec, ResolvedTarget, Settings, Target};
use url::Url;

pub fn execute(
    home: &Home,
    browser: &str,
    incognito: bool,
    dry_run: bool,
    urls: &[Url],
    format: OutputFormat,
) -> Result<()> {
    let (_store, settings) = home.load_with_catalog()?;
    let resolver = home.installed_apps()?;

    let spec = launch_spec(&settings, resolver, browser, incognito, urls)?;
    if !dry_run {
        ProcessLauncher::new().launch(&spec);
    }

    match format {
        OutputFormat::Json => print_json(&spec)?,
        OutputFormat::Table => {
            println!("Executable,New Instance,Arguments");
            println!(
                "{},{},{}",
                spec.executable_path.display(),
                spec.force_new_instance,
                spec.arguments.join(" ")
            );
        }
        OutputFormat::Pretty => {
            use console::style;
            let verb = if dry_run { "Would launch" } else { "Launched" };
            println!("{} {}", verb, style(spec.executable_path.display()).green());
            if !spec.arguments.is_empty() {
                println!("  Arguments: {}", spec.arguments.join(" "));
            }
        }
    }
    Ok(())
}

/// Launch spec for a browser the user picked by identity, position or
/// shortcut character
pub fn launch_spec(
    settings: &Settings,
    resolver: &impl AppResolver,
    browser: &str,
    incognito: bool,
    urls: &[Url],
) -> Result<LaunchSpec> {
    let entry = select_entry(&settings.catalog, &settings.shortcuts, browser)
        .ok_or_else(|| anyhow!("Browser '{}' not found. See 'handoff browsers list'.", browser))?;

    let app_id = entry
        .app_id()
        .map(str::to_string)
        .or_else(|| resolver.app_id(entry.executable_path()))
        .ok_or_else(|| anyhow!("{} is not installed", entry.executable_path().display()))?;

    let target = ResolvedTarget::new(app_id, Target::from(entry));
    Ok(LaunchSpec::build(&target, incognito, urls, &settings.private_args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use handoff_core::{Catalog, CatalogEntry, Profile};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn settings() -> Settings {
        let mut settings = Settings {
            catalog: Catalog::from_entries(vec![
                CatalogEntry::new("/usr/bin/firefox", Some("firefox".to_string()), None),
                CatalogEntry::new(
                    "/opt/google/chrome/chrome",
                    Some("google-chrome".to_string()),
                    Some(Profile::new("Default", "Personal", "/tmp/Default")),
                ),
                CatalogEntry::new("/usr/local/bin/surf", None, None),
            ])
            .unwrap(),
            ..Default::default()
        };
        settings.private_args.insert("firefox".to_string(), "--private-window".to_string());
        settings.shortcuts.insert("google-chrome_Default".to_string(), "p".to_string());
        settings
    }

    fn urls() -> Vec<Url> {
        vec![Url::parse("https://example.com/").unwrap()]
    }

    #[test]
    fn test_incognito_uses_private_argument() {
        let resolver: HashMap<PathBuf, String> = HashMap::new();
        let spec = launch_spec(&settings(), &resolver, "1", true, &urls()).unwrap();

        assert_eq!(spec.arguments, vec!["--private-window", "https://example.com/"]);
        assert!(spec.force_new_instance);
    }

    #[test]
    fn test_shortcut_selects_profile() {
        let resolver: HashMap<PathBuf, String> = HashMap::new();
        let spec = launch_spec(&settings(), &resolver, "P", true, &urls()).unwrap();

        assert_eq!(spec.arguments, vec!["--profile-directory=Default", "https://example.com/"]);
    }

    #[test]
    fn test_entry_without_app_id_needs_resolver() {
        let empty: HashMap<PathBuf, String> = HashMap::new();
        let err = launch_spec(&settings(), &empty, "/usr/local/bin/surf", false, &urls()).unwrap_err();
        assert!(err.to_string().contains("not installed"));

        let resolver = HashMap::from([(PathBuf::from("/usr/local/bin/surf"), "surf".to_string())]);
        let spec = launch_spec(&settings(), &resolver, "/usr/local/bin/surf", false, &urls()).unwrap();
        assert_eq!(spec.urls_passed_directly, urls());
    }

    #[test]
    fn test_unknown_browser() {
        let resolver: HashMap<PathBuf, String> = HashMap::new();
        let err = launch_spec(&settings(), &resolver, "netscape", false, &urls()).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
