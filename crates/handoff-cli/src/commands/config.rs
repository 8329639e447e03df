use crate::{Home, OutputFormat, print_json};
use anyhow::{Context, Result, anyhow};
use handoff_core::RouterConfig;

pub fn show(home: &Home, format: OutputFormat) -> Result<()> {
    let config = home.config()?;

    match format {
        OutputFormat::Json => print_json(&config)?,
        OutputFormat::Table => {
            println!("Key,Value");
            for dir in &config.search_directories {
                println!("search_directory,{}", dir.display());
            }
            for app in &config.excluded_apps {
                println!("excluded_app,{}", app);
            }
            println!(
                "fallback_browser,{}",
                config.fallback_browser.as_deref().unwrap_or("")
            );
            for family in &config.profile_families {
                println!("profile_family,{}", family);
            }
            println!("stale_profile_policy,{:?}", config.stale_profile_policy);
        }
        OutputFormat::Pretty => {
            use console::style;

            let path = home.config_path();
            let source = if path.exists() { "" } else { " (defaults)" };
            println!("{}{}", style(path.display()).bold(), source);
            println!("\n{}", style("Search directories").bold());
            for dir in &config.search_directories {
                println!("  {}", dir.display());
            }
            println!("\n{}", style("Excluded apps").bold());
            let mut excluded: Vec<&str> = config.exclusions().into_iter().collect();
            excluded.sort_unstable();
            for app in excluded {
                println!("  {}", app);
            }
            println!("\n{}", style("Browsers").bold());
            println!(
                "  Fallback:        {}",
                config.fallback_browser.as_deref().unwrap_or("none")
            );
            let families: Vec<&str> = config.profile_families.iter().map(|f| f.as_str()).collect();
            println!("  Profiles from:   {}", families.join(", "));
            println!("  Stale profiles:  {:?}", config.stale_profile_policy);
        }
    }
    Ok(())
}

pub fn init(home: &Home, force: bool) -> Result<()> {
    let path = home.config_path();
    if path.exists() && !force {
        return Err(anyhow!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        ));
    }

    RouterConfig::default()
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("✅ Wrote {}", path.display());
    Ok(())
}
