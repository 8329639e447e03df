use crate::{OutputFormat, print_json};
use anyhow::{Result, anyhow};
use handoff_browser::ProfileProvider;
use handoff_core::{BrowserFamily, Profile};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct FamilyProfiles {
    family: BrowserFamily,
    profiles: Vec<Profile>,
}

/// List the profiles Chromium-family browsers keep for the current user
pub fn execute(family: Option<&str>, format: OutputFormat) -> Result<()> {
    let families = match family {
        Some(name) => vec![
            BrowserFamily::from_name(name)
                .ok_or_else(|| anyhow!("Unknown browser family '{}' (expected chrome or edge)", name))?,
        ],
        None => BrowserFamily::ALL.to_vec(),
    };

    let provider = ProfileProvider::for_current_user()?;
    let found: Vec<FamilyProfiles> = families
        .into_iter()
        .map(|family| FamilyProfiles {
            family,
            profiles: provider.profiles(family),
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&found)?,
        OutputFormat::Table => {
            println!("Family,Id,Name,Path");
            for group in &found {
                for profile in &group.profiles {
                    println!(
                        "{},{},{},{}",
                        group.family,
                        profile.id,
                        profile.name,
                        profile.directory_path.display()
                    );
                }
            }
        }
        OutputFormat::Pretty => {
            use console::style;

            for group in &found {
                println!("{}", style(group.family.as_str()).bold());
                if group.profiles.is_empty() {
                    println!("  {}", style("No profiles found").dim());
                }
                for profile in &group.profiles {
                    println!("  {:<24} {}", profile.name, style(&profile.id).dim());
                }
            }
        }
    }
    Ok(())
}
