//! The handoff home directory: `settings.json` and `config.json`.

use crate::store::FileStore;
use anyhow::{Context, Result, anyhow};
use handoff_browser::{CatalogBuilder, InstalledApps, ProfileProvider, RescanGuard};
use handoff_core::settings::RescanSummary;
use handoff_core::{RouterConfig, Settings, SettingsKey};
use std::cell::OnceCell;
use std::path::{Path, PathBuf};

pub const DIR_NAME: &str = ".handoff";
const RESCAN_LOCK: &str = "rescan.lock";

pub struct Home {
    root: PathBuf,
    apps: OnceCell<InstalledApps>,
}

impl Home {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            apps: OnceCell::new(),
        }
    }

    /// Use `explicit` when given, `~/.handoff` otherwise
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        match explicit {
            Some(root) => Ok(Self::new(root)),
            None => {
                let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
                Ok(Self::new(home.join(DIR_NAME)))
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join("settings.json")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub fn config(&self) -> Result<RouterConfig> {
        let path = self.config_path();
        RouterConfig::load(&path).with_context(|| format!("Failed to read config {}", path.display()))
    }

    pub fn store(&self) -> Result<FileStore> {
        let path = self.settings_path();
        FileStore::open(&path).with_context(|| format!("Failed to open settings {}", path.display()))
    }

    /// Open the store and load the settings it holds
    pub fn load(&self) -> Result<(FileStore, Settings)> {
        let store = self.store()?;
        let settings = Settings::load(&store).context("Failed to load settings")?;
        Ok((store, settings))
    }

    /// Load the settings, building the catalog first if it was never built
    pub fn load_with_catalog(&self) -> Result<(FileStore, Settings)> {
        let (mut store, mut settings) = self.load()?;
        if settings.catalog.is_empty() {
            tracing::info!("No browsers known yet, scanning");
            self.rescan(&mut store, &mut settings)?;
        }
        Ok((store, settings))
    }

    /// The installed applications, scanned on first use and reused for the
    /// rest of the command
    pub fn installed_apps(&self) -> Result<&InstalledApps> {
        if let Some(apps) = self.apps.get() {
            return Ok(apps);
        }
        let apps = InstalledApps::for_current_user().context("Failed to scan installed applications")?;
        Ok(self.apps.get_or_init(|| apps))
    }

    /// Rebuild the catalog from the installed handlers and save the result.
    ///
    /// Holds the rescan lock from loading the settings until the merged
    /// result is saved, so `store` and `settings` are reloaded under it.
    pub fn rescan(&self, store: &mut FileStore, settings: &mut Settings) -> Result<RescanSummary> {
        let config = self.config()?;
        let profiles = ProfileProvider::for_current_user()?;
        let builder = CatalogBuilder::new(&config, &profiles);
        let apps = self.installed_apps()?;

        let mut guard = RescanGuard::open(self.root.join(RESCAN_LOCK)).context("Failed to open rescan lock")?;
        let permit = guard.acquire().context("Failed to take rescan lock")?;

        *store = self.store()?;
        *settings = Settings::load(store).context("Failed to load settings")?;
        let summary = permit.rescan(settings, &builder, apps);

        for key in [
            SettingsKey::Browsers,
            SettingsKey::HiddenBrowsers,
            SettingsKey::Shortcuts,
            SettingsKey::PrivateArgs,
        ] {
            settings.save_key(store, key)?;
        }
        Ok(summary)
    }
}
