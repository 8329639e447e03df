//! Builds the browser catalog from the handlers installed for `https`.

use crate::Result;
use crate::bundle::bundle_identifier;
use crate::profile::ProfileProvider;
use handoff_core::{AppResolver, BrowserFamily, Catalog, CatalogEntry, RouterConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// An installed application able to open `https` URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledApp {
    pub app_id: String,
    pub name: String,
    pub executable_path: PathBuf,
}

impl InstalledApp {
    pub fn new(app_id: impl Into<String>, name: impl Into<String>, executable_path: impl Into<PathBuf>) -> Self {
        Self {
            app_id: app_id.into(),
            name: name.into(),
            executable_path: executable_path.into(),
        }
    }
}

/// The system's registry of installed applications
pub trait HandlerSource {
    /// Take a snapshot of the installed applications, marking those
    /// registered for the `https` scheme
    fn scan(&self) -> Result<InstalledApps>;
}

/// A snapshot of the installed applications.
///
/// Scanned once per command and then queried as often as needed, both as the
/// catalog's input and as the [`AppResolver`] of the decision engine.
#[derive(Debug, Clone, Default)]
pub struct InstalledApps {
    handlers: Vec<InstalledApp>,
    others: Vec<InstalledApp>,
}

impl InstalledApps {
    pub fn new(handlers: Vec<InstalledApp>) -> Self {
        Self {
            handlers,
            others: Vec::new(),
        }
    }

    /// Add an installed app that is not registered for `https`
    pub fn with_app(mut self, app: InstalledApp) -> Self {
        self.others.push(app);
        self
    }

    /// Scan the application registry of this platform: app bundles on
    /// macOS, desktop entries elsewhere
    pub fn for_current_user() -> Result<Self> {
        #[cfg(target_os = "macos")]
        return crate::bundle::AppBundleSource::for_current_user().scan();

        #[cfg(not(target_os = "macos"))]
        return crate::desktop::DesktopEntrySource::for_current_user().scan();
    }

    /// Applications registered for the `https` scheme
    pub fn https_handlers(&self) -> &[InstalledApp] {
        &self.handlers
    }

    /// Look up an installed application by app id
    pub fn find_app(&self, app_id: &str) -> Option<&InstalledApp> {
        self.all().find(|app| app.app_id == app_id)
    }

    pub fn len(&self) -> usize {
        self.handlers.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn all(&self) -> impl Iterator<Item = &InstalledApp> {
        self.handlers.iter().chain(self.others.iter())
    }
}

impl AppResolver for InstalledApps {
    /// App id of the scanned application at `executable_path`. Paths the
    /// scan did not see still resolve while they exist: app bundles by their
    /// bundle identifier, plain executables by file name.
    fn app_id(&self, executable_path: &Path) -> Option<String> {
        if let Some(app) = self.all().find(|app| app.executable_path == executable_path) {
            return Some(app.app_id.clone());
        }

        if executable_path.is_dir() {
            return bundle_identifier(executable_path);
        }
        executable_path
            .is_file()
            .then(|| executable_path.file_name())
            .flatten()
            .map(|name| name.to_string_lossy().into_owned())
    }
}

/// Turns installed handlers into catalog entries, one per browser profile
pub struct CatalogBuilder<'a> {
    config: &'a RouterConfig,
    profiles: &'a ProfileProvider,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(config: &'a RouterConfig, profiles: &'a ProfileProvider) -> Self {
        Self { config, profiles }
    }

    pub fn build(&self, apps: &InstalledApps) -> Catalog {
        let handlers = apps.https_handlers();
        tracing::debug!("Found {} https handlers", handlers.len());

        let search_dirs = self.config.search_directories(self.profiles.home());
        let exclusions = self.config.exclusions();

        let mut browsers: Vec<InstalledApp> = handlers
            .iter()
            .filter(|app| {
                let searched = search_dirs.iter().any(|dir| app.executable_path.starts_with(dir));
                if !searched {
                    tracing::debug!("Skipping {} outside search directories", app.executable_path.display());
                }
                searched
            })
            .filter(|app| {
                let excluded = exclusions.contains(app.app_id.as_str());
                if excluded {
                    tracing::debug!("Excluding {}", app.app_id);
                }
                !excluded
            })
            .cloned()
            .collect();

        if let Some(fallback) = self.config.fallback_browser.as_deref() {
            if !browsers.iter().any(|app| app.app_id == fallback) {
                match apps.find_app(fallback) {
                    Some(app) => {
                        tracing::debug!("Adding fallback browser {}", fallback);
                        browsers.insert(0, app.clone());
                    }
                    None => tracing::debug!("Fallback browser {} is not installed", fallback),
                }
            }
        }

        let entries = browsers
            .iter()
            .flat_map(|app| self.expand(app))
            .collect::<Vec<_>>();

        let catalog = Catalog::dedup_entries(entries);
        tracing::info!("Catalog has {} entries", catalog.len());
        catalog
    }

    fn expand(&self, app: &InstalledApp) -> Vec<CatalogEntry> {
        let plain = || vec![CatalogEntry::new(app.executable_path.clone(), Some(app.app_id.clone()), None)];

        let Some(family) = BrowserFamily::from_app_id(&app.app_id) else {
            return plain();
        };
        if !self.config.expands_profiles(family) {
            return plain();
        }

        let profiles = self.profiles.profiles(family);
        if profiles.is_empty() {
            return plain();
        }

        profiles
            .into_iter()
            .map(|profile| {
                CatalogEntry::new(app.executable_path.clone(), Some(app.app_id.clone()), Some(profile))
            })
            .collect()
    }
}
