use crate::Result;
use crate::catalog::{CatalogBuilder, InstalledApps};
use handoff_core::Settings;
use handoff_core::settings::RescanSummary;
use std::fs::{self, File, OpenOptions};
use std::path::Path;

/// Serializes catalog rebuilds across processes.
///
/// The guard is an advisory lock on a file. While a [`RescanPermit`] is
/// alive no other process (or other guard on the same file) can take one, so
/// "load settings, rebuild the catalog, merge, save" never interleaves.
#[derive(Debug)]
pub struct RescanGuard {
    lock: fd_lock::RwLock<File>,
}

impl RescanGuard {
    /// Open (creating if needed) the lock file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)?;
        Ok(Self {
            lock: fd_lock::RwLock::new(file),
        })
    }

    /// Block until no other rescan is running
    pub fn acquire(&mut self) -> Result<RescanPermit<'_>> {
        let held = self.lock.write()?;
        tracing::debug!("Acquired rescan lock");
        Ok(RescanPermit { _held: held })
    }
}

/// Proof that the rescan lock is held
pub struct RescanPermit<'a> {
    _held: fd_lock::RwLockWriteGuard<'a, File>,
}

impl RescanPermit<'_> {
    /// Rebuild the catalog and carry per-browser settings over to it
    pub fn rescan(
        &self,
        settings: &mut Settings,
        builder: &CatalogBuilder<'_>,
        apps: &InstalledApps,
    ) -> RescanSummary {
        let catalog = builder.build(apps);
        settings.apply_rescan(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InstalledApp;
    use crate::profile::ProfileProvider;
    use handoff_core::{CatalogEntry, RouterConfig};
    use std::path::PathBuf;
    use std::sync::mpsc;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_rescan_keeps_live_state() {
        let home = TempDir::new().unwrap();
        let profiles = ProfileProvider::new(home.path().to_path_buf());
        let config = RouterConfig {
            search_directories: vec![PathBuf::from("/usr/bin")],
            fallback_browser: None,
            ..Default::default()
        };
        let builder = CatalogBuilder::new(&config, &profiles);
        let apps = InstalledApps::new(vec![InstalledApp::new("firefox", "Firefox", "/usr/bin/firefox")]);

        let mut settings = Settings::default();
        settings.catalog = handoff_core::Catalog::from_entries(vec![
            CatalogEntry::new("/usr/bin/firefox", Some("firefox".to_string()), None),
            CatalogEntry::new("/usr/bin/old-browser", Some("old-browser".to_string()), None),
        ])
        .unwrap();
        settings.hidden.insert("/usr/bin/old-browser");
        settings.shortcuts.insert("firefox".to_string(), "f".to_string());
        settings.shortcuts.insert("old-browser".to_string(), "o".to_string());
        settings.private_args.insert("firefox".to_string(), "--private-window".to_string());

        let mut guard = RescanGuard::open(home.path().join("rescan.lock")).unwrap();
        let summary = guard.acquire().unwrap().rescan(&mut settings, &builder, &apps);

        assert_eq!(summary.entries, 1);
        assert_eq!(summary.dropped_hidden, vec!["/usr/bin/old-browser"]);
        assert_eq!(summary.dropped_shortcuts, vec!["old-browser"]);
        assert!(summary.dropped_private_args.is_empty());
        assert_eq!(settings.catalog.len(), 1);
        assert!(settings.hidden.is_empty());
        assert_eq!(settings.shortcuts.get("firefox").map(String::as_str), Some("f"));
    }

    #[test]
    fn test_second_rescan_waits_for_first() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state/rescan.lock");

        let mut first = RescanGuard::open(&path).unwrap();
        let permit = first.acquire().unwrap();

        let (tx, rx) = mpsc::channel();
        let second_path = path.clone();
        let second = std::thread::spawn(move || {
            let mut guard = RescanGuard::open(&second_path).unwrap();
            let _permit = guard.acquire().unwrap();
            tx.send(()).unwrap();
        });

        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
        drop(permit);
        rx.recv_timeout(Duration::from_secs(10)).unwrap();
        second.join().unwrap();
    }
}
