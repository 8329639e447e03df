//! Handler discovery from macOS application bundles.

use crate::Result;
use crate::catalog::{HandlerSource, InstalledApp, InstalledApps};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The keys of `Contents/Info.plist` handoff cares about
#[derive(Debug, Default, Deserialize)]
pub struct BundleInfo {
    #[serde(rename = "CFBundleIdentifier")]
    pub identifier: Option<String>,
    #[serde(rename = "CFBundleDisplayName")]
    pub display_name: Option<String>,
    #[serde(rename = "CFBundleName")]
    pub name: Option<String>,
    #[serde(rename = "CFBundleURLTypes", default)]
    pub url_types: Vec<UrlType>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UrlType {
    #[serde(rename = "CFBundleURLSchemes", default)]
    pub schemes: Vec<String>,
}

impl BundleInfo {
    pub fn handles_https(&self) -> bool {
        self.url_types
            .iter()
            .flat_map(|t| t.schemes.iter())
            .any(|scheme| scheme.eq_ignore_ascii_case("https"))
    }
}

/// Read `Contents/Info.plist` of the bundle at `bundle`, XML or binary
pub fn read_bundle_info(bundle: &Path) -> Option<BundleInfo> {
    let plist = bundle.join("Contents/Info.plist");
    if !plist.is_file() {
        return None;
    }
    match plist::from_file::<_, BundleInfo>(&plist) {
        Ok(info) => Some(info),
        Err(e) => {
            tracing::debug!("Cannot read {}: {}", plist.display(), e);
            None
        }
    }
}

/// `CFBundleIdentifier` of the bundle at `bundle`
pub fn bundle_identifier(bundle: &Path) -> Option<String> {
    read_bundle_info(bundle)?.identifier
}

/// Finds URL handlers among the `.app` bundles of the application folders.
///
/// Bundles directly inside a folder and one level below (`Utilities/`,
/// vendor folders) are considered. The first bundle with a given identifier
/// wins.
pub struct AppBundleSource {
    dirs: Vec<PathBuf>,
}

impl AppBundleSource {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// `/Applications`, `~/Applications` and `/System/Applications`
    pub fn for_current_user() -> Self {
        let mut folders = vec![PathBuf::from("/Applications")];
        if let Some(home) = dirs::home_dir() {
            folders.push(home.join("Applications"));
        }
        folders.push(PathBuf::from("/System/Applications"));
        Self::new(folders)
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl HandlerSource for AppBundleSource {
    fn scan(&self) -> Result<InstalledApps> {
        let mut seen = HashSet::new();
        let mut handlers = Vec::new();
        let mut others = Vec::new();

        for dir in &self.dirs {
            if !dir.is_dir() {
                continue;
            }
            tracing::debug!("Scanning app bundles in {}", dir.display());

            let root = glob::Pattern::escape(&dir.to_string_lossy());
            for pattern in [format!("{}/*.app", root), format!("{}/*/*.app", root)] {
                for bundle in glob::glob(&pattern)?.flatten() {
                    let Some(info) = read_bundle_info(&bundle) else {
                        continue;
                    };
                    let Some(id) = info.identifier.clone() else {
                        tracing::debug!("No bundle identifier in {}", bundle.display());
                        continue;
                    };
                    if !seen.insert(id.clone()) {
                        continue;
                    }

                    let name = info
                        .display_name
                        .clone()
                        .or_else(|| info.name.clone())
                        .or_else(|| bundle.file_stem().map(|s| s.to_string_lossy().into_owned()))
                        .unwrap_or_else(|| id.clone());
                    let app = InstalledApp::new(id, name, bundle);
                    if info.handles_https() {
                        handlers.push(app);
                    } else {
                        others.push(app);
                    }
                }
            }
        }

        tracing::debug!("Found {} app bundles", handlers.len() + others.len());
        Ok(others
            .into_iter()
            .fold(InstalledApps::new(handlers), InstalledApps::with_app))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use handoff_core::AppResolver;
    use std::fs;
    use tempfile::TempDir;

    pub(crate) fn write_bundle(bundle: &Path, id: &str, name: &str, schemes: &[&str]) {
        let schemes: String = schemes
            .iter()
            .map(|s| format!("<string>{}</string>", s))
            .collect();
        let plist = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>CFBundleIdentifier</key>
    <string>{id}</string>
    <key>CFBundleName</key>
    <string>{name}</string>
    <key>CFBundleURLTypes</key>
    <array>
        <dict>
            <key>CFBundleURLName</key>
            <string>Web site URL</string>
            <key>CFBundleURLSchemes</key>
            <array>{schemes}</array>
        </dict>
    </array>
</dict>
</plist>
"#
        );
        let contents = bundle.join("Contents");
        fs::create_dir_all(&contents).unwrap();
        fs::write(contents.join("Info.plist"), plist).unwrap();
    }

    #[test]
    fn test_scan_splits_handlers_from_other_apps() {
        let temp = TempDir::new().unwrap();
        let apps_dir = temp.path().join("Applications");
        write_bundle(&apps_dir.join("Safari.app"), "com.apple.Safari", "Safari", &["http", "https"]);
        write_bundle(&apps_dir.join("Mail.app"), "com.apple.mail", "Mail", &["mailto"]);
        write_bundle(
            &apps_dir.join("Utilities/Browser.app"),
            "org.example.Browser",
            "Browser",
            &["HTTPS"],
        );
        fs::create_dir_all(apps_dir.join("Broken.app")).unwrap();

        let apps = AppBundleSource::new(vec![apps_dir.clone(), temp.path().join("missing")])
            .scan()
            .unwrap();

        let handlers: Vec<&str> = apps.https_handlers().iter().map(|a| a.app_id.as_str()).collect();
        assert_eq!(handlers, vec!["com.apple.Safari", "org.example.Browser"]);
        assert_eq!(apps.len(), 3);

        let safari = apps.find_app("com.apple.Safari").unwrap();
        assert_eq!(safari.name, "Safari");
        assert_eq!(safari.executable_path, apps_dir.join("Safari.app"));
        assert_eq!(
            apps.app_id(&apps_dir.join("Mail.app")).as_deref(),
            Some("com.apple.mail")
        );
    }

    #[test]
    fn test_first_folder_wins() {
        let temp = TempDir::new().unwrap();
        let system = temp.path().join("system");
        let user = temp.path().join("user");
        write_bundle(&system.join("Safari.app"), "com.apple.Safari", "Safari", &["https"]);
        write_bundle(&user.join("Safari Copy.app"), "com.apple.Safari", "Safari", &["https"]);

        let apps = AppBundleSource::new(vec![system.clone(), user]).scan().unwrap();
        assert_eq!(apps.https_handlers().len(), 1);
        assert_eq!(apps.https_handlers()[0].executable_path, system.join("Safari.app"));
    }

    #[test]
    fn test_unreadable_plist_is_skipped() {
        let temp = TempDir::new().unwrap();
        let bundle = temp.path().join("Odd.app");
        fs::create_dir_all(bundle.join("Contents")).unwrap();
        fs::write(bundle.join("Contents/Info.plist"), "not a plist").unwrap();

        assert!(read_bundle_info(&bundle).is_none());
        assert_eq!(bundle_identifier(&bundle), None);
    }
}
