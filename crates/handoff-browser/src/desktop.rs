//! Handler discovery from freedesktop desktop entries.

use crate::Result;
use crate::catalog::{HandlerSource, InstalledApp, InstalledApps};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const HTTPS_HANDLER: &str = "x-scheme-handler/https";
const FLATPAK_EXPORTS: &str = "/var/lib/flatpak/exports/bin";

lazy_static! {
    static ref ENTRY_LINE: Regex =
        Regex::new(r"^([A-Za-z0-9-]+)(\[[^\]]+\])?\s*=\s*(.*)$").unwrap();
}

/// The `[Desktop Entry]` group of a `.desktop` file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesktopEntry {
    pub name: Option<String>,
    pub exec: Option<String>,
    pub mime_types: Vec<String>,
    pub hidden: bool,
    pub no_display: bool,
    pub flatpak_id: Option<String>,
}

impl DesktopEntry {
    pub fn handles_https(&self) -> bool {
        self.mime_types.iter().any(|m| m == HTTPS_HANDLER)
    }

    /// Program named by `Exec=`, without arguments or field codes
    pub fn program(&self) -> Option<String> {
        let exec = self.exec.as_deref()?;
        split_exec(exec)
            .into_iter()
            .find(|token| token != "env" && !is_env_assignment(token))
    }
}

/// Parse the `[Desktop Entry]` group. `None` when the file has no such
/// group or describes something other than an application.
pub fn parse_desktop_entry(content: &str) -> Option<DesktopEntry> {
    let mut entry = DesktopEntry::default();
    let mut in_group = false;
    let mut found = false;
    let mut is_application = true;

    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') {
            in_group = line == "[Desktop Entry]";
            found |= in_group;
            continue;
        }
        if !in_group {
            continue;
        }
        let Some(caps) = ENTRY_LINE.captures(line) else {
            continue;
        };
        // Localized values
        if caps.get(2).is_some() {
            continue;
        }
        let value = caps[3].trim().to_string();
        match &caps[1] {
            "Type" => is_application = value == "Application",
            "Name" => entry.name = Some(value),
            "Exec" => entry.exec = Some(value),
            "MimeType" => {
                entry.mime_types = value
                    .split(';')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            "Hidden" => entry.hidden = value == "true",
            "NoDisplay" => entry.no_display = value == "true",
            "X-Flatpak" => entry.flatpak_id = Some(value),
            _ => {}
        }
    }

    (found && is_application).then_some(entry)
}

/// Split an `Exec=` value into tokens, honouring double quotes and dropping
/// `%u`-style field codes
fn split_exec(exec: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut escaped = false;
    let mut has_token = false;

    for c in exec.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' if quoted => escaped = true,
            '"' => {
                quoted = !quoted;
                has_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if has_token || !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => current.push(c),
        }
    }
    if has_token || !current.is_empty() {
        tokens.push(current);
    }

    tokens
        .into_iter()
        .filter(|t| !(t.len() == 2 && t.starts_with('%')))
        .collect()
}

fn is_env_assignment(token: &str) -> bool {
    token
        .split_once('=')
        .is_some_and(|(name, _)| !name.is_empty() && !name.contains('/'))
}

/// Finds URL handlers by scanning `applications/` directories.
///
/// Directories are searched in order; the first file for a desktop id wins,
/// as in the XDG lookup rules.
pub struct DesktopEntrySource {
    dirs: Vec<PathBuf>,
}

impl DesktopEntrySource {
    /// Scan the given `applications/` directories
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Scan the standard XDG data directories of the current user
    pub fn for_current_user() -> Self {
        Self::new(Self::default_dirs())
    }

    fn default_dirs() -> Vec<PathBuf> {
        let mut data_dirs = Vec::new();
        if let Some(data_home) = dirs::data_dir() {
            data_dirs.push(data_home.join("flatpak/exports/share"));
            data_dirs.push(data_home);
        }

        let system = std::env::var("XDG_DATA_DIRS")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
        data_dirs.extend(system.split(':').filter(|d| !d.is_empty()).map(PathBuf::from));
        data_dirs.push(PathBuf::from("/var/lib/flatpak/exports/share"));

        data_dirs.dedup();
        data_dirs.into_iter().map(|d| d.join("applications")).collect()
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl HandlerSource for DesktopEntrySource {
    fn scan(&self) -> Result<InstalledApps> {
        let mut seen = HashSet::new();
        let mut handlers = Vec::new();
        let mut others = Vec::new();

        for dir in &self.dirs {
            if !dir.is_dir() {
                continue;
            }
            tracing::debug!("Scanning desktop entries in {}", dir.display());

            let pattern = format!("{}/**/*.desktop", glob::Pattern::escape(&dir.to_string_lossy()));
            for path in glob::glob(&pattern)?.flatten() {
                let Some(id) = desktop_id(dir, &path) else {
                    continue;
                };
                if !seen.insert(id.clone()) {
                    continue;
                }

                let content = match std::fs::read_to_string(&path) {
                    Ok(content) => content,
                    Err(e) => {
                        tracing::debug!("Cannot read {}: {}", path.display(), e);
                        continue;
                    }
                };
                let Some(entry) = parse_desktop_entry(&content) else {
                    continue;
                };
                if entry.hidden || entry.no_display {
                    continue;
                }
                let Some(executable_path) = resolve_program(&entry) else {
                    tracing::debug!("No executable for {}", path.display());
                    continue;
                };

                let name = entry.name.clone().unwrap_or_else(|| id.clone());
                let app = InstalledApp::new(id, name, executable_path);
                if entry.handles_https() {
                    handlers.push(app);
                } else {
                    others.push(app);
                }
            }
        }

        tracing::debug!("Found {} desktop applications", handlers.len() + others.len());
        Ok(others
            .into_iter()
            .fold(InstalledApps::new(handlers), InstalledApps::with_app))
    }
}

/// `applications/foo/bar.desktop` has desktop id `foo-bar`
fn desktop_id(dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(dir).ok()?;
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("-");
    joined.strip_suffix(".desktop").map(str::to_string)
}

fn resolve_program(entry: &DesktopEntry) -> Option<PathBuf> {
    let program = entry.program()?;

    let is_flatpak = Path::new(&program).file_name().is_some_and(|n| n == "flatpak");
    if is_flatpak {
        if let Some(id) = &entry.flatpak_id {
            let exported = Path::new(FLATPAK_EXPORTS).join(id);
            return exported.exists().then_some(exported);
        }
    }

    let path = Path::new(&program);
    if path.is_absolute() {
        return path.exists().then(|| path.to_path_buf());
    }
    which::which(&program).ok()
}
