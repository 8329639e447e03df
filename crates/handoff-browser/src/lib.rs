//! Everything that touches the installed system: handler discovery,
//! browser profiles and process launching.

pub mod bundle;
pub mod catalog;
pub mod desktop;
mod error;
pub mod launcher;
pub mod profile;
pub mod rescan;

pub use bundle::AppBundleSource;
pub use catalog::{CatalogBuilder, HandlerSource, InstalledApp, InstalledApps};
pub use desktop::{DesktopEntry, DesktopEntrySource};
pub use error::{Error, Result};
pub use launcher::{Launcher, ProcessLauncher, RecordingLauncher};
pub use profile::ProfileProvider;
pub use rescan::{RescanGuard, RescanPermit};
