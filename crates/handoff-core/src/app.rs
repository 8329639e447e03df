use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Looks up which installed application lives at an executable path.
///
/// `None` means the application is not installed (any more) and must not be
/// launched.
pub trait AppResolver {
    fn app_id(&self, executable_path: &Path) -> Option<String>;

    fn is_installed(&self, executable_path: &Path) -> bool {
        self.app_id(executable_path).is_some()
    }
}

impl<T: AppResolver + ?Sized> AppResolver for &T {
    fn app_id(&self, executable_path: &Path) -> Option<String> {
        (**self).app_id(executable_path)
    }
}

impl AppResolver for HashMap<PathBuf, String> {
    fn app_id(&self, executable_path: &Path) -> Option<String> {
        self.get(executable_path).cloned()
    }
}
