pub mod apps;
pub mod browsers;
pub mod choose;
pub mod completion;
pub mod config;
pub mod launch;
pub mod open;
pub mod profiles;
pub mod rules;
pub mod settings;

use anyhow::{Result, anyhow};

/// Convert a 1-based position typed by the user into an index
pub(crate) fn position(value: usize) -> Result<usize> {
    value
        .checked_sub(1)
        .ok_or_else(|| anyhow!("Positions start at 1"))
}
