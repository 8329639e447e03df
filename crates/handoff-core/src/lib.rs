pub mod app;
pub mod chooser;
pub mod config;
pub mod decision;
pub mod error;
pub mod family;
pub mod launch;
pub mod model;
pub mod pattern;
pub mod rules;
pub mod settings;

pub use app::AppResolver;
pub use config::RouterConfig;
pub use decision::{Decision, DecisionEngine, NoDecisionReason, StaleProfilePolicy};
pub use error::{Error, Result};
pub use family::BrowserFamily;
pub use launch::LaunchSpec;
pub use model::{Catalog, CatalogEntry, CompanionApp, Profile, ResolvedTarget, Rule, Target};
pub use rules::RuleStore;
pub use settings::{HiddenSet, Settings, SettingsKey, SettingsStore};
