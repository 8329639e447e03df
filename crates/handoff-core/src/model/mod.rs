mod catalog;
mod companion;
mod profile;
mod rule;
mod target;

pub use catalog::{Catalog, CatalogEntry};
pub use companion::CompanionApp;
pub use profile::Profile;
pub use rule::Rule;
pub use target::{ResolvedTarget, Target};
