use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// A native application registered for one site, offered by the chooser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanionApp {
    pub host: String,
    pub app: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme_override: Option<String>,
}

impl CompanionApp {
    /// Apply the scheme override, if any. Nothing else about the URL changes.
    pub fn rewrite(&self, url: &Url) -> Url {
        let Some(scheme) = self.scheme_override.as_deref().filter(|s| !s.is_empty()) else {
            return url.clone();
        };

        // Url::set_scheme refuses special <-> non-special switches, so splice the string.
        let rest = &url.as_str()[url.scheme().len()..];
        match Url::parse(&format!("{}{}", scheme, rest)) {
            Ok(rewritten) => rewritten,
            Err(e) => {
                tracing::warn!("Cannot apply scheme '{}' to {}: {}", scheme, url, e);
                url.clone()
            }
        }
    }
}
