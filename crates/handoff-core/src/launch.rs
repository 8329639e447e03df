//! Turns a resolved target into a process launch specification.

use crate::family;
use crate::model::{ResolvedTarget, Target};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use url::Url;

/// How to start (or reuse) a browser for a request.
///
/// Either the URLs travel as process `arguments` (and a new instance is
/// forced), or they are handed over in `urls_passed_directly` so the system
/// can reuse a running instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchSpec {
    pub executable_path: PathBuf,
    pub arguments: Vec<String>,
    pub force_new_instance: bool,
    pub urls_passed_directly: Vec<Url>,
}

impl LaunchSpec {
    /// Build the launch spec. A named profile always wins over incognito.
    pub fn build(
        target: &ResolvedTarget,
        incognito: bool,
        urls: &[Url],
        private_args: &BTreeMap<String, String>,
    ) -> Self {
        let url_args = urls.iter().map(|u| u.as_str().to_string());

        let spec = match &target.target {
            Target::Profiled {
                executable_path,
                profile,
            } if family::is_multi_profile(&target.app_id) => LaunchSpec {
                executable_path: executable_path.clone(),
                arguments: std::iter::once(format!("--profile-directory={}", profile.id))
                    .chain(url_args)
                    .collect(),
                force_new_instance: true,
                urls_passed_directly: Vec::new(),
            },
            other => match private_arg(private_args, &target.app_id).filter(|_| incognito) {
                Some(flag) => LaunchSpec {
                    executable_path: other.executable_path().to_path_buf(),
                    arguments: std::iter::once(flag.to_string()).chain(url_args).collect(),
                    force_new_instance: true,
                    urls_passed_directly: Vec::new(),
                },
                None => LaunchSpec {
                    executable_path: other.executable_path().to_path_buf(),
                    arguments: Vec::new(),
                    force_new_instance: false,
                    urls_passed_directly: urls.to_vec(),
                },
            },
        };

        if incognito && !spec.force_new_instance {
            tracing::debug!("No private argument configured for {}", target.app_id);
        }
        tracing::debug!(
            "Launch spec for {}: new instance {}, arguments {:?}",
            spec.executable_path.display(),
            spec.force_new_instance,
            spec.arguments
        );

        spec
    }
}

fn private_arg<'a>(private_args: &'a BTreeMap<String, String>, app_id: &str) -> Option<&'a str> {
    private_args
        .get(app_id)
        .map(|arg| arg.trim())
        .filter(|arg| !arg.is_empty())
}
