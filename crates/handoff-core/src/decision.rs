//! Match-and-resolve: picks the rule for an incoming URL and turns it into a
//! live target.
//!
//! Only the first URL of a request is matched; all URLs of the request travel
//! together to whatever that URL resolves to. Rules are tried in stored order,
//! patterns that do not compile are skipped, and the first match wins.

use crate::app::AppResolver;
use crate::family::BrowserFamily;
use crate::model::{Catalog, CatalogEntry, Profile, ResolvedTarget, Rule, Target};
use crate::pattern::PatternCache;
use crate::rules::RuleStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// What to do when a rule names a profile the current catalog no longer has
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleProfilePolicy {
    /// Launch with the profile stored in the rule
    #[default]
    UseStored,
    /// Treat the rule as not matching and hand over to the chooser
    NoMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Route {
        rule_index: usize,
        target: ResolvedTarget,
    },
    NoDecision {
        reason: NoDecisionReason,
    },
}

impl Decision {
    fn none(reason: NoDecisionReason) -> Self {
        Decision::NoDecision { reason }
    }

    pub fn target(&self) -> Option<&ResolvedTarget> {
        match self {
            Decision::Route { target, .. } => Some(target),
            Decision::NoDecision { .. } => None,
        }
    }

    pub fn is_route(&self) -> bool {
        matches!(self, Decision::Route { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoDecisionReason {
    NoUrls,
    NoMatchingRule,
    /// The matching rule points at an application that is not installed
    TargetMissing {
        rule_index: usize,
        executable_path: PathBuf,
    },
    /// The matching rule names a profile the catalog no longer has
    ProfileUnavailable { rule_index: usize, profile_id: String },
}

pub struct DecisionEngine<R> {
    resolver: R,
    policy: StaleProfilePolicy,
    patterns: PatternCache,
}

impl<R: AppResolver> DecisionEngine<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            policy: StaleProfilePolicy::default(),
            patterns: PatternCache::new(),
        }
    }

    pub fn with_policy(mut self, policy: StaleProfilePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Decide where a request carrying `urls` goes
    pub fn decide(&mut self, urls: &[Url], rules: &RuleStore, catalog: &Catalog) -> Decision {
        let Some(first) = urls.first() else {
            return Decision::none(NoDecisionReason::NoUrls);
        };
        let url = first.as_str();

        tracing::debug!("Checking {} rules against {}", rules.len(), url);

        for (index, rule) in rules.iter().enumerate() {
            let matched = match self.patterns.get(&rule.pattern) {
                Some(regex) => regex.is_match(url),
                None => {
                    tracing::debug!("Skipping rule {} with invalid pattern '{}'", index, rule.pattern);
                    continue;
                }
            };

            if !matched {
                tracing::debug!("Rule {} '{}' does not match", index, rule.pattern);
                continue;
            }

            tracing::info!("URL {} matches rule {} '{}'", url, index, rule.pattern);
            return self.resolve(index, rule, catalog);
        }

        tracing::info!("No rule matches {}", url);
        Decision::none(NoDecisionReason::NoMatchingRule)
    }

    fn resolve(&self, rule_index: usize, rule: &Rule, catalog: &Catalog) -> Decision {
        let Some(app_id) = self.resolver.app_id(&rule.target_executable_path) else {
            tracing::warn!(
                "Rule {} targets {} which is not installed",
                rule_index,
                rule.target_executable_path.display()
            );
            return Decision::none(NoDecisionReason::TargetMissing {
                rule_index,
                executable_path: rule.target_executable_path.clone(),
            });
        };

        if let (Some(family), Some(profile)) =
            (BrowserFamily::from_app_id(&app_id), rule.target_profile.as_ref())
        {
            match find_profile_entry(catalog, family, rule, profile) {
                Some(entry) => return self.route_to_entry(rule_index, entry),
                None => match self.policy {
                    StaleProfilePolicy::UseStored => {
                        tracing::info!(
                            "Profile '{}' not in catalog, using the profile stored in rule {}",
                            profile.id,
                            rule_index
                        );
                    }
                    StaleProfilePolicy::NoMatch => {
                        tracing::info!("Profile '{}' not in catalog, deferring to chooser", profile.id);
                        return Decision::none(NoDecisionReason::ProfileUnavailable {
                            rule_index,
                            profile_id: profile.id.clone(),
                        });
                    }
                },
            }
        }

        Decision::Route {
            rule_index,
            target: ResolvedTarget::new(app_id, Target::from(rule)),
        }
    }

    fn route_to_entry(&self, rule_index: usize, entry: &CatalogEntry) -> Decision {
        match self.resolver.app_id(entry.executable_path()) {
            Some(app_id) => {
                tracing::debug!("Re-hydrated profile '{}' from catalog", entry.identity());
                Decision::Route {
                    rule_index,
                    target: ResolvedTarget::new(app_id, Target::from(entry)),
                }
            }
            None => Decision::none(NoDecisionReason::TargetMissing {
                rule_index,
                executable_path: entry.executable_path().to_path_buf(),
            }),
        }
    }
}

fn find_profile_entry<'a>(
    catalog: &'a Catalog,
    family: BrowserFamily,
    rule: &Rule,
    profile: &Profile,
) -> Option<&'a CatalogEntry> {
    catalog.iter().find(|entry| {
        entry.profile().is_some()
            && entry.identity() == profile.id
            && (entry.app_id().and_then(BrowserFamily::from_app_id) == Some(family)
                || entry.executable_path() == rule.target_executable_path)
    })
}
