use crate::{Error, Result};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

const UNSUPPORTED_SYNTAX: &str =
    "rule patterns have no look-around or backreferences; match the wider text instead";

/// Compile a rule pattern. Matching is case-insensitive and unanchored.
pub fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| {
            let mut reason = e.to_string();
            if reason.contains("not supported") {
                reason.push_str("\nnote: ");
                reason.push_str(UNSUPPORTED_SYNTAX);
            }
            Error::InvalidPattern {
                pattern: pattern.to_string(),
                reason,
            }
        })
}

/// Return the sample URLs the pattern matches, in input order
pub fn matching<'a>(pattern: &str, urls: &'a [String]) -> Result<Vec<&'a str>> {
    let regex = compile(pattern)?;
    Ok(urls
        .iter()
        .map(String::as_str)
        .filter(|url| regex.is_match(url))
        .collect())
}

/// Compiled patterns keyed by pattern text. Failures are cached too.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: HashMap<String, Option<Regex>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The compiled pattern, or `None` if it does not compile
    pub fn get(&mut self, pattern: &str) -> Option<&Regex> {
        self.compiled
            .entry(pattern.to_string())
            .or_insert_with(|| match compile(pattern) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    tracing::warn!("Skipping rule: {}", e);
                    None
                }
            })
            .as_ref()
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}
