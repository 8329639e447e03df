//! Ordered rule collection. Position is priority: the first matching rule wins.

use crate::model::Rule;
use crate::{Error, Result, pattern};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuleStore {
    rules: Vec<Rule>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    /// Add a rule with the lowest priority
    pub fn append(&mut self, rule: Rule) {
        tracing::debug!("Appending rule '{}'", rule.pattern);
        self.rules.push(rule);
    }

    /// Replace the rule at `index`, keeping its position
    pub fn update(&mut self, index: usize, rule: Rule) -> Result<()> {
        self.check_index(index)?;
        tracing::debug!("Updating rule {}: '{}'", index, rule.pattern);
        self.rules[index] = rule;
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Rule> {
        self.check_index(index)?;
        Ok(self.rules.remove(index))
    }

    /// Remove the first rule equal to `rule`. Returns false if none was found.
    pub fn remove_rule(&mut self, rule: &Rule) -> bool {
        match self.rules.iter().position(|r| r == rule) {
            Some(index) => {
                self.rules.remove(index);
                true
            }
            None => false,
        }
    }

    /// Move the rule at `from` to `to`, shifting the rules in between
    pub fn move_rule(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        let rule = self.rules.remove(from);
        self.rules.insert(to, rule);
        Ok(())
    }

    /// Rules whose pattern does not compile, with the compile error
    pub fn validate(&self) -> Vec<(usize, Error)> {
        self.rules
            .iter()
            .enumerate()
            .filter_map(|(index, rule)| pattern::compile(&rule.pattern).err().map(|e| (index, e)))
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.rules.len() {
            return Err(Error::RuleIndex {
                index,
                len: self.rules.len(),
            });
        }
        Ok(())
    }
}

impl From<Vec<Rule>> for RuleStore {
    fn from(rules: Vec<Rule>) -> Self {
        Self::from_rules(rules)
    }
}
