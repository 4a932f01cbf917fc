//! Ordered rule table with first-match resolution.

use crate::attrs::{self, AttrSource, Attrs, merge_sources};
use crate::debug;
use crate::error::Result;
use crate::rule::Rule;

/// Outcome of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Position of the matching rule in registration order.
    pub index: usize,
    pub ext: Option<String>,
    /// Built path, trailing `/` removed.
    pub raw: String,
    pub pretty: Option<bool>,
}

/// Rules in registration order. The first matching rule wins.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a rule.
    ///
    /// A rule whose signature is already covered by an earlier one is still
    /// registered; it just never matches.
    pub fn register(&mut self, rule: Rule) -> Result<()> {
        rule.validate()?;
        if let Some(earlier) = self.rules.iter().position(|r| r.shadows(&rule)) {
            debug!("route"; "rule #{} `{}` is shadowed by rule #{}", self.rules.len(), rule, earlier);
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Chainable [`RuleTable::register`].
    pub fn with(mut self, rule: Rule) -> Result<Self> {
        self.register(rule)?;
        Ok(self)
    }

    /// First rule matching `attrs`.
    pub fn find(&self, attrs: &Attrs) -> Option<(usize, &Rule)> {
        self.rules.iter().enumerate().find(|(_, rule)| rule.matches(attrs))
    }

    /// Resolve an attribute set. `Ok(None)` means no rule applies.
    pub fn resolve(&self, attrs: &Attrs) -> Result<Option<Resolved>> {
        let Some((index, rule)) = self.find(attrs) else {
            debug!("route"; "no rule for {}", attrs::describe(attrs));
            return Ok(None);
        };
        let raw = rule.construct(attrs)?;
        Ok(Some(Resolved {
            index,
            ext: rule.extension().map(str::to_string),
            raw,
            pretty: rule.pretty_override(),
        }))
    }

    /// Merge layered sources, then [`RuleTable::resolve`].
    pub fn resolve_sources(&self, sources: &[AttrSource<'_>]) -> Result<Option<Resolved>> {
        let attrs = merge_sources(sources)?;
        self.resolve(&attrs)
    }

    /// Indices of rules that can never match, each with the index of the
    /// earlier rule that claims its signature.
    pub fn shadowed(&self) -> Vec<(usize, usize)> {
        self.rules
            .iter()
            .enumerate()
            .filter_map(|(i, rule)| {
                self.rules[..i]
                    .iter()
                    .position(|earlier| earlier.shadows(rule))
                    .map(|earlier| (i, earlier))
            })
            .collect()
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
}
