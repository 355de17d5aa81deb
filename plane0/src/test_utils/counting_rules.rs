//! Counting rule source — asserts whether the policy engine was consulted.

use crate::policy::{RuleSet, RuleSource};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A [`RuleSource`] that counts how many times its rules were fetched.
///
/// The policy engine fetches the rule set once per validation, so the count
/// doubles as a "was policy ever consulted" probe in short-circuit tests.
pub struct CountingRules {
    rules: RuleSet,
    fetches: AtomicUsize,
}

impl CountingRules {
    /// Serve the given rule set.
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Serve an allow-all rule set.
    pub fn allow_all() -> Self {
        Self::new(RuleSet::allow_all())
    }

    /// How many times the rule set was fetched.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl RuleSource for CountingRules {
    fn current_rules(&self) -> RuleSet {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.rules.clone()
    }
}
