#![deny(missing_docs)]
//! Policy engine for the axon control plane.
//!
//! [`PolicyEngine::validate`] is a pure function of the request and the
//! rule set its [`RuleSource`] currently serves: same inputs, same decision,
//! every time. That determinism is what makes audits reproducible. The
//! engine has no observable side effects — auditing the decision is the
//! dispatcher's job, not the engine's.
//!
//! Malformed requests (empty executor id, empty action, empty request id)
//! are denied with a descriptive reason before any rule runs. Silent
//! allow-by-default on malformed input is the failure mode this engine
//! exists to rule out.

use plane0::{PolicyDecision, Request, RuleAction, RuleSet, RuleSource};
use std::sync::{Arc, RwLock};

/// Evaluates requests against the rule set served by a [`RuleSource`].
pub struct PolicyEngine {
    rules: Arc<dyn RuleSource>,
}

impl PolicyEngine {
    /// Engine over the given rule source.
    pub fn new(rules: Arc<dyn RuleSource>) -> Self {
        Self { rules }
    }

    /// Engine over a fixed allow-all rule set. Useful for tests and for
    /// deployments that gate purely on health.
    pub fn allow_all() -> Self {
        Self::new(Arc::new(StaticRules::new(RuleSet::allow_all())))
    }

    /// Evaluate one request.
    ///
    /// Shape checks run first; then rules apply first-match-wins in
    /// declaration order; the rule set's default action covers the rest.
    pub fn validate(&self, request: &Request) -> PolicyDecision {
        if request.executor.is_empty() {
            return PolicyDecision::deny("request has an empty executor id");
        }
        if request.action.is_empty() {
            return PolicyDecision::deny("request has an empty action");
        }
        if request.request_id.is_empty() {
            return PolicyDecision::deny("request has an empty request id");
        }

        let rules = self.rules.current_rules();
        for rule in &rules.rules {
            if rule.matcher.matches(request) {
                return decision_for(&rule.action, &rule.name);
            }
        }
        decision_for(&rules.default_action, "default")
    }
}

fn decision_for(action: &RuleAction, rule_name: &str) -> PolicyDecision {
    match action {
        RuleAction::Allow => PolicyDecision::Allow,
        RuleAction::Deny { reason } => {
            PolicyDecision::deny(format!("{reason} (rule: {rule_name})"))
        }
    }
}

/// Rule source serving a fixed rule set.
pub struct StaticRules {
    rules: RuleSet,
}

impl StaticRules {
    /// Serve `rules` forever.
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }
}

impl RuleSource for StaticRules {
    fn current_rules(&self) -> RuleSet {
        self.rules.clone()
    }
}

/// Rule source that can be swapped at runtime.
///
/// Cloneable handle over an `RwLock`'d rule set; replacing the rules takes
/// the write lock briefly, evaluation paths only ever read. Suits a config
/// watcher or an admin endpoint feeding rule reloads.
#[derive(Clone)]
pub struct SharedRules {
    inner: Arc<RwLock<RuleSet>>,
}

impl SharedRules {
    /// Start with the given rule set.
    pub fn new(rules: RuleSet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(rules)),
        }
    }

    /// Replace the rule set in force.
    pub fn replace(&self, rules: RuleSet) {
        *self.inner.write().expect("rule lock poisoned") = rules;
    }
}

impl RuleSource for SharedRules {
    fn current_rules(&self) -> RuleSet {
        self.inner.read().expect("rule lock poisoned").clone()
    }
}
