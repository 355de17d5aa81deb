//! Policy vocabulary — rules, rule sets, decisions, and the rule source
//! boundary.
//!
//! The types live here so the policy engine, the dispatcher, and whatever
//! loads rules (static config, a hot-reloaded file, an admin API) all share
//! one vocabulary without depending on each other.

use crate::priority::Priority;
use crate::request::Request;
use serde::{Deserialize, Serialize};

/// Outcome of evaluating one request against the current rule set.
///
/// Computed fresh per request and never persisted beyond the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum PolicyDecision {
    /// The request may proceed to dispatch.
    Allow,
    /// The request is denied.
    Deny {
        /// Why the request was denied; carried into the audit trail.
        reason: String,
    },
}

impl PolicyDecision {
    /// Deny with a reason.
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny {
            reason: reason.into(),
        }
    }

    /// Whether the decision permits dispatch.
    pub fn is_allowed(&self) -> bool {
        matches!(self, PolicyDecision::Allow)
    }

    /// The denial reason, if denied.
    pub fn reason(&self) -> Option<&str> {
        match self {
            PolicyDecision::Allow => None,
            PolicyDecision::Deny { reason } => Some(reason),
        }
    }
}

/// What a matching rule does to the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RuleAction {
    /// Permit the request.
    Allow,
    /// Deny the request with a reason.
    Deny {
        /// Why matching requests are denied.
        reason: String,
    },
}

/// Match criteria for one rule. A `None` field matches anything.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMatch {
    /// Exact executor id to match, or `None` for any executor.
    pub executor: Option<String>,
    /// Exact action name to match, or `None` for any action.
    pub action: Option<String>,
    /// Match only requests at or above this tier, or `None` for any tier.
    pub min_priority: Option<Priority>,
}

impl RuleMatch {
    /// Matcher that matches every request.
    pub fn any() -> Self {
        Self::default()
    }

    /// Restrict to one executor id.
    pub fn executor(mut self, id: impl Into<String>) -> Self {
        self.executor = Some(id.into());
        self
    }

    /// Restrict to one action name.
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Restrict to requests at or above a tier.
    pub fn min_priority(mut self, p: Priority) -> Self {
        self.min_priority = Some(p);
        self
    }

    /// Whether this matcher applies to the request.
    pub fn matches(&self, request: &Request) -> bool {
        if let Some(executor) = &self.executor {
            if executor != request.executor.as_str() {
                return false;
            }
        }
        if let Some(action) = &self.action {
            if action != &request.action {
                return false;
            }
        }
        if let Some(min) = self.min_priority {
            if request.priority < min {
                return false;
            }
        }
        true
    }
}

/// One named authorization/safety rule.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Stable rule name for audits and diagnostics.
    pub name: String,
    /// What the rule matches.
    pub matcher: RuleMatch,
    /// What happens when it matches.
    pub action: RuleAction,
}

impl Rule {
    /// An allow rule.
    pub fn allow(name: impl Into<String>, matcher: RuleMatch) -> Self {
        Self {
            name: name.into(),
            matcher,
            action: RuleAction::Allow,
        }
    }

    /// A deny rule with a reason.
    pub fn deny(name: impl Into<String>, matcher: RuleMatch, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matcher,
            action: RuleAction::Deny {
                reason: reason.into(),
            },
        }
    }
}

/// An ordered rule set plus the action taken when no rule matches.
///
/// Evaluation is first-matching-rule-wins in declaration order, which keeps
/// decisions deterministic for reproducible audits. A default of
/// [`RuleAction::Allow`] with explicit deny rules gives deny-listing;
/// flipping the default to a deny gives allow-listing.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Rules in evaluation order.
    pub rules: Vec<Rule>,
    /// Action when no rule matches.
    pub default_action: RuleAction,
}

impl RuleSet {
    /// Empty rule set that allows everything.
    pub fn allow_all() -> Self {
        Self {
            rules: vec![],
            default_action: RuleAction::Allow,
        }
    }

    /// Empty rule set that denies everything with the given reason.
    pub fn deny_all(reason: impl Into<String>) -> Self {
        Self {
            rules: vec![],
            default_action: RuleAction::Deny {
                reason: reason.into(),
            },
        }
    }

    /// Append a rule, keeping declaration order.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::allow_all()
    }
}

/// Supplies the rule set the policy engine evaluates.
///
/// May be static configuration or a dynamically reloaded source; the engine
/// only ever asks for the current snapshot.
pub trait RuleSource: Send + Sync {
    /// The rule set in force right now.
    fn current_rules(&self) -> RuleSet;
}
