//! # Conditional Rule Engine
//!
//! Evaluates `show` / `hide` / `goto` rules against a [`Scope`] (document
//! variables overlaid with runtime fields).
//!
//! - A condition on a missing field is false, except `empty`, which treats a
//!   missing field like `""`.
//! - A rule's conditions combine with AND; zero conditions always match.
//! - Inactive rules are ignored entirely.
//! - An element is hidden if any matching `hide` rule targets it, or if at
//!   least one `show` rule targets it and none of them match.
//! - The first matching `goto` in document order decides the redirect.

use crate::variables::Scope;
use funnel_model::{Condition, ConditionRule, Element, Operator, RuleType};
use std::collections::{BTreeSet, HashMap};

pub fn condition_matches(condition: &Condition, scope: &Scope) -> bool {
    let field = scope.get(condition.field.trim());

    match (condition.operator, field) {
        (Operator::Empty, None) => true,
        (Operator::Empty, Some(value)) => value.is_empty(),
        (_, None) => false,
        (Operator::Equals, Some(value)) => value == condition.value,
        (Operator::NotEquals, Some(value)) => value != condition.value,
        (Operator::Contains, Some(value)) => value.contains(condition.value.as_str()),
        (Operator::NotContains, Some(value)) => !value.contains(condition.value.as_str()),
        (Operator::NotEmpty, Some(value)) => !value.is_empty(),
    }
}

/// True if the rule is active and every condition holds
pub fn rule_matches(rule: &ConditionRule, scope: &Scope) -> bool {
    rule.is_active && rule.conditions.iter().all(|c| condition_matches(c, scope))
}

/// Result of evaluating every rule on a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOutcome {
    /// Element ids that must not be shown
    pub hidden: BTreeSet<String>,
    /// Target of the first matching `goto`
    pub redirect: Option<String>,
}

impl RuleOutcome {
    pub fn is_visible(&self, element_id: &str) -> bool {
        !self.hidden.contains(element_id)
    }
}

#[derive(Default)]
struct Visibility {
    hide_matched: bool,
    show_rules: usize,
    show_matched: bool,
}

/// Evaluate all active rules carried by `elements`
pub fn evaluate_rules(elements: &[Element], scope: &Scope) -> RuleOutcome {
    let mut targets: HashMap<&str, Visibility> = HashMap::new();
    let mut redirect = None;

    let rules = elements.iter().flat_map(|el| el.conditions.iter());
    for rule in rules.filter(|r| r.is_active) {
        let matched = rule_matches(rule, scope);

        match rule.rule_type {
            RuleType::Hide => {
                targets.entry(rule.target()).or_default().hide_matched |= matched;
            }
            RuleType::Show => {
                let state = targets.entry(rule.target()).or_default();
                state.show_rules += 1;
                state.show_matched |= matched;
            }
            RuleType::Goto => {
                if matched && redirect.is_none() {
                    match &rule.target_id {
                        Some(target) => redirect = Some(target.clone()),
                        None => tracing::warn!(rule = %rule.id, "goto rule has no target"),
                    }
                }
            }
        }
    }

    let hidden = targets
        .into_iter()
        .filter(|(_, v)| v.hide_matched || (v.show_rules > 0 && !v.show_matched))
        .map(|(id, _)| id.to_string())
        .collect();

    RuleOutcome { hidden, redirect }
}
