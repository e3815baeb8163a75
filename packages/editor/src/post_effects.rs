//! # Post-Effect System
//!
//! Mutations can trigger follow-up mutations that keep the page consistent.
//! Effects run after the primary mutation has been applied and see the page
//! as it is afterwards.
//!
//! Current effects:
//! - Removing an element deactivates every rule that names it as source or
//!   target, so no rule is left pointing at nothing.
//! - Replacing an element's rules deactivates any new rule whose target is
//!   not on the page (`goto` targets are steps, not elements, and are left
//!   alone).

use crate::mutations::{Mutation, MutationError, PageContent};
use funnel_model::RuleType;
use tracing::debug;

/// Post-effect that can be triggered by a mutation
pub trait PostEffect: std::fmt::Debug + Send + Sync {
    /// Inspect the applied mutation and return follow-up mutations
    fn analyze(&self, mutation: &Mutation, page: &PageContent) -> Vec<Mutation>;
}

/// Deactivate rules referencing a removed element
#[derive(Debug)]
pub struct DeactivateRulesOfRemoved;

impl PostEffect for DeactivateRulesOfRemoved {
    fn analyze(&self, mutation: &Mutation, page: &PageContent) -> Vec<Mutation> {
        let Mutation::RemoveElement { id } = mutation else {
            return vec![];
        };

        page.rules()
            .filter(|(_, rule)| rule.is_active && rule.references(id))
            .map(|(element_id, rule)| Mutation::DeactivateRule {
                element_id: element_id.to_string(),
                rule_id: rule.id.clone(),
            })
            .collect()
    }
}

/// Deactivate freshly set rules whose target element does not exist
#[derive(Debug)]
pub struct DeactivateDanglingTargets;

impl PostEffect for DeactivateDanglingTargets {
    fn analyze(&self, mutation: &Mutation, page: &PageContent) -> Vec<Mutation> {
        let Mutation::SetConditions { id, rules } = mutation else {
            return vec![];
        };

        rules
            .iter()
            .filter(|rule| rule.is_active && rule.rule_type != RuleType::Goto)
            .filter(|rule| match &rule.target_id {
                Some(target) => page.index_of(target).is_none(),
                None => false,
            })
            .map(|rule| Mutation::DeactivateRule {
                element_id: id.clone(),
                rule_id: rule.id.clone(),
            })
            .collect()
    }
}

/// Post-effect engine that applies all registered effects
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new() -> Self {
        Self {
            effects: vec![
                Box::new(DeactivateRulesOfRemoved),
                Box::new(DeactivateDanglingTargets),
            ],
        }
    }

    /// Engine with no effects
    pub fn empty() -> Self {
        Self { effects: vec![] }
    }

    pub fn register(&mut self, effect: Box<dyn PostEffect>) {
        self.effects.push(effect);
    }

    /// Analyze a mutation and generate all secondary mutations
    pub fn analyze(&self, mutation: &Mutation, page: &PageContent) -> Vec<Mutation> {
        let mut secondary_mutations = Vec::new();

        for effect in &self.effects {
            let mut effect_mutations = effect.analyze(mutation, page);
            secondary_mutations.append(&mut effect_mutations);
        }

        secondary_mutations
    }

    /// Apply a mutation with all its post-effects.
    ///
    /// Returns whether anything changed and the secondary mutations applied.
    pub fn apply_with_effects(
        &self,
        mutation: &Mutation,
        page: &mut PageContent,
    ) -> Result<(bool, Vec<Mutation>), MutationError> {
        let changed = mutation.apply(page)?;
        if !changed {
            return Ok((false, vec![]));
        }

        let secondary = self.analyze(mutation, page);
        for secondary_mutation in &secondary {
            secondary_mutation.apply(page)?;
        }

        if !secondary.is_empty() {
            debug!(
                mutation = mutation.name(),
                effects = secondary.len(),
                "Applied post-effects"
            );
        }

        Ok((true, secondary))
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funnel_model::{ConditionRule, Element, ElementType};

    fn page_with_rule() -> PageContent {
        PageContent {
            elements: vec![
                Element::text("form-1", ElementType::Text, "form").with_condition(
                    ConditionRule::new("r1", "form-1", RuleType::Show).with_target("offer-1"),
                ),
                Element::text("offer-1", ElementType::Text, "offer"),
            ],
            variables: vec![],
        }
    }

    #[test]
    fn test_engine_creation() {
        let engine = PostEffectEngine::new();
        assert_eq!(engine.effects.len(), 2);
    }

    #[test]
    fn test_removing_target_deactivates_rule() {
        let mut page = page_with_rule();
        let engine = PostEffectEngine::new();

        let (changed, secondary) = engine
            .apply_with_effects(&Mutation::RemoveElement { id: "offer-1".into() }, &mut page)
            .unwrap();

        assert!(changed);
        assert_eq!(secondary.len(), 1);
        assert!(!page.elements[0].conditions[0].is_active);
    }

    #[test]
    fn test_unrelated_mutation_has_no_effects() {
        let page = page_with_rule();
        let engine = PostEffectEngine::new();
        let mutation = Mutation::MoveElement {
            id: "offer-1".into(),
            direction: crate::mutations::Direction::Up,
        };

        assert!(engine.analyze(&mutation, &page).is_empty());
    }

    #[test]
    fn test_set_conditions_with_missing_target() {
        let mut page = page_with_rule();
        let engine = PostEffectEngine::new();
        let rules = vec![
            ConditionRule::new("r2", "form-1", RuleType::Hide).with_target("ghost"),
            ConditionRule::new("r3", "form-1", RuleType::Goto).with_target("step-2"),
        ];

        engine
            .apply_with_effects(
                &Mutation::SetConditions {
                    id: "form-1".into(),
                    rules,
                },
                &mut page,
            )
            .unwrap();

        let rules = &page.elements[0].conditions;
        assert!(!rules[0].is_active);
        assert!(rules[1].is_active);
    }

    #[test]
    fn test_noop_skips_effects() {
        let mut page = page_with_rule();
        let engine = PostEffectEngine::new();

        let (changed, secondary) = engine
            .apply_with_effects(&Mutation::RemoveElement { id: "ghost".into() }, &mut page)
            .unwrap();
        assert!(!changed);
        assert!(secondary.is_empty());
    }
}
