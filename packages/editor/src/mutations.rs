//! # Page Mutations
//!
//! Every change to a page goes through a [`Mutation`]. Mutations validate
//! first, then apply; a failed validation leaves the page untouched.
//!
//! ## Mutation Semantics
//!
//! ### AddElement / InsertElement
//! - Rejects an id already present on the page
//! - Rejects content whose shape does not match the element type
//! - Insert index is clamped to the page length
//!
//! ### UpdateElement
//! - `content` replaces, `props` merge key by key (`null` removes a key)
//! - New content must match the element type
//! - Unknown id is a no-op
//!
//! ### RemoveElement
//! - Unknown id is a no-op
//! - Rules pointing at the removed element are deactivated by a post-effect
//!
//! ### MoveElement
//! - Swaps with the neighbour in the given direction
//! - No-op at the edges

use funnel_model::{ConditionRule, Content, Element, Props, Variable};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Ordered page state mutations operate on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContent {
    pub elements: Vec<Element>,
    pub variables: Vec<Variable>,
}

impl PageContent {
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|el| el.id == id)
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| el.id == id)
    }

    /// Every rule on the page, with the id of the element carrying it
    pub fn rules(&self) -> impl Iterator<Item = (&str, &ConditionRule)> {
        self.elements
            .iter()
            .flat_map(|el| el.conditions.iter().map(move |r| (el.id.as_str(), r)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Partial update of an element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub content: Option<Content>,
    pub props: Option<Props>,
}

impl ElementPatch {
    pub fn content(content: Content) -> Self {
        Self {
            content: Some(content),
            props: None,
        }
    }

    pub fn props(props: Props) -> Self {
        Self {
            content: None,
            props: Some(props),
        }
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props
            .get_or_insert_with(Props::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Semantic page operations
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Append an element
    AddElement { element: Element },

    /// Insert an element at a position (drops)
    InsertElement { index: usize, element: Element },

    /// Replace content and/or merge props
    UpdateElement { id: String, patch: ElementPatch },

    /// Remove an element from the page
    RemoveElement { id: String },

    /// Swap an element with its neighbour
    MoveElement { id: String, direction: Direction },

    AddVariable { name: String, value: String },

    UpdateVariable {
        index: usize,
        name: String,
        value: String,
    },

    RemoveVariable { index: usize },

    /// Replace an element's rules
    SetConditions {
        id: String,
        rules: Vec<ConditionRule>,
    },

    /// Mark one rule inactive (generated by post-effects)
    DeactivateRule { element_id: String, rule_id: String },
}

/// Mutation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Duplicate element id: {0}")]
    DuplicateId(String),

    #[error("Variable index {index} out of range (page has {len})")]
    VariableIndexOutOfRange { index: usize, len: usize },

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Content of element {id} does not match its type {element_type}")]
    ContentMismatch { id: String, element_type: String },

    #[error("Variable name must not be empty")]
    EmptyVariableName,

    #[error("Rule {rule_id} has source {source_id} but is stored on {element_id}")]
    RuleSourceMismatch {
        rule_id: String,
        source_id: String,
        element_id: String,
    },
}

impl Mutation {
    /// Check the mutation can be applied
    pub fn validate(&self, page: &PageContent) -> Result<(), MutationError> {
        match self {
            Mutation::AddElement { element } | Mutation::InsertElement { element, .. } => {
                if page.index_of(&element.id).is_some() {
                    return Err(MutationError::DuplicateId(element.id.clone()));
                }
                check_content(element, &element.content)
            }

            Mutation::UpdateElement { id, patch } => {
                match (page.element(id), &patch.content) {
                    (Some(element), Some(content)) => check_content(element, content),
                    _ => Ok(()),
                }
            }

            Mutation::AddVariable { name, .. } => {
                if name.trim().is_empty() {
                    return Err(MutationError::EmptyVariableName);
                }
                Ok(())
            }

            Mutation::UpdateVariable { index, name, .. } => {
                check_variable_index(page, *index)?;
                if name.trim().is_empty() {
                    return Err(MutationError::EmptyVariableName);
                }
                Ok(())
            }

            Mutation::RemoveVariable { index } => check_variable_index(page, *index),

            Mutation::SetConditions { id, rules } => {
                if page.index_of(id).is_none() {
                    return Err(MutationError::ElementNotFound(id.clone()));
                }
                if let Some(rule) = rules.iter().find(|r| &r.source_id != id) {
                    return Err(MutationError::RuleSourceMismatch {
                        rule_id: rule.id.clone(),
                        source_id: rule.source_id.clone(),
                        element_id: id.clone(),
                    });
                }
                Ok(())
            }

            // Stale ids are tolerated and become no-ops
            Mutation::RemoveElement { .. }
            | Mutation::MoveElement { .. }
            | Mutation::DeactivateRule { .. } => Ok(()),
        }
    }

    /// Apply to the page. Returns `false` when the mutation was a no-op.
    pub fn apply(&self, page: &mut PageContent) -> Result<bool, MutationError> {
        self.validate(page)?;

        let changed = match self {
            Mutation::AddElement { element } => {
                page.elements.push(element.clone());
                true
            }

            Mutation::InsertElement { index, element } => {
                let index = (*index).min(page.elements.len());
                page.elements.insert(index, element.clone());
                true
            }

            Mutation::UpdateElement { id, patch } => Self::apply_update(page, id, patch),

            Mutation::RemoveElement { id } => match page.index_of(id) {
                Some(index) => {
                    page.elements.remove(index);
                    true
                }
                None => {
                    warn!(element_id = %id, "Remove of unknown element ignored");
                    false
                }
            },

            Mutation::MoveElement { id, direction } => Self::apply_move(page, id, *direction),

            Mutation::AddVariable { name, value } => {
                page.variables.push(Variable::new(name.trim(), value.clone()));
                true
            }

            Mutation::UpdateVariable { index, name, value } => {
                page.variables[*index] = Variable::new(name.trim(), value.clone());
                true
            }

            Mutation::RemoveVariable { index } => {
                page.variables.remove(*index);
                true
            }

            Mutation::SetConditions { id, rules } => match page.element_mut(id) {
                Some(element) => {
                    element.conditions = rules.clone();
                    true
                }
                None => false,
            },

            Mutation::DeactivateRule {
                element_id,
                rule_id,
            } => {
                let rule = page
                    .element_mut(element_id)
                    .and_then(|el| el.conditions.iter_mut().find(|r| &r.id == rule_id));
                match rule {
                    Some(rule) if rule.is_active => {
                        rule.is_active = false;
                        true
                    }
                    _ => false,
                }
            }
        };

        Ok(changed)
    }

    fn apply_update(page: &mut PageContent, id: &str, patch: &ElementPatch) -> bool {
        let Some(element) = page.element_mut(id) else {
            warn!(element_id = %id, "Update of unknown element ignored");
            return false;
        };

        if let Some(content) = &patch.content {
            element.content = content.clone();
        }

        if let Some(props) = &patch.props {
            for (key, value) in props {
                if value.is_null() {
                    element.props.remove(key);
                } else {
                    element.props.insert(key.clone(), value.clone());
                }
            }
        }

        true
    }

    fn apply_move(page: &mut PageContent, id: &str, direction: Direction) -> bool {
        let Some(index) = page.index_of(id) else {
            warn!(element_id = %id, "Move of unknown element ignored");
            return false;
        };

        let neighbour = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < page.elements.len() => index + 1,
            _ => return false,
        };

        page.elements.swap(index, neighbour);
        true
    }

    /// Element id this mutation targets, if any
    pub fn element_id(&self) -> Option<&str> {
        match self {
            Mutation::AddElement { element } | Mutation::InsertElement { element, .. } => {
                Some(&element.id)
            }
            Mutation::UpdateElement { id, .. }
            | Mutation::RemoveElement { id }
            | Mutation::MoveElement { id, .. }
            | Mutation::SetConditions { id, .. } => Some(id),
            Mutation::DeactivateRule { element_id, .. } => Some(element_id),
            Mutation::AddVariable { .. }
            | Mutation::UpdateVariable { .. }
            | Mutation::RemoveVariable { .. } => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddElement { .. } => "add_element",
            Mutation::InsertElement { .. } => "insert_element",
            Mutation::UpdateElement { .. } => "update_element",
            Mutation::RemoveElement { .. } => "remove_element",
            Mutation::MoveElement { .. } => "move_element",
            Mutation::AddVariable { .. } => "add_variable",
            Mutation::UpdateVariable { .. } => "update_variable",
            Mutation::RemoveVariable { .. } => "remove_variable",
            Mutation::SetConditions { .. } => "set_conditions",
            Mutation::DeactivateRule { .. } => "deactivate_rule",
        }
    }
}

fn check_variable_index(page: &PageContent, index: usize) -> Result<(), MutationError> {
    if index >= page.variables.len() {
        return Err(MutationError::VariableIndexOutOfRange {
            index,
            len: page.variables.len(),
        });
    }
    Ok(())
}

fn check_content(element: &Element, content: &Content) -> Result<(), MutationError> {
    if content.fits(&element.element_type) {
        return Ok(());
    }
    Err(MutationError::ContentMismatch {
        id: element.id.clone(),
        element_type: element.element_type.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use funnel_model::{BlockPayload, ElementType, FaqContent, HeroContent, RuleType};
    use serde_json::json;

    fn page(ids: &[&str]) -> PageContent {
        PageContent {
            elements: ids
                .iter()
                .map(|id| Element::text(*id, ElementType::Text, *id))
                .collect(),
            variables: Vec::new(),
        }
    }

    fn ids(page: &PageContent) -> Vec<&str> {
        page.elements.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let mut p = page(&["a"]);
        let err = Mutation::AddElement {
            element: Element::text("a", ElementType::Text, "again"),
        }
        .apply(&mut p)
        .unwrap_err();

        assert_eq!(err, MutationError::DuplicateId("a".into()));
        assert_eq!(p.elements.len(), 1);
    }

    #[test]
    fn test_insert_index_is_clamped() {
        let mut p = page(&["a", "b"]);
        Mutation::InsertElement {
            index: 99,
            element: Element::text("c", ElementType::Text, ""),
        }
        .apply(&mut p)
        .unwrap();
        Mutation::InsertElement {
            index: 0,
            element: Element::text("z", ElementType::Text, ""),
        }
        .apply(&mut p)
        .unwrap();

        assert_eq!(ids(&p), vec!["z", "a", "b", "c"]);
    }

    #[test]
    fn test_update_merges_props_and_null_removes() {
        let mut p = page(&["a"]);
        p.elements[0].props.insert("keep".into(), json!(1));
        p.elements[0].props.insert("drop".into(), json!(2));

        let patch = ElementPatch::content(Content::Text("new".into()))
            .with_prop("drop", Value::Null)
            .with_prop("add", "x");
        let changed = Mutation::UpdateElement {
            id: "a".into(),
            patch,
        }
        .apply(&mut p)
        .unwrap();

        assert!(changed);
        let el = &p.elements[0];
        assert_eq!(el.content.as_text(), Some("new"));
        assert_eq!(el.props.get("keep"), Some(&json!(1)));
        assert_eq!(el.props.get("add"), Some(&json!("x")));
        assert!(!el.props.contains_key("drop"));
    }

    #[test]
    fn test_content_must_match_element_type() {
        let mut p = page(&["a"]);
        p.elements.push(Element::new(
            "hero",
            ElementType::Hero,
            Content::Block(BlockPayload::Hero(HeroContent::default())),
        ));
        let before = p.clone();

        let text_on_hero = Mutation::UpdateElement {
            id: "hero".into(),
            patch: ElementPatch::content(Content::Text("plain".into())),
        };
        let faq_on_hero = Mutation::UpdateElement {
            id: "hero".into(),
            patch: ElementPatch::content(Content::Block(BlockPayload::Faq(FaqContent::default()))),
        };
        let hero_on_text = Mutation::AddElement {
            element: Element::new(
                "b",
                ElementType::Text,
                Content::Block(BlockPayload::Hero(HeroContent::default())),
            ),
        };

        for mutation in [text_on_hero, faq_on_hero, hero_on_text] {
            assert!(matches!(
                mutation.apply(&mut p),
                Err(MutationError::ContentMismatch { .. })
            ));
        }
        assert_eq!(p, before);
    }

    #[test]
    fn test_stale_ids_are_noops() {
        let mut p = page(&["a"]);
        let before = p.clone();

        let update = Mutation::UpdateElement {
            id: "ghost".into(),
            patch: ElementPatch::content(Content::Text("x".into())),
        };
        assert!(!update.apply(&mut p).unwrap());
        assert!(!Mutation::RemoveElement { id: "ghost".into() }.apply(&mut p).unwrap());
        assert_eq!(p, before);
    }

    #[test]
    fn test_move_edges_are_noops() {
        let mut p = page(&["a", "b", "c"]);

        let up_first = Mutation::MoveElement {
            id: "a".into(),
            direction: Direction::Up,
        };
        let down_last = Mutation::MoveElement {
            id: "c".into(),
            direction: Direction::Down,
        };
        assert!(!up_first.apply(&mut p).unwrap());
        assert!(!down_last.apply(&mut p).unwrap());
        assert_eq!(ids(&p), vec!["a", "b", "c"]);

        Mutation::MoveElement {
            id: "b".into(),
            direction: Direction::Down,
        }
        .apply(&mut p)
        .unwrap();
        assert_eq!(ids(&p), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_variable_index_checks() {
        let mut p = page(&[]);
        Mutation::AddVariable {
            name: " plan ".into(),
            value: "basic".into(),
        }
        .apply(&mut p)
        .unwrap();
        assert_eq!(p.variables[0].name, "plan");

        let err = Mutation::UpdateVariable {
            index: 3,
            name: "x".into(),
            value: "y".into(),
        }
        .apply(&mut p)
        .unwrap_err();
        assert_eq!(err, MutationError::VariableIndexOutOfRange { index: 3, len: 1 });

        Mutation::RemoveVariable { index: 0 }.apply(&mut p).unwrap();
        assert!(p.variables.is_empty());
    }

    #[test]
    fn test_set_conditions_requires_matching_source() {
        let mut p = page(&["a"]);
        let bad = Mutation::SetConditions {
            id: "a".into(),
            rules: vec![ConditionRule::new("r", "b", RuleType::Hide)],
        };
        assert!(matches!(
            bad.apply(&mut p),
            Err(MutationError::RuleSourceMismatch { .. })
        ));

        let good = Mutation::SetConditions {
            id: "a".into(),
            rules: vec![ConditionRule::new("r", "a", RuleType::Hide)],
        };
        assert!(good.apply(&mut p).unwrap());
        assert_eq!(p.elements[0].conditions.len(), 1);
    }
}
