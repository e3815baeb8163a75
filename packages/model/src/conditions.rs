//! Conditional rule data model.
//!
//! Rules are stored on the element that owns them (`source_id`). Evaluation
//! lives in the evaluator; this module only describes the shape.

use serde::{Deserialize, Serialize};

/// Effect of a matching rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Show,
    Hide,
    Goto,
}

/// Comparison operator for a single condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    Empty,
    NotEmpty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: String,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Show/hide/goto rule attached to an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRule {
    pub id: String,
    pub source_id: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl ConditionRule {
    pub fn new(id: impl Into<String>, source_id: impl Into<String>, rule_type: RuleType) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            rule_type,
            conditions: Vec::new(),
            target_id: None,
            is_active: true,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_target(mut self, target_id: impl Into<String>) -> Self {
        self.target_id = Some(target_id.into());
        self
    }

    /// Element (or step, for `goto`) the rule acts on
    pub fn target(&self) -> &str {
        self.target_id.as_deref().unwrap_or(&self.source_id)
    }

    /// True if the rule names `element_id` as its source or target
    pub fn references(&self, element_id: &str) -> bool {
        self.source_id == element_id || self.target_id.as_deref() == Some(element_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let json = r#"{
            "id": "r1",
            "sourceId": "form-1",
            "type": "show",
            "conditions": [{"field": "plan", "operator": "equals", "value": "premium"}],
            "targetId": "offer-1",
            "isActive": true
        }"#;

        let rule: ConditionRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.rule_type, RuleType::Show);
        assert_eq!(rule.conditions[0].operator, Operator::Equals);
        assert_eq!(rule.target(), "offer-1");

        let out = serde_json::to_string(&rule).unwrap();
        assert!(out.contains("\"sourceId\":\"form-1\""));
        assert!(out.contains("\"isActive\":true"));
    }

    #[test]
    fn test_target_falls_back_to_source() {
        let rule = ConditionRule::new("r", "el-1", RuleType::Hide);
        assert_eq!(rule.target(), "el-1");
        assert!(rule.references("el-1"));
        assert!(!rule.references("el-2"));
    }

    #[test]
    fn test_missing_is_active_defaults_true() {
        let rule: ConditionRule =
            serde_json::from_str(r#"{"id":"r","sourceId":"s","type":"goto","targetId":"t"}"#).unwrap();
        assert!(rule.is_active);
        assert!(rule.conditions.is_empty());
    }
}
