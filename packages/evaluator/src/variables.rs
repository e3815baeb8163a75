//! # Variable Substitution
//!
//! `{{name}}` tokens in text are replaced by variable values. Whitespace
//! inside the braces is ignored, so `{{ name }}` and `{{name}}` resolve the
//! same variable.
//!
//! Resolution rules:
//! - the last-listed variable with a given name wins;
//! - unmatched tokens are left exactly as written;
//! - substituted values are never re-scanned, so a value containing
//!   `{{other}}` comes out literally.

use funnel_model::Variable;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

// Name is anything but braces; trimmed after capture
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]*)\}\}").expect("valid token pattern"));

/// Name → value lookup used for substitution and rule evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    values: BTreeMap<String, String>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an ordered variable list; later entries override earlier ones
    pub fn from_variables(variables: &[Variable]) -> Self {
        let values = variables
            .iter()
            .map(|v| (v.name.trim().to_string(), v.value.clone()))
            .collect();
        Self { values }
    }

    /// Overlay runtime fields (form answers, query parameters)
    pub fn with_fields<'a>(mut self, fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        for (name, value) in fields {
            self.values.insert(name.to_string(), value.to_string());
        }
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace every resolvable `{{name}}` token in `text`
    pub fn substitute(&self, text: &str) -> String {
        if !text.contains("{{") {
            return text.to_string();
        }

        TOKEN
            .replace_all(text, |caps: &Captures| {
                let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
                match self.get(name) {
                    Some(value) => value.to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

/// Substitute `{{name}}` tokens using an ordered variable list
pub fn substitute(text: &str, variables: &[Variable]) -> String {
    Scope::from_variables(variables).substitute(text)
}
