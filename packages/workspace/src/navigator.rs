//! Runtime navigation between funnel steps.
//!
//! Buttons and forms carry symbolic actions (`next_page`, `previous_page`,
//! `url`); `goto` rules name a step document id. Both resolve by position in
//! the funnel's step list.

use funnel_model::{Element, Funnel};
use tracing::warn;

/// Where an action leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Step(usize),
    External(String),
    /// No movement (first/last step, unknown action or target)
    Stay,
}

#[derive(Debug, Clone, Copy)]
pub struct Navigator<'a> {
    funnel: &'a Funnel,
}

impl<'a> Navigator<'a> {
    pub fn new(funnel: &'a Funnel) -> Self {
        Self { funnel }
    }

    pub fn resolve_action(&self, current: usize, action: &str, url: Option<&str>) -> Destination {
        match action {
            "next_page" if current + 1 < self.funnel.steps.len() => Destination::Step(current + 1),
            "previous_page" if current > 0 && current <= self.funnel.steps.len() => {
                Destination::Step(current - 1)
            }
            "url" => match url {
                Some(url) if !url.is_empty() && url != "#" => Destination::External(url.to_string()),
                _ => Destination::Stay,
            },
            "next_page" | "previous_page" => Destination::Stay,
            other => {
                warn!(action = other, "Unknown navigation action");
                Destination::Stay
            }
        }
    }

    /// Destination of clicking `element` (a button or form submit) on step `current`
    pub fn resolve_element(&self, current: usize, element: &Element) -> Destination {
        let action = element.prop_str("action").unwrap_or("next_page");
        self.resolve_action(current, action, element.prop_str("url"))
    }

    /// Destination of a matching `goto` rule
    pub fn resolve_goto(&self, target: &str) -> Destination {
        match self.funnel.step_index(target) {
            Some(index) => Destination::Step(index),
            None => {
                warn!(target, funnel_id = %self.funnel.id, "Goto target is not a step");
                Destination::Stay
            }
        }
    }
}
