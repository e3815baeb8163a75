//! # Funnel Evaluator
//!
//! Evaluates a page (ordered elements plus variables and runtime fields) to
//! a virtual DOM.
//!
//! ```text
//! Vec<Element> + Scope ─→ conditions::evaluate_rules ─→ hidden set / redirect
//!                    └──→ renderer::Renderer ─────────→ VirtualDomDocument
//! ```
//!
//! ## Determinism
//!
//! For the same elements, scope and [`RenderOptions`] (including `now`),
//! rendering produces identical output. Attribute and style maps are ordered,
//! and the only clock read is the `now` passed in by the caller.

mod blocks;
pub mod conditions;
pub mod device;
pub mod edit_form;
pub mod error;
pub mod renderer;
pub mod styles;
pub mod variables;
pub mod vdom;

pub use blocks::remaining;
pub use conditions::{condition_matches, evaluate_rules, rule_matches, RuleOutcome};
pub use device::Device;
pub use edit_form::{field_name, render_edit_form};
pub use error::EvalError;
pub use renderer::{RenderMode, RenderOptions, RenderedPage, Renderer};
pub use styles::{default_text_style, resolved_text_style};
pub use variables::{substitute, Scope};
pub use vdom::{CssRule, VNode, VirtualDomDocument};
