//! # Funnel Catalog
//!
//! Static knowledge about what can go on a page: the element type registry
//! (defaults and edit descriptors) and the pre-built funnel templates.

pub mod registry;
pub mod templates;

pub use registry::{
    Category, FieldSpec, FieldTarget, InputKind, Registry, TypeDescriptor, BUTTON_ACTIONS,
    COUNTDOWN_DEFAULT_DAYS,
};
pub use templates::{Page, Template, TemplateCatalog, TemplateSummary, TemplateType};
