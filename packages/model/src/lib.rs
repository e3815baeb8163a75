//! # Funnel Model
//!
//! Data model shared by every funnel package: elements and their typed
//! payloads, condition rules, variables, and the persisted record shape.
//!
//! ## Boundaries
//!
//! ```text
//! backend record.content (JSON text)
//!         ↓ parse_elements
//! Vec<Element> with typed Content      ← everything internal works here
//!         ↓ serialize_elements
//! backend record.content (JSON text)
//! ```

pub mod conditions;
pub mod element;
pub mod error;
pub mod id;
pub mod payload;
pub mod record;
pub mod style;
pub mod variable;

pub use conditions::{Condition, ConditionRule, Operator, RuleType};
pub use element::{
    parse_elements, serialize_elements, Content, ContentKind, Element, ElementRecord, ElementType,
    Props,
};
pub use error::{ContentError, ModelError};
pub use id::{document_seed, IdGenerator};
pub use payload::*;
pub use record::{Funnel, FunnelRecord, FunnelStep, PageType, PublishState};
pub use style::TextStyle;
pub use variable::Variable;
