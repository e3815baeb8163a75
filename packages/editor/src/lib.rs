//! # Funnel Editor
//!
//! Page editing engine: the ordered element list of one funnel step, the
//! mutations that change it, and the edit → render loop.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ catalog: element types, defaults, templates │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document + mutations                │
//! │  - Add / insert / update / remove / move    │
//! │  - Variables and condition rules            │
//! │  - Post-effects keep rules consistent       │
//! │  - Edit sessions with private drafts        │
//! │  - Palette drops via DropTarget             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ evaluator: elements → VDOM                  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Every effective mutation bumps the document version and hands the full
//! element list to the attached [`SnapshotSink`]. Persistence lives behind
//! that sink (see `funnel-workspace`).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use funnel_editor::{Document, Direction};
//! use funnel_model::{Element, ElementType};
//!
//! let mut doc = Document::new("page-1");
//! doc.add_element(Element::text("h1", ElementType::Headline, "Hello"))?;
//! doc.add_element(Element::text("b1", ElementType::Button, "Go"))?;
//! doc.move_element("b1", Direction::Up)?;
//! ```

pub mod document;
pub mod drag;
pub mod errors;
pub mod mutations;
pub mod pipeline;
pub mod post_effects;
pub mod session;

pub use document::{Document, MutationResult, SnapshotSink};
pub use drag::{DragController, DragItem, DropTarget};
pub use errors::EditorError;
pub use mutations::{Direction, ElementPatch, Mutation, MutationError, PageContent};
pub use pipeline::{Pipeline, PipelineResult};
pub use post_effects::{DeactivateDanglingTargets, DeactivateRulesOfRemoved, PostEffect, PostEffectEngine};
pub use session::{Draft, EditSession, EditState};
