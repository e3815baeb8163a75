//! # Document Handle
//!
//! A Document is one page of a funnel: an ordered list of elements plus the
//! page variables, a version counter, and an optional snapshot sink.
//!
//! ## Lifecycle
//!
//! ```text
//! empty / template copy / loaded record
//!        ↓
//!    mutations ──→ version += 1 ──→ SnapshotSink::snapshot_changed(version, elements)
//!        ↓
//!    serialize (persistence boundary)
//! ```
//!
//! The sink is notified synchronously after every mutation that changed the
//! page. No-op mutations (stale ids, edge moves) neither bump the version nor
//! notify.

use crate::errors::EditorError;
use crate::mutations::{Direction, ElementPatch, Mutation, PageContent};
use crate::post_effects::PostEffectEngine;
use funnel_model::{serialize_elements, ConditionRule, Element, IdGenerator, ModelError, Variable};
use std::fmt;
use tracing::debug;

/// Receives the full element list after every change
pub trait SnapshotSink: Send + Sync {
    fn snapshot_changed(&self, version: u64, elements: &[Element]);
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// Document version after the mutation
    pub version: u64,
    /// False when the mutation was a no-op
    pub changed: bool,
    /// Secondary mutations applied by post-effects
    pub effects: Vec<Mutation>,
}

/// Editable page
pub struct Document {
    /// Document (record) id
    pub id: String,

    /// Current version number (increments on each effective mutation)
    version: u64,

    page: PageContent,
    ids: IdGenerator,
    effects: PostEffectEngine,
    sink: Option<Box<dyn SnapshotSink>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("elements", &self.page.elements.len())
            .field("variables", &self.page.variables.len())
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl Document {
    /// Empty document
    pub fn new(id: impl Into<String>) -> Self {
        Self::from_elements(id, Vec::new())
    }

    /// Document seeded with elements (template copy or loaded record)
    pub fn from_elements(id: impl Into<String>, elements: Vec<Element>) -> Self {
        let id = id.into();
        let mut ids = IdGenerator::new(&id);
        ids.reserve(elements.iter().map(|el| el.id.as_str()));

        Self {
            id,
            version: 0,
            page: PageContent {
                elements,
                variables: Vec::new(),
            },
            ids,
            effects: PostEffectEngine::new(),
            sink: None,
        }
    }

    pub fn with_variables(mut self, variables: Vec<Variable>) -> Self {
        self.page.variables = variables;
        self
    }

    /// Attach the sink that receives every snapshot
    pub fn attach_sink(&mut self, sink: Box<dyn SnapshotSink>) {
        self.sink = Some(sink);
    }

    pub fn detach_sink(&mut self) -> Option<Box<dyn SnapshotSink>> {
        self.sink.take()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn elements(&self) -> &[Element] {
        &self.page.elements
    }

    pub fn variables(&self) -> &[Variable] {
        &self.page.variables
    }

    pub fn page(&self) -> &PageContent {
        &self.page
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.page.element(id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.page.index_of(id)
    }

    pub fn len(&self) -> usize {
        self.page.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.page.elements.is_empty()
    }

    /// Fresh element id, unique within this document
    pub fn new_id(&mut self) -> String {
        self.ids.new_id()
    }

    /// Replace the whole element list (used when a record is loaded).
    /// Does not notify the sink.
    pub fn replace_elements(&mut self, elements: Vec<Element>) {
        self.ids.reserve(elements.iter().map(|el| el.id.as_str()));
        self.page.elements = elements;
    }

    /// Persisted form of the element list
    pub fn serialize(&self) -> Result<String, ModelError> {
        serialize_elements(&self.page.elements)
    }

    /// Apply a mutation
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        if let Mutation::AddElement { element } | Mutation::InsertElement { element, .. } =
            &mutation
        {
            self.ids.reserve([element.id.as_str()]);
        }

        let (changed, effects) = self.effects.apply_with_effects(&mutation, &mut self.page)?;

        if changed {
            self.version += 1;
            debug!(
                document_id = %self.id,
                version = self.version,
                mutation = mutation.name(),
                "Applied mutation"
            );

            if let Some(sink) = &self.sink {
                sink.snapshot_changed(self.version, &self.page.elements);
            }
        }

        Ok(MutationResult {
            version: self.version,
            changed,
            effects,
        })
    }

    pub fn add_element(&mut self, element: Element) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::AddElement { element })
    }

    pub fn insert_element(
        &mut self,
        index: usize,
        element: Element,
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::InsertElement { index, element })
    }

    pub fn update_element(
        &mut self,
        id: &str,
        patch: ElementPatch,
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::UpdateElement {
            id: id.to_string(),
            patch,
        })
    }

    pub fn remove_element(&mut self, id: &str) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::RemoveElement { id: id.to_string() })
    }

    pub fn move_element(
        &mut self,
        id: &str,
        direction: Direction,
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::MoveElement {
            id: id.to_string(),
            direction,
        })
    }

    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::AddVariable {
            name: name.into(),
            value: value.into(),
        })
    }

    pub fn update_variable(
        &mut self,
        index: usize,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::UpdateVariable {
            index,
            name: name.into(),
            value: value.into(),
        })
    }

    pub fn remove_variable(&mut self, index: usize) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::RemoveVariable { index })
    }

    pub fn set_conditions(
        &mut self,
        id: &str,
        rules: Vec<ConditionRule>,
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::SetConditions {
            id: id.to_string(),
            rules,
        })
    }
}
