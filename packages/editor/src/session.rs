//! # Edit Session Management
//!
//! Tracks the Viewing/Editing state of one element.
//!
//! ```text
//! Viewing ──begin_edit──→ Editing(draft) ──save ok──→ Viewing
//!                            │   ↑   │
//!                 update_draft┘   │   └──cancel──→ Viewing (draft dropped)
//!                                 └── save failed (draft kept, error recorded)
//! ```
//!
//! The draft is a private copy of `content` and `props`; nothing reaches the
//! document until `save` succeeds.

use crate::document::{Document, MutationResult};
use crate::errors::EditorError;
use crate::mutations::ElementPatch;
use funnel_catalog::{FieldTarget, Registry};
use funnel_evaluator::{render_edit_form, VNode};
use funnel_model::{BlockPayload, Content, ContentKind, ElementType, Props};
use serde_json::Value;
use tracing::{debug, warn};

/// Local copy of an element's editable state
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub element_type: ElementType,
    /// JSON string for text types, payload object for structured types
    pub content: Value,
    pub props: Props,
}

impl Draft {
    /// Set one field addressed the way the edit form addresses it
    pub fn set_field(&mut self, target: FieldTarget, value: Value) {
        match target {
            FieldTarget::Content => self.content = value,
            FieldTarget::Prop(key) => {
                self.props.insert(key.to_string(), value);
            }
            FieldTarget::Payload(key) => {
                if !self.content.is_object() {
                    self.content = Value::Object(serde_json::Map::new());
                }
                if let Value::Object(map) = &mut self.content {
                    map.insert(key.to_string(), value);
                }
            }
        }
    }

    /// Committed content this draft would produce
    pub fn to_content(&self) -> Result<Content, EditorError> {
        match self.element_type.content_kind() {
            ContentKind::Text => Ok(Content::Text(match &self.content {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            })),
            ContentKind::Structured => {
                let payload = BlockPayload::from_value(&self.element_type, &self.content)?;
                Ok(Content::Block(payload))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditState {
    Viewing,
    Editing(Draft),
}

/// Edit state of one element
#[derive(Debug, Clone)]
pub struct EditSession {
    /// Element being edited
    pub element_id: String,
    state: EditState,
    last_error: Option<EditorError>,
}

impl EditSession {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            state: EditState::Viewing,
            last_error: None,
        }
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing(_))
    }

    pub fn draft(&self) -> Option<&Draft> {
        match &self.state {
            EditState::Editing(draft) => Some(draft),
            EditState::Viewing => None,
        }
    }

    /// Error from the last failed save, if the draft is still pending
    pub fn last_error(&self) -> Option<&EditorError> {
        self.last_error.as_ref()
    }

    /// Enter Editing with a copy of the committed state
    pub fn begin_edit(&mut self, document: &Document) -> Result<&Draft, EditorError> {
        let element = document
            .element(&self.element_id)
            .ok_or_else(|| EditorError::ElementNotFound(self.element_id.clone()))?;

        let content = match &element.content {
            Content::Text(text) => Value::String(text.clone()),
            Content::Block(payload) => payload.to_value()?,
            Content::Malformed { raw, .. } => Value::String(raw.clone()),
        };

        self.state = EditState::Editing(Draft {
            element_type: element.element_type.clone(),
            content,
            props: element.props.clone(),
        });
        self.last_error = None;

        debug!(element_id = %self.element_id, "Begin edit");
        self.draft()
            .ok_or_else(|| EditorError::NotEditing(self.element_id.clone()))
    }

    /// Change the draft only
    pub fn update_draft(&mut self, update: impl FnOnce(&mut Draft)) -> Result<(), EditorError> {
        match &mut self.state {
            EditState::Editing(draft) => {
                update(draft);
                Ok(())
            }
            EditState::Viewing => Err(EditorError::NotEditing(self.element_id.clone())),
        }
    }

    /// Commit the draft through `update_element` and return to Viewing.
    ///
    /// On failure the session stays in Editing with the draft untouched.
    pub fn save(&mut self, document: &mut Document) -> Result<MutationResult, EditorError> {
        let EditState::Editing(draft) = &self.state else {
            return Err(EditorError::NotEditing(self.element_id.clone()));
        };

        let result = Self::commit(&self.element_id, draft, document);
        match result {
            Ok(result) => {
                self.state = EditState::Viewing;
                self.last_error = None;
                Ok(result)
            }
            Err(err) => {
                warn!(element_id = %self.element_id, error = %err, "Save failed, draft kept");
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    fn commit(
        element_id: &str,
        draft: &Draft,
        document: &mut Document,
    ) -> Result<MutationResult, EditorError> {
        let Some(committed) = document.element(element_id) else {
            return Err(EditorError::ElementNotFound(element_id.to_string()));
        };
        let content = draft.to_content()?;

        // Keys dropped from the draft are removed from the element
        let mut props = draft.props.clone();
        for key in committed.props.keys() {
            if !props.contains_key(key) {
                props.insert(key.clone(), Value::Null);
            }
        }

        document.update_element(
            element_id,
            ElementPatch {
                content: Some(content),
                props: Some(props),
            },
        )
    }

    /// Drop the draft unconditionally
    pub fn cancel(&mut self) {
        if self.is_editing() {
            debug!(element_id = %self.element_id, "Edit cancelled");
        }
        self.state = EditState::Viewing;
        self.last_error = None;
    }

    /// Edit form for the current draft
    pub fn render_form(&self, registry: &Registry) -> Option<VNode> {
        let draft = self.draft()?;
        let descriptor = registry.descriptor(&draft.element_type)?;
        Some(render_edit_form(descriptor, &draft.content, &draft.props))
    }
}
