//! Error types for the editor

use funnel_model::{ContentError, ModelError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Element {0} is not being edited")]
    NotEditing(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Element type {0} is not in the palette")]
    UnknownType(String),

    #[error("Another drag is already in progress")]
    DragInProgress,

    #[error("No drag in progress")]
    NoActiveDrag,
}
