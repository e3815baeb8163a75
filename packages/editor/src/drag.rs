//! Drag-and-drop capability.
//!
//! The palette drag source only ever calls [`DropTarget::on_item_dropped`];
//! how the drop becomes an element is up to the target. [`DragController`]
//! keeps drags exclusive: one active drag at a time.

use crate::errors::EditorError;
use funnel_model::ElementType;
use tracing::debug;

/// Anything that accepts palette drops
pub trait DropTarget {
    /// Create a default element of `element_type` at `position`.
    /// Returns the new element id.
    fn on_item_dropped(
        &mut self,
        element_type: ElementType,
        position: usize,
    ) -> Result<String, EditorError>;
}

/// Item currently being dragged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragItem {
    pub element_type: ElementType,
}

#[derive(Debug, Default)]
pub struct DragController {
    active: Option<DragItem>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&DragItem> {
        self.active.as_ref()
    }

    /// Start dragging a palette item
    pub fn begin(&mut self, element_type: ElementType) -> Result<(), EditorError> {
        if self.active.is_some() {
            return Err(EditorError::DragInProgress);
        }
        debug!(element_type = %element_type, "Drag started");
        self.active = Some(DragItem { element_type });
        Ok(())
    }

    /// Finish the drag over `target` at `position`
    pub fn drop_on(
        &mut self,
        target: &mut dyn DropTarget,
        position: usize,
    ) -> Result<String, EditorError> {
        let item = self.active.take().ok_or(EditorError::NoActiveDrag)?;
        target.on_item_dropped(item.element_type, position)
    }

    /// Abandon the drag without dropping
    pub fn cancel(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<(ElementType, usize)>);

    impl DropTarget for Recorder {
        fn on_item_dropped(
            &mut self,
            element_type: ElementType,
            position: usize,
        ) -> Result<String, EditorError> {
            self.0.push((element_type, position));
            Ok(format!("new-{}", self.0.len()))
        }
    }

    #[test]
    fn test_only_one_drag_at_a_time() {
        let mut drag = DragController::new();
        drag.begin(ElementType::Headline).unwrap();
        assert_eq!(drag.begin(ElementType::Button), Err(EditorError::DragInProgress));
    }

    #[test]
    fn test_drop_forwards_to_target() {
        let mut drag = DragController::new();
        let mut target = Recorder::default();

        drag.begin(ElementType::Hero).unwrap();
        let id = drag.drop_on(&mut target, 2).unwrap();

        assert_eq!(id, "new-1");
        assert_eq!(target.0, vec![(ElementType::Hero, 2)]);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_drop_without_drag() {
        let mut drag = DragController::new();
        let mut target = Recorder::default();
        assert_eq!(drag.drop_on(&mut target, 0), Err(EditorError::NoActiveDrag));

        drag.begin(ElementType::Text).unwrap();
        drag.cancel();
        assert_eq!(drag.drop_on(&mut target, 0), Err(EditorError::NoActiveDrag));
    }
}
