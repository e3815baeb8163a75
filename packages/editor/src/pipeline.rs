//! # Editing Pipeline
//!
//! Coordinates the edit → render loop for one page: apply a mutation, then
//! re-render the canvas with the page variables and the current runtime
//! fields. The pipeline is also the page's [`DropTarget`].

use crate::document::Document;
use crate::drag::DropTarget;
use crate::errors::EditorError;
use crate::mutations::Mutation;
use funnel_catalog::Registry;
use funnel_evaluator::{RenderOptions, RenderedPage, Renderer, Scope, VirtualDomDocument};
use funnel_model::{Element, ElementType};
use std::collections::BTreeMap;
use tracing::debug;

/// Manages the full edit → render pipeline
pub struct Pipeline {
    document: Document,
    registry: Registry,
    options: RenderOptions,
    /// Simulated visitor input (form answers, query parameters)
    fields: BTreeMap<String, String>,
    last_vdom: Option<VirtualDomDocument>,
}

impl Pipeline {
    /// Create pipeline for document
    pub fn new(document: Document, registry: Registry, options: RenderOptions) -> Self {
        Self {
            document,
            registry,
            options,
            fields: BTreeMap::new(),
            last_vdom: None,
        }
    }

    /// Apply mutation and re-render
    pub fn apply_mutation(&mut self, mutation: Mutation) -> Result<PipelineResult, EditorError> {
        let result = self.document.apply(mutation)?;
        let rendered = self.render();
        self.last_vdom = Some(rendered.document.clone());

        Ok(PipelineResult {
            version: result.version,
            changed: result.changed,
            vdom: rendered.document,
            redirect: rendered.redirect,
        })
    }

    /// Full re-render of the current page
    pub fn full_evaluate(&mut self) -> VirtualDomDocument {
        let vdom = self.render().document;
        self.last_vdom = Some(vdom.clone());
        vdom
    }

    pub fn render(&self) -> RenderedPage {
        Renderer::new(&self.registry, self.options).render_page(self.document.elements(), &self.scope())
    }

    /// Page variables overlaid with runtime fields
    pub fn scope(&self) -> Scope {
        Scope::from_variables(self.document.variables())
            .with_fields(self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Set a runtime field (visitor input); clears the render cache
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
        self.last_vdom = None;
    }

    pub fn clear_fields(&mut self) {
        self.fields.clear();
        self.last_vdom = None;
    }

    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
        self.last_vdom = None;
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Get current document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Get mutable document reference
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Get last VDOM (if any)
    pub fn last_vdom(&self) -> Option<&VirtualDomDocument> {
        self.last_vdom.as_ref()
    }

    /// Default element of `element_type` with a fresh id
    pub fn create_element(&mut self, element_type: ElementType) -> Result<Element, EditorError> {
        if !self.registry.contains(&element_type) {
            return Err(EditorError::UnknownType(element_type.to_string()));
        }
        let id = self.document.new_id();
        Ok(self
            .registry
            .create_element(element_type, id, self.options.now))
    }
}

impl DropTarget for Pipeline {
    fn on_item_dropped(
        &mut self,
        element_type: ElementType,
        position: usize,
    ) -> Result<String, EditorError> {
        let element = self.create_element(element_type)?;
        let id = element.id.clone();
        debug!(element_id = %id, position, "Palette item dropped");

        self.apply_mutation(Mutation::InsertElement {
            index: position,
            element,
        })?;
        Ok(id)
    }
}

/// Result of pipeline execution
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// New version number
    pub version: u64,
    pub changed: bool,
    pub vdom: VirtualDomDocument,
    /// Redirect requested by a matching `goto` rule
    pub redirect: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use funnel_evaluator::Device;

    fn pipeline() -> Pipeline {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Pipeline::new(
            Document::new("doc"),
            Registry::standard(),
            RenderOptions::new(Device::Desktop, now).canvas(),
        )
    }

    #[test]
    fn test_pipeline_initial_evaluation() {
        let mut pipeline = pipeline();
        let vdom = pipeline.full_evaluate();
        assert!(vdom.nodes.is_empty());
        assert!(pipeline.last_vdom().is_some());
    }

    #[test]
    fn test_drop_inserts_default_element_at_position() {
        let mut pipeline = pipeline();
        pipeline
            .apply_mutation(Mutation::AddElement {
                element: Element::text("first", ElementType::Text, "x"),
            })
            .unwrap();

        let id = pipeline.on_item_dropped(ElementType::Button, 0).unwrap();

        let doc = pipeline.document();
        assert_eq!(doc.index_of(&id), Some(0));
        assert_eq!(doc.element(&id).unwrap().prop_str("action"), Some("next_page"));
        assert_eq!(pipeline.last_vdom().unwrap().nodes.len(), 2);
    }

    #[test]
    fn test_drop_of_unknown_type_is_rejected() {
        let mut pipeline = pipeline();
        let err = pipeline
            .on_item_dropped(ElementType::Unknown("CAROUSEL".into()), 0)
            .unwrap_err();
        assert_eq!(err, EditorError::UnknownType("CAROUSEL".into()));
        assert!(pipeline.document().is_empty());
    }

    #[test]
    fn test_runtime_fields_feed_rendering() {
        let mut pipeline = pipeline();
        pipeline
            .apply_mutation(Mutation::AddElement {
                element: Element::text("t", ElementType::Text, "Hi {{name}}"),
            })
            .unwrap();
        pipeline.set_field("name", "Ann");

        let vdom = pipeline.full_evaluate();
        assert_eq!(vdom.nodes[0].text_content(), "Hi Ann");
    }
}
