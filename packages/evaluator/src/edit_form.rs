//! Edit-form rendering.
//!
//! Builds the type-specific form shown while an element is in Editing
//! mode, driven entirely by the registry descriptor's field list. The form
//! reads from the draft (`content`, `props`), never from committed state.

use crate::vdom::VNode;
use funnel_catalog::{FieldSpec, FieldTarget, InputKind, TypeDescriptor};
use funnel_model::Props;
use serde_json::Value;

/// Form field name for a target (`content`, `props.<key>`, `payload.<key>`)
pub fn field_name(target: FieldTarget) -> String {
    match target {
        FieldTarget::Content => "content".to_string(),
        FieldTarget::Prop(key) => format!("props.{}", key),
        FieldTarget::Payload(key) => format!("payload.{}", key),
    }
}

fn read<'a>(target: FieldTarget, content: &'a Value, props: &'a Props) -> Option<&'a Value> {
    match target {
        FieldTarget::Content => Some(content),
        FieldTarget::Prop(key) => props.get(key),
        FieldTarget::Payload(key) => content.get(key),
    }
}

fn display(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => serde_json::to_string_pretty(other).unwrap_or_default(),
    }
}

fn control(spec: &FieldSpec, value: Option<&Value>) -> VNode {
    let name = field_name(spec.target);
    let input = |kind: &str| {
        VNode::element("input")
            .with_attr("type", kind)
            .with_attr("name", name.clone())
            .with_attr("value", display(value))
    };

    match spec.input {
        InputKind::Text => input("text"),
        InputKind::Url => input("url"),
        InputKind::Number => input("number"),
        InputKind::Color => input("color"),
        InputKind::DateTime => input("datetime-local"),
        InputKind::TextArea => VNode::element("textarea")
            .with_attr("name", name.clone())
            .with_child(VNode::text(display(value))),
        InputKind::Items => VNode::element("textarea")
            .with_attr("name", name.clone())
            .with_attr("data-format", "json")
            .with_child(VNode::text(display(value))),
        InputKind::Checkbox => {
            let node = VNode::element("input")
                .with_attr("type", "checkbox")
                .with_attr("name", name.clone());
            if value.and_then(Value::as_bool).unwrap_or(false) {
                node.with_attr("checked", "true")
            } else {
                node
            }
        }
        InputKind::Select(options) => {
            let current = display(value);
            let options = options
                .iter()
                .map(|option| {
                    let node = VNode::element("option")
                        .with_attr("value", *option)
                        .with_child(VNode::text(*option));
                    if *option == current {
                        node.with_attr("selected", "true")
                    } else {
                        node
                    }
                })
                .collect();
            VNode::element("select")
                .with_attr("name", name.clone())
                .with_children(options)
        }
    }
}

/// Render the edit form for a draft.
///
/// `content` is the draft content: a JSON string for text types, the payload
/// object for structured types.
pub fn render_edit_form(descriptor: &TypeDescriptor, content: &Value, props: &Props) -> VNode {
    let fields = descriptor
        .fields
        .iter()
        .map(|spec| {
            VNode::element("div")
                .with_key(field_name(spec.target))
                .with_attr("class", "edit-field")
                .with_child(VNode::element("label").with_child(VNode::text(spec.label)))
                .with_child(control(spec, read(spec.target, content, props)))
        })
        .collect();

    let actions = VNode::element("div")
        .with_attr("class", "edit-actions")
        .with_child(
            VNode::element("button")
                .with_attr("type", "submit")
                .with_attr("data-action", "save")
                .with_child(VNode::text("Save")),
        )
        .with_child(
            VNode::element("button")
                .with_attr("type", "button")
                .with_attr("data-action", "cancel")
                .with_child(VNode::text("Cancel")),
        );

    VNode::element("form")
        .with_attr("class", "edit-form")
        .with_attr("data-element-type", descriptor.element_type.as_str())
        .with_child(VNode::element("h4").with_child(VNode::text(format!("Edit {}", descriptor.label))))
        .with_children(fields)
        .with_child(actions)
}
