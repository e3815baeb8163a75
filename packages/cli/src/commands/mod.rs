pub mod catalog;
pub mod init;
pub mod new;
pub mod render;

pub use catalog::{templates, types, TemplatesArgs, TypesArgs};
pub use init::{init, InitArgs};
pub use new::{new, NewArgs};
pub use render::{render, RenderArgs};

/// Re-indent a compact JSON string for files people edit by hand
pub(crate) fn pretty_json(compact: &str) -> anyhow::Result<String> {
    let value: serde_json::Value = serde_json::from_str(compact)?;
    Ok(serde_json::to_string_pretty(&value)?)
}
