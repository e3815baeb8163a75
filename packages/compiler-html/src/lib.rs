//! Static HTML output for rendered funnel pages.

mod compiler;

#[cfg(test)]
mod tests;

pub use compiler::{compile_to_html, CompileError, CompileOptions};
