use funnel_evaluator::{CssRule, VNode, VirtualDomDocument};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during HTML compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Invalid tag name: {0}")]
    InvalidTag(String),

    #[error("Invalid attribute name {name} on <{tag}>")]
    InvalidAttribute { tag: String, name: String },
}

/// Options for HTML compilation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Page title
    pub title: String,
    /// Emit node styles as `style` attributes
    pub inline_styles: bool,
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            title: "Funnel".to_string(),
            inline_styles: true,
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

struct Context {
    options: CompileOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: CompileOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        self.newline();
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn newline(&mut self) {
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Compile a rendered page to a standalone HTML document
pub fn compile_to_html(
    document: &VirtualDomDocument,
    options: CompileOptions,
) -> Result<String, CompileError> {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html>");
    ctx.indent();

    compile_head(&document.styles, &mut ctx);

    ctx.add_line("<body>");
    ctx.indent();
    ctx.add_line("<main class=\"funnel-page\">");
    ctx.indent();

    for node in &document.nodes {
        compile_node(node, &mut ctx)?;
    }

    ctx.dedent();
    ctx.add_line("</main>");
    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    Ok(ctx.get_output())
}

fn compile_head(styles: &[CssRule], ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();

    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    let title = format!("<title>{}</title>", escape_html(&ctx.options.title));
    ctx.add_line(&title);

    if !styles.is_empty() {
        ctx.add_line("<style>");
        ctx.indent();
        for rule in styles {
            let line = format!(
                "{} {{ {}}}",
                rule.selector,
                declarations(&rule.properties)
            );
            ctx.add_line(&line);
        }
        ctx.dedent();
        ctx.add_line("</style>");
    }

    ctx.dedent();
    ctx.add_line("</head>");
}

fn compile_node(node: &VNode, ctx: &mut Context) -> Result<(), CompileError> {
    match node {
        VNode::Element {
            tag,
            attributes,
            styles,
            children,
            key: _,
        } => compile_tag(tag, attributes, styles, children, ctx),

        VNode::Text { content } => {
            ctx.add(&escape_html(content));
            Ok(())
        }

        VNode::Comment { content } => {
            let line = format!("<!-- {} -->", content.replace("--", "- -"));
            ctx.add_line(&line);
            Ok(())
        }

        VNode::Error {
            message,
            element_id,
        } => {
            let mut open = String::from("<div class=\"funnel-error\" role=\"alert\"");
            if let Some(id) = element_id {
                open.push_str(&format!(" data-element-id=\"{}\"", escape_html(id)));
            }
            let line = format!("{}>{}</div>", open, escape_html(message));
            ctx.add_line(&line);
            Ok(())
        }
    }
}

fn compile_tag(
    name: &str,
    attributes: &BTreeMap<String, String>,
    styles: &BTreeMap<String, String>,
    children: &[VNode],
    ctx: &mut Context,
) -> Result<(), CompileError> {
    if !is_valid_name(name) {
        return Err(CompileError::InvalidTag(name.to_string()));
    }

    if ctx.options.pretty {
        ctx.add_indent();
    }
    ctx.add(&format!("<{}", name));

    for (attr_name, value) in attributes {
        if !is_valid_name(attr_name) {
            return Err(CompileError::InvalidAttribute {
                tag: name.to_string(),
                name: attr_name.clone(),
            });
        }
        ctx.add(&format!(" {}=\"{}\"", attr_name, escape_html(value)));
    }

    if ctx.options.inline_styles && !styles.is_empty() {
        ctx.add(&format!(
            " style=\"{}\"",
            escape_html(declarations(styles).trim_end())
        ));
    }

    if is_void(name) {
        ctx.add(" />");
        ctx.newline();
        return Ok(());
    }

    ctx.add(">");

    let block = has_element_children(children);
    if block {
        ctx.newline();
    }
    ctx.indent();
    for child in children {
        compile_node(child, ctx)?;
    }
    ctx.dedent();
    if block && ctx.options.pretty {
        ctx.add_indent();
    }

    ctx.add(&format!("</{}>", name));
    ctx.newline();

    Ok(())
}

fn declarations(properties: &BTreeMap<String, String>) -> String {
    properties
        .iter()
        .map(|(key, value)| format!("{}: {}; ", key, value))
        .collect()
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "img" | "input" | "br" | "hr" | "meta" | "link" | "source" | "wbr"
    )
}

fn has_element_children(children: &[VNode]) -> bool {
    children
        .iter()
        .any(|child| !matches!(child, VNode::Text { .. }))
}
