use crate::config::Config;
use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::Args;
use colored::Colorize;
use funnel_catalog::Registry;
use funnel_compiler_html::{compile_to_html, CompileOptions};
use funnel_evaluator::{Device, RenderMode, RenderOptions, Renderer, Scope};
use funnel_model::{parse_elements, Variable};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Page file (JSON array of elements)
    pub page: PathBuf,

    /// Device (mobile, tablet, desktop); defaults to the config
    #[arg(short, long)]
    pub device: Option<String>,

    /// Render mode (preview, canvas)
    #[arg(short, long, default_value = "preview")]
    pub mode: String,

    /// Page variable as NAME=VALUE (repeatable, last one wins)
    #[arg(long = "var", value_parser = parse_pair)]
    pub vars: Vec<(String, String)>,

    /// Visitor field as NAME=VALUE (repeatable)
    #[arg(long = "field", value_parser = parse_pair)]
    pub fields: Vec<(String, String)>,

    /// Output format (html, vdom)
    #[arg(short, long, default_value = "html")]
    pub target: String,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))
}

pub fn render(args: RenderArgs, cwd: &Path) -> Result<Option<PathBuf>> {
    let config = Config::load(cwd)?;

    let device = match &args.device {
        Some(device) => device.parse::<Device>()?,
        None => config.default_device,
    };
    let mode = args.mode.parse::<RenderMode>()?;

    let page_path = cwd.join(&args.page);
    let source = fs::read_to_string(&page_path)
        .map_err(|e| anyhow!("Cannot read {}: {}", page_path.display(), e))?;
    let elements = parse_elements(&source)?;

    let variables: Vec<Variable> = args
        .vars
        .iter()
        .map(|(name, value)| Variable::new(name.as_str(), value.as_str()))
        .collect();
    let scope = Scope::from_variables(&variables)
        .with_fields(args.fields.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    let registry = Registry::standard();
    let options = RenderOptions {
        device,
        mode,
        now: Utc::now(),
    };
    let rendered = Renderer::new(&registry, options).render_page(&elements, &scope);
    debug!(nodes = rendered.document.nodes.len(), "Rendered");

    if let Some(target) = &rendered.redirect {
        eprintln!("{} goto rule redirects to {}", "↪".yellow(), target.bright_white());
    }

    let (output, extension) = match args.target.as_str() {
        "html" => {
            let title = page_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Funnel")
                .to_string();
            let options = CompileOptions {
                title,
                ..Default::default()
            };
            (compile_to_html(&rendered.document, options)?, "html")
        }
        "vdom" => (serde_json::to_string_pretty(&rendered.document)?, "vdom.json"),
        other => return Err(anyhow!("Unknown target: {}", other)),
    };

    if args.stdout {
        println!("{}", output);
        return Ok(None);
    }

    let stem = page_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("page");
    let out_dir = config.out_dir(cwd, args.out_dir.as_deref());
    fs::create_dir_all(&out_dir)?;
    let output_file = out_dir.join(format!("{}.{}.{}", stem, device, extension));
    fs::write(&output_file, output)?;

    println!(
        "  {} {} → {}",
        "✓".green(),
        args.page.display(),
        output_file.display()
    );
    Ok(Some(output_file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(page: &str) -> RenderArgs {
        RenderArgs {
            page: PathBuf::from(page),
            device: Some("mobile".into()),
            mode: "preview".into(),
            vars: vec![("name".into(), "Ann".into())],
            fields: vec![],
            target: "html".into(),
            stdout: false,
            out_dir: None,
        }
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair("a=b=c"), Ok(("a".into(), "b=c".into())));
        assert!(parse_pair("novalue").is_err());
        assert!(parse_pair("=x").is_err());
    }

    #[test]
    fn test_render_page_file_to_html() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("page.json"),
            r#"[{"id":"h","type":"HEADLINE","content":"Hello {{name}}"}]"#,
        )
        .unwrap();

        let output = render(args("page.json"), dir.path()).unwrap().unwrap();

        assert_eq!(output, dir.path().join("dist/page.mobile.html"));
        let html = fs::read_to_string(output).unwrap();
        assert!(html.contains("Hello Ann"));
    }

    #[test]
    fn test_render_rejects_unknown_target() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("page.json"), "[]").unwrap();

        let mut args = args("page.json");
        args.target = "pdf".into();
        assert!(render(args, dir.path()).is_err());
    }
}
