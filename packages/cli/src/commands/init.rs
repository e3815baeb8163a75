use crate::commands::pretty_json;
use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::Args;
use colored::Colorize;
use funnel_catalog::{Registry, TemplateCatalog, TemplateType};
use funnel_evaluator::Device;
use funnel_model::serialize_elements;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Default preview device (mobile, tablet, desktop)
    #[arg(short, long, default_value = "desktop")]
    pub device: String,

    /// Output directory
    #[arg(short, long, default_value = "dist")]
    pub out_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let device: Device = args.device.parse()?;

    println!("{}", "📝 Initializing funnel project...".bright_blue().bold());

    let pages_dir = cwd.join("pages");
    if !pages_dir.exists() {
        fs::create_dir_all(&pages_dir)?;
        println!("  {} Created pages/", "✓".green());
    }

    // Example page: the first page of the lead magnet template
    let example_file = pages_dir.join("example.json");
    if !example_file.exists() {
        let catalog = TemplateCatalog::standard(&Registry::standard(), Utc::now());
        let pages = catalog
            .instantiate(TemplateType::LeadMagnet)
            .ok_or_else(|| anyhow!("Lead magnet template missing"))?;
        let content = serialize_elements(&pages[0].content)?;
        fs::write(&example_file, pretty_json(&content)?)?;
        println!("  {} Created pages/example.json", "✓".green());
    }

    let config = Config {
        out_dir: args.out_dir.clone(),
        default_device: device,
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit pages/example.json");
    println!("  2. Run: funnel render pages/example.json");
    println!("  3. Check output in {}/", args.out_dir);

    Ok(())
}
