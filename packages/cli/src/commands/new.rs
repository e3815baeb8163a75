use crate::commands::pretty_json;
use crate::config::Config;
use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::Args;
use colored::Colorize;
use funnel_catalog::{Registry, TemplateCatalog};
use funnel_workspace::{slugify, FunnelService, FunnelWizard, MemoryBackend};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Template (SALES_FUNNEL, LEAD_MAGNET, WEBINAR, PRODUCT_LAUNCH)
    pub template: String,

    /// Funnel name
    #[arg(short, long)]
    pub name: String,

    /// Owner recorded on every page
    #[arg(short, long, default_value = "local")]
    pub user: String,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,
}

/// Create a funnel from a template and write one page file per step
pub fn new(args: NewArgs, cwd: &Path) -> Result<PathBuf> {
    let config = Config::load(cwd)?;

    let mut wizard = FunnelWizard::new();
    wizard.set_name(args.name.as_str());
    wizard.set_template(args.template.as_str());
    let request = wizard.finish()?;

    let now = Utc::now();
    let backend = Arc::new(MemoryBackend::new());
    let catalog = TemplateCatalog::standard(&Registry::standard(), now);
    let service = FunnelService::new(backend.clone(), catalog, config.sync);

    let runtime = tokio::runtime::Runtime::new()?;
    let funnel = runtime.block_on(service.create_from_template(
        &args.user,
        &request.name,
        request.template_type,
        now,
    ))?;

    let funnel_dir = config
        .out_dir(cwd, args.out_dir.as_deref())
        .join(slugify(&request.name));
    fs::create_dir_all(&funnel_dir)?;

    println!(
        "{} {} ({})",
        "🧩 Creating".bright_blue().bold(),
        request.name.bold(),
        request.template_type
    );

    for (index, step) in funnel.steps.iter().enumerate() {
        let record = backend
            .record(&step.document_id)
            .ok_or_else(|| anyhow!("Page {} was not stored", step.document_id))?;
        let file = funnel_dir.join(format!("{:02}-{}.json", index + 1, slugify(&step.name)));
        fs::write(&file, pretty_json(&record.content)?)?;
        println!("  {} {} → {}", "✓".green(), step.name, file.display());
    }

    fs::write(
        funnel_dir.join("funnel.json"),
        serde_json::to_string_pretty(&funnel)?,
    )?;

    println!();
    println!("{}", "✅ Funnel created!".green().bold());
    Ok(funnel_dir)
}
