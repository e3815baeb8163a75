use anyhow::Result;
use chrono::Utc;
use clap::Args;
use colored::Colorize;
use funnel_catalog::{Registry, TemplateCatalog};

#[derive(Debug, Args)]
pub struct TypesArgs {
    /// Print the editable fields of each type
    #[arg(long)]
    pub fields: bool,
}

#[derive(Debug, Args)]
pub struct TemplatesArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn types(args: TypesArgs) -> Result<()> {
    let registry = Registry::standard();

    println!("{}", "Element types".bright_blue().bold());
    for descriptor in registry.descriptors() {
        let columns = descriptor
            .desktop_columns
            .map(|n| format!("{} cols", n))
            .unwrap_or_default();
        println!(
            "  {:<14} {:<18} {:<8} {}",
            descriptor.element_type.as_str().bright_white(),
            descriptor.label,
            format!("{:?}", descriptor.category).dimmed(),
            columns.dimmed()
        );

        if args.fields {
            for field in descriptor.fields {
                println!("      - {} ({:?})", field.label, field.input);
            }
        }
    }

    Ok(())
}

pub fn templates(args: TemplatesArgs) -> Result<()> {
    let catalog = TemplateCatalog::standard(&Registry::standard(), Utc::now());
    let summaries = catalog.list();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("{}", "Templates".bright_blue().bold());
    for summary in summaries {
        println!(
            "  {:<16} {}",
            summary.template_type.as_str().bright_white(),
            summary.name.bold()
        );
        println!("  {:<16} {}", "", summary.description.dimmed());
        println!("  {:<16} {}", "", summary.pages.join(" → "));
    }

    Ok(())
}
