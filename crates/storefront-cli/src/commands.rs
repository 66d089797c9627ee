use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use storefront_catalog::{Catalog, SeedStatus};
use storefront_server::{ServerConfig, StorefrontServer};
use storefront_store::Database;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Seed(args) => cmd_seed(args, &cli.format).await,
        Command::Check(args) => cmd_check(args, &cli.format).await,
    }
}

fn load_config(args: &ConfigArgs) -> anyhow::Result<ServerConfig> {
    ServerConfig::load(args.config.as_deref()).context("loading configuration")
}

async fn open_catalog(config: &ServerConfig) -> anyhow::Result<Catalog> {
    let db = Database::connect(&config.database.url, &config.database.name)
        .await
        .with_context(|| format!("connecting to database {:?}", config.database.name))?;
    Ok(Catalog::new(Arc::new(db)))
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = load_config(&args.config)?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address {bind:?}"))?;
    }
    config.seed_on_start |= args.seed;

    let server = StorefrontServer::connect(config).await?;
    server.serve().await?;
    Ok(())
}

async fn cmd_seed(args: ConfigArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let catalog = open_catalog(&config).await?;
    let report = catalog.seed_products().await?;
    catalog.database().close().await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => match report.status {
            SeedStatus::Seeded => println!(
                "{} Seeded {} products into {}",
                "✓".green().bold(),
                report.inserted_count.to_string().bold(),
                config.database.name.cyan()
            ),
            SeedStatus::AlreadySeeded => println!(
                "{} {} already has products; nothing inserted",
                "•".yellow(),
                config.database.name.cyan()
            ),
        },
    }
    Ok(())
}

async fn cmd_check(args: ConfigArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let catalog = open_catalog(&config).await?;
    let diag = catalog.diagnostics().await;
    catalog.database().close().await;

    if *format == OutputFormat::Json {
        let report = serde_json::json!({
            "store": diag,
            "database_url_set": config.env.database_url,
            "database_name_set": config.env.database_name,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let set = |present: bool| if present { "set".green() } else { "not set".red() };
    if diag.available {
        println!("Store: {} ({})", "available".green().bold(), diag.backend);
    } else {
        println!("Store: {} ({})", "unavailable".red().bold(), diag.backend);
    }
    println!("  Database: {}", diag.database_name.cyan());
    if diag.collections.is_empty() {
        println!("  Collections: {}", "none".dimmed());
    } else {
        println!("  Collections: {}", diag.collections.join(", "));
    }
    if let Some(err) = &diag.error {
        println!("  Error: {}", err.red());
    }
    println!("DATABASE_URL: {}", set(config.env.database_url));
    println!("DATABASE_NAME: {}", set(config.env.database_name));
    Ok(())
}
