//! Storefront CLI - Inspect and fill product variant drafts.
//!
//! Commands:
//! - `storefront init` - Write a default config and a sample draft
//! - `storefront config` - Show configuration
//! - `storefront variants` - Print the variant matrix of a draft
//! - `storefront fill` - Fill empty variant fields from a template
//! - `storefront payload` - Print the product store payload of a draft

mod commands;
mod config;
mod context;
mod draft;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{ConfigArgs, FillArgs, InitArgs, PayloadArgs, VariantsArgs};

/// Storefront CLI - Product variant drafts from the command line
#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write storefront.toml and a sample product draft
    Init(InitArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Print the variant matrix of a draft
    Variants(VariantsArgs),

    /// Fill empty variant fields from a template
    Fill(FillArgs),

    /// Print the product store payload of a draft
    Payload(PayloadArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    // Execute command
    let result = match cli.command {
        Commands::Init(args) => commands::init::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
        Commands::Variants(args) => commands::variants::run(args, &ctx).await,
        Commands::Fill(args) => commands::fill::run(args, &ctx).await,
        Commands::Payload(args) => commands::payload::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
