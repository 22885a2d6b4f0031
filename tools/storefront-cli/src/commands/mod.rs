//! CLI command implementations.

pub mod config;
pub mod fill;
pub mod init;
pub mod payload;
pub mod variants;

use clap::{Args, Subcommand};

/// Arguments for the init command.
#[derive(Args)]
pub struct InitArgs {
    /// Overwrite existing files.
    #[arg(short, long)]
    pub force: bool,

    /// Skip confirmation prompts (answer yes).
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
}

/// Arguments for the variants command.
#[derive(Args)]
pub struct VariantsArgs {
    /// Draft file (default: the configured draft path).
    pub draft: Option<String>,
}

/// Arguments for the fill command.
#[derive(Args)]
pub struct FillArgs {
    /// Draft file (default: the configured draft path).
    pub draft: Option<String>,

    /// Price for rows without one.
    #[arg(long)]
    pub price: Option<i64>,

    /// Original price for rows without one.
    #[arg(long)]
    pub original_price: Option<i64>,

    /// Stock for rows without stock.
    #[arg(long)]
    pub stock: Option<i64>,

    /// Sold count for rows without one.
    #[arg(long)]
    pub sold: Option<i64>,

    /// SKU for rows without one.
    #[arg(long)]
    pub sku: Option<String>,

    /// Stored image reference for rows without an image.
    #[arg(long)]
    pub image: Option<String>,

    /// Option the filter applies to (default: the first option).
    #[arg(long)]
    pub filter_option: Option<String>,

    /// Only fill rows with one of these values (repeatable).
    #[arg(long = "filter")]
    pub filter: Vec<String>,
}

/// Arguments for the payload command.
#[derive(Args)]
pub struct PayloadArgs {
    /// Draft file (default: the configured draft path).
    pub draft: Option<String>,
}
