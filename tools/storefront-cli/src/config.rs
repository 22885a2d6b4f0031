//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use storefront_catalog::EditorConfig;

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Editor settings shared with the admin console.
    #[serde(default)]
    pub editor: EditorConfig,

    /// Draft file settings.
    #[serde(default)]
    pub draft: DraftConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }
}

/// Draft file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftConfig {
    /// Draft used when a command is given no path.
    #[serde(default = "default_draft_path")]
    pub path: String,
}

fn default_draft_path() -> String {
    "product.toml".to_string()
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            path: default_draft_path(),
        }
    }
}

/// Generate a default storefront.toml config file.
pub fn generate_default_config() -> String {
    r#"# Storefront editor configuration

[editor]
max_options = 3
max_images = 8
variant_types = ["Kích thước", "Màu", "Giới tính"]
currency = "VND"

[editor.log]
format = "human"
level = "warn"
sink = "stderr"

[draft]
path = "product.toml"
"#
    .to_string()
}

/// Generate a sample product draft.
pub fn generate_sample_draft() -> String {
    r#"# Product draft

name = "Áo thun basic"
currency = "VND"
price = 150000
original_price = 200000
sold_count = 0
images = []

[[options]]
name = "Màu"
values = ["Đỏ", "Xanh"]

[[options]]
name = "Kích thước"
values = ["S", "M", "L"]

# Rows entered earlier; matched to the generated variants by their attributes.
[[variants]]
attributes = { "Màu" = "Đỏ", "Kích thước" = "M" }
price = 140000
stock = 12
sku = "AT-DO-M"
"#
    .to_string()
}
