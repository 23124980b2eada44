use crate::config::{DEFAULT_API_BASE_URL, DEFAULT_STORAGE_PATH, MAX_TIMEOUT_SECS};
use crate::core::persist::DEFAULT_STORAGE_KEY;
use crate::config::TomlConfig;
use crate::core::ConfigProvider;
use crate::domain::model::ProductId;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "shop-cart")]
#[command(about = "Manage a storefront shopping cart persisted to local storage")]
pub struct CliConfig {
    #[arg(long, help = "TOML config file; flags given below take precedence over it")]
    pub config: Option<String>,

    #[arg(long, help = "Catalog API base URL [default: http://localhost:3333]")]
    pub api_base_url: Option<String>,

    #[arg(long, help = "Storage file path [default: ./cart.json]")]
    pub storage_path: Option<String>,

    #[arg(long, help = "Storage key holding the cart [default: cart]")]
    pub storage_key: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CartCommand {
    /// Print the cart lines and totals
    Show,
    /// Add one unit of a product
    Add { product_id: ProductId },
    /// Remove a product's line
    Remove { product_id: ProductId },
    /// Set the quantity of a product already in the cart
    Update {
        product_id: ProductId,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

impl CliConfig {
    /// Overrides `config` with every connection flag given on the command line.
    pub fn apply_to(&self, config: &mut TomlConfig) {
        if let Some(url) = &self.api_base_url {
            tracing::info!("--api-base-url overrides api.base_url from config file");
            config.api.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_seconds {
            tracing::info!("--timeout-seconds overrides api.timeout_seconds from config file");
            config.api.timeout_seconds = Some(secs);
        }
        if let Some(path) = &self.storage_path {
            tracing::info!("--storage-path overrides storage.path from config file");
            config.storage.path = path.clone();
        }
        if let Some(key) = &self.storage_key {
            tracing::info!("--storage-key overrides storage.key from config file");
            config.storage.key = key.clone();
        }
    }
}

impl ConfigProvider for CliConfig {
    fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    fn storage_path(&self) -> &str {
        self.storage_path.as_deref().unwrap_or(DEFAULT_STORAGE_PATH)
    }

    fn storage_key(&self) -> &str {
        self.storage_key.as_deref().unwrap_or(DEFAULT_STORAGE_KEY)
    }

    fn request_timeout_secs(&self) -> Option<u64> {
        self.timeout_seconds
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_base_url", self.api_base_url())?;
        validate_path("storage_path", self.storage_path())?;
        validate_non_empty_string("storage_key", self.storage_key())?;
        if let Some(secs) = self.timeout_seconds {
            validate_range("timeout_seconds", secs, 1, MAX_TIMEOUT_SECS)?;
        }
        Ok(())
    }
}
