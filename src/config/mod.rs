#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CartCommand, CliConfig};
pub use toml_config::TomlConfig;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3333";
pub const DEFAULT_STORAGE_PATH: &str = "./cart.json";
pub const MAX_TIMEOUT_SECS: u64 = 300;
