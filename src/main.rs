use anyhow::Context;
use clap::Parser;
use shop_cart::core::ConfigProvider;
use shop_cart::utils::{logger, validation::Validate};
use shop_cart::{
    CartCommand, CartManager, CartSummary, CliConfig, HttpCatalog, JsonFileStorage, NoticeBoard,
    Product, TomlConfig, TracingNotifier, UpdateProductAmount,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut toml = match &cli.config {
        Some(path) => Some(
            TomlConfig::from_file(path)
                .with_context(|| format!("failed to load config file {}", path))?,
        ),
        None => None,
    };

    let directive = toml
        .as_ref()
        .and_then(TomlConfig::log_level)
        .map(str::to_string)
        .unwrap_or_else(|| logger::default_directive(cli.verbose).to_string());
    if toml.as_ref().is_some_and(TomlConfig::json_logging) {
        logger::init_json_logger(&directive);
    } else {
        logger::init_cli_logger(&directive);
    }

    tracing::debug!("CLI config: {:?}", cli);
    if let Some(config) = toml.as_mut() {
        cli.apply_to(config);
    }

    let validation = match &toml {
        Some(config) => config.validate(),
        None => cli.validate(),
    };
    if let Err(e) = validation {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(2);
    }

    let provider: &dyn ConfigProvider = match &toml {
        Some(config) => config,
        None => &cli,
    };

    let catalog = HttpCatalog::from_config(provider)?;
    let storage = JsonFileStorage::new(provider.storage_path());
    let board = NoticeBoard::new();

    let notifier = (TracingNotifier, board.clone());

    let manager = CartManager::init(catalog, storage, notifier, provider.storage_key())
        .with_context(|| format!("failed to load cart from {}", provider.storage_path()))?;

    match cli.command {
        CartCommand::Show => {}
        CartCommand::Add { product_id } => manager.add_product(product_id).await,
        CartCommand::Remove { product_id } => manager.remove_product(product_id),
        CartCommand::Update { product_id, amount } => {
            manager
                .update_product_amount(UpdateProductAmount { product_id, amount })
                .await
        }
    }

    let notices = board.drain();
    for notice in &notices {
        eprintln!(
            "❌ [{}] {}",
            notice.raised_at.with_timezone(&chrono::Local).format("%H:%M:%S"),
            notice.message
        );
    }

    print_cart(&manager.cart(), &manager.summary());

    if !notices.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

fn print_cart(cart: &[Product], summary: &CartSummary) {
    if cart.is_empty() {
        println!("🛒 Cart is empty");
        return;
    }

    println!("🛒 Cart ({} items)", summary.distinct_items);
    for product in cart {
        println!(
            "  #{:<4} {:<40} x{:<3} {:>10.2} {:>10.2}",
            product.id,
            product.title,
            product.amount,
            product.price,
            product.subtotal()
        );
    }
    println!(
        "  Total: {} units, {:.2}",
        summary.total_units, summary.total_price
    );
}
