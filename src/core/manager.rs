use crate::core::cart;
use crate::core::persist::{read_cart, write_cart};
use crate::domain::model::{CartOperation, CartSummary, Product, ProductId, UpdateProductAmount};
use crate::domain::ports::{CartStorage, CatalogApi, Notifier};
use crate::utils::error::{CartError, Result};
use tokio::sync::watch;

/// Holds the cart lines and applies add/remove/update against the catalog.
///
/// Every successful mutation is written to storage first and then published
/// to subscribers; a failed one leaves both untouched. Operations snapshot the
/// lines when they start, so overlapping calls resolve last-write-wins.
pub struct CartManager<A: CatalogApi, S: CartStorage, N: Notifier> {
    api: A,
    storage: S,
    notifier: N,
    storage_key: String,
    state: watch::Sender<Vec<Product>>,
}

impl<A: CatalogApi, S: CartStorage, N: Notifier> CartManager<A, S, N> {
    pub fn init(api: A, storage: S, notifier: N, storage_key: impl Into<String>) -> Result<Self> {
        let storage_key = storage_key.into();
        let cart = read_cart(&storage, &storage_key)?;
        let (state, _) = watch::channel(cart);

        Ok(Self {
            api,
            storage,
            notifier,
            storage_key,
            state,
        })
    }

    pub fn cart(&self) -> Vec<Product> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Product>> {
        self.state.subscribe()
    }

    pub fn summary(&self) -> CartSummary {
        cart::summarize(&self.state.borrow())
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Writes the current lines to storage.
    pub fn persist(&self) -> Result<()> {
        let snapshot = self.cart();
        write_cart(&self.storage, &self.storage_key, &snapshot)
    }

    fn commit(&self, updated: Vec<Product>) -> Result<Vec<Product>> {
        write_cart(&self.storage, &self.storage_key, &updated)?;
        self.state.send_replace(updated.clone());
        Ok(updated)
    }

    fn report(&self, operation: CartOperation, product_id: ProductId, error: &CartError) {
        tracing::warn!(
            "{:?} of product {} failed: {} (Category: {:?})",
            operation,
            product_id,
            error,
            error.category()
        );
        self.notifier
            .notify(cart::failure_notice(operation, product_id, error));
    }

    pub async fn try_add_product(&self, product_id: ProductId) -> Result<Vec<Product>> {
        let snapshot = self.cart();

        let stock = self.api.fetch_stock(product_id).await?;
        let desired = u64::from(cart::current_amount(&snapshot, product_id)) + 1;
        let desired = cart::ensure_in_stock(product_id, desired, &stock)?;

        let updated = if cart::find_line(&snapshot, product_id).is_some() {
            cart::with_amount(&snapshot, product_id, desired)?
        } else {
            let record = self.api.fetch_product(product_id).await?;
            if record.id != product_id {
                return Err(CartError::ValidationError {
                    message: format!(
                        "Catalog returned product {} when asked for {}",
                        record.id, product_id
                    ),
                });
            }
            cart::with_new_line(&snapshot, record)
        };

        let updated = self.commit(updated)?;
        tracing::info!("Added product {} (amount now {})", product_id, desired);
        Ok(updated)
    }

    pub fn try_remove_product(&self, product_id: ProductId) -> Result<Vec<Product>> {
        let updated = cart::without(&self.cart(), product_id)?;

        let updated = self.commit(updated)?;
        tracing::info!("Removed product {} ({} lines left)", product_id, updated.len());
        Ok(updated)
    }

    /// Sets a line's amount. Amounts of zero or less leave the cart as it is.
    pub async fn try_update_product_amount(&self, update: UpdateProductAmount) -> Result<Vec<Product>> {
        let UpdateProductAmount { product_id, amount } = update;

        if amount <= 0 {
            tracing::debug!("Ignoring amount {} for product {}", amount, product_id);
            return Ok(self.cart());
        }

        let stock = self.api.fetch_stock(product_id).await?;
        let amount = cart::ensure_in_stock(product_id, amount.unsigned_abs(), &stock)?;

        let updated = cart::with_amount(&self.cart(), product_id, amount)?;

        let updated = self.commit(updated)?;
        tracing::info!("Set product {} amount to {}", product_id, amount);
        Ok(updated)
    }

    pub async fn add_product(&self, product_id: ProductId) {
        if let Err(e) = self.try_add_product(product_id).await {
            self.report(CartOperation::Add, product_id, &e);
        }
    }

    pub fn remove_product(&self, product_id: ProductId) {
        if let Err(e) = self.try_remove_product(product_id) {
            self.report(CartOperation::Remove, product_id, &e);
        }
    }

    pub async fn update_product_amount(&self, update: UpdateProductAmount) {
        if let Err(e) = self.try_update_product_amount(update).await {
            self.report(CartOperation::UpdateAmount, update.product_id, &e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::notify::NoticeBoard;
    use crate::adapters::storage::MemoryStorage;
    use crate::domain::model::{CatalogProduct, Stock};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct FakeCatalog {
        stock: Arc<Mutex<HashMap<ProductId, u32>>>,
        products: Arc<Mutex<HashMap<ProductId, CatalogProduct>>>,
        product_fetches: Arc<AtomicUsize>,
    }

    impl FakeCatalog {
        fn with_product(self, id: ProductId, stock: u32) -> Self {
            self.stock.lock().unwrap().insert(id, stock);
            self.products.lock().unwrap().insert(
                id,
                CatalogProduct {
                    id,
                    title: format!("Shoe {}", id),
                    price: 99.9,
                    image: format!("shoe-{}.jpg", id),
                    extra: Default::default(),
                },
            );
            self
        }

        fn set_stock(&self, id: ProductId, amount: u32) {
            self.stock.lock().unwrap().insert(id, amount);
        }
    }

    #[async_trait]
    impl CatalogApi for FakeCatalog {
        async fn fetch_stock(&self, product_id: ProductId) -> Result<Stock> {
            let stock = self.stock.lock().unwrap();
            stock
                .get(&product_id)
                .map(|amount| Stock {
                    id: Some(product_id),
                    amount: *amount,
                })
                .ok_or_else(|| {
                    CartError::IoError(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("stock {} not found", product_id),
                    ))
                })
        }

        async fn fetch_product(&self, product_id: ProductId) -> Result<CatalogProduct> {
            self.product_fetches.fetch_add(1, Ordering::SeqCst);
            let products = self.products.lock().unwrap();
            products.get(&product_id).cloned().ok_or_else(|| {
                CartError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("product {} not found", product_id),
                ))
            })
        }
    }

    struct ReadOnlyStorage;

    impl CartStorage for ReadOnlyStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
            Err(CartError::IoError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only storage",
            )))
        }

        fn remove_item(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    type TestManager = CartManager<FakeCatalog, MemoryStorage, NoticeBoard>;

    fn manager(catalog: FakeCatalog) -> (TestManager, MemoryStorage, NoticeBoard) {
        let storage = MemoryStorage::new();
        let board = NoticeBoard::new();
        let manager = CartManager::init(catalog, storage.clone(), board.clone(), "cart").unwrap();
        (manager, storage, board)
    }

    fn stored(storage: &MemoryStorage) -> Vec<Product> {
        let raw = storage.get_item("cart").unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_add_new_product_appends_single_unit() {
        let (manager, storage, board) = manager(FakeCatalog::default().with_product(1, 5));

        manager.add_product(1).await;

        let cart = manager.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].id, 1);
        assert_eq!(cart[0].amount, 1);
        assert_eq!(cart[0].title, "Shoe 1");
        assert_eq!(stored(&storage), cart);
        assert!(board.is_empty());
    }

    #[tokio::test]
    async fn test_add_existing_product_increments_without_refetching_details() {
        let catalog = FakeCatalog::default().with_product(1, 5);
        let fetches = catalog.product_fetches.clone();
        let (manager, storage, _board) = manager(catalog);

        manager.try_add_product(1).await.unwrap();
        let cart = manager.try_add_product(1).await.unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].amount, 2);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(stored(&storage), cart);
    }

    #[tokio::test]
    async fn test_add_beyond_stock_is_rejected() {
        let (manager, storage, board) = manager(FakeCatalog::default().with_product(1, 1));

        manager.add_product(1).await;
        manager.add_product(1).await;

        assert_eq!(manager.cart()[0].amount, 1);
        assert_eq!(stored(&storage)[0].amount, 1);

        let notices = board.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].operation, CartOperation::Add);
        assert_eq!(notices[0].message, "Requested quantity is out of stock");
    }

    #[tokio::test]
    async fn test_add_with_zero_stock_never_fetches_details() {
        let catalog = FakeCatalog::default().with_product(8, 0);
        let fetches = catalog.product_fetches.clone();
        let (manager, storage, _board) = manager(catalog);

        let err = manager.try_add_product(8).await.unwrap_err();

        assert!(err.is_stock_exceeded());
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
        assert!(manager.cart().is_empty());
        assert!(storage.get_item("cart").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_unknown_product_reports_generic_failure() {
        let (manager, storage, board) = manager(FakeCatalog::default());

        manager.add_product(99).await;

        assert!(manager.cart().is_empty());
        assert!(storage.get_item("cart").unwrap().is_none());
        assert_eq!(board.notices()[0].message, "Failed to add product");
    }

    #[tokio::test]
    async fn test_add_with_stock_but_missing_details_changes_nothing() {
        let catalog = FakeCatalog::default();
        catalog.set_stock(3, 5);
        let fetches = catalog.product_fetches.clone();
        let (manager, storage, board) = manager(catalog);

        manager.add_product(3).await;

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(manager.cart().is_empty());
        assert!(storage.get_item("cart").unwrap().is_none());
        assert_eq!(board.notices()[0].message, "Failed to add product");
    }

    #[tokio::test]
    async fn test_add_rejects_details_for_another_product() {
        let catalog = FakeCatalog::default().with_product(6, 5);
        catalog.set_stock(3, 5);
        let misfiled = catalog.products.lock().unwrap().get(&6).cloned().unwrap();
        catalog.products.lock().unwrap().insert(3, misfiled);
        let (manager, storage, board) = manager(catalog);

        let err = manager.try_add_product(3).await.unwrap_err();
        assert!(matches!(err, CartError::ValidationError { .. }));

        manager.add_product(3).await;
        assert!(manager.cart().is_empty());
        assert!(storage.get_item("cart").unwrap().is_none());
        assert_eq!(board.notices()[0].message, "Failed to add product");
    }

    #[tokio::test]
    async fn test_remove_present_and_absent() {
        let catalog = FakeCatalog::default().with_product(1, 3).with_product(2, 3);
        let (manager, storage, board) = manager(catalog);
        manager.try_add_product(1).await.unwrap();
        manager.try_add_product(2).await.unwrap();

        manager.remove_product(1);
        let cart = manager.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].id, 2);
        assert_eq!(stored(&storage), cart);
        assert!(board.is_empty());

        manager.remove_product(1);
        assert_eq!(manager.cart(), cart);
        assert_eq!(board.notices()[0].message, "Failed to remove product");
    }

    #[tokio::test]
    async fn test_update_non_positive_amount_is_noop() {
        let catalog = FakeCatalog::default().with_product(1, 5);
        let (manager, _storage, board) = manager(catalog.clone());
        manager.try_add_product(1).await.unwrap();

        // No stock entry is consulted for the guard, so a missing one cannot fail it.
        catalog.stock.lock().unwrap().clear();

        for amount in [0, -1, -40] {
            let cart = manager
                .try_update_product_amount(UpdateProductAmount {
                    product_id: 1,
                    amount,
                })
                .await
                .unwrap();
            assert_eq!(cart[0].amount, 1);
        }
        assert!(board.is_empty());
    }

    #[tokio::test]
    async fn test_update_sets_amount_within_stock() {
        let (manager, storage, _board) = manager(FakeCatalog::default().with_product(1, 5));
        manager.try_add_product(1).await.unwrap();

        let cart = manager
            .try_update_product_amount(UpdateProductAmount {
                product_id: 1,
                amount: 5,
            })
            .await
            .unwrap();

        assert_eq!(cart[0].amount, 5);
        assert_eq!(stored(&storage), cart);
    }

    #[tokio::test]
    async fn test_update_missing_line_reports_failure() {
        let (manager, _storage, board) = manager(FakeCatalog::default().with_product(4, 5));

        manager
            .update_product_amount(UpdateProductAmount {
                product_id: 4,
                amount: 2,
            })
            .await;

        assert!(manager.cart().is_empty());
        assert_eq!(board.notices()[0].message, "Failed to update product quantity");
    }

    #[tokio::test]
    async fn test_documented_walkthrough() {
        let catalog = FakeCatalog::default().with_product(1, 5);
        let (manager, _storage, board) = manager(catalog.clone());

        manager.add_product(1).await;
        assert_eq!(manager.cart()[0].amount, 1);

        manager.add_product(1).await;
        assert_eq!(manager.cart()[0].amount, 2);

        manager
            .update_product_amount(UpdateProductAmount {
                product_id: 1,
                amount: 10,
            })
            .await;
        assert_eq!(manager.cart()[0].amount, 2);
        assert_eq!(board.notices()[0].message, "Requested quantity is out of stock");

        catalog.set_stock(1, 10);
        manager
            .update_product_amount(UpdateProductAmount {
                product_id: 1,
                amount: 10,
            })
            .await;
        assert_eq!(manager.cart()[0].amount, 10);
        assert_eq!(board.notices().len(), 1);
    }

    #[tokio::test]
    async fn test_subscribers_see_only_successful_mutations() {
        let (manager, _storage, _board) = manager(FakeCatalog::default().with_product(1, 1));
        let mut rx = manager.subscribe();
        assert!(!rx.has_changed().unwrap());

        manager.add_product(1).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);

        manager.add_product(1).await;
        manager.remove_product(7);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_storage_failure_leaves_state_unchanged() {
        let board = NoticeBoard::new();
        let manager = CartManager::init(
            FakeCatalog::default().with_product(1, 5),
            ReadOnlyStorage,
            board.clone(),
            "cart",
        )
        .unwrap();
        let rx = manager.subscribe();

        manager.add_product(1).await;

        assert!(manager.cart().is_empty());
        assert!(!rx.has_changed().unwrap());
        assert_eq!(board.notices()[0].message, "Failed to add product");
        assert!(manager.persist().is_err());
    }

    #[tokio::test]
    async fn test_init_restores_persisted_cart() {
        let catalog = FakeCatalog::default().with_product(1, 5).with_product(2, 5);
        let (first, storage, _board) = manager(catalog.clone());
        first.try_add_product(2).await.unwrap();
        first.try_add_product(1).await.unwrap();

        let second =
            CartManager::init(catalog, storage.clone(), NoticeBoard::new(), "cart").unwrap();
        let ids: Vec<ProductId> = second.cart().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(second.summary().total_units, 2);
    }

    #[tokio::test]
    async fn test_persist_writes_current_lines() {
        let (manager, storage, _board) = manager(FakeCatalog::default().with_product(1, 5));
        manager.try_add_product(1).await.unwrap();
        storage.remove_item("cart").unwrap();

        manager.persist().unwrap();
        assert_eq!(stored(&storage), manager.cart());
    }
}
