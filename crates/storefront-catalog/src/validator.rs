use storefront_store::Collection;
use storefront_types::{DocumentId, Order, Product};

use crate::error::{CatalogError, CatalogResult};

/// Referential check of order lines against the product collection.
///
/// Read-only. Stops at the first bad line; later lines are not looked at.
#[derive(Clone, Debug)]
pub struct OrderValidator {
    products: Collection<Product>,
}

impl OrderValidator {
    pub fn new(products: Collection<Product>) -> Self {
        Self { products }
    }

    /// Fails with [`CatalogError::InvalidReference`] naming the first
    /// product id that is malformed or unknown. Store failures propagate
    /// as [`CatalogError::Store`]. An order without lines passes.
    pub async fn validate(&self, order: &Order) -> CatalogResult<()> {
        for product_id in order.product_ids() {
            let Ok(id) = DocumentId::from_hex(product_id) else {
                return Err(CatalogError::InvalidReference(product_id.to_string()));
            };
            if self.products.find_by_id(&id).await?.is_none() {
                return Err(CatalogError::InvalidReference(product_id.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Map, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use storefront_store::{
        Document, DocumentStore, Filter, InMemoryDocumentStore, StoreError, StoreResult,
    };
    use storefront_types::OrderItem;

    /// Delegates to an in-memory store and counts id lookups.
    struct CountingStore {
        inner: InMemoryDocumentStore,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl DocumentStore for CountingStore {
        fn backend(&self) -> &'static str {
            "counting"
        }
        async fn ping(&self) -> StoreResult<()> {
            self.inner.ping().await
        }
        async fn insert(&self, c: &str, f: Map<String, Value>) -> StoreResult<DocumentId> {
            self.inner.insert(c, f).await
        }
        async fn insert_many(
            &self,
            c: &str,
            b: Vec<Map<String, Value>>,
        ) -> StoreResult<Vec<DocumentId>> {
            self.inner.insert_many(c, b).await
        }
        async fn query(&self, c: &str, f: &Filter, l: usize) -> StoreResult<Vec<Document>> {
            self.inner.query(c, f, l).await
        }
        async fn find_by_id(&self, c: &str, id: &DocumentId) -> StoreResult<Option<Document>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_id(c, id).await
        }
        async fn count(&self, c: &str, f: &Filter) -> StoreResult<u64> {
            self.inner.count(c, f).await
        }
        async fn list_collections(&self) -> StoreResult<Vec<String>> {
            self.inner.list_collections().await
        }
        async fn close(&self) {
            self.inner.close().await
        }
    }

    fn setup() -> (Arc<CountingStore>, Collection<Product>, OrderValidator) {
        let store = Arc::new(CountingStore {
            inner: InMemoryDocumentStore::new(),
            lookups: AtomicUsize::new(0),
        });
        let products = Collection::<Product>::new(store.clone());
        let validator = OrderValidator::new(products.clone());
        (store, products, validator)
    }

    #[tokio::test]
    async fn order_with_known_products_passes() {
        let (_, products, validator) = setup();
        let a = products.insert(&Product::new("A", 1.0, "X")).await.unwrap();
        let b = products.insert(&Product::new("B", 2.0, "X")).await.unwrap();
        let order = Order::new(vec![
            OrderItem::new(a.to_hex(), 1),
            OrderItem::new(b.to_hex(), 4),
        ]);
        validator.validate(&order).await.unwrap();
    }

    #[tokio::test]
    async fn unknown_product_is_invalid_reference() {
        let (_, _, validator) = setup();
        let order = Order::new(vec![OrderItem::new("000000000000000000000000", 1)]);
        match validator.validate(&order).await.unwrap_err() {
            CatalogError::InvalidReference(id) => assert_eq!(id, "000000000000000000000000"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_product_id_is_invalid_reference() {
        let (_, _, validator) = setup();
        let order = Order::new(vec![OrderItem::new("not-an-id", 1)]);
        assert!(matches!(
            validator.validate(&order).await,
            Err(CatalogError::InvalidReference(id)) if id == "not-an-id"
        ));
    }

    #[tokio::test]
    async fn first_bad_line_stops_validation() {
        let (store, products, validator) = setup();
        let good = products.insert(&Product::new("A", 1.0, "X")).await.unwrap();
        let order = Order::new(vec![
            OrderItem::new(good.to_hex(), 1),
            OrderItem::new("000000000000000000000000", 1),
            OrderItem::new("ffffffffffffffffffffffff", 1),
        ]);
        let err = validator.validate(&order).await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidReference(id) if id == "000000000000000000000000"));
        assert_eq!(store.lookups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_order_passes_without_lookups() {
        let (store, _, validator) = setup();
        validator.validate(&Order::default()).await.unwrap();
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn validation_writes_nothing() {
        let (store, products, validator) = setup();
        let id = products.insert(&Product::new("A", 1.0, "X")).await.unwrap();
        validator
            .validate(&Order::new(vec![OrderItem::new(id.to_hex(), 1)]))
            .await
            .unwrap();
        assert_eq!(store.inner.len().await, 1);
    }

    #[tokio::test]
    async fn unavailable_store_is_not_an_invalid_reference() {
        let (store, products, validator) = setup();
        let id = products.insert(&Product::new("A", 1.0, "X")).await.unwrap();
        store.close().await;
        let err = validator
            .validate(&Order::new(vec![OrderItem::new(id.to_hex(), 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Store(StoreError::Unavailable(_))));
    }
}
