use std::sync::Arc;

use serde::{Deserialize, Serialize};
use storefront_store::{Collection, Database, Document, Filter};
use storefront_types::{DocumentId, Order, Product, Schema};

use crate::dataset::starter_products;
use crate::error::CatalogResult;
use crate::seeder::{SeedReport, Seeder};
use crate::validator::OrderValidator;

/// Collections listed in a diagnostic report, at most.
const DIAGNOSTIC_COLLECTIONS: usize = 10;

/// Store health as seen from the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub backend: String,
    pub database_name: String,
    pub available: bool,
    pub collections: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Product and order operations over one database.
#[derive(Clone)]
pub struct Catalog {
    db: Arc<Database>,
    products: Collection<Product>,
    orders: Collection<Order>,
    validator: OrderValidator,
    seeder: Seeder<Product>,
}

impl Catalog {
    pub fn new(db: Arc<Database>) -> Self {
        let products = db.collection::<Product>();
        let orders = db.collection::<Order>();
        Self {
            validator: OrderValidator::new(products.clone()),
            seeder: Seeder::new(products.clone()),
            db,
            products,
            orders,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    // ---- Products ----

    pub async fn create_product(&self, product: &Product) -> CatalogResult<DocumentId> {
        product.validate()?;
        let id = self.products.insert(product).await?;
        tracing::info!(%id, title = %product.title, "product created");
        Ok(id)
    }

    pub async fn list_products(
        &self,
        category: Option<&str>,
        limit: usize,
    ) -> CatalogResult<Vec<Document>> {
        let filter = Filter::all().eq_opt("category", category);
        Ok(self.products.find(&filter, limit).await?)
    }

    /// Look up a product by its wire id.
    ///
    /// A malformed id fails with `MalformedIdentifier`; a well-formed id
    /// with no product behind it fails with the store's `NotFound`.
    pub async fn get_product(&self, id: &str) -> CatalogResult<Document> {
        let id = DocumentId::from_hex(id)?;
        Ok(self.products.get(&id).await?)
    }

    pub async fn seed_products(&self) -> CatalogResult<SeedReport> {
        self.seeder.seed_if_empty(&starter_products()).await
    }

    // ---- Orders ----

    /// Validate every line, then store the order. The two steps are not
    /// atomic.
    pub async fn create_order(&self, order: &Order) -> CatalogResult<DocumentId> {
        order.validate()?;
        if let Err(err) = self.validator.validate(order).await {
            tracing::warn!(error = %err, "order rejected");
            return Err(err);
        }
        let id = self.orders.insert(order).await?;
        tracing::info!(%id, items = order.items.len(), "order created");
        Ok(id)
    }

    pub async fn list_orders(&self, limit: usize) -> CatalogResult<Vec<Document>> {
        Ok(self.orders.find(&Filter::all(), limit).await?)
    }

    // ---- Diagnostics ----

    /// Never fails: problems are reported in the result.
    pub async fn diagnostics(&self) -> Diagnostics {
        let mut report = Diagnostics {
            backend: self.db.backend().to_string(),
            database_name: self.db.name().to_string(),
            available: false,
            collections: Vec::new(),
            error: None,
        };
        if let Err(e) = self.db.ping().await {
            report.error = Some(e.to_string());
            return report;
        }
        report.available = true;
        match self.db.list_collections().await {
            Ok(mut names) => {
                names.truncate(DIAGNOSTIC_COLLECTIONS);
                report.collections = names;
            }
            Err(e) => report.error = Some(e.to_string()),
        }
        report
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("database", &self.db)
            .field("products", &Product::COLLECTION)
            .field("orders", &Order::COLLECTION)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::seeder::SeedStatus;
    use serde_json::json;
    use storefront_store::{DocumentStore, StoreError, PUBLIC_ID_FIELD};
    use storefront_types::OrderItem;

    fn catalog() -> Catalog {
        Catalog::new(Arc::new(Database::in_memory("test")))
    }

    fn mug() -> Product {
        Product::new("Mug", 349.0, "Home")
    }

    #[tokio::test]
    async fn create_and_get_product() {
        let catalog = catalog();
        let id = catalog.create_product(&mug()).await.unwrap();

        let doc = catalog.get_product(&id.to_hex()).await.unwrap();
        assert_eq!(doc.id, Some(id));
        assert_eq!(doc.decode::<Product>().unwrap(), mug());
    }

    #[tokio::test]
    async fn invalid_product_is_not_stored() {
        let catalog = catalog();
        let err = catalog
            .create_product(&Product::new("Mug", -5.0, "Home"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert!(catalog.list_products(None, 50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_product_distinguishes_malformed_from_missing() {
        let catalog = catalog();
        assert!(matches!(
            catalog.get_product("xyz").await,
            Err(CatalogError::MalformedIdentifier(id)) if id == "xyz"
        ));
        assert!(matches!(
            catalog.get_product("000000000000000000000000").await,
            Err(CatalogError::Store(StoreError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn list_products_filters_by_category() {
        let catalog = catalog();
        catalog.seed_products().await.unwrap();

        let home = catalog.list_products(Some("Home"), 50).await.unwrap();
        assert_eq!(home.len(), 1);
        assert_eq!(home[0].get("title"), Some(&json!("Ceramic Coffee Mug")));

        assert_eq!(catalog.list_products(None, 50).await.unwrap().len(), 4);
        assert_eq!(catalog.list_products(None, 2).await.unwrap().len(), 2);
        assert!(catalog.list_products(Some("Garden"), 50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn seed_products_is_idempotent() {
        let catalog = catalog();
        assert_eq!(catalog.seed_products().await.unwrap().status, SeedStatus::Seeded);
        let again = catalog.seed_products().await.unwrap();
        assert_eq!(again.status, SeedStatus::AlreadySeeded);
        assert_eq!(again.inserted_count, 0);
    }

    #[tokio::test]
    async fn order_flow() {
        let catalog = catalog();
        let product_id = catalog.create_product(&mug()).await.unwrap();
        let order = Order::new(vec![OrderItem::new(product_id.to_hex(), 2)]);
        let order_id = catalog.create_order(&order).await.unwrap();

        let orders = catalog.list_orders(50).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, Some(order_id));
        assert_eq!(orders[0].decode::<Order>().unwrap(), order);
    }

    #[tokio::test]
    async fn order_with_unknown_product_is_rejected_and_not_stored() {
        let catalog = catalog();
        let order = Order::new(vec![OrderItem::new("000000000000000000000000", 1)]);
        let err = catalog.create_order(&order).await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidReference(id) if id == "000000000000000000000000"));
        assert!(catalog.list_orders(50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_order_is_accepted() {
        let catalog = catalog();
        catalog.create_order(&Order::default()).await.unwrap();
        assert_eq!(catalog.list_orders(50).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn serialized_product_exposes_string_id() {
        let catalog = catalog();
        let id = catalog.create_product(&mug()).await.unwrap();
        let docs = catalog.list_products(None, 50).await.unwrap();
        let views = storefront_store::serialize_all(&docs);
        assert_eq!(views[0][PUBLIC_ID_FIELD], json!(id.to_hex()));
    }

    #[tokio::test]
    async fn diagnostics_list_at_most_ten_collections() {
        let catalog = catalog();
        let store = catalog.database().store();
        for n in 0..12 {
            let mut fields = serde_json::Map::new();
            fields.insert("n".into(), json!(n));
            store.insert(&format!("c{n:02}"), fields).await.unwrap();
        }

        let report = catalog.diagnostics().await;
        assert!(report.available);
        assert_eq!(report.collections.len(), 10);
        let expected: Vec<String> = (0..10).map(|n| format!("c{n:02}")).collect();
        assert_eq!(report.collections, expected);
    }

    #[tokio::test]
    async fn diagnostics_report_collections_and_availability() {
        let catalog = catalog();
        catalog.seed_products().await.unwrap();

        let report = catalog.diagnostics().await;
        assert!(report.available);
        assert_eq!(report.backend, "memory");
        assert_eq!(report.database_name, "test");
        assert_eq!(report.collections, vec!["product".to_string()]);
        assert!(report.error.is_none());

        catalog.database().close().await;
        let report = catalog.diagnostics().await;
        assert!(!report.available);
        assert!(report.error.is_some());
    }
}
