use serde::{Deserialize, Serialize};
use storefront_store::Collection;
use storefront_types::Schema;

use crate::error::CatalogResult;

/// Outcome of a seeding attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedStatus {
    /// The collection was empty and the dataset was written.
    Seeded,
    /// The collection already held documents; nothing was written.
    AlreadySeeded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub inserted_count: usize,
    pub status: SeedStatus,
}

/// Inserts a fixed dataset into a collection only while it is empty.
///
/// The emptiness check and the insert are separate store calls. Two seeders
/// racing on an empty collection can both insert.
#[derive(Clone)]
pub struct Seeder<S> {
    collection: Collection<S>,
}

impl<S: Schema> Seeder<S> {
    pub fn new(collection: Collection<S>) -> Self {
        Self { collection }
    }

    pub async fn seed_if_empty(&self, dataset: &[S]) -> CatalogResult<SeedReport> {
        if !self.collection.is_empty().await? {
            tracing::debug!(collection = self.collection.name(), "seed skipped");
            return Ok(SeedReport {
                inserted_count: 0,
                status: SeedStatus::AlreadySeeded,
            });
        }
        let ids = self.collection.insert_many(dataset).await?;
        tracing::info!(
            collection = self.collection.name(),
            inserted = ids.len(),
            "seeded collection"
        );
        Ok(SeedReport {
            inserted_count: ids.len(),
            status: SeedStatus::Seeded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::starter_products;
    use serde_json::json;
    use std::sync::Arc;
    use storefront_store::{Filter, InMemoryDocumentStore};
    use storefront_types::Product;

    fn products() -> Collection<Product> {
        Collection::new(Arc::new(InMemoryDocumentStore::new()))
    }

    #[tokio::test]
    async fn seeds_once_then_reports_already_seeded() {
        let products = products();
        let seeder = Seeder::new(products.clone());
        let dataset = starter_products();

        let first = seeder.seed_if_empty(&dataset).await.unwrap();
        assert_eq!(first.status, SeedStatus::Seeded);
        assert_eq!(first.inserted_count, dataset.len());

        let second = seeder.seed_if_empty(&dataset).await.unwrap();
        assert_eq!(second.status, SeedStatus::AlreadySeeded);
        assert_eq!(second.inserted_count, 0);

        assert_eq!(products.count(&Filter::all()).await.unwrap(), dataset.len() as u64);
    }

    #[tokio::test]
    async fn non_empty_collection_is_left_alone() {
        let products = products();
        products.insert(&Product::new("Existing", 1.0, "X")).await.unwrap();

        let report = Seeder::new(products.clone())
            .seed_if_empty(&starter_products())
            .await
            .unwrap();
        assert_eq!(report.status, SeedStatus::AlreadySeeded);
        assert_eq!(products.count(&Filter::all()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn closed_store_fails_instead_of_reporting() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let seeder = Seeder::new(Collection::<Product>::new(store.clone()));
        storefront_store::DocumentStore::close(store.as_ref()).await;
        assert!(seeder.seed_if_empty(&starter_products()).await.is_err());
    }

    #[test]
    fn report_wire_format() {
        let report = SeedReport {
            inserted_count: 4,
            status: SeedStatus::Seeded,
        };
        assert_eq!(
            serde_json::to_value(report).unwrap(),
            json!({ "insertedCount": 4, "status": "seeded" })
        );
        let skipped = SeedReport {
            inserted_count: 0,
            status: SeedStatus::AlreadySeeded,
        };
        assert_eq!(serde_json::to_value(skipped).unwrap()["status"], "already-seeded");
    }
}
