//! Resolver snapshot cache.
//!
//! [`LinkCatalog`] holds the current [`CatalogSnapshot`] behind an `Arc`.
//! Refreshing builds a complete new snapshot and swaps the reference, so a
//! reader always works against one consistent index for the whole of a
//! resolution call.

use std::sync::Arc;

use chrono::Utc;
use kogebog_client::{ApiError, LinkApi};
use kogebog_core::model::{ProductMapping, SupplierOption};
use kogebog_core::purchase::select_option;
use kogebog_core::resolver;
use kogebog_core::types::{MappingId, Timestamp};
use kogebog_core::KeywordIndex;
use tokio::sync::RwLock;

/// An immutable view of mappings and options at one point in time.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub index: KeywordIndex,
    pub options: Vec<SupplierOption>,
    /// `None` until the first refresh.
    pub refreshed_at: Option<Timestamp>,
}

impl CatalogSnapshot {
    pub fn build(
        mappings: &[ProductMapping],
        options: Vec<SupplierOption>,
        refreshed_at: Timestamp,
    ) -> Self {
        Self {
            index: KeywordIndex::build(mappings),
            options,
            refreshed_at: Some(refreshed_at),
        }
    }

    pub fn resolve(&self, ingredient: &str) -> Option<&str> {
        resolver::resolve(ingredient, &self.index)
    }

    /// Resolve an ingredient and pick the option to link for `country`.
    pub fn purchase_option(&self, ingredient: &str, country: &str) -> Option<&SupplierOption> {
        let mapping_id = self.resolve(ingredient)?;
        select_option(&self.options, mapping_id, country)
    }
}

/// Shared holder of the current snapshot.
///
/// Designed to be wrapped in `Arc` and shared across tasks.
#[derive(Debug, Default)]
pub struct LinkCatalog {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl LinkCatalog {
    /// Create an empty catalog. Every lookup misses until the first refresh.
    pub fn new() -> Self {
        Self::default()
    }

    /// The snapshot currently in use.
    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&*self.current.read().await)
    }

    /// Swap in a new snapshot.
    pub async fn replace(&self, snapshot: CatalogSnapshot) {
        *self.current.write().await = Arc::new(snapshot);
    }

    /// Fetch mappings and options and swap in a freshly built snapshot.
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn refresh<A>(&self, api: &A) -> Result<Arc<CatalogSnapshot>, ApiError>
    where
        A: LinkApi + ?Sized,
    {
        let mappings = api.list_mappings().await?;
        let options = api.list_options().await?;

        let snapshot = Arc::new(CatalogSnapshot::build(&mappings, options, Utc::now()));
        *self.current.write().await = Arc::clone(&snapshot);

        tracing::info!(
            mappings = snapshot.index.len(),
            options = snapshot.options.len(),
            "Link catalog refreshed"
        );
        Ok(snapshot)
    }

    /// Resolve an ingredient against the current snapshot.
    pub async fn resolve(&self, ingredient: &str) -> Option<MappingId> {
        let snapshot = self.snapshot().await;
        let resolved = snapshot.resolve(ingredient).map(str::to_string);
        if resolved.is_none() {
            tracing::debug!(ingredient, "No product mapping for ingredient");
        }
        resolved
    }

    /// Resolve every ingredient line of a recipe against one snapshot.
    pub async fn resolve_all(&self, ingredients: &[String]) -> Vec<Option<MappingId>> {
        let snapshot = self.snapshot().await;
        resolver::resolve_all(ingredients, &snapshot.index)
            .into_iter()
            .map(|id| id.map(str::to_string))
            .collect()
    }

    /// The purchase option to show for an ingredient in `country`.
    pub async fn purchase_link(&self, ingredient: &str, country: &str) -> Option<SupplierOption> {
        self.snapshot()
            .await
            .purchase_option(ingredient, country)
            .cloned()
    }
}
