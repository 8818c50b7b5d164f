//! Shared test helpers: an in-memory `LinkApi` and record builders.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use kogebog_batch::BatchExecutor;
use kogebog_client::{ApiError, LinkApi};
use kogebog_core::import::RawImportRecord;
use kogebog_core::model::{
    MappingPatch, OptionPatch, OptionStatus, ProductMapping, Supplier, SupplierOption,
    SupplierPatch,
};

#[derive(Debug, Default)]
struct Store {
    mappings: Vec<ProductMapping>,
    options: Vec<SupplierOption>,
    suppliers: Vec<Supplier>,
}

/// In-memory stand-in for the remote link API.
///
/// Mirrors the server contract the core relies on: deletes of unknown ids
/// fail with `NotFound`, deleting a mapping cascades to its options, and
/// creating a mapping or option with an existing id is a conflict. Any call whose key
/// (record id, or supplier for option creation) was registered with
/// [`fail_on`](Self::fail_on) fails with HTTP 500.
#[derive(Debug, Default)]
pub struct InMemoryLinkApi {
    store: Mutex<Store>,
    failing: Mutex<HashSet<String>>,
    fail_listing: Mutex<bool>,
    calls: Mutex<Vec<String>>,
}

impl InMemoryLinkApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mappings(self, mappings: Vec<ProductMapping>) -> Self {
        self.store.lock().unwrap().mappings = mappings;
        self
    }

    pub fn with_options(self, options: Vec<SupplierOption>) -> Self {
        self.store.lock().unwrap().options = options;
        self
    }

    pub fn with_suppliers(self, suppliers: Vec<Supplier>) -> Self {
        self.store.lock().unwrap().suppliers = suppliers;
        self
    }

    pub fn fail_on(&self, key: &str) {
        self.failing.lock().unwrap().insert(key.to_string());
    }

    pub fn fail_listing(&self) {
        *self.fail_listing.lock().unwrap() = true;
    }

    /// Every call made, as `"<operation> <key>"`, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mapping_ids(&self) -> Vec<String> {
        self.store.lock().unwrap().mappings.iter().map(|m| m.id.clone()).collect()
    }

    pub fn options(&self) -> Vec<SupplierOption> {
        self.store.lock().unwrap().options.clone()
    }

    pub fn supplier_ids(&self) -> Vec<String> {
        self.store.lock().unwrap().suppliers.iter().map(|s| s.id.clone()).collect()
    }

    fn record(&self, operation: &str, key: &str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(format!("{operation} {key}"));
        if self.failing.lock().unwrap().contains(key) {
            return Err(ApiError::Api {
                status: 500,
                body: format!("{operation} {key} failed"),
            });
        }
        Ok(())
    }

    fn check_listing(&self, operation: &str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(operation.to_string());
        if *self.fail_listing.lock().unwrap() {
            return Err(ApiError::Api {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(())
    }
}

fn not_found(entity: &'static str, id: &str) -> ApiError {
    ApiError::NotFound {
        entity,
        id: id.to_string(),
    }
}

#[async_trait]
impl LinkApi for InMemoryLinkApi {
    async fn list_mappings(&self) -> Result<Vec<ProductMapping>, ApiError> {
        self.check_listing("list_mappings")?;
        Ok(self.store.lock().unwrap().mappings.clone())
    }

    async fn create_mapping(&self, mapping: &ProductMapping) -> Result<ProductMapping, ApiError> {
        self.record("create_mapping", &mapping.id)?;
        let mut store = self.store.lock().unwrap();
        if store.mappings.iter().any(|m| m.id == mapping.id) {
            return Err(ApiError::Api {
                status: 409,
                body: format!("mapping {} exists", mapping.id),
            });
        }
        store.mappings.push(mapping.clone());
        Ok(mapping.clone())
    }

    async fn update_mapping(
        &self,
        id: &str,
        patch: &MappingPatch,
    ) -> Result<ProductMapping, ApiError> {
        self.record("update_mapping", id)?;
        let mut store = self.store.lock().unwrap();
        let mapping = store
            .mappings
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found("mapping", id))?;
        if let Some(name) = &patch.name {
            mapping.name = name.clone();
        }
        if let Some(ean) = &patch.ean {
            mapping.ean = Some(ean.clone());
        }
        if let Some(keywords) = &patch.keywords {
            mapping.keywords = keywords.clone();
        }
        Ok(mapping.clone())
    }

    async fn delete_mapping(&self, id: &str) -> Result<(), ApiError> {
        self.record("delete_mapping", id)?;
        let mut store = self.store.lock().unwrap();
        let before = store.mappings.len();
        store.mappings.retain(|m| m.id != id);
        if store.mappings.len() == before {
            return Err(not_found("mapping", id));
        }
        store.options.retain(|o| o.mapping_id != id);
        Ok(())
    }

    async fn list_options(&self) -> Result<Vec<SupplierOption>, ApiError> {
        self.check_listing("list_options")?;
        Ok(self.store.lock().unwrap().options.clone())
    }

    async fn create_option(&self, option: &SupplierOption) -> Result<SupplierOption, ApiError> {
        self.record("create_option", &option.supplier)?;
        let mut store = self.store.lock().unwrap();
        if store.options.iter().any(|o| o.id == option.id) {
            return Err(ApiError::Api {
                status: 409,
                body: format!("option {} exists", option.id),
            });
        }
        store.options.push(option.clone());
        Ok(option.clone())
    }

    async fn update_option(
        &self,
        id: &str,
        patch: &OptionPatch,
    ) -> Result<SupplierOption, ApiError> {
        self.record("update_option", id)?;
        let mut store = self.store.lock().unwrap();
        let option = store
            .options
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| not_found("option", id))?;
        if let Some(status) = patch.status {
            option.status = status;
        }
        if let Some(title) = &patch.title {
            option.title = title.clone();
        }
        if let Some(url) = &patch.url {
            option.url = url.clone();
        }
        if let Some(codes) = &patch.country_codes {
            option.country_codes = codes.clone();
        }
        Ok(option.clone())
    }

    async fn delete_option(&self, id: &str) -> Result<(), ApiError> {
        self.record("delete_option", id)?;
        let mut store = self.store.lock().unwrap();
        let before = store.options.len();
        store.options.retain(|o| o.id != id);
        if store.options.len() == before {
            return Err(not_found("option", id));
        }
        Ok(())
    }

    async fn list_suppliers(&self) -> Result<Vec<Supplier>, ApiError> {
        self.check_listing("list_suppliers")?;
        Ok(self.store.lock().unwrap().suppliers.clone())
    }

    async fn create_supplier(&self, supplier: &Supplier) -> Result<Supplier, ApiError> {
        self.record("create_supplier", &supplier.id)?;
        self.store.lock().unwrap().suppliers.push(supplier.clone());
        Ok(supplier.clone())
    }

    async fn update_supplier(&self, id: &str, patch: &SupplierPatch) -> Result<Supplier, ApiError> {
        self.record("update_supplier", id)?;
        let mut store = self.store.lock().unwrap();
        let supplier = store
            .suppliers
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("supplier", id))?;
        if let Some(name) = &patch.name {
            supplier.name = name.clone();
        }
        if let Some(url) = &patch.url {
            supplier.url = Some(url.clone());
        }
        if let Some(active) = patch.active {
            supplier.active = active;
        }
        Ok(supplier.clone())
    }

    async fn delete_supplier(&self, id: &str) -> Result<(), ApiError> {
        self.record("delete_supplier", id)?;
        let mut store = self.store.lock().unwrap();
        let before = store.suppliers.len();
        store.suppliers.retain(|s| s.id != id);
        if store.suppliers.len() == before {
            return Err(not_found("supplier", id));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Executor without pacing, for fast tests.
pub fn no_delay() -> BatchExecutor {
    BatchExecutor::from_millis(0).expect("zero delay is valid")
}

pub fn mapping(id: &str, keywords: &str) -> ProductMapping {
    ProductMapping {
        id: id.to_string(),
        name: id.to_string(),
        ean: None,
        keywords: keywords.to_string(),
    }
}

pub fn option(id: &str, mapping_id: &str, supplier: &str, countries: &[&str]) -> SupplierOption {
    SupplierOption {
        id: id.to_string(),
        mapping_id: mapping_id.to_string(),
        supplier: supplier.to_string(),
        title: id.to_string(),
        url: format!("https://{supplier}.example/{id}"),
        status: OptionStatus::Active,
        country_codes: countries.iter().map(|c| c.to_string()).collect(),
        price_last_seen: None,
        updated_at: None,
    }
}

pub fn supplier(id: &str) -> Supplier {
    Supplier {
        id: id.to_string(),
        name: id.to_string(),
        url: None,
        active: true,
    }
}

pub fn row(name: &str, keywords: &str) -> RawImportRecord {
    RawImportRecord {
        name: Some(name.to_string()),
        keywords: Some(keywords.to_string()),
        ..Default::default()
    }
}

pub fn row_with_option(name: &str, keywords: &str, supplier: &str, url: &str) -> RawImportRecord {
    RawImportRecord {
        supplier: Some(supplier.to_string()),
        url: Some(url.to_string()),
        ..row(name, keywords)
    }
}
