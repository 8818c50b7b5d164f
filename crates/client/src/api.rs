//! The link API collaborator contract.

use async_trait::async_trait;
use kogebog_core::model::{
    MappingPatch, OptionPatch, ProductMapping, Supplier, SupplierOption, SupplierPatch,
};

use crate::error::ApiError;

/// Remote CRUD over mappings, supplier options and suppliers.
///
/// Every call is keyed by id. Deleting an id that does not exist is an
/// error ([`ApiError::NotFound`]), never silently ignored. Deleting a mapping
/// removes its options on the server side.
#[async_trait]
pub trait LinkApi: Send + Sync {
    /// All mappings, in the server's list order.
    async fn list_mappings(&self) -> Result<Vec<ProductMapping>, ApiError>;
    async fn create_mapping(&self, mapping: &ProductMapping) -> Result<ProductMapping, ApiError>;
    async fn update_mapping(&self, id: &str, patch: &MappingPatch)
        -> Result<ProductMapping, ApiError>;
    async fn delete_mapping(&self, id: &str) -> Result<(), ApiError>;

    async fn list_options(&self) -> Result<Vec<SupplierOption>, ApiError>;
    async fn create_option(&self, option: &SupplierOption) -> Result<SupplierOption, ApiError>;
    async fn update_option(&self, id: &str, patch: &OptionPatch)
        -> Result<SupplierOption, ApiError>;
    async fn delete_option(&self, id: &str) -> Result<(), ApiError>;

    async fn list_suppliers(&self) -> Result<Vec<Supplier>, ApiError>;
    async fn create_supplier(&self, supplier: &Supplier) -> Result<Supplier, ApiError>;
    async fn update_supplier(&self, id: &str, patch: &SupplierPatch)
        -> Result<Supplier, ApiError>;
    async fn delete_supplier(&self, id: &str) -> Result<(), ApiError>;
}
