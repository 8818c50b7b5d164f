//! Bulk link administration.
//!
//! [`LinkAdmin`] feeds the link API's single-record calls through a
//! [`BatchExecutor`] so bulk actions are paced, ordered and tolerant of
//! individual failures. It never refreshes caches itself; callers refresh
//! their [`LinkCatalog`](crate::LinkCatalog) after a bulk action completes.

use std::collections::HashSet;

use chrono::Utc;
use kogebog_batch::{BatchExecutor, BatchResult};
use kogebog_client::{ApiError, LinkApi};
use kogebog_core::import::{parse_records, ParsedRecord, RawImportRecord, ValidRecord};
use kogebog_core::model::{OptionPatch, OptionStatus, SupplierOption};
use kogebog_core::types::{MappingId, OptionId, SupplierId};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Import types
// ---------------------------------------------------------------------------

/// Outcome of a bulk import.
///
/// Counts only cover records that were genuinely created. Records whose
/// mapping or option already existed are counted separately and are not
/// errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub mappings_created: usize,
    pub options_created: usize,
    /// Records whose derived mapping id already existed.
    pub mappings_existing: usize,
    /// Records whose option (same mapping, supplier and url) already existed.
    pub options_reused: usize,
    /// Malformed rows and failed API calls, one line each.
    pub errors: Vec<String>,
    pub cancelled: bool,
    pub not_attempted: usize,
}

/// The import could not start. Nothing has been written.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Failed to load existing links before import: {0}")]
    Fetch(#[from] ApiError),
}

/// Identity of an option for reuse during import.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct OptionKey {
    mapping_id: MappingId,
    supplier: SupplierId,
    url: String,
}

/// Mutable bookkeeping shared by the items of one import run.
#[derive(Debug, Default)]
struct ImportState {
    mapping_ids: HashSet<MappingId>,
    option_keys: HashSet<OptionKey>,
    /// Ids of existing options and of every option id issued in this run.
    option_ids: HashSet<OptionId>,
    mappings_created: usize,
    options_created: usize,
    mappings_existing: usize,
    options_reused: usize,
}

// ---------------------------------------------------------------------------
// LinkAdmin
// ---------------------------------------------------------------------------

/// Composition point for bulk mapping, option and supplier workflows.
pub struct LinkAdmin<A> {
    api: A,
    executor: BatchExecutor,
}

impl<A: LinkApi> LinkAdmin<A> {
    pub fn new(api: A, executor: BatchExecutor) -> Self {
        Self { api, executor }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn executor(&self) -> &BatchExecutor {
        &self.executor
    }

    /// Delete mappings one by one. The API removes their options with them.
    ///
    /// Confirmation is the caller's job.
    pub async fn bulk_delete_mappings(
        &self,
        ids: Vec<MappingId>,
        cancel: &CancellationToken,
    ) -> BatchResult<MappingId, ApiError> {
        tracing::info!(count = ids.len(), "Bulk deleting mappings");
        let api = &self.api;
        self.executor
            .run(ids, cancel, move |id| async move {
                api.delete_mapping(&id).await
            })
            .await
    }

    /// Delete suppliers one by one. Options referencing them are untouched.
    pub async fn bulk_delete_suppliers(
        &self,
        ids: Vec<SupplierId>,
        cancel: &CancellationToken,
    ) -> BatchResult<SupplierId, ApiError> {
        tracing::info!(count = ids.len(), "Bulk deleting suppliers");
        let api = &self.api;
        self.executor
            .run(ids, cancel, move |id| async move {
                api.delete_supplier(&id).await
            })
            .await
    }

    pub async fn bulk_delete_options(
        &self,
        ids: Vec<OptionId>,
        cancel: &CancellationToken,
    ) -> BatchResult<OptionId, ApiError> {
        tracing::info!(count = ids.len(), "Bulk deleting options");
        let api = &self.api;
        self.executor
            .run(ids, cancel, move |id| async move {
                api.delete_option(&id).await
            })
            .await
    }

    /// Activate or deactivate options one by one.
    pub async fn bulk_set_option_status(
        &self,
        ids: Vec<OptionId>,
        status: OptionStatus,
        cancel: &CancellationToken,
    ) -> BatchResult<OptionId, ApiError> {
        tracing::info!(count = ids.len(), %status, "Bulk updating option status");
        let api = &self.api;
        self.executor
            .run(ids, cancel, move |id| async move {
                let patch = OptionPatch {
                    status: Some(status),
                    ..Default::default()
                };
                api.update_option(&id, &patch).await.map(|_| ())
            })
            .await
    }

    /// Create mappings and options from parsed CSV rows.
    ///
    /// Malformed rows are reported and skipped. Each valid row is one batch
    /// item: its mapping is created unless a mapping with the derived id
    /// already exists (before or earlier in this import), then its option
    /// is created unless an identical one already exists.
    pub async fn bulk_import(
        &self,
        records: &[RawImportRecord],
        cancel: &CancellationToken,
    ) -> Result<ImportSummary, ImportError> {
        let mut summary = ImportSummary::default();
        let mut valid = Vec::new();

        for parsed in parse_records(records) {
            match parsed {
                ParsedRecord::Valid(record) => valid.push(record),
                ParsedRecord::Malformed(malformed) => {
                    tracing::warn!(row = malformed.row, error = %malformed.error, "Skipping malformed import row");
                    summary.errors.push(malformed.to_string());
                }
            }
        }

        tracing::info!(
            rows = records.len(),
            valid = valid.len(),
            malformed = summary.errors.len(),
            "Bulk import started"
        );

        if valid.is_empty() {
            return Ok(summary);
        }

        let state = Mutex::new(self.load_import_state().await?);
        let api = &self.api;
        let state_ref = &state;

        let result = self
            .executor
            .run(valid, cancel, move |record| {
                Self::import_record(api, record, state_ref)
            })
            .await;

        let state = state.into_inner();
        summary.mappings_created = state.mappings_created;
        summary.options_created = state.options_created;
        summary.mappings_existing = state.mappings_existing;
        summary.options_reused = state.options_reused;
        summary.cancelled = result.cancelled;
        summary.not_attempted = result.not_attempted;
        summary.errors.extend(result.errors.into_iter().map(|failed| {
            format!("row {}: {}: {}", failed.id.row, failed.id.name, failed.error)
        }));

        tracing::info!(
            mappings_created = summary.mappings_created,
            options_created = summary.options_created,
            errors = summary.errors.len(),
            "Bulk import finished"
        );

        Ok(summary)
    }

    /// Snapshot the ids and option identities that already exist.
    async fn load_import_state(&self) -> Result<ImportState, ApiError> {
        let mappings = self.api.list_mappings().await?;
        let options = self.api.list_options().await?;

        Ok(ImportState {
            mapping_ids: mappings.into_iter().map(|m| m.id).collect(),
            option_ids: options.iter().map(|o| o.id.clone()).collect(),
            option_keys: options
                .into_iter()
                .map(|o| OptionKey {
                    mapping_id: o.mapping_id,
                    supplier: o.supplier,
                    url: o.url,
                })
                .collect(),
            ..Default::default()
        })
    }

    async fn import_record(
        api: &A,
        record: ValidRecord,
        state: &Mutex<ImportState>,
    ) -> Result<(), ApiError> {
        let mapping_exists = {
            let mut state = state.lock().await;
            let exists = state.mapping_ids.contains(&record.mapping_id);
            if exists {
                state.mappings_existing += 1;
            }
            exists
        };

        if mapping_exists {
            tracing::debug!(row = record.row, mapping_id = %record.mapping_id, "Mapping already exists");
        } else {
            api.create_mapping(&record.to_mapping()).await?;
            let mut state = state.lock().await;
            state.mapping_ids.insert(record.mapping_id.clone());
            state.mappings_created += 1;
        }

        let Some(draft) = &record.option else {
            return Ok(());
        };

        let key = OptionKey {
            mapping_id: record.mapping_id.clone(),
            supplier: draft.supplier.clone(),
            url: draft.url.clone(),
        };
        let option_id = {
            let mut state = state.lock().await;
            if state.option_keys.contains(&key) {
                state.options_reused += 1;
                return Ok(());
            }
            // Reserved even if the create fails below.
            let id = SupplierOption::generate_unique_id(&draft.supplier, Utc::now(), |id| {
                state.option_ids.contains(id)
            });
            state.option_ids.insert(id.clone());
            id
        };

        api.create_option(&draft.to_option(option_id, &record.mapping_id))
            .await?;
        let mut state = state.lock().await;
        state.option_keys.insert(key);
        state.options_created += 1;
        Ok(())
    }
}
