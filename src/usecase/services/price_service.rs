use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::domain::entities::defaults::bundled_default_table;
use crate::domain::entities::document::ExportDocument;
use crate::domain::entities::edit::StagedEdits;
use crate::domain::entities::price::{is_sentinel, PriceField, PricePair, PriceTable};
use crate::domain::entities::view::{
    build_rows, filter_regions, table_stats, RegionRow, SortSpec, TableStats,
};
use crate::infra::document::json::price_table_from_document;
use crate::usecase::error::{PanelError, ValidationError};
use crate::usecase::notice::Notice;
use crate::usecase::ports::confirm::{ConfirmPrompt, Confirmer};
use crate::usecase::ports::gateway::{FieldWrite, PriceGateway};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableSource {
    #[default]
    NotLoaded,
    Gateway,
    BundledDefault,
}

#[derive(Debug, Default)]
struct PriceState {
    committed: PriceTable,
    edits: StagedEdits,
    source: TableSource,
}

struct LoadGuard<'a>(&'a AtomicBool);

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Committed price table plus unsaved edits, kept in step with a [`PriceGateway`].
///
/// Local state only changes after the gateway call it depends on succeeds, and
/// the state lock is never held across an await.
pub struct PriceService {
    gateway: Arc<dyn PriceGateway>,
    state: Mutex<PriceState>,
    loading: AtomicBool,
}

pub fn validate_new_region(
    table: &PriceTable,
    name: &str,
    home: i64,
    desk: i64,
) -> Result<(String, PricePair), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.chars().count() < 2 {
        return Err(ValidationError::NameTooShort);
    }
    if table.contains_key(name) {
        return Err(ValidationError::DuplicateRegion(name.to_string()));
    }
    let (Ok(home), Ok(desk)) = (u64::try_from(home), u64::try_from(desk)) else {
        return Err(ValidationError::NegativePrice);
    };
    Ok((name.to_string(), PricePair::new(home, desk)))
}

impl PriceService {
    pub fn new(gateway: Arc<dyn PriceGateway>) -> Self {
        Self {
            gateway,
            state: Mutex::new(PriceState::default()),
            loading: AtomicBool::new(false),
        }
    }

    fn begin_load(&self) -> Option<LoadGuard<'_>> {
        self.loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LoadGuard(&self.loading))
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Fetches the committed table. A gateway failure installs the bundled
    /// defaults and is reported as a notice, not an error. Returns `None`
    /// when another load is already running.
    pub async fn load(&self) -> Option<Notice> {
        let Some(_guard) = self.begin_load() else {
            debug!("load already in flight, ignoring request");
            return None;
        };

        let (table, source, notice) = match self.gateway.get_all().await {
            Ok(table) => {
                info!(regions = table.len(), "loaded delivery prices");
                let notice = Notice::success("Delivery prices loaded");
                (table, TableSource::Gateway, notice)
            }
            Err(err) => {
                warn!(error = %err, "failed to load delivery prices, using bundled defaults");
                let notice = Notice::error(format!(
                    "Failed to load delivery prices ({err}); showing bundled defaults"
                ));
                (bundled_default_table(), TableSource::BundledDefault, notice)
            }
        };

        let mut state = self.state.lock();
        state.edits.retain_differing(&table);
        state.committed = table;
        state.source = source;
        Some(notice)
    }

    /// Stages a typed value. The sentinel region is never editable.
    pub fn record_edit(&self, region: &str, field: PriceField, proposed: u64) -> bool {
        if is_sentinel(region) {
            return false;
        }
        let mut state = self.state.lock();
        let PriceState {
            committed, edits, ..
        } = &mut *state;
        edits.record(committed, region, field, proposed)
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().edits.pending_count()
    }

    pub fn is_dirty(&self, region: &str, field: PriceField) -> bool {
        self.state.lock().edits.is_dirty(region, field)
    }

    /// Value shown for a cell: the staged edit if any, else the committed price.
    pub fn display_value(&self, region: &str, field: PriceField) -> u64 {
        let state = self.state.lock();
        state.edits.merged(&state.committed, region).get(field)
    }

    pub fn committed(&self) -> PriceTable {
        self.state.lock().committed.clone()
    }

    pub fn source(&self) -> TableSource {
        self.state.lock().source
    }

    pub async fn save_region(&self, region: &str) -> Result<Notice, PanelError> {
        let prices = {
            let state = self.state.lock();
            if !state.committed.contains_key(region) && state.edits.get(region).is_none() {
                return Err(ValidationError::UnknownRegion(region.to_string()).into());
            }
            state.edits.merged(&state.committed, region)
        };

        if let Err(err) = self.gateway.set_region(region, prices).await {
            error!(region, error = %err, "failed to save region prices");
            return Err(err.into());
        }

        let mut state = self.state.lock();
        state.committed.insert(region.to_string(), prices);
        state.edits.remove_region(region);
        info!(region, home = prices.home, desk = prices.desk, "saved region prices");
        Ok(Notice::success(format!("Prices for \"{region}\" updated")))
    }

    /// Writes every staged field in one atomic multi-field update. Returns
    /// `None` when the operator declines the confirmation.
    pub async fn save_all(&self, confirmer: &dyn Confirmer) -> Result<Option<Notice>, PanelError> {
        let (pending, writes) = {
            let state = self.state.lock();
            if state.edits.is_empty() {
                return Ok(Some(Notice::info("There are no changes to save")));
            }
            let writes: Vec<FieldWrite> = state
                .edits
                .cells()
                .into_iter()
                .map(|(cell, value)| FieldWrite {
                    region: cell.region,
                    field: cell.field,
                    value,
                })
                .collect();
            (state.edits.pending_count(), writes)
        };

        if !confirmer.confirm(&ConfirmPrompt::SaveAll { pending }) {
            debug!(pending, "batch save cancelled");
            return Ok(None);
        }

        if let Err(err) = self.gateway.atomic_multi_write(&writes).await {
            error!(pending, error = %err, "batch save failed");
            return Err(err.into());
        }

        let mut state = self.state.lock();
        for write in &writes {
            state
                .committed
                .entry(write.region.clone())
                .or_default()
                .set(write.field, write.value);
        }
        state.edits.clear();
        info!(regions = pending, fields = writes.len(), "saved all staged prices");
        Ok(Some(Notice::success(format!(
            "Saved changes for {pending} region(s)"
        ))))
    }

    pub async fn add_region(&self, name: &str, home: i64, desk: i64) -> Result<Notice, PanelError> {
        let (name, prices) = {
            let state = self.state.lock();
            validate_new_region(&state.committed, name, home, desk)?
        };

        if let Err(err) = self.gateway.set_region(&name, prices).await {
            error!(region = %name, error = %err, "failed to add region");
            return Err(err.into());
        }

        self.state.lock().committed.insert(name.clone(), prices);
        info!(region = %name, "added region");
        Ok(Notice::success(format!("Region \"{name}\" added")))
    }

    pub async fn delete_region(
        &self,
        name: &str,
        confirmer: &dyn Confirmer,
    ) -> Result<Option<Notice>, PanelError> {
        let prompt = ConfirmPrompt::DeleteRegion {
            region: name.to_string(),
        };
        if !confirmer.confirm(&prompt) {
            return Ok(None);
        }

        if let Err(err) = self.gateway.delete_region(name).await {
            error!(region = name, error = %err, "failed to delete region");
            return Err(err.into());
        }

        let mut state = self.state.lock();
        state.committed.remove(name);
        state.edits.remove_region(name);
        info!(region = name, "deleted region");
        Ok(Some(Notice::success(format!("Region \"{name}\" deleted"))))
    }

    /// Imports a parsed document holding a price table.
    pub async fn import_table(
        &self,
        document: &Value,
        confirmer: &dyn Confirmer,
    ) -> Result<Option<Notice>, PanelError> {
        let table = price_table_from_document(document)?;
        self.import_price_table(table, confirmer).await
    }

    /// Replaces the remote and local tables wholesale; unsaved edits are dropped.
    pub async fn import_price_table(
        &self,
        table: PriceTable,
        confirmer: &dyn Confirmer,
    ) -> Result<Option<Notice>, PanelError> {
        let regions = table.len();
        if !confirmer.confirm(&ConfirmPrompt::Import { regions }) {
            return Ok(None);
        }

        if let Err(err) = self.gateway.bulk_set(&table).await {
            error!(regions, error = %err, "import failed");
            return Err(err.into());
        }

        let mut state = self.state.lock();
        let discarded = state.edits.pending_count();
        state.committed = table;
        state.edits.clear();
        state.source = TableSource::Gateway;
        info!(regions, discarded, "imported price table");
        Ok(Some(Notice::success(format!(
            "Imported prices for {regions} region(s)"
        ))))
    }

    /// Committed prices only; staged edits are not exported.
    pub fn export_table(&self) -> ExportDocument {
        ExportDocument::new(self.committed(), Utc::now())
    }

    /// Region names containing `term`, case-insensitively, in name order.
    pub fn filter(&self, term: &str) -> Vec<String> {
        filter_regions(&self.state.lock().committed, term)
    }

    pub fn rows(&self, regions: &[String], sort: SortSpec) -> Vec<RegionRow> {
        let state = self.state.lock();
        build_rows(&state.committed, &state.edits, regions, sort)
    }

    pub fn stats(&self) -> TableStats {
        let state = self.state.lock();
        table_stats(&state.committed, &state.edits)
    }
}
