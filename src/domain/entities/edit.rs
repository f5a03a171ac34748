use std::collections::BTreeMap;

use crate::domain::entities::price::{committed_value, PriceField, PricePair, PriceTable};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub region: String,
    pub field: PriceField,
}

/// Fields of one region that differ from the committed prices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialPrice {
    pub home: Option<u64>,
    pub desk: Option<u64>,
}

impl PartialPrice {
    pub fn get(&self, field: PriceField) -> Option<u64> {
        match field {
            PriceField::Home => self.home,
            PriceField::Desk => self.desk,
        }
    }

    fn slot(&mut self, field: PriceField) -> &mut Option<u64> {
        match field {
            PriceField::Home => &mut self.home,
            PriceField::Desk => &mut self.desk,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.home.is_none() && self.desk.is_none()
    }

    pub fn merge_over(&self, committed: PricePair) -> PricePair {
        PricePair {
            home: self.home.unwrap_or(committed.home),
            desk: self.desk.unwrap_or(committed.desk),
        }
    }
}

/// Sparse overlay of unsaved edits on top of a [`PriceTable`].
///
/// Every region kept here has at least one field that differs from the
/// committed table it was recorded against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedEdits {
    staged_cells: BTreeMap<String, PartialPrice>,
}

impl StagedEdits {
    /// Stages `proposed` for the cell, or unstages it when it matches the
    /// committed value. Returns whether the cell is dirty afterwards.
    pub fn record(
        &mut self,
        committed: &PriceTable,
        region: &str,
        field: PriceField,
        proposed: u64,
    ) -> bool {
        if proposed != committed_value(committed, region, field) {
            let entry = self.staged_cells.entry(region.to_string()).or_default();
            *entry.slot(field) = Some(proposed);
            return true;
        }

        if let Some(entry) = self.staged_cells.get_mut(region) {
            *entry.slot(field) = None;
            if entry.is_empty() {
                self.staged_cells.remove(region);
            }
        }
        false
    }

    /// Number of regions with unsaved edits, not the number of fields.
    pub fn pending_count(&self) -> usize {
        self.staged_cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged_cells.is_empty()
    }

    pub fn get(&self, region: &str) -> Option<&PartialPrice> {
        self.staged_cells.get(region)
    }

    pub fn is_dirty(&self, region: &str, field: PriceField) -> bool {
        self.staged_cells
            .get(region)
            .and_then(|entry| entry.get(field))
            .is_some()
    }

    pub fn remove_region(&mut self, region: &str) -> Option<PartialPrice> {
        self.staged_cells.remove(region)
    }

    pub fn clear(&mut self) {
        self.staged_cells.clear();
    }

    /// Every staged field, one entry per cell.
    pub fn cells(&self) -> Vec<(CellKey, u64)> {
        self.staged_cells
            .iter()
            .flat_map(|(region, entry)| {
                PriceField::ALL.into_iter().filter_map(move |field| {
                    entry.get(field).map(|value| {
                        (
                            CellKey {
                                region: region.clone(),
                                field,
                            },
                            value,
                        )
                    })
                })
            })
            .collect()
    }

    /// Prices currently shown for `region`: staged fields over committed
    /// ones, missing fields as 0.
    pub fn merged(&self, committed: &PriceTable, region: &str) -> PricePair {
        let base = committed.get(region).copied().unwrap_or_default();
        match self.staged_cells.get(region) {
            Some(entry) => entry.merge_over(base),
            None => base,
        }
    }

    /// Drops staged fields that now equal `committed`, e.g. after a reload.
    pub fn retain_differing(&mut self, committed: &PriceTable) {
        self.staged_cells.retain(|region, entry| {
            for field in PriceField::ALL {
                if entry.get(field) == Some(committed_value(committed, region, field)) {
                    *entry.slot(field) = None;
                }
            }
            !entry.is_empty()
        });
    }
}
