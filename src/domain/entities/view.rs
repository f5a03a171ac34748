use std::cmp::Ordering;

use crate::domain::entities::edit::StagedEdits;
use crate::domain::entities::price::{is_sentinel, PriceField, PriceTable};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortColumn {
    #[default]
    Region,
    Home,
    Desk,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Clicking the active column flips direction, another column starts ascending.
    pub fn toggled(self, column: SortColumn) -> Self {
        if self.column == column {
            let direction = match self.direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
            Self { column, direction }
        } else {
            Self {
                column,
                direction: SortDirection::Asc,
            }
        }
    }
}

/// One rendered table line: displayed values are staged edits over committed prices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRow {
    pub region: String,
    pub home: u64,
    pub desk: u64,
    pub home_dirty: bool,
    pub desk_dirty: bool,
    pub editable: bool,
}

impl RegionRow {
    pub fn value(&self, field: PriceField) -> u64 {
        match field {
            PriceField::Home => self.home,
            PriceField::Desk => self.desk,
        }
    }

    pub fn is_dirty(&self, field: PriceField) -> bool {
        match field {
            PriceField::Home => self.home_dirty,
            PriceField::Desk => self.desk_dirty,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
    pub region_count: usize,
    pub avg_home: u64,
    pub avg_desk: u64,
    pub pending: usize,
}

/// Case-insensitive substring match on the region name.
pub fn matches_filter(region: &str, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    term.is_empty() || region.to_lowercase().contains(&term)
}

pub fn filter_regions(table: &PriceTable, term: &str) -> Vec<String> {
    table
        .keys()
        .filter(|region| matches_filter(region, term))
        .cloned()
        .collect()
}

/// Rows for `regions`, typically the output of [`filter_regions`]; names
/// missing from `table` show their staged values over zero.
pub fn build_rows(
    table: &PriceTable,
    edits: &StagedEdits,
    regions: &[String],
    sort: SortSpec,
) -> Vec<RegionRow> {
    let mut rows: Vec<RegionRow> = regions
        .iter()
        .map(|region| {
            let shown = edits.merged(table, region);
            RegionRow {
                region: region.clone(),
                home: shown.home,
                desk: shown.desk,
                home_dirty: edits.is_dirty(region, PriceField::Home),
                desk_dirty: edits.is_dirty(region, PriceField::Desk),
                editable: !is_sentinel(region),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        let ordering = match sort.column {
            SortColumn::Region => a.region.cmp(&b.region),
            SortColumn::Home => a.home.cmp(&b.home).then_with(|| a.region.cmp(&b.region)),
            SortColumn::Desk => a.desk.cmp(&b.desk).then_with(|| a.region.cmp(&b.region)),
        };
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    rows
}

fn rounded_average(values: &[u64]) -> u64 {
    if values.is_empty() {
        return 0;
    }
    let total: u128 = values.iter().map(|value| *value as u128).sum();
    let count = values.len() as u128;
    let quotient = total / count;
    match (total % count * 2).cmp(&count) {
        Ordering::Less => quotient as u64,
        _ => (quotient + 1) as u64,
    }
}

/// Committed-table statistics; the sentinel and zero prices are left out of averages.
pub fn table_stats(table: &PriceTable, edits: &StagedEdits) -> TableStats {
    let regions: Vec<_> = table
        .iter()
        .filter(|(region, _)| !is_sentinel(region))
        .collect();
    let homes: Vec<u64> = regions
        .iter()
        .map(|(_, prices)| prices.home)
        .filter(|value| *value > 0)
        .collect();
    let desks: Vec<u64> = regions
        .iter()
        .map(|(_, prices)| prices.desk)
        .filter(|value| *value > 0)
        .collect();

    TableStats {
        region_count: regions.len(),
        avg_home: rounded_average(&homes),
        avg_desk: rounded_average(&desks),
        pending: edits.pending_count(),
    }
}
