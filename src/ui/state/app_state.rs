use dioxus::prelude::*;

use crate::domain::entities::view::{RegionRow, SortColumn, SortSpec, TableStats};
use crate::usecase::error::PanelError;
use crate::usecase::notice::Notice;
use crate::usecase::services::price_service::{PriceService, TableSource};

#[derive(Clone, Copy)]
pub struct AppState {
    pub rows: Signal<Vec<RegionRow>>,
    pub stats: Signal<TableStats>,
    pub source: Signal<TableSource>,
    pub search: Signal<String>,
    pub sort: Signal<SortSpec>,
    pub busy: Signal<bool>,
    pub notice: Signal<Option<Notice>>,
    pub new_region_name: Signal<String>,
    pub new_region_home: Signal<String>,
    pub new_region_desk: Signal<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            rows: use_signal(Vec::<RegionRow>::new),
            stats: use_signal(TableStats::default),
            source: use_signal(TableSource::default),
            search: use_signal(String::new),
            sort: use_signal(SortSpec::default),
            busy: use_signal(|| false),
            notice: use_signal(|| None::<Notice>),
            new_region_name: use_signal(String::new),
            new_region_home: use_signal(String::new),
            new_region_desk: use_signal(String::new),
        }
    }

    /// Re-reads rows and statistics from the service.
    pub fn refresh(mut self, service: &PriceService) {
        let visible = service.filter(&self.search.cloned());
        self.rows.set(service.rows(&visible, self.sort.cloned()));
        self.stats.set(service.stats());
        self.source.set(service.source());
    }

    pub fn set_busy(mut self, busy: bool) {
        self.busy.set(busy);
    }

    pub fn set_search(mut self, term: String, service: &PriceService) {
        self.search.set(term);
        self.refresh(service);
    }

    pub fn toggle_sort(mut self, column: SortColumn, service: &PriceService) {
        let next = self.sort.cloned().toggled(column);
        self.sort.set(next);
        self.refresh(service);
    }

    pub fn notify(mut self, notice: Notice) {
        self.notice.set(Some(notice));
    }

    pub fn dismiss_notice(mut self) {
        self.notice.set(None);
    }

    pub fn report(self, result: Result<Notice, PanelError>) {
        match result {
            Ok(notice) => self.notify(notice),
            Err(err) => self.notify(Notice::error(err.to_string())),
        }
    }

    /// Like [`AppState::report`]; `Ok(None)` means the operator cancelled.
    pub fn report_optional(self, result: Result<Option<Notice>, PanelError>) {
        match result {
            Ok(Some(notice)) => self.notify(notice),
            Ok(None) => {}
            Err(err) => self.notify(Notice::error(err.to_string())),
        }
    }

    pub fn clear_new_region(mut self) {
        self.new_region_name.set(String::new());
        self.new_region_home.set(String::new());
        self.new_region_desk.set(String::new());
    }
}
