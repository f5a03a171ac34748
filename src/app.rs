use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use dioxus::prelude::*;
use tracing::{debug, error, info};

use crate::config::{load_config, Backend};
use crate::domain::entities::document::export_file_name;
use crate::domain::entities::price::{parse_price_input, parse_signed_price_input, PriceField};
use crate::domain::entities::view::{SortColumn, SortDirection};
use crate::infra::open_gateway;
use crate::platform::desktop::dialogs::{pick_export_file, pick_import_file, DialogConfirmer};
use crate::platform::desktop::paths::{default_config_path, default_data_dir};
use crate::ui::state::app_state::AppState;
use crate::ui::style::{
    cell_style, notice_style, price_input_style, table_container_style, table_header_cell_style,
};
use crate::usecase::notice::Notice;
use crate::usecase::services::price_service::{PriceService, TableSource};
use crate::usecase::services::transfer_service::{ImportSource, TransferFormat, TransferService};

fn build_price_service() -> Result<Arc<PriceService>> {
    let config_path = default_config_path()?;
    let config = load_config(&config_path, true)?
        .with_env(|key| std::env::var(key).ok())
        .resolve(&default_data_dir()?);
    match &config.backend {
        Backend::Firebase(firebase) => {
            info!(url = %firebase.database_url, root = %firebase.root_path, "using realtime database")
        }
        Backend::Sqlite { path } => info!(path = %path.display(), "using local price store"),
    }
    let gateway = open_gateway(&config.backend)?;
    Ok(Arc::new(PriceService::new(gateway)))
}

fn sort_marker(active: SortColumn, direction: SortDirection, column: SortColumn) -> &'static str {
    if active != column {
        return "";
    }
    match direction {
        SortDirection::Asc => " ▲",
        SortDirection::Desc => " ▼",
    }
}

#[component]
pub fn App() -> Element {
    let state = AppState::new();
    let service = use_hook(|| build_price_service().map_err(|err| format!("{err:#}")));

    let service = match service {
        Ok(service) => service,
        Err(err) => {
            error!(error = %err, "failed to start");
            return rsx! {
                div {
                    p { "Unable to start the delivery price panel: {err}" }
                }
            };
        }
    };

    let service_for_init = service.clone();
    use_effect(move || {
        let service = service_for_init.clone();
        spawn(async move {
            state.set_busy(true);
            if let Some(notice) = service.load().await {
                state.notify(notice);
            }
            state.refresh(&service);
            state.set_busy(false);
        });
    });

    let service_for_reload = service.clone();
    let reload = move |_: MouseEvent| {
        let service = service_for_reload.clone();
        if service.is_loading() {
            debug!("reload requested while loading");
            return;
        }
        spawn(async move {
            state.set_busy(true);
            if let Some(notice) = service.load().await {
                state.notify(notice);
            }
            state.refresh(&service);
            state.set_busy(false);
        });
    };

    let service_for_save_all = service.clone();
    let save_all = move |_: MouseEvent| {
        let service = service_for_save_all.clone();
        spawn(async move {
            state.set_busy(true);
            let result = service.save_all(&DialogConfirmer).await;
            state.report_optional(result);
            state.refresh(&service);
            state.set_busy(false);
        });
    };

    let service_for_add = service.clone();
    let add_region = move |_: MouseEvent| {
        let service = service_for_add.clone();
        let name = state.new_region_name.cloned();
        let home = parse_signed_price_input(&state.new_region_home.cloned());
        let desk = parse_signed_price_input(&state.new_region_desk.cloned());
        spawn(async move {
            state.set_busy(true);
            let result = service.add_region(&name, home, desk).await;
            if result.is_ok() {
                state.clear_new_region();
            }
            state.report(result);
            state.refresh(&service);
            state.set_busy(false);
        });
    };

    let service_for_import = service.clone();
    let import_file = move |_: MouseEvent| {
        let service = service_for_import.clone();
        let Some(path) = pick_import_file() else {
            return;
        };
        spawn(async move {
            state.set_busy(true);
            match TransferService.read_import(&path) {
                Ok(ImportSource::Document(document)) => {
                    let result = service.import_table(&document, &DialogConfirmer).await;
                    state.report_optional(result);
                }
                Ok(ImportSource::Table(table)) => {
                    let result = service.import_price_table(table, &DialogConfirmer).await;
                    state.report_optional(result);
                }
                Err(err) => {
                    let message = format!("{err:#}");
                    error!(path = %path.display(), error = %message, "import failed");
                    state.notify(Notice::error(format!("Import failed: {message}")));
                }
            }
            state.refresh(&service);
            state.set_busy(false);
        });
    };

    let service_for_export = service.clone();
    let export_file = move |_: MouseEvent| {
        let document = service_for_export.export_table();
        let default_name = export_file_name(
            Local::now().date_naive(),
            TransferFormat::Json.extension(),
        );
        let Some(path) = pick_export_file(&default_name) else {
            return;
        };
        match TransferService.write_export(&path, &document) {
            Ok(()) => {
                info!(path = %path.display(), regions = document.region_count, "exported prices");
                state.notify(Notice::success(format!(
                    "Exported {} region(s) to {}",
                    document.region_count,
                    path.display()
                )));
            }
            Err(err) => {
                let message = format!("{err:#}");
                error!(path = %path.display(), error = %message, "export failed");
                state.notify(Notice::error(format!("Export failed: {message}")));
            }
        }
    };

    let service_for_search = service.clone();
    let service_for_sort_region = service.clone();
    let service_for_sort_home = service.clone();
    let service_for_sort_desk = service.clone();

    let busy = state.busy.cloned();
    let stats = state.stats.cloned();
    let sort = state.sort.cloned();
    let rows = state.rows.cloned();
    let notice = state.notice.cloned();
    let save_label = if stats.pending > 0 {
        format!("Save changes ({})", stats.pending)
    } else {
        "Save all changes".to_string()
    };
    let is_fallback = state.source.cloned() == TableSource::BundledDefault;
    let notice_banner = notice.map(|notice| {
        rsx! {
            div {
                style: "{notice_style(notice.level)}",
                span { style: "flex: 1;", "{notice.message}" }
                button {
                    style: "background: none; border: none; cursor: pointer;",
                    onclick: move |_| state.dismiss_notice(),
                    "✕"
                }
            }
        }
    });

    rsx! {
        div {
            style: "font-family: sans-serif; padding: 16px; display: flex; flex-direction: column; gap: 12px;",

            {notice_banner}

            div {
                style: "display: flex; gap: 24px; align-items: center;",
                span { "Regions: {stats.region_count}" }
                span { "Average home price: {stats.avg_home} DA" }
                span { "Average desk price: {stats.avg_desk} DA" }
                if is_fallback {
                    span { style: "color: #a60;", "Offline: showing bundled defaults" }
                }
                if busy {
                    span { style: "color: #666;", "Working…" }
                }
            }

            div {
                style: "display: flex; gap: 8px; align-items: center; flex-wrap: wrap;",
                input {
                    r#type: "text",
                    placeholder: "Search regions…",
                    value: state.search.cloned(),
                    oninput: move |event| state.set_search(event.value(), &service_for_search),
                }
                button { disabled: busy, onclick: reload, "Reload" }
                button { disabled: busy, onclick: import_file, "Import from file" }
                button { disabled: busy, onclick: export_file, "Export to file" }
                button {
                    disabled: busy,
                    style: if stats.pending > 0 { "background: #ffa500;" } else { "" },
                    onclick: save_all,
                    "{save_label}"
                }
            }

            div {
                style: "display: flex; gap: 8px; align-items: center;",
                input {
                    r#type: "text",
                    placeholder: "New region name",
                    value: state.new_region_name.cloned(),
                    oninput: move |event| {
                        let mut name = state.new_region_name;
                        name.set(event.value());
                    },
                }
                input {
                    r#type: "number",
                    min: "0",
                    placeholder: "Home price",
                    value: state.new_region_home.cloned(),
                    oninput: move |event| {
                        let mut home = state.new_region_home;
                        home.set(event.value());
                    },
                }
                input {
                    r#type: "number",
                    min: "0",
                    placeholder: "Desk price",
                    value: state.new_region_desk.cloned(),
                    oninput: move |event| {
                        let mut desk = state.new_region_desk;
                        desk.set(event.value());
                    },
                }
                button { disabled: busy, onclick: add_region, "Add region" }
            }

            div {
                style: "{table_container_style()}",
                table { style: "border-collapse: collapse; width: 100%; background: #fff;",
                    thead {
                        tr {
                            th {
                                style: "{table_header_cell_style()}",
                                onclick: move |_| state.toggle_sort(SortColumn::Region, &service_for_sort_region),
                                "Region{sort_marker(sort.column, sort.direction, SortColumn::Region)}"
                            }
                            th {
                                style: "{table_header_cell_style()}",
                                onclick: move |_| state.toggle_sort(SortColumn::Home, &service_for_sort_home),
                                "Home delivery{sort_marker(sort.column, sort.direction, SortColumn::Home)}"
                            }
                            th {
                                style: "{table_header_cell_style()}",
                                onclick: move |_| state.toggle_sort(SortColumn::Desk, &service_for_sort_desk),
                                "Desk pickup{sort_marker(sort.column, sort.direction, SortColumn::Desk)}"
                            }
                            th { style: "{table_header_cell_style()}", "Actions" }
                        }
                    }
                    tbody {
                        if rows.is_empty() {
                            tr {
                                td { colspan: "4", style: "text-align: center; padding: 2rem; color: #666;",
                                    "No data to display"
                                }
                            }
                        }
                        {rows.iter().map(|row| {
                            let region = row.region.clone();
                            let editable = row.editable;
                            let price_cells = PriceField::ALL.map(|field| {
                                let service = service.clone();
                                let region = region.clone();
                                let value = row.value(field);
                                let dirty = row.is_dirty(field);
                                rsx!(
                                    td { style: "{cell_style()}",
                                        input {
                                            r#type: "number",
                                            min: "0",
                                            style: "{price_input_style(dirty)}",
                                            disabled: !editable,
                                            value: "{value}",
                                            onchange: move |event| {
                                                service.record_edit(&region, field, parse_price_input(&event.value()));
                                                state.refresh(&service);
                                            },
                                        }
                                        span { style: "margin-left: 4px; color: #666;", "DA" }
                                    }
                                )
                            });
                            let service_for_row_save = service.clone();
                            let service_for_row_delete = service.clone();
                            let region_for_save = region.clone();
                            let region_for_delete = region.clone();
                            rsx!(
                                tr { key: "{region}",
                                    td { style: "border: 1px solid #bbb; padding: 4px;",
                                        strong { "{region}" }
                                        if !editable {
                                            br {}
                                            small { style: "color: #666;", "(default)" }
                                        }
                                    }
                                    {price_cells.into_iter()}
                                    td { style: "{cell_style()}",
                                        if editable {
                                            button {
                                                disabled: busy,
                                                title: "Save changes for this region",
                                                onclick: move |_| {
                                                    let service = service_for_row_save.clone();
                                                    let region = region_for_save.clone();
                                                    spawn(async move {
                                                        state.set_busy(true);
                                                        let result = service.save_region(&region).await;
                                                        state.report(result);
                                                        state.refresh(&service);
                                                        state.set_busy(false);
                                                    });
                                                },
                                                "Save"
                                            }
                                            button {
                                                disabled: busy,
                                                title: "Delete region",
                                                style: "margin-left: 6px; color: #d24;",
                                                onclick: move |_| {
                                                    let service = service_for_row_delete.clone();
                                                    let region = region_for_delete.clone();
                                                    spawn(async move {
                                                        state.set_busy(true);
                                                        let result = service.delete_region(&region, &DialogConfirmer).await;
                                                        state.report_optional(result);
                                                        state.refresh(&service);
                                                        state.set_busy(false);
                                                    });
                                                },
                                                "Delete"
                                            }
                                        } else {
                                            span { style: "color: #999;", "Not allowed" }
                                        }
                                    }
                                }
                            )
                        })}
                    }
                }
            }
        }
    }
}
