//! Table artifact - View Component

use super::model::{metadata_entries, TableGrid};
use crate::chat::view_model::ChatVm;
use crate::shared::export::{export_table_csv, export_tables_zip, ExportError};
use crate::shared::icons::icon;
use contracts::chat::TableArtifact;
use leptos::ev;
use leptos::prelude::*;
use thaw::*;
use wasm_bindgen::JsCast;

const SELECT_INPUT_ID: &str = "artifact-select";

#[component]
#[allow(non_snake_case)]
pub fn TableArtifactView(vm: ChatVm, table: TableArtifact) -> impl IntoView {
    let query = RwSignal::new(table.fact.clone());
    let list_open = RwSignal::new(false);

    let matches = Memo::new(move |_| {
        let q = query.get();
        vm.session.with(|s| {
            let store = s.store();
            store
                .filter_indices(&q)
                .into_iter()
                .filter_map(|i| store.get(i).map(|t| (i, t.fact.clone())))
                .collect::<Vec<_>>()
        })
    });

    // Any click outside the selector input closes the dropdown
    let handle = window_event_listener(ev::click, move |ev| {
        let target_id = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .map(|el| el.id());
        if target_id.as_deref() != Some(SELECT_INPUT_ID) {
            list_open.set(false);
        }
    });
    on_cleanup(move || handle.remove());

    let grid = TableGrid::from_artifact(&table);
    let metadata = metadata_entries(&table);
    let csv_table = table.clone();

    let on_download_csv = move |_| {
        if let Err(e) = export_table_csv(&csv_table) {
            log::error!("Failed to export CSV: {}", e);
        }
    };

    let on_download_zip = move |_| {
        let tables = vm.session.with_untracked(|s| s.store().all().to_vec());
        match export_tables_zip(&tables) {
            Ok(()) => {}
            Err(ExportError::Empty) => log::warn!("No tables available to download"),
            Err(e) => log::error!("Failed to export ZIP: {}", e),
        }
    };

    view! {
        <div class="artifact-table">
            <div class="artifact-select" style="position: relative; margin-bottom: 12px;">
                <input
                    id=SELECT_INPUT_ID
                    type="text"
                    class="form__input"
                    style="width: 100%;"
                    placeholder="Search tables..."
                    autocomplete="off"
                    prop:value=move || query.get()
                    on:focus=move |_| {
                        query.set(String::new());
                        list_open.set(true);
                    }
                    on:input=move |ev| {
                        query.set(event_target_value(&ev));
                        list_open.set(true);
                    }
                />
                <Show when=move || list_open.get()>
                    <div
                        class="artifact-select__list"
                        style="position: absolute; z-index: 10; left: 0; right: 0; max-height: 240px; overflow-y: auto; background: var(--colorNeutralBackground1); border: 1px solid var(--colorNeutralStroke2); border-radius: 4px;"
                    >
                        {move || {
                            let items = matches.get();
                            if items.is_empty() {
                                view! {
                                    <div class="artifact-select__empty" style="padding: 6px 10px; color: var(--colorNeutralForeground3);">
                                        "No matching tables found"
                                    </div>
                                }
                                    .into_any()
                            } else {
                                items
                                    .into_iter()
                                    .map(|(index, fact)| {
                                        view! {
                                            <div
                                                class="artifact-select__item"
                                                style="padding: 6px 10px; cursor: pointer;"
                                                on:click=move |_| {
                                                    list_open.set(false);
                                                    vm.select_table_at(index);
                                                }
                                            >
                                                {fact}
                                            </div>
                                        }
                                    })
                                    .collect_view()
                                    .into_any()
                            }
                        }}
                    </div>
                </Show>
            </div>

            <Flex align=FlexAlign::Center style="gap: 8px; margin-bottom: 12px;">
                <Button appearance=ButtonAppearance::Secondary on_click=on_download_csv>
                    {icon("download")}
                    " Download Selected Table (CSV)"
                </Button>
                <Button appearance=ButtonAppearance::Secondary on_click=on_download_zip>
                    {icon("download")}
                    " Download All Tables (ZIP)"
                </Button>
            </Flex>

            <div class="artifact-metadata" style="margin-bottom: 12px;">
                {metadata
                    .into_iter()
                    .map(|(name, value)| {
                        view! {
                            <div>
                                <strong>{format!("{}:", name)}</strong>
                                " "
                                {value}
                            </div>
                        }
                    })
                    .collect_view()}
            </div>

            {if grid.is_empty() {
                view! { <p>"No table data available."</p> }.into_any()
            } else {
                let TableGrid { columns, rows } = grid;
                view! {
                    <div style="overflow-x: auto;">
                        <Table>
                            <TableHeader>
                                <TableRow>
                                    {columns
                                        .into_iter()
                                        .map(|column| view! { <TableHeaderCell>{column}</TableHeaderCell> })
                                        .collect_view()}
                                </TableRow>
                            </TableHeader>
                            <TableBody>
                                {rows
                                    .into_iter()
                                    .map(|cells| {
                                        view! {
                                            <TableRow>
                                                {cells
                                                    .into_iter()
                                                    .map(|cell| {
                                                        view! {
                                                            <TableCell>
                                                                <TableCellLayout>{cell}</TableCellLayout>
                                                            </TableCell>
                                                        }
                                                    })
                                                    .collect_view()}
                                            </TableRow>
                                        }
                                    })
                                    .collect_view()}
                            </TableBody>
                        </Table>
                    </div>
                }
                    .into_any()
            }}
        </div>
    }
}
