//! Filing artifact: sandboxed document view with optional jump to a section

use crate::shared::export::{export_filing_html, export_filing_json};
use crate::shared::icons::icon;
use contracts::chat::FilingArtifact;
use leptos::prelude::*;
use thaw::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlIFrameElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

#[component]
#[allow(non_snake_case)]
pub fn FilingArtifactView(filing: FilingArtifact) -> impl IntoView {
    let FilingArtifact {
        html,
        data,
        anchor_id,
    } = filing;
    let html_for_download = html.clone();

    let on_download_html = move |_| {
        if let Err(e) = export_filing_html(&html_for_download) {
            log::error!("Failed to export filing HTML: {}", e);
        }
    };
    let on_download_json = move |_| {
        if let Err(e) = export_filing_json(&data) {
            log::error!("Failed to export filing data: {}", e);
        }
    };

    view! {
        <div class="artifact-filing" style="display: flex; flex-direction: column; height: 100%;">
            <Flex align=FlexAlign::Center style="gap: 8px; margin-bottom: 12px;">
                <Button appearance=ButtonAppearance::Secondary on_click=on_download_html>
                    {icon("document")}
                    " Download Filing HTML"
                </Button>
                <Button appearance=ButtonAppearance::Secondary on_click=on_download_json>
                    {icon("download")}
                    " Download Filing Data (JSON)"
                </Button>
            </Flex>

            // No allow-scripts: filing markup never executes in our origin
            <iframe
                sandbox="allow-same-origin"
                srcdoc=html
                style="width: 100%; flex: 1; min-height: 600px; border: 1px solid var(--colorNeutralStroke2);"
                on:load=move |ev| {
                    let Some(anchor) = anchor_id.as_deref() else {
                        return;
                    };
                    let iframe = ev
                        .target()
                        .and_then(|t| t.dyn_into::<HtmlIFrameElement>().ok());
                    if let Some(iframe) = iframe {
                        scroll_to_anchor(&iframe, anchor);
                    }
                }
            ></iframe>
        </div>
    }
}

/// Missing sections are ignored
fn scroll_to_anchor(iframe: &HtmlIFrameElement, anchor: &str) {
    let Some(document) = iframe.content_document() else {
        log::warn!("Filing document not accessible");
        return;
    };
    match document.get_element_by_id(anchor) {
        Some(element) => {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Start);
            element.scroll_into_view_with_scroll_into_view_options(&options);
        }
        None => log::debug!("Section '{}' not found in filing", anchor),
    }
}
