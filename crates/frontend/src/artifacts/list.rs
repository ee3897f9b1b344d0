//! List artifact: the URLs returned by a filings lookup

use crate::shared::icons::icon;
use leptos::prelude::*;

#[component]
#[allow(non_snake_case)]
pub fn ListArtifactView(items: Vec<String>) -> impl IntoView {
    view! {
        <div class="artifact-list">
            <h3>"URLs"</h3>
            <ul>
                {items
                    .into_iter()
                    .map(|url| {
                        let href = url.clone();
                        view! {
                            <li>
                                {icon("link")}
                                " "
                                <a href=href target="_blank" rel="noopener noreferrer">{url}</a>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </div>
    }
}
