//! Artifact panel: renders whatever the session marked as active

use super::filing::FilingArtifactView;
use super::list::ListArtifactView;
use super::table::view::TableArtifactView;
use crate::chat::session::ActiveArtifact;
use crate::chat::view_model::ChatVm;
use leptos::prelude::*;

#[component]
#[allow(non_snake_case)]
pub fn ArtifactPanel(vm: ChatVm) -> impl IntoView {
    // Keyed on render_seq: re-rendering the same artifact replaces the view
    let current = Memo::new(move |_| {
        vm.session
            .with(|s| (s.render_seq(), s.active().cloned()))
    });

    view! {
        <div id="artifact-view" class="artifact-panel" style="height: 100%; overflow-y: auto;">
            {move || match current.get().1 {
                None => view! {
                    <p style="color: var(--colorNeutralForeground3);">"No artifacts yet"</p>
                }
                    .into_any(),
                Some(ActiveArtifact::Table(table)) => view! { <TableArtifactView vm=vm table=table /> }.into_any(),
                Some(ActiveArtifact::List(items)) => view! { <ListArtifactView items=items /> }.into_any(),
                Some(ActiveArtifact::Filing(filing)) => view! { <FilingArtifactView filing=filing /> }.into_any(),
            }}
        </div>
    }
}
