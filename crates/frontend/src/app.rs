use crate::artifacts::panel::ArtifactPanel;
use crate::chat::view::{ChatPanel, SuggestionBox};
use crate::chat::view_model::ChatVm;
use crate::shared::icons::icon;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn App() -> impl IntoView {
    let vm = ChatVm::new();

    // A `?prompt=` in the page URL is sent once on load
    vm.bootstrap_prompt();

    let artifacts_visible = Memo::new(move |_| vm.session.with(|s| s.artifacts_visible()));

    view! {
        <div class="app" style="display: flex; gap: 16px; height: 100vh; padding: 16px; box-sizing: border-box;">
            <div style="flex: 1; min-width: 0;">
                <ChatPanel vm=vm />
            </div>
            <div style="flex: 1; min-width: 0; display: flex; flex-direction: column;">
                <div style="margin-bottom: 12px;">
                    <Button appearance=ButtonAppearance::Subtle on_click=move |_| vm.toggle_artifacts()>
                        {icon("eye")}
                        {move || if artifacts_visible.get() { " Hide Artifacts" } else { " Show Artifacts" }}
                    </Button>
                </div>
                <div style="flex: 1; min-height: 0;">
                    <Show
                        when=move || artifacts_visible.get()
                        fallback=move || view! { <SuggestionBox vm=vm /> }
                    >
                        <ArtifactPanel vm=vm />
                    </Show>
                </div>
            </div>
        </div>
    }
}
