//! Chat - View Component

use super::transcript::Sender;
use super::view_model::{ChatVm, SUGGESTIONS};
use crate::shared::icons::icon;
use leptos::prelude::*;
use thaw::*;

#[component]
#[allow(non_snake_case)]
pub fn ChatPanel(vm: ChatVm) -> impl IntoView {
    let messages_container_ref = NodeRef::<leptos::html::Div>::new();

    let turn_count = Memo::new(move |_| vm.session.with(|s| s.transcript().len()));
    let is_pending = Memo::new(move |_| vm.session.with(|s| s.transcript().is_pending()));

    // Scroll to the newest entry after every append
    Effect::new(move |_| {
        turn_count.track();
        is_pending.track();
        if let Some(container) = messages_container_ref.get() {
            request_animation_frame(move || {
                container.set_scroll_top(container.scroll_height());
            });
        }
    });

    view! {
        <div class="chat-panel" style="height: 100%; display: flex; flex-direction: column;">
            <div
                id="chat-container"
                node_ref=messages_container_ref
                style="flex: 1; overflow-y: auto; display: flex; flex-direction: column; gap: 8px; padding: 12px; border: 1px solid var(--colorNeutralStroke2); border-radius: 8px;"
            >
                <For
                    each=move || vm.session.with(|s| s.transcript().turns().to_vec())
                    key=|turn| turn.id
                    let:turn
                >
                    {
                        let bubble_style = if turn.sender == Sender::User {
                            "align-self: flex-end; max-width: 80%; background: var(--colorBrandBackground2); padding: 8px 12px; border-radius: 12px;"
                        } else {
                            "align-self: flex-start; max-width: 80%; background: var(--colorNeutralBackground2); padding: 8px 12px; border-radius: 12px;"
                        };
                        view! {
                            <div class="chat-turn" style=bubble_style>
                                <strong>{format!("{}:", turn.sender.display_name())}</strong>
                                " "
                                <span style="white-space: pre-wrap;">{turn.content.clone()}</span>
                            </div>
                        }
                    }
                </For>

                <Show when=move || is_pending.get()>
                    <div class="thinking-indicator" style="align-self: flex-start; color: var(--colorNeutralForeground3);">
                        <Spinner />
                        " Thinking..."
                    </div>
                </Show>
            </div>

            <div style="display: flex; gap: 8px; margin-top: 12px;">
                <input
                    id="user-input"
                    type="text"
                    class="form__input"
                    style="flex: 1;"
                    placeholder="Ask about SEC filings..."
                    autocomplete="off"
                    prop:value=move || vm.input.get()
                    on:input=move |ev| vm.input.set(event_target_value(&ev))
                    on:keydown=move |ev: web_sys::KeyboardEvent| {
                        if ev.key() == "Enter" {
                            ev.prevent_default();
                            vm.submit_input();
                        }
                    }
                />
                <Button appearance=ButtonAppearance::Primary on_click=move |_| vm.submit_input()>
                    {icon("send")}
                    " Send"
                </Button>
            </div>
        </div>
    }
}

/// Canned prompts, sent through the same pipeline as typed input
#[component]
#[allow(non_snake_case)]
pub fn SuggestionBox(vm: ChatVm) -> impl IntoView {
    view! {
        <div class="suggestion-box" style="display: flex; flex-direction: column; gap: 8px;">
            <h4>"Try asking"</h4>
            {SUGGESTIONS
                .iter()
                .map(move |suggestion| {
                    let text = suggestion.to_string();
                    view! {
                        <div
                            class="suggestion-item"
                            style="cursor: pointer; padding: 8px 12px; border: 1px solid var(--colorNeutralStroke2); border-radius: 8px;"
                            on:click=move |_| {
                                vm.submit(&text);
                            }
                        >
                            {icon("chevron-right")}
                            " "
                            {*suggestion}
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}
