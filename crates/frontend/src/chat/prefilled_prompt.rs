//! `?prompt=...` bootstrap: a prompt in the page URL is sent once on load.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct PromptQuery {
    prompt: Option<String>,
}

/// Extract the prompt from a `location.search` string
pub fn prompt_from_query(search: &str) -> Option<String> {
    let query = search.trim_start_matches('?');
    if query.is_empty() {
        return None;
    }
    let parsed: PromptQuery = match serde_qs::from_str(query) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::warn!("Ignoring malformed query string: {}", e);
            return None;
        }
    };
    parsed.prompt.filter(|p| !p.trim().is_empty())
}

/// Prompt of the current page, if any
pub fn current_prompt() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    prompt_from_query(&search)
}
