//! API utilities for frontend-backend communication
//!
//! The backend serves the widget bundle itself, so requests go to the page's
//! own origin.

/// Get the base URL for API requests
///
/// # Returns
/// - Origin of the current page like "http://localhost:3000"
/// - Empty string if window is not available (relative URLs are used then)
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let host = location.host().unwrap_or_default();
    origin(&protocol, &host)
}

/// Build a full API URL from a path
///
/// # Example
/// ```rust,ignore
/// let url = api_url("/chat");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

fn origin(protocol: &str, host: &str) -> String {
    if host.is_empty() {
        return String::new();
    }
    format!("{}//{}", protocol, host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin() {
        assert_eq!(origin("http:", "localhost:3000"), "http://localhost:3000");
        assert_eq!(origin("https:", "example.com"), "https://example.com");
        assert_eq!(origin("file:", ""), "");
    }
}
