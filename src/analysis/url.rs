//! URL normalization helpers

use reqwest::Url;

/// Ensure the URL carries a scheme before analysis.
///
/// Passes schemed input through unchanged (case-insensitive match on
/// `http://` / `https://`), otherwise assumes HTTPS. Callers reject
/// empty input before reaching this point.
pub fn ensure_scheme(raw: &str) -> String {
    let lower = raw.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    }
}

/// Parse the URL and pull out its bare host, if any.
pub fn host_of(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_string())
}
