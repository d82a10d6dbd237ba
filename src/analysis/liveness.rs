//! Liveness probe
//!
//! One GET against the candidate URL, classified into a short status
//! string. Best-effort: single attempt, every failure collapses into a
//! placeholder rather than an error.

use std::error::Error as _;

use reqwest::Client;

pub const PLACEHOLDER: &str = "Could not be determined";

/// Probe the URL once and classify the outcome.
pub async fn probe(client: &Client, url: &str) -> String {
    match client.get(url).send().await {
        Ok(response) => classify_status(response.status().as_u16()),
        Err(err) => {
            tracing::debug!("Liveness probe failed for {url}: {err}");
            classify_error(&err)
        }
    }
}

fn classify_status(code: u16) -> String {
    if (200..300).contains(&code) {
        format!("Online (Status: {code})")
    } else {
        format!("Responded with Error (Status: {code})")
    }
}

fn classify_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        return "Offline (Request Timed Out)".to_string();
    }
    if is_certificate_error(err) {
        return "SSL Certificate Error".to_string();
    }
    if err.is_connect() {
        return "Offline (Connection Failed)".to_string();
    }
    PLACEHOLDER.to_string()
}

/// reqwest surfaces TLS failures as connect errors; the certificate
/// detail only appears in the source chain.
fn is_certificate_error(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string().to_lowercase();
        if text.contains("certificate") || text.contains("ssl") || text.contains("tls") {
            return true;
        }
        source = cause.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_statuses_read_as_online() {
        assert_eq!(classify_status(200), "Online (Status: 200)");
        assert_eq!(classify_status(204), "Online (Status: 204)");
        assert_eq!(classify_status(299), "Online (Status: 299)");
    }

    #[test]
    fn non_success_statuses_read_as_error() {
        assert_eq!(classify_status(301), "Responded with Error (Status: 301)");
        assert_eq!(classify_status(404), "Responded with Error (Status: 404)");
        assert_eq!(classify_status(503), "Responded with Error (Status: 503)");
    }
}
