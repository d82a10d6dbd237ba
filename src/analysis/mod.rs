//! URL analysis pipeline
//!
//! Gathers evidence about a URL (liveness, monitoring reputation,
//! lexical features, domain age) and hands it to the adjudicator. All
//! lookups are best-effort: a failed lookup becomes a placeholder
//! string in the evidence, never an error. Only a URL that fails to
//! parse aborts the pipeline.

pub mod liveness;
pub mod reputation;
pub mod url;
pub mod verdict;
pub mod whois;

use std::time::Duration;

use indexmap::IndexMap;
use reqwest::Client;

use crate::config::Config;
use verdict::AiAnalysis;

/// Timeout for the liveness probe and the reputation lookup.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for the model call; generation is slower than a probe.
const MODEL_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent presented by the liveness probe.
const PROBE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Substrings whose presence in a URL is worth flagging to the model.
const SUSPICIOUS_KEYWORDS: &[&str] = &[
    "login", "verify", "bank", "account", "secure", "update", "signin",
];

/// Ordered set of named observations gathered about a URL. Insertion
/// order is preserved because it drives prompt and findings order.
pub type Evidence = IndexMap<&'static str, String>;

/// Per-request analysis pipeline. Holds the outbound HTTP clients and
/// the feature toggles; read-only after startup.
#[derive(Clone)]
pub struct Analyzer {
    probe_client: Client,
    model_client: Client,
    gemini_api_key: Option<String>,
    gemini_model: String,
    uptimerobot_api_key: Option<String>,
}

impl Analyzer {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let probe_client = Client::builder()
            .timeout(PROBE_TIMEOUT)
            .user_agent(PROBE_USER_AGENT)
            .build()?;

        let model_client = Client::builder().timeout(MODEL_TIMEOUT).build()?;

        Ok(Self {
            probe_client,
            model_client,
            gemini_api_key: config.gemini_api_key.clone(),
            gemini_model: config.gemini_model.clone(),
            uptimerobot_api_key: config.uptimerobot_api_key.clone(),
        })
    }

    /// Gather the evidence mapping for a fully-qualified URL.
    ///
    /// Returns `None` when the URL does not parse; partial evidence is
    /// never returned. Lookups run sequentially, each degrading to a
    /// placeholder on failure.
    pub async fn extract_evidence(&self, full_url: &str) -> Option<Evidence> {
        let parsed = match reqwest::Url::parse(full_url) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!("Could not parse URL {full_url}: {err}");
                return None;
            }
        };
        let host = url::host_of(&parsed).unwrap_or_default();

        let mut evidence: Evidence = IndexMap::new();

        evidence.insert(
            "Real-Time Status",
            liveness::probe(&self.probe_client, full_url).await,
        );
        evidence.insert(
            "Monitoring Reputation",
            reputation::lookup(
                &self.probe_client,
                self.uptimerobot_api_key.as_deref(),
                &host,
            )
            .await,
        );
        evidence.insert("URL Length", full_url.chars().count().to_string());
        evidence.insert(
            "Uses HTTPS",
            if parsed.scheme() == "https" { "Yes" } else { "No" }.to_string(),
        );
        evidence.insert(
            "Number of Suspicious Keywords",
            suspicious_keyword_count(full_url).to_string(),
        );
        evidence.insert(
            "Domain Age",
            domain_age_finding(whois::domain_age_days(&host).await),
        );

        Some(evidence)
    }

    /// Ask the model for a verdict over the evidence.
    pub async fn adjudicate(&self, full_url: &str, evidence: &Evidence) -> AiAnalysis {
        verdict::adjudicate(
            &self.model_client,
            self.gemini_api_key.as_deref(),
            &self.gemini_model,
            full_url,
            evidence,
        )
        .await
    }
}

/// Render the domain-age evidence value. A failed WHOIS lookup becomes
/// the placeholder string; the key is never dropped from the evidence.
fn domain_age_finding(days: Option<i64>) -> String {
    match days {
        Some(days) => format!("{days} days"),
        None => "Could not be determined".to_string(),
    }
}

/// Count how many of the suspicious keywords appear in the URL,
/// case-insensitive, each counted at most once.
fn suspicious_keyword_count(url: &str) -> usize {
    let lower = url.to_lowercase();
    SUSPICIOUS_KEYWORDS
        .iter()
        .filter(|keyword| lower.contains(*keyword))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_presence_counted_once_each() {
        assert_eq!(
            suspicious_keyword_count("http://secure-login-bank.example.com"),
            3
        );
        // "login" twice still counts once
        assert_eq!(
            suspicious_keyword_count("https://login.example.com/login"),
            1
        );
        assert_eq!(suspicious_keyword_count("https://example.com"), 0);
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        assert_eq!(
            suspicious_keyword_count("https://SECURE-VERIFY.example.com"),
            2
        );
    }

    #[test]
    fn failed_whois_lookup_becomes_placeholder() {
        assert_eq!(domain_age_finding(None), "Could not be determined");
    }

    #[test]
    fn resolved_whois_lookup_formats_days() {
        assert_eq!(domain_age_finding(Some(11000)), "11000 days");
        assert_eq!(domain_age_finding(Some(0)), "0 days");
    }
}
