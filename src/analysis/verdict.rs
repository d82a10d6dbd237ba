//! Verdict adjudication
//!
//! Renders the gathered evidence into a prompt, asks Gemini for a
//! classification, and parses its reply into a typed verdict. The model
//! answers in free text that should contain a JSON object; parsing is
//! kept behind `parse_model_reply` so the prompt wording can change
//! without touching the pipeline contract. Any model-side failure
//! degrades to a fixed `Suspicious` fallback.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::Evidence;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub const NOT_CONFIGURED_REASON: &str = "AI is not configured.";
pub const FALLBACK_REASON: &str =
    "The AI analysis could not be completed, so this link is flagged as suspicious by default.";

/// Risk categories the model chooses from, plus the `Error` sentinel
/// used only when adjudication itself is not configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    #[serde(rename = "Phishing Detected")]
    PhishingDetected,
    #[serde(rename = "High Risk")]
    HighRisk,
    Suspicious,
    #[serde(rename = "Looks Safe")]
    LooksSafe,
    Error,
}

impl Verdict {
    /// Map a model-supplied category string; anything outside the four
    /// allowed categories counts as malformed output.
    fn from_model_str(s: &str) -> Option<Self> {
        match s.trim() {
            "Phishing Detected" => Some(Self::PhishingDetected),
            "High Risk" => Some(Self::HighRisk),
            "Suspicious" => Some(Self::Suspicious),
            "Looks Safe" => Some(Self::LooksSafe),
            _ => None,
        }
    }
}

/// The adjudicator's answer: a verdict and a one-sentence reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiAnalysis {
    pub verdict: Verdict,
    pub reason: String,
}

impl AiAnalysis {
    fn fallback() -> Self {
        Self {
            verdict: Verdict::Suspicious,
            reason: FALLBACK_REASON.to_string(),
        }
    }

    fn not_configured() -> Self {
        Self {
            verdict: Verdict::Error,
            reason: NOT_CONFIGURED_REASON.to_string(),
        }
    }
}

// Gemini generateContent wire types

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ReplyContent,
}

#[derive(Deserialize)]
struct ReplyContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
struct ReplyPart {
    text: String,
}

/// The JSON object the model is instructed to answer with.
#[derive(Deserialize)]
struct ModelReply {
    verdict: String,
    reason: String,
}

/// Ask the model to classify the URL given the gathered evidence.
pub async fn adjudicate(
    client: &Client,
    api_key: Option<&str>,
    model: &str,
    url: &str,
    evidence: &Evidence,
) -> AiAnalysis {
    let Some(api_key) = api_key else {
        return AiAnalysis::not_configured();
    };

    let prompt = build_prompt(url, evidence);
    let endpoint = format!("{GEMINI_API_BASE}/{model}:generateContent?key={api_key}");
    let request = GenerateRequest {
        contents: vec![Content {
            parts: vec![Part { text: prompt }],
        }],
    };

    let response = match client.post(&endpoint).json(&request).send().await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!("Gemini call failed for {url}: {err}");
            return AiAnalysis::fallback();
        }
    };

    if !response.status().is_success() {
        tracing::warn!("Gemini returned status {} for {url}", response.status());
        return AiAnalysis::fallback();
    }

    let body = match response.json::<GenerateResponse>().await {
        Ok(body) => body,
        Err(err) => {
            tracing::warn!("Gemini response for {url} unparseable: {err}");
            return AiAnalysis::fallback();
        }
    };

    let Some(text) = body
        .candidates
        .first()
        .and_then(|c| c.content.parts.first())
        .map(|p| p.text.as_str())
    else {
        tracing::warn!("Gemini response for {url} had no candidates");
        return AiAnalysis::fallback();
    };

    parse_model_reply(text).unwrap_or_else(|| {
        tracing::warn!("Gemini reply for {url} was not valid verdict JSON");
        AiAnalysis::fallback()
    })
}

/// Render the instruction prompt: the four categories verbatim, the URL,
/// and the evidence as a bullet list in gathering order. Wording here is
/// tunable; only `parse_model_reply` depends on the answer shape.
fn build_prompt(url: &str, evidence: &Evidence) -> String {
    let bullets = evidence
        .iter()
        .map(|(name, value)| format!("- {name}: {value}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "As a cybersecurity expert, analyze the following URL and classify it into ONE of \
         the four following categories: \"Phishing Detected\", \"High Risk\", \"Suspicious\", \
         or \"Looks Safe\".\n\
         URL: \"{url}\"\n\
         Here is the evidence I have gathered about the URL:\n\
         {bullets}\n\
         Based on this evidence, which of the four categories is the most appropriate expert \
         judgment?\n\
         Respond ONLY with a valid JSON object containing two keys:\n\
         1. \"verdict\": A string containing your choice from the four categories.\n\
         2. \"reason\": A string with a concise, one-sentence explanation for your verdict."
    )
}

/// Parse the model's free-text reply into a typed result. Strips
/// surrounding whitespace and markdown code fences before the JSON
/// parse; anything that does not yield one of the four categories plus
/// a reason is `None`.
fn parse_model_reply(text: &str) -> Option<AiAnalysis> {
    let cleaned = text.trim().replace("```json", "").replace("```", "");
    let reply: ModelReply = serde_json::from_str(cleaned.trim()).ok()?;
    let verdict = Verdict::from_model_str(&reply.verdict)?;
    Some(AiAnalysis {
        verdict,
        reason: reply.reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn sample_evidence() -> Evidence {
        let mut evidence: Evidence = IndexMap::new();
        evidence.insert("URL Length", "31".to_string());
        evidence.insert("Uses HTTPS", "No".to_string());
        evidence
    }

    #[tokio::test]
    async fn unconfigured_adjudicator_returns_error_sentinel() {
        let client = Client::new();
        let result = adjudicate(
            &client,
            None,
            "gemini-1.5-flash",
            "https://example.com",
            &sample_evidence(),
        )
        .await;
        assert_eq!(result.verdict, Verdict::Error);
        assert_eq!(result.reason, NOT_CONFIGURED_REASON);
    }

    #[test]
    fn parses_plain_json_reply() {
        let reply =
            parse_model_reply(r#"{"verdict": "Looks Safe", "reason": "Old domain."}"#).unwrap();
        assert_eq!(reply.verdict, Verdict::LooksSafe);
        assert_eq!(reply.reason, "Old domain.");
    }

    #[test]
    fn strips_markdown_fences() {
        let text = "```json\n{\"verdict\": \"High Risk\", \"reason\": \"Keyword stuffing.\"}\n```";
        let reply = parse_model_reply(text).unwrap();
        assert_eq!(reply.verdict, Verdict::HighRisk);
    }

    #[test]
    fn rejects_unknown_verdict_strings() {
        assert!(parse_model_reply(r#"{"verdict": "Probably fine", "reason": "x"}"#).is_none());
    }

    #[test]
    fn rejects_non_json_replies() {
        assert!(parse_model_reply("I think this URL is safe.").is_none());
        assert!(parse_model_reply(r#"{"verdict": "Suspicious"}"#).is_none());
    }

    #[test]
    fn prompt_lists_evidence_in_order() {
        let prompt = build_prompt("https://example.com", &sample_evidence());
        let length_pos = prompt.find("- URL Length: 31").unwrap();
        let https_pos = prompt.find("- Uses HTTPS: No").unwrap();
        assert!(length_pos < https_pos);
        assert!(prompt.contains("\"Phishing Detected\""));
        assert!(prompt.contains("\"Looks Safe\""));
        assert!(prompt.contains("https://example.com"));
    }

    #[test]
    fn verdict_serializes_to_display_strings() {
        assert_eq!(
            serde_json::to_string(&Verdict::PhishingDetected).unwrap(),
            "\"Phishing Detected\""
        );
        assert_eq!(
            serde_json::to_string(&Verdict::LooksSafe).unwrap(),
            "\"Looks Safe\""
        );
        assert_eq!(serde_json::to_string(&Verdict::Error).unwrap(), "\"Error\"");
    }
}
