//! URL analysis handler

use axum::{extract::State, Json};

use crate::analysis::url::ensure_scheme;
use crate::analysis::verdict::AiAnalysis;
use crate::analysis::Evidence;
use crate::models::{AnalyzeRequest, AnalyzeResponse, Finding};
use crate::{AppError, AppResult, AppState};

/// Analyze a URL: normalize, gather evidence, adjudicate, respond.
///
/// Once the URL parses, the pipeline always answers 200; upstream
/// failures have already degraded into placeholder findings or the
/// fallback verdict by the time they reach this point.
pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> AppResult<Json<AnalyzeResponse>> {
    let raw_url = req.url.trim();
    if raw_url.is_empty() {
        return Err(AppError::MissingUrl);
    }

    let full_url = ensure_scheme(raw_url);

    let evidence = state
        .analyzer
        .extract_evidence(&full_url)
        .await
        .ok_or(AppError::UnprocessableUrl)?;

    let ai = state.analyzer.adjudicate(&full_url, &evidence).await;

    tracing::info!("Analyzed {raw_url}: verdict {:?}", ai.verdict);

    Ok(Json(build_response(raw_url, ai, &evidence)))
}

/// Shape the response: AI reason first, then one finding per evidence
/// entry in gathering order.
fn build_response(raw_url: &str, ai: AiAnalysis, evidence: &Evidence) -> AnalyzeResponse {
    let mut findings = Vec::with_capacity(evidence.len() + 1);
    findings.push(Finding::new(format!("AI Analysis: {}", ai.reason)));
    findings.extend(
        evidence
            .iter()
            .map(|(name, value)| Finding::new(format!("{name}: {value}"))),
    );

    AnalyzeResponse {
        url: raw_url.to_string(),
        verdict: ai.verdict,
        findings,
    }
}
