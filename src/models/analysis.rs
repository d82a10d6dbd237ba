//! Analysis request/response types

use serde::{Deserialize, Serialize};

use crate::analysis::verdict::Verdict;

/// Body of `POST /analyze`
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Raw URL as submitted; may lack a scheme.
    #[serde(default)]
    pub url: String,
}

/// One supporting observation shown to the caller.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Finding {
    pub description: String,
}

impl Finding {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Body of a successful `POST /analyze`
///
/// `url` echoes the raw string as submitted, not the normalized form.
/// The first finding is always the AI's reason; the rest mirror the
/// evidence entries in the order they were gathered.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub url: String,
    pub verdict: Verdict,
    pub findings: Vec<Finding>,
}
