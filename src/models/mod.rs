//! Request/response models

pub mod analysis;

pub use analysis::{AnalyzeRequest, AnalyzeResponse, Finding};
