//! Wire formats for the HTTP surface.

use serde::{Deserialize, Serialize};

/// Body of `POST /v1/compare-text`.
#[derive(Debug, Deserialize)]
pub struct CompareTextRequest {
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub text1: Option<String>,
    #[serde(default)]
    pub text2: Option<String>,
}

/// Success body of `POST /v1/compare-text`.
#[derive(Debug, Serialize)]
pub struct CompareTextResponse {
    pub ok: bool,
    pub lang: &'static str,
    pub similarity: f64,
}

/// Summary of the uploaded document echoed back to the caller.
#[derive(Debug, Serialize)]
pub struct FileSummary {
    pub name: String,
    pub detected_type: &'static str,
    pub chars: usize,
}

/// Success body of `POST /v1/compare-file`.
#[derive(Debug, Serialize)]
pub struct CompareFileResponse {
    pub ok: bool,
    pub lang: &'static str,
    pub file: FileSummary,
    pub similarity: f64,
}

/// Body of `GET /healthz`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub space: String,
}

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct ServiceDescriptor {
    pub ok: bool,
    pub service: &'static str,
    pub space_url: String,
    pub endpoints: [&'static str; 3],
}
