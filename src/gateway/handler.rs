use axum::{
    Json,
    extract::{Multipart, State},
};
use tracing::{debug, instrument};

use crate::extract::extract_text;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{
    CompareFileResponse, CompareTextRequest, CompareTextResponse, FileSummary,
};
use crate::gateway::state::HandlerState;
use crate::normalize::clean_text;
use crate::space::{ComparisonRequest, Language, SpaceTransport};

/// `POST /v1/compare-text`: two raw text blocks in a JSON body.
#[instrument(skip(state, body))]
pub async fn compare_text_handler<T>(
    State(state): State<HandlerState<T>>,
    body: axum::body::Bytes,
) -> Result<Json<CompareTextResponse>, GatewayError>
where
    T: SpaceTransport + 'static,
{
    // Content-Type is deliberately not required; the body just has to be
    // JSON.
    let body: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|_| GatewayError::invalid("Invalid JSON body."))?;

    let request: CompareTextRequest = serde_json::from_value(body)
        .map_err(|e| GatewayError::invalid(format!("Invalid request schema: {e}")))?;

    let text1 = clean_text(request.text1.as_deref().unwrap_or(""), state.max_text_chars);
    let text2 = clean_text(request.text2.as_deref().unwrap_or(""), state.max_text_chars);

    if text1.is_empty() || text2.is_empty() {
        return Err(GatewayError::invalid(
            "Both 'text1' and 'text2' are required and non-empty.",
        ));
    }

    let language = parse_language(request.lang.as_deref())?;

    debug!(lang = %language, "running text-to-text comparison");
    let similarity = state
        .client
        .compare(&ComparisonRequest {
            language,
            text_a: text1,
            text_b: text2,
        })
        .await?;

    Ok(Json(CompareTextResponse {
        ok: true,
        lang: language.as_str(),
        similarity,
    }))
}

/// `POST /v1/compare-file`: a transcript plus an uploaded document.
#[instrument(skip(state, multipart))]
pub async fn compare_file_handler<T>(
    State(state): State<HandlerState<T>>,
    mut multipart: Multipart,
) -> Result<Json<CompareFileResponse>, GatewayError>
where
    T: SpaceTransport + 'static,
{
    let mut lang_field: Option<String> = None;
    let mut transcript_field: Option<String> = None;
    let mut file_field: Option<(String, axum::body::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::invalid(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "lang" => {
                lang_field = Some(field.text().await.map_err(|e| {
                    GatewayError::invalid(format!("Unreadable 'lang' field: {e}"))
                })?);
            }
            "transcript_text" => {
                transcript_field = Some(field.text().await.map_err(|e| {
                    GatewayError::invalid(format!("Unreadable 'transcript_text' field: {e}"))
                })?);
            }
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(|e| {
                    GatewayError::invalid(format!("Unreadable 'file' field: {e}"))
                })?;
                file_field = Some((filename, data));
            }
            _ => {}
        }
    }

    let Some((raw_name, data)) = file_field else {
        return Err(GatewayError::invalid("Missing 'file' field."));
    };

    let filename = sanitize_filename(&raw_name);
    if filename.is_empty() {
        return Err(GatewayError::invalid("Invalid file name."));
    }

    let (file_text, detected_type) = extract_text(&data, &filename)?;
    let file_text = clean_text(&file_text, state.max_text_chars);

    let transcript = clean_text(
        transcript_field.as_deref().unwrap_or(""),
        state.max_text_chars,
    );
    if transcript.is_empty() {
        return Err(GatewayError::invalid("Missing or empty 'transcript_text'."));
    }
    if file_text.is_empty() {
        return Err(GatewayError::NoExtractableText { filename });
    }

    let language = parse_language(lang_field.as_deref())?;

    let chars = file_text.chars().count();
    debug!(lang = %language, file = %filename, chars, "running transcript-to-file comparison");

    let similarity = state
        .client
        .compare(&ComparisonRequest {
            language,
            text_a: transcript,
            text_b: file_text,
        })
        .await?;

    Ok(Json(CompareFileResponse {
        ok: true,
        lang: language.as_str(),
        file: FileSummary {
            name: filename,
            detected_type: detected_type.as_str(),
            chars,
        },
        similarity,
    }))
}

fn parse_language(tag: Option<&str>) -> Result<Language, GatewayError> {
    let Some(tag) = tag.map(str::trim).filter(|t| !t.is_empty()) else {
        return Err(GatewayError::invalid(
            "Missing 'lang'. Valid values: 'kannada' or 'english'.",
        ));
    };

    Language::parse(tag)
        .ok_or_else(|| GatewayError::invalid("Invalid 'lang'. Use 'kannada' or 'english'."))
}

/// Strips path components and anything outside a conservative character set
/// from an uploaded filename.
pub(crate) fn sanitize_filename(raw: &str) -> String {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or("");

    name.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect()
}
