//! `/v1` handlers: enhance, generate, gallery, inspiration.
//!
//! Each handler gets a fresh `req_...` id, runs inside a span carrying it, and
//! records `http_requests_total` / `http_request_duration_seconds` on the way out.

use std::future::Future;
use std::time::Instant;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use studio::{AspectRatio, GenerationRequest, GenerationResult, ImageStyle, MAX_PROMPT_CHARS};
use tracing::{Instrument, error, info, info_span, warn};

use crate::AppState;
use crate::error::{ApiError, new_request_id};

#[derive(Debug, Deserialize)]
pub struct EnhanceBody {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct PromptReply {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    pub prompt: String,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: AspectRatio,
    #[serde(default = "default_style")]
    pub style: ImageStyle,
    #[serde(default = "default_batch_size")]
    pub batch_size: u8,
}

fn default_aspect_ratio() -> AspectRatio {
    AspectRatio::Square
}

fn default_style() -> ImageStyle {
    ImageStyle::NoStyle
}

fn default_batch_size() -> u8 {
    1
}

#[derive(Debug, Serialize)]
pub struct ImagesReply {
    pub images: Vec<GenerationResult>,
}

/// Run `work` under a request span, turn errors into JSON, record metrics.
async fn respond<F>(route: &'static str, work: F) -> Response
where
    F: Future<Output = Result<Response, ApiError>>,
{
    let request_id = new_request_id();
    let started = Instant::now();
    let span = info_span!("request", route, request_id = %request_id);

    let response = match work.instrument(span.clone()).await {
        Ok(response) => response,
        Err(err) => {
            let _entered = span.enter();
            if err.status().is_server_error() {
                error!(error = %err, kind = err.error_type(), "request failed");
            } else {
                warn!(error = %err, kind = err.error_type(), "request rejected");
            }
            err.respond(&request_id)
        }
    };

    crate::metrics::record_request(
        route,
        response.status().as_u16(),
        started.elapsed().as_secs_f64(),
    );
    response
}

fn parse<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// `POST /v1/enhance`: always 200 for a well-formed body within the prompt limit.
pub async fn enhance_handler(
    State(state): State<AppState>,
    payload: Result<Json<EnhanceBody>, JsonRejection>,
) -> Response {
    respond("enhance", async move {
        let body = parse(payload)?;
        let chars = body.prompt.chars().count();
        if chars > MAX_PROMPT_CHARS {
            return Err(ApiError::BadRequest(format!(
                "prompt is {chars} characters, limit is {MAX_PROMPT_CHARS}"
            )));
        }
        let prompt = state.studio.enhance(&body.prompt).await;
        Ok(Json(PromptReply { prompt }).into_response())
    })
    .await
}

/// `POST /v1/generate`: one batch, all-or-nothing. A successful batch
/// replaces the cached gallery; a failed one leaves it alone.
pub async fn generate_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateBody>, JsonRejection>,
) -> Response {
    respond("generate", async move {
        let body = parse(payload)?;
        let request =
            GenerationRequest::new(body.prompt, body.aspect_ratio, body.style, body.batch_size)?;
        let images = state.studio.generate_batch(&request).await?;

        if let Err(e) = state.gallery.replace(images.clone()).await {
            warn!(error = %e, "batch generated but not cached");
        }

        Ok(Json(ImagesReply { images }).into_response())
    })
    .await
}

/// `GET /v1/gallery`
pub async fn gallery_handler(State(state): State<AppState>) -> Response {
    respond("gallery", async move {
        let images = state.gallery.list().await;
        Ok(Json(ImagesReply { images }).into_response())
    })
    .await
}

/// `GET /v1/gallery/{id}/download`: raw image bytes as an attachment.
pub async fn download_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    respond("download", async move {
        let image = state
            .gallery
            .get(&id)
            .await
            .ok_or_else(|| ApiError::NotFound(id.clone()))?;
        let (mime_type, bytes) = image.url.decode()?;
        let disposition = format!(
            "attachment; filename=\"{}\"",
            studio::download_filename(&image.id)
        );
        info!(id = %image.id, bytes = bytes.len(), "image downloaded");
        Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, mime_type),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            bytes,
        )
            .into_response())
    })
    .await
}

/// `DELETE /v1/gallery/{id}`
pub async fn delete_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    respond("delete", async move {
        if state.gallery.remove(&id).await? {
            info!(%id, "image removed from gallery");
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(ApiError::NotFound(id))
        }
    })
    .await
}

/// `GET /v1/inspiration`
pub async fn inspiration_handler() -> Response {
    respond("inspiration", async move {
        Ok(Json(PromptReply {
            prompt: studio::random_inspiration().to_string(),
        })
        .into_response())
    })
    .await
}
