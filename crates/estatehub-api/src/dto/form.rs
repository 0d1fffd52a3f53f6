//! Listing create/update bodies: multipart with uploads, or plain JSON.

use axum::Json;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::debug;

use estatehub_core::{AppError, AppResult};
use estatehub_storage::staging::discard_all;
use estatehub_storage::{StagedUpload, UploadStaging};

use super::coerce::Fields;
use crate::error::ApiError;
use crate::state::AppState;

/// Multipart field carrying images, both as files and as text entries.
const IMAGES_FIELD: &str = "images";

/// A listing body together with any files it uploaded.
#[derive(Debug, Default)]
pub struct ListingForm {
    pub fields: Fields,
    pub files: Vec<StagedUpload>,
}

impl FromRequest<AppState> for ListingForm {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::validation(e.body_text()))?;
            let mut files = Vec::new();
            let read = read_multipart(
                multipart,
                &state.staging,
                state.config.media.max_files,
                &mut files,
            )
            .await;
            return match read {
                Ok(fields) => Ok(Self { fields, files }),
                Err(e) => {
                    discard_all(&files).await;
                    Err(e.into())
                }
            };
        }

        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        match body {
            Value::Object(fields) => Ok(Self {
                fields,
                files: Vec::new(),
            }),
            _ => Err(AppError::validation("Request body must be a JSON object").into()),
        }
    }
}

async fn read_multipart(
    mut multipart: Multipart,
    staging: &UploadStaging,
    max_files: usize,
    files: &mut Vec<StagedUpload>,
) -> AppResult<Fields> {
    let mut fields = Fields::new();
    let mut body_images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();

        if let Some(file_name) = field.file_name().map(String::from) {
            if name != IMAGES_FIELD {
                debug!(field = %name, "Ignoring unexpected file field");
                continue;
            }
            if files.len() >= max_files {
                return Err(AppError::validation(format!(
                    "Too many files: at most {max_files} images per request"
                )));
            }
            let content_type = field.content_type().map(String::from);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
            if data.is_empty() {
                continue;
            }
            files.push(
                staging
                    .stage(&file_name, content_type.as_deref(), data)
                    .await?,
            );
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
        if name == IMAGES_FIELD {
            body_images.push(Value::String(text));
        } else if !name.is_empty() {
            fields.insert(name, Value::String(text));
        }
    }

    // A lone part may itself hold a JSON array string.
    match body_images.len() {
        0 => {}
        1 => {
            fields.insert(IMAGES_FIELD.to_string(), body_images.remove(0));
        }
        _ => {
            fields.insert(IMAGES_FIELD.to_string(), Value::Array(body_images));
        }
    }
    Ok(fields)
}
