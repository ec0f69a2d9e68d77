use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::db::models::ContentRecord;
use crate::db::repository::ContentRepository;
use crate::error::AppError;
use crate::models::content::{Content, ContentFields, ContentPatch};
use crate::models::validation::{validate, ValidationErrors};

const ID_REQUIRED: &str = "ID is required";
const BODY_REQUIRED: &str = "Request body is required";
const NOT_FOUND: &str = "Content not found";

fn require_id(id: &str) -> Result<&str, AppError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::MissingParameter(ID_REQUIRED.into()));
    }
    Ok(id)
}

/// Decode a JSON request body. An empty body is a missing parameter; an
/// undecodable one is a validation failure.
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::MissingParameter(BODY_REQUIRED.into()));
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(ValidationErrors::malformed(e.to_string())))
}

/// Core logic to list all content, newest first.
pub async fn process_list(repo: &dyn ContentRepository) -> Result<Vec<Content>, AppError> {
    let records = repo.list_newest_first().await?;
    Ok(records.into_iter().map(Content::from).collect())
}

/// Core logic to fetch one record.
pub async fn process_get(repo: &dyn ContentRepository, id: &str) -> Result<Content, AppError> {
    let id = require_id(id)?;
    repo.find_by_id(id)
        .await?
        .map(Content::from)
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
}

/// Core logic to create a record: validate, assign id and timestamps, persist.
///
/// An unreachable store is reported before any validation failure.
pub async fn process_create(
    repo: &dyn ContentRepository,
    fields: ContentFields,
) -> Result<Content, AppError> {
    repo.ready().await?;
    let valid = validate(&fields)?;
    let record = ContentRecord::create(valid, Utc::now());

    repo.insert(&record).await?;
    tracing::debug!(id = %record.id, "content created");

    Ok(record.into())
}

/// Core logic to update a record.
///
/// The patch is merged over the stored fields and the result is validated
/// as a whole; nothing is written unless it passes. Fields sent as `null`
/// are cleared, so a required one fails validation.
pub async fn process_update(
    repo: &dyn ContentRepository,
    id: &str,
    patch: ContentPatch,
) -> Result<Content, AppError> {
    let id = require_id(id)?;
    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;

    let current = Content::from(existing.clone());
    let merged = ContentFields::from(&current).merged_with(patch);
    let valid = validate(&merged)?;

    let now = Utc::now().max(existing.created_at);
    let revised = existing.revise(valid, now);

    // Deleted between the read and the write.
    if !repo.replace(&revised).await? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }
    tracing::debug!(id = %revised.id, "content updated");

    Ok(revised.into())
}

/// Core logic to delete a record.
pub async fn process_delete(repo: &dyn ContentRepository, id: &str) -> Result<(), AppError> {
    let id = require_id(id)?;
    if !repo.delete(id).await? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }
    tracing::debug!(id, "content deleted");
    Ok(())
}

#[cfg(feature = "server")]
mod handlers {
    use axum::body::Bytes;
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::Json;

    use super::*;
    use crate::api::envelope::{Empty, Envelope};
    use crate::app::AppState;
    use crate::models::catalog::Catalog;

    /// Axum handler for `GET /content`.
    pub async fn list_content_handler(
        State(state): State<AppState>,
    ) -> Result<Json<Envelope<Vec<Content>>>, AppError> {
        let contents = process_list(state.content_repo.as_ref()).await?;
        Ok(Json(Envelope::ok(contents)))
    }

    /// Axum handler for `POST /content`.
    pub async fn create_content_handler(
        State(state): State<AppState>,
        body: Bytes,
    ) -> Result<(StatusCode, Json<Envelope<Content>>), AppError> {
        state.content_repo.ready().await?;
        let fields: ContentFields = parse_body(&body)?;
        let content = process_create(state.content_repo.as_ref(), fields).await?;
        Ok((StatusCode::CREATED, Json(Envelope::ok(content))))
    }

    /// Axum handler for `GET /content/{id}`.
    pub async fn get_content_handler(
        State(state): State<AppState>,
        Path(id): Path<String>,
    ) -> Result<Json<Envelope<Content>>, AppError> {
        let content = process_get(state.content_repo.as_ref(), &id).await?;
        Ok(Json(Envelope::ok(content)))
    }

    /// Axum handler for `PUT /content/{id}`.
    pub async fn update_content_handler(
        State(state): State<AppState>,
        Path(id): Path<String>,
        body: Bytes,
    ) -> Result<Json<Envelope<Content>>, AppError> {
        require_id(&id)?;
        state.content_repo.ready().await?;
        let patch: ContentPatch = parse_body(&body)?;
        let content = process_update(state.content_repo.as_ref(), &id, patch).await?;
        Ok(Json(Envelope::ok(content)))
    }

    /// Axum handler for `DELETE /content/{id}`.
    pub async fn delete_content_handler(
        State(state): State<AppState>,
        Path(id): Path<String>,
    ) -> Result<Json<Envelope<Empty>>, AppError> {
        process_delete(state.content_repo.as_ref(), &id).await?;
        Ok(Json(Envelope::ok(Empty {})))
    }

    /// Item routes reached without an id (`/content/`).
    pub async fn missing_id_handler() -> AppError {
        AppError::MissingParameter(ID_REQUIRED.into())
    }

    /// Axum handler for `GET /content/options`.
    pub async fn content_options_handler() -> Json<Envelope<Catalog>> {
        Json(Envelope::ok(Catalog::current()))
    }
}

#[cfg(feature = "server")]
pub use handlers::*;
