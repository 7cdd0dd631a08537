use axum::{
    extract::{Multipart, Path, State},
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::handlers::forms;
use crate::models::journal::JournalEntry;
use crate::services::aggregates::{self, ActivityEvent, ActivityKind};
use crate::services::text;
use crate::storage;
use crate::AppState;

const MAX_TEXT_LEN: usize = 10_000;

#[derive(Debug, Serialize)]
pub struct CreateEntryResponse {
    pub message: String,
    pub entry: JournalEntry,
}

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    multipart: Multipart,
) -> AppResult<Json<CreateEntryResponse>> {
    let form = forms::collect(multipart).await?;

    let entry_text = form
        .text("text")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Journal text is required".into()))?
        .to_string();
    if entry_text.len() > MAX_TEXT_LEN {
        return Err(AppError::Validation(format!(
            "Journal text must be under {MAX_TEXT_LEN} characters"
        )));
    }

    let title = form
        .text("title")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| text::derive_title(&entry_text));

    let (sentiment, keywords) = text::analyze_text(&entry_text);

    // Optional image: absent is fine, a present one must classify cleanly.
    let (image_path, image_level) = match form.file("image") {
        Some(image) => {
            let extension = storage::image_extension(&image.file_name).ok_or_else(|| {
                AppError::Validation(format!(
                    "Unsupported image type; allowed: {}",
                    storage::ALLOWED_IMAGE_EXTENSIONS.join(", ")
                ))
            })?;
            let result = state
                .classifier
                .classify(&image.bytes)
                .map_err(AppError::Inference)?;
            let path = state.images.save(&extension, &image.bytes).await?;
            (Some(path), Some(result.stress_level))
        }
        None => (None, None),
    };

    let combined = text::combine_levels(sentiment, image_level);

    let entry = sqlx::query_as::<_, JournalEntry>(
        r#"
        INSERT INTO journal_entries
            (id, user_id, title, text, image_path, text_sentiment,
             image_stress_level, combined_stress_level, keywords)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(&title)
    .bind(&entry_text)
    .bind(&image_path)
    .bind(sentiment)
    .bind(image_level)
    .bind(combined)
    .bind(serde_json::json!(keywords))
    .fetch_one(&state.db)
    .await?;

    let event = ActivityEvent::new(auth_user.id, ActivityKind::Journal, Some(combined));
    if let Err(e) = aggregates::apply_activity(&state.db, event).await {
        tracing::warn!(
            error = %e,
            user_id = %auth_user.id,
            "Aggregate update failed after journal write"
        );
    }

    Ok(Json(CreateEntryResponse {
        message: "Journal entry saved".into(),
        entry,
    }))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let image_path = sqlx::query_scalar::<_, Option<String>>(
        "DELETE FROM journal_entries WHERE id = $1 AND user_id = $2 RETURNING image_path",
    )
    .bind(entry_id)
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Journal entry not found".into()))?;

    if let Some(path) = image_path {
        state.images.delete_detached(&path);
    }
    Ok(Json(serde_json::json!({ "message": "Journal entry deleted" })))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<JournalEntry>>> {
    let entries = sqlx::query_as::<_, JournalEntry>(
        "SELECT * FROM journal_entries WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(entries))
}
