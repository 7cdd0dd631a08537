use axum::{
    extract::{Multipart, Path, State},
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::handlers::forms;
use crate::models::prediction::Prediction;
use crate::services::aggregates::{self, ActivityEvent, ActivityKind};
use crate::storage;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CreatePredictionResponse {
    pub message: String,
    pub prediction: Prediction,
}

pub async fn create_prediction(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    multipart: Multipart,
) -> AppResult<Json<CreatePredictionResponse>> {
    let form = forms::collect(multipart).await?;
    let image = form.require_file("image")?;
    let extension = storage::image_extension(&image.file_name).ok_or_else(|| {
        AppError::Validation(format!(
            "Unsupported image type; allowed: {}",
            storage::ALLOWED_IMAGE_EXTENSIONS.join(", ")
        ))
    })?;

    // Classify before persisting anything: a collaborator failure must not
    // leave a partial record behind.
    let result = state
        .classifier
        .classify(&image.bytes)
        .map_err(AppError::Inference)?;

    let image_path = state.images.save(&extension, &image.bytes).await?;

    let prediction = sqlx::query_as::<_, Prediction>(
        r#"
        INSERT INTO predictions (id, user_id, image_path, stress_level, mood_tag, stress_type, confidence)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(&image_path)
    .bind(result.stress_level)
    .bind(result.mood_tag)
    .bind(result.stress_type)
    .bind(result.confidence)
    .fetch_one(&state.db)
    .await?;

    // Best-effort session bookkeeping.
    let _ = sqlx::query(
        "UPDATE user_sessions SET predictions_made = predictions_made + 1 WHERE user_id = $1 AND logout_time IS NULL",
    )
    .bind(auth_user.id)
    .execute(&state.db)
    .await;

    let event = ActivityEvent::new(
        auth_user.id,
        ActivityKind::Prediction,
        Some(prediction.stress_level),
    );
    if let Err(e) = aggregates::apply_activity(&state.db, event).await {
        tracing::warn!(
            error = %e,
            user_id = %auth_user.id,
            "Aggregate update failed after prediction write"
        );
    }

    Ok(Json(CreatePredictionResponse {
        message: "Stress prediction recorded".into(),
        prediction,
    }))
}

pub async fn delete_prediction(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(prediction_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let image_path = sqlx::query_scalar::<_, String>(
        "DELETE FROM predictions WHERE id = $1 AND user_id = $2 RETURNING image_path",
    )
    .bind(prediction_id)
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Prediction not found".into()))?;

    state.images.delete_detached(&image_path);
    Ok(Json(serde_json::json!({ "message": "Prediction deleted" })))
}

/// Prediction history, newest first.
pub async fn list_predictions(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<Prediction>>> {
    let predictions = sqlx::query_as::<_, Prediction>(
        "SELECT * FROM predictions WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(predictions))
}
