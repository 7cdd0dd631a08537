use axum::{
    extract::{Multipart, Path, State},
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::handlers::forms::{self, UploadedFile};
use crate::models::comparison::Comparison;
use crate::services::aggregates::{self, ActivityEvent, ActivityKind};
use crate::services::improvement;
use crate::services::inference::Classification;
use crate::storage;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    pub message: String,
    pub comparison: Comparison,
}

fn validated_extension(image: &UploadedFile) -> AppResult<String> {
    storage::image_extension(&image.file_name).ok_or_else(|| {
        AppError::Validation(format!(
            "Unsupported image type; allowed: {}",
            storage::ALLOWED_IMAGE_EXTENSIONS.join(", ")
        ))
    })
}

pub async fn create_comparison(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    multipart: Multipart,
) -> AppResult<Json<ComparisonResponse>> {
    let form = forms::collect(multipart).await?;
    let before = form.require_file("before_image")?;
    let after = form.require_file("after_image")?;
    let before_ext = validated_extension(before)?;
    let after_ext = validated_extension(after)?;
    let notes = form.text("notes").map(str::trim).filter(|n| !n.is_empty());

    // Classify both images before persisting anything.
    let before_result: Classification = state
        .classifier
        .classify(&before.bytes)
        .map_err(AppError::Inference)?;
    let after_result: Classification = state
        .classifier
        .classify(&after.bytes)
        .map_err(AppError::Inference)?;

    let score = improvement::improvement(before_result.stress_level, after_result.stress_level);

    let before_path = state.images.save(&before_ext, &before.bytes).await?;
    let after_path = state.images.save(&after_ext, &after.bytes).await?;

    let comparison = sqlx::query_as::<_, Comparison>(
        r#"
        INSERT INTO comparisons
            (id, user_id, before_image_path, after_image_path,
             before_stress_level, after_stress_level,
             before_confidence, after_confidence, improvement_score, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(&before_path)
    .bind(&after_path)
    .bind(before_result.stress_level)
    .bind(after_result.stress_level)
    .bind(before_result.confidence)
    .bind(after_result.confidence)
    .bind(score)
    .bind(notes)
    .fetch_one(&state.db)
    .await?;

    // Comparisons count toward totals but never move the avatar.
    let event = ActivityEvent::new(auth_user.id, ActivityKind::Comparison, None);
    if let Err(e) = aggregates::apply_activity(&state.db, event).await {
        tracing::warn!(
            error = %e,
            user_id = %auth_user.id,
            "Aggregate update failed after comparison write"
        );
    }

    Ok(Json(ComparisonResponse {
        message: "Comparison recorded".into(),
        comparison,
    }))
}

pub async fn list_comparisons(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<Comparison>>> {
    let comparisons = sqlx::query_as::<_, Comparison>(
        "SELECT * FROM comparisons WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(comparisons))
}

pub async fn get_comparison(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(comparison_id): Path<Uuid>,
) -> AppResult<Json<Comparison>> {
    let comparison = sqlx::query_as::<_, Comparison>(
        "SELECT * FROM comparisons WHERE id = $1 AND user_id = $2",
    )
    .bind(comparison_id)
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Comparison not found".into()))?;

    Ok(Json(comparison))
}

pub async fn delete_comparison(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(comparison_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let paths = sqlx::query_as::<_, (String, String)>(
        r#"
        DELETE FROM comparisons WHERE id = $1 AND user_id = $2
        RETURNING before_image_path, after_image_path
        "#,
    )
    .bind(comparison_id)
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Comparison not found".into()))?;

    state.images.delete_detached(&paths.0);
    state.images.delete_detached(&paths.1);
    Ok(Json(serde_json::json!({ "message": "Comparison deleted" })))
}

/// The only path that rewrites `improvement_score`.
pub async fn recalculate(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(comparison_id): Path<Uuid>,
) -> AppResult<Json<ComparisonResponse>> {
    let existing = sqlx::query_as::<_, Comparison>(
        "SELECT * FROM comparisons WHERE id = $1 AND user_id = $2",
    )
    .bind(comparison_id)
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Comparison not found".into()))?;

    let score = improvement::improvement(existing.before_stress_level, existing.after_stress_level);

    let comparison = sqlx::query_as::<_, Comparison>(
        "UPDATE comparisons SET improvement_score = $2 WHERE id = $1 RETURNING *",
    )
    .bind(comparison_id)
    .bind(score)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(ComparisonResponse {
        message: "Improvement score recalculated".into(),
        comparison,
    }))
}
