use axum::{extract::State, Extension, Json};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::models::streak::DailyStreak;
use crate::services::aggregates::{self, ActivityEvent, ActivityKind};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    pub message: String,
    pub date: NaiveDate,
    pub check_in_count: i32,
    pub streak_days: i32,
}

pub async fn check_in(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<CheckInResponse>> {
    let today = Utc::now().date_naive();

    // One row per (user, date); repeat check-ins bump the count.
    let streak = sqlx::query_as::<_, DailyStreak>(
        r#"
        INSERT INTO daily_streaks (id, user_id, date)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, date) DO UPDATE SET
            check_in_count = daily_streaks.check_in_count + 1,
            last_check_in = NOW()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(today)
    .fetch_one(&state.db)
    .await?;

    let dates = sqlx::query_scalar::<_, NaiveDate>(
        "SELECT date FROM daily_streaks WHERE user_id = $1",
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    let streak_days = aggregates::current_streak(&dates, today);

    let event = ActivityEvent::new(auth_user.id, ActivityKind::CheckIn, None);
    if let Err(e) = aggregates::apply_activity(&state.db, event).await {
        tracing::warn!(
            error = %e,
            user_id = %auth_user.id,
            "Aggregate update failed after check-in write"
        );
    }

    if let Err(e) = sqlx::query("UPDATE stress_profiles SET streak_days = $2 WHERE user_id = $1")
        .bind(auth_user.id)
        .bind(streak_days)
        .execute(&state.db)
        .await
    {
        tracing::warn!(error = %e, user_id = %auth_user.id, "Streak update failed");
    }

    Ok(Json(CheckInResponse {
        message: "Checked in".into(),
        date: streak.date,
        check_in_count: streak.check_in_count,
        streak_days,
    }))
}
