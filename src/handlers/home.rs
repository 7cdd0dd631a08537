use axum::{extract::State, Extension, Json};
use chrono::Utc;
use serde::Serialize;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::models::content::{BreathingExercise, MotivationalQuote, StressTip};
use crate::models::prediction::StressLevel;
use crate::models::profile::{ProfileView, StressProfile};
use crate::services::{avatar, content, trends};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub profile: ProfileView,
    pub tips: Vec<StressTip>,
    pub exercise: Option<BreathingExercise>,
    pub quote: Option<MotivationalQuote>,
    pub trend: trends::WeeklyTrend,
}

/// Home dashboard: effective avatar, content bundle, weekly trend.
pub async fn home(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<HomeResponse>> {
    let now = Utc::now();

    let profile = sqlx::query_as::<_, StressProfile>(
        "SELECT * FROM stress_profiles WHERE user_id = $1",
    )
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?;

    let latest_level = sqlx::query_scalar::<_, StressLevel>(
        "SELECT stress_level FROM predictions WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?;

    // Avatar is re-derived at read time from the latest prediction; the
    // inactivity override wins and is never written back.
    let profile_view = match profile {
        Some(p) => {
            let base = latest_level
                .map(avatar::derive_from_stress_level)
                .unwrap_or(p.avatar_state);
            ProfileView {
                avatar_state: avatar::effective_state(base, p.last_activity, now),
                streak_days: p.streak_days,
                total_predictions: p.total_predictions,
                total_journal_entries: p.total_journal_entries,
                total_comparisons: p.total_comparisons,
                last_activity: Some(p.last_activity),
                created_at: Some(p.created_at),
            }
        }
        None => ProfileView::default(),
    };

    let bundle = content::load_display_bundle(&state.db).await?;
    let trend = trends::weekly_trend(&state.db, auth_user.id, now.date_naive()).await?;

    Ok(Json(HomeResponse {
        profile: profile_view,
        tips: bundle.tips,
        exercise: bundle.exercise,
        quote: bundle.quote,
        trend,
    }))
}
