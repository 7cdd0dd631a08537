use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::services::trends::{self, WeeklyTrend};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub as_of: Option<NaiveDate>,
}

/// 7-day prediction counts by stress level, for chart display.
pub async fn get_trends(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<TrendQuery>,
) -> AppResult<Json<WeeklyTrend>> {
    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let trend = trends::weekly_trend(&state.db, auth_user.id, as_of).await?;
    Ok(Json(trend))
}
