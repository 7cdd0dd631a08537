use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "avatar_state", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AvatarState {
    Happy,
    Neutral,
    Stressed,
    Sleeping,
}

impl Default for AvatarState {
    fn default() -> Self {
        Self::Neutral
    }
}

/// Per-user running aggregates. Exactly one row per user, created lazily
/// on first activity. Counters only ever grow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StressProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub avatar_state: AvatarState,
    pub streak_days: i32,
    pub total_predictions: i64,
    pub total_journal_entries: i64,
    pub total_comparisons: i64,
    pub last_activity: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Read-side projection of a profile. `avatar_state` here is the effective
/// state after the inactivity override, never what is stored.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub avatar_state: AvatarState,
    pub streak_days: i32,
    pub total_predictions: i64,
    pub total_journal_entries: i64,
    pub total_comparisons: i64,
    pub last_activity: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Default for ProfileView {
    fn default() -> Self {
        Self {
            avatar_state: AvatarState::Neutral,
            streak_days: 0,
            total_predictions: 0,
            total_journal_entries: 0,
            total_comparisons: 0,
            last_activity: None,
            created_at: None,
        }
    }
}
