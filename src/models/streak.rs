use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One check-in row per (user, date); repeat check-ins on the same day
/// bump `check_in_count`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyStreak {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub check_in_count: i32,
    pub last_check_in: DateTime<Utc>,
}
