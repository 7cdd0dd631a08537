use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "stress_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    Low,
    Medium,
    High,
}

impl StressLevel {
    /// Severity ordinal (Low=1, Medium=2, High=3), used only by the
    /// comparison improvement formula.
    pub fn severity(self) -> i32 {
        match self {
            StressLevel::Low => 1,
            StressLevel::Medium => 2,
            StressLevel::High => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "mood_tag", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MoodTag {
    Happy,
    Neutral,
    Sad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "stress_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StressType {
    Work,
    Personal,
    Social,
    Health,
    Financial,
    Other,
}

/// One image-based stress prediction. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Prediction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image_path: String,
    pub stress_level: StressLevel,
    pub mood_tag: MoodTag,
    pub stress_type: StressType,
    pub confidence: i32,
    pub created_at: DateTime<Utc>,
}
