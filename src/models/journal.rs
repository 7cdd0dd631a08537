use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::prediction::StressLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text_sentiment", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// A journal entry. `combined_stress_level` is always set, whether or not
/// an image was attached.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub text: String,
    pub image_path: Option<String>,
    pub text_sentiment: Sentiment,
    pub image_stress_level: Option<StressLevel>,
    pub combined_stress_level: StressLevel,
    pub keywords: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
