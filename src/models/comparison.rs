use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::prediction::StressLevel;

/// A before/after comparison. Immutable except for `improvement_score`,
/// which is only ever recomputed via the explicit recalculate endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comparison {
    pub id: Uuid,
    pub user_id: Uuid,
    pub before_image_path: String,
    pub after_image_path: String,
    pub before_stress_level: StressLevel,
    pub after_stress_level: StressLevel,
    pub before_confidence: i32,
    pub after_confidence: i32,
    pub improvement_score: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
