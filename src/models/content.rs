use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::prediction::StressLevel;

/// Reference content. Read-only from user flows; rows are managed out of
/// band (seed migration / operator tooling).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StressTip {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// None means the tip applies at every stress level.
    pub target_level: Option<StressLevel>,
    pub category: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BreathingExercise {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub inhale_secs: i32,
    pub hold_secs: i32,
    pub exhale_secs: i32,
    pub cycles: i32,
    pub is_active: bool,
}

impl BreathingExercise {
    pub fn total_duration_secs(&self) -> i32 {
        (self.inhale_secs + self.hold_secs + self.exhale_secs) * self.cycles
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MotivationalQuote {
    pub id: Uuid,
    pub quote: String,
    pub author: String,
    pub category: String,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_duration_multiplies_cycle_time() {
        let exercise = BreathingExercise {
            id: Uuid::new_v4(),
            name: "Box Breathing".into(),
            description: String::new(),
            inhale_secs: 4,
            hold_secs: 4,
            exhale_secs: 4,
            cycles: 5,
            is_active: true,
        };
        assert_eq!(exercise.total_duration_secs(), 60);
    }
}
