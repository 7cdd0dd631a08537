//! Mood-avatar state machine.
//!
//! The stored avatar state only changes when a prediction or journal entry
//! is saved. On reads, the state is re-derived as a pure projection:
//! inactivity of three or more days forces `sleeping`, overriding whatever
//! the stress level would produce. The sleeping state is never written back.

use chrono::{DateTime, Utc};

use crate::models::prediction::StressLevel;
use crate::models::profile::AvatarState;

/// Days without activity before the avatar falls asleep.
pub const INACTIVITY_SLEEP_DAYS: i64 = 3;

/// Stress-derived transition: Low→happy, Medium→neutral, anything else→stressed.
pub fn derive_from_stress_level(level: StressLevel) -> AvatarState {
    match level {
        StressLevel::Low => AvatarState::Happy,
        StressLevel::Medium => AvatarState::Neutral,
        _ => AvatarState::Stressed,
    }
}

/// Read-time projection. Inactivity takes priority over the stress-derived
/// state.
pub fn effective_state(
    base: AvatarState,
    last_activity: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AvatarState {
    if (now - last_activity).num_days() >= INACTIVITY_SLEEP_DAYS {
        AvatarState::Sleeping
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn low_maps_to_happy() {
        assert_eq!(derive_from_stress_level(StressLevel::Low), AvatarState::Happy);
    }

    #[test]
    fn medium_maps_to_neutral() {
        assert_eq!(
            derive_from_stress_level(StressLevel::Medium),
            AvatarState::Neutral
        );
    }

    #[test]
    fn high_maps_to_stressed() {
        assert_eq!(
            derive_from_stress_level(StressLevel::High),
            AvatarState::Stressed
        );
    }

    #[test]
    fn recent_activity_keeps_derived_state() {
        let now = Utc::now();
        let last = now - Duration::days(2);
        assert_eq!(
            effective_state(AvatarState::Happy, last, now),
            AvatarState::Happy
        );
    }

    #[test]
    fn three_days_idle_forces_sleeping() {
        let now = Utc::now();
        let last = now - Duration::days(3);
        assert_eq!(
            effective_state(AvatarState::Happy, last, now),
            AvatarState::Sleeping
        );
        assert_eq!(
            effective_state(AvatarState::Stressed, last - Duration::days(10), now),
            AvatarState::Sleeping
        );
    }

    #[test]
    fn just_under_three_days_is_not_sleeping() {
        let now = Utc::now();
        let last = now - Duration::days(3) + Duration::hours(1);
        assert_eq!(
            effective_state(AvatarState::Neutral, last, now),
            AvatarState::Neutral
        );
    }
}
