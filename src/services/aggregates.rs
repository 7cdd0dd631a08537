//! Profile aggregate store.
//!
//! Every activity record save emits an `ActivityEvent` which is folded into
//! the user's `StressProfile` by a single dedicated function, keeping record
//! persistence decoupled from aggregate mutation.
//!
//! The fold is read-modify-write over the whole profile row: concurrent
//! events for the same user are last-write-wins, and a failed fold after a
//! successful record write is logged and swallowed by callers. Both are
//! accepted consistency gaps.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::prediction::StressLevel;
use crate::models::profile::StressProfile;
use crate::services::avatar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Prediction,
    Journal,
    Comparison,
    CheckIn,
}

/// "Something happened for this user": the only input the aggregate store
/// consumes.
#[derive(Debug, Clone)]
pub struct ActivityEvent {
    pub user_id: Uuid,
    pub kind: ActivityKind,
    pub derived_level: Option<StressLevel>,
}

impl ActivityEvent {
    pub fn new(user_id: Uuid, kind: ActivityKind, derived_level: Option<StressLevel>) -> Self {
        Self {
            user_id,
            kind,
            derived_level,
        }
    }
}

/// Pure fold of one event into a profile. Counters are bumped per kind;
/// only predictions and journal entries move the avatar.
pub fn fold_activity(profile: &mut StressProfile, event: &ActivityEvent, now: DateTime<Utc>) {
    match event.kind {
        ActivityKind::Prediction => profile.total_predictions += 1,
        ActivityKind::Journal => profile.total_journal_entries += 1,
        ActivityKind::Comparison => profile.total_comparisons += 1,
        ActivityKind::CheckIn => {}
    }

    if matches!(event.kind, ActivityKind::Prediction | ActivityKind::Journal) {
        if let Some(level) = event.derived_level {
            profile.avatar_state = avatar::derive_from_stress_level(level);
        }
    }

    profile.last_activity = now;
}

/// Fetch the user's profile, creating it with zeroed counters and a neutral
/// avatar if this is their first activity.
pub async fn fetch_or_create_profile(db: &PgPool, user_id: Uuid) -> AppResult<StressProfile> {
    sqlx::query(
        r#"
        INSERT INTO stress_profiles (id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .execute(db)
    .await?;

    let profile = sqlx::query_as::<_, StressProfile>(
        "SELECT * FROM stress_profiles WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(db)
    .await?;

    Ok(profile)
}

/// Consume one activity event: get-or-create the profile, fold, persist.
pub async fn apply_activity(db: &PgPool, event: ActivityEvent) -> AppResult<StressProfile> {
    let mut profile = fetch_or_create_profile(db, event.user_id).await?;
    fold_activity(&mut profile, &event, Utc::now());

    sqlx::query(
        r#"
        UPDATE stress_profiles SET
            avatar_state = $2,
            total_predictions = $3,
            total_journal_entries = $4,
            total_comparisons = $5,
            last_activity = $6
        WHERE user_id = $1
        "#,
    )
    .bind(event.user_id)
    .bind(profile.avatar_state)
    .bind(profile.total_predictions)
    .bind(profile.total_journal_entries)
    .bind(profile.total_comparisons)
    .bind(profile.last_activity)
    .execute(db)
    .await?;

    Ok(profile)
}

/// Number of consecutive check-in days ending today. `dates` must be
/// distinct; order does not matter.
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> i32 {
    let mut sorted: Vec<NaiveDate> = dates.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let mut streak = 0i32;
    let mut check_date = today;
    for date in &sorted {
        if *date == check_date {
            streak += 1;
            check_date -= chrono::Duration::days(1);
        } else if *date < check_date {
            break;
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::AvatarState;

    fn empty_profile(user_id: Uuid) -> StressProfile {
        StressProfile {
            id: Uuid::new_v4(),
            user_id,
            avatar_state: AvatarState::Neutral,
            streak_days: 0,
            total_predictions: 0,
            total_journal_entries: 0,
            total_comparisons: 0,
            last_activity: Utc::now(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn each_kind_bumps_its_own_counter() {
        let user_id = Uuid::new_v4();
        let mut profile = empty_profile(user_id);
        let now = Utc::now();

        for _ in 0..3 {
            fold_activity(
                &mut profile,
                &ActivityEvent::new(user_id, ActivityKind::Prediction, Some(StressLevel::Medium)),
                now,
            );
        }
        fold_activity(
            &mut profile,
            &ActivityEvent::new(user_id, ActivityKind::Journal, Some(StressLevel::Low)),
            now,
        );
        fold_activity(
            &mut profile,
            &ActivityEvent::new(user_id, ActivityKind::Comparison, None),
            now,
        );
        fold_activity(
            &mut profile,
            &ActivityEvent::new(user_id, ActivityKind::CheckIn, None),
            now,
        );

        assert_eq!(profile.total_predictions, 3);
        assert_eq!(profile.total_journal_entries, 1);
        assert_eq!(profile.total_comparisons, 1);
    }

    #[test]
    fn interleaved_kinds_count_independently() {
        let user_id = Uuid::new_v4();
        let mut profile = empty_profile(user_id);
        let now = Utc::now();

        let kinds = [
            ActivityKind::Prediction,
            ActivityKind::Journal,
            ActivityKind::Prediction,
            ActivityKind::Comparison,
            ActivityKind::Prediction,
            ActivityKind::Journal,
        ];
        for kind in kinds {
            fold_activity(&mut profile, &ActivityEvent::new(user_id, kind, None), now);
        }

        assert_eq!(profile.total_predictions, 3);
        assert_eq!(profile.total_journal_entries, 2);
        assert_eq!(profile.total_comparisons, 1);
    }

    #[test]
    fn prediction_level_moves_avatar() {
        let user_id = Uuid::new_v4();
        let mut profile = empty_profile(user_id);
        let now = Utc::now();

        fold_activity(
            &mut profile,
            &ActivityEvent::new(user_id, ActivityKind::Prediction, Some(StressLevel::High)),
            now,
        );
        assert_eq!(profile.avatar_state, AvatarState::Stressed);

        fold_activity(
            &mut profile,
            &ActivityEvent::new(user_id, ActivityKind::Journal, Some(StressLevel::Low)),
            now,
        );
        assert_eq!(profile.avatar_state, AvatarState::Happy);
    }

    #[test]
    fn comparison_never_touches_avatar() {
        let user_id = Uuid::new_v4();
        let mut profile = empty_profile(user_id);
        profile.avatar_state = AvatarState::Happy;

        fold_activity(
            &mut profile,
            &ActivityEvent::new(user_id, ActivityKind::Comparison, Some(StressLevel::High)),
            Utc::now(),
        );
        assert_eq!(profile.avatar_state, AvatarState::Happy);
    }

    #[test]
    fn fold_updates_last_activity() {
        let user_id = Uuid::new_v4();
        let mut profile = empty_profile(user_id);
        let then = profile.last_activity;
        let now = then + chrono::Duration::hours(6);

        fold_activity(
            &mut profile,
            &ActivityEvent::new(user_id, ActivityKind::CheckIn, None),
            now,
        );
        assert_eq!(profile.last_activity, now);
    }

    #[test]
    fn streak_counts_consecutive_days_ending_today() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
        let dates = vec![
            today,
            today - chrono::Duration::days(1),
            today - chrono::Duration::days(2),
            // gap
            today - chrono::Duration::days(5),
        ];
        assert_eq!(current_streak(&dates, today), 3);
    }

    #[test]
    fn streak_is_zero_without_a_checkin_today() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
        let dates = vec![today - chrono::Duration::days(1)];
        assert_eq!(current_streak(&dates, today), 0);
        assert_eq!(current_streak(&[], today), 0);
    }
}
