//! Reference-content selection for the home dashboard.
//!
//! Tips are sampled without replacement and, intentionally, without any
//! target-level filtering: the catalog categorizes tips by level but the
//! display path has always shown a cross-section. Exercise and quote are
//! uniform picks. Empty catalogs produce empty selections, never errors.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::content::{BreathingExercise, MotivationalQuote, StressTip};

pub const MAX_TIPS: usize = 3;

#[derive(Debug, Serialize)]
pub struct DisplayBundle {
    pub tips: Vec<StressTip>,
    pub exercise: Option<BreathingExercise>,
    pub quote: Option<MotivationalQuote>,
}

pub fn pick_display_bundle<R: Rng + ?Sized>(
    tips: &[StressTip],
    exercises: &[BreathingExercise],
    quotes: &[MotivationalQuote],
    rng: &mut R,
) -> DisplayBundle {
    DisplayBundle {
        tips: tips.choose_multiple(rng, MAX_TIPS).cloned().collect(),
        exercise: exercises.choose(rng).cloned(),
        quote: quotes.choose(rng).cloned(),
    }
}

/// Load the active catalog rows and pick a bundle for display.
pub async fn load_display_bundle(db: &PgPool) -> AppResult<DisplayBundle> {
    let tips = sqlx::query_as::<_, StressTip>("SELECT * FROM stress_tips WHERE is_active = true")
        .fetch_all(db)
        .await?;
    let exercises = sqlx::query_as::<_, BreathingExercise>(
        "SELECT * FROM breathing_exercises WHERE is_active = true",
    )
    .fetch_all(db)
    .await?;
    let quotes = sqlx::query_as::<_, MotivationalQuote>(
        "SELECT * FROM motivational_quotes WHERE is_active = true",
    )
    .fetch_all(db)
    .await?;

    Ok(pick_display_bundle(
        &tips,
        &exercises,
        &quotes,
        &mut rand::thread_rng(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn tip(title: &str) -> StressTip {
        StressTip {
            id: Uuid::new_v4(),
            title: title.into(),
            content: String::new(),
            target_level: None,
            category: "General".into(),
            is_active: true,
        }
    }

    fn quote(text: &str) -> MotivationalQuote {
        MotivationalQuote {
            id: Uuid::new_v4(),
            quote: text.into(),
            author: "Unknown".into(),
            category: "General".into(),
            is_active: true,
        }
    }

    #[test]
    fn empty_catalogs_yield_empty_bundle() {
        let bundle = pick_display_bundle(&[], &[], &[], &mut rand::thread_rng());
        assert!(bundle.tips.is_empty());
        assert!(bundle.exercise.is_none());
        assert!(bundle.quote.is_none());
    }

    #[test]
    fn caps_at_three_tips() {
        let tips: Vec<StressTip> = (0..10).map(|i| tip(&format!("tip-{i}"))).collect();
        let bundle = pick_display_bundle(&tips, &[], &[], &mut rand::thread_rng());
        assert_eq!(bundle.tips.len(), MAX_TIPS);
    }

    #[test]
    fn small_catalog_returns_everything_once() {
        let tips = vec![tip("a"), tip("b")];
        let bundle = pick_display_bundle(&tips, &[], &[], &mut rand::thread_rng());
        assert_eq!(bundle.tips.len(), 2);
        assert_ne!(bundle.tips[0].id, bundle.tips[1].id);
    }

    #[test]
    fn sampling_is_without_replacement() {
        let tips: Vec<StressTip> = (0..5).map(|i| tip(&format!("tip-{i}"))).collect();
        for _ in 0..50 {
            let bundle = pick_display_bundle(&tips, &[], &[], &mut rand::thread_rng());
            let mut ids: Vec<_> = bundle.tips.iter().map(|t| t.id).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), bundle.tips.len());
        }
    }

    #[test]
    fn single_quote_is_always_chosen() {
        let quotes = vec![quote("Progress, not perfection.")];
        let bundle = pick_display_bundle(&[], &[], &quotes, &mut rand::thread_rng());
        assert_eq!(
            bundle.quote.map(|q| q.quote),
            Some("Progress, not perfection.".to_string())
        );
    }
}
