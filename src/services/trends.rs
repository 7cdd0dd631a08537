//! Weekly trend aggregation over prediction records.
//!
//! Pure read path: the window is the 7 consecutive days ending at `as_of`
//! inclusive, dates ascending, with zero-filled buckets for day/level
//! combinations that have no predictions.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::prediction::StressLevel;

pub const TREND_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Serialize)]
pub struct WeeklyTrend {
    pub dates: Vec<NaiveDate>,
    pub stress_counts: StressCounts,
}

#[derive(Debug, Serialize)]
pub struct StressCounts {
    #[serde(rename = "Low")]
    pub low: Vec<i64>,
    #[serde(rename = "Medium")]
    pub medium: Vec<i64>,
    #[serde(rename = "High")]
    pub high: Vec<i64>,
}

/// Fill the 7-day grid from sparse (day, level, count) rows.
pub fn build_series(rows: &[(NaiveDate, StressLevel, i64)], as_of: NaiveDate) -> WeeklyTrend {
    let start = as_of - chrono::Duration::days(TREND_WINDOW_DAYS - 1);
    let dates: Vec<NaiveDate> = (0..TREND_WINDOW_DAYS)
        .map(|offset| start + chrono::Duration::days(offset))
        .collect();

    let mut low = vec![0i64; dates.len()];
    let mut medium = vec![0i64; dates.len()];
    let mut high = vec![0i64; dates.len()];

    for (day, level, count) in rows {
        let Some(idx) = dates.iter().position(|d| d == day) else {
            continue; // outside the window
        };
        match level {
            StressLevel::Low => low[idx] += count,
            StressLevel::Medium => medium[idx] += count,
            StressLevel::High => high[idx] += count,
        }
    }

    WeeklyTrend {
        dates,
        stress_counts: StressCounts { low, medium, high },
    }
}

/// Per-day, per-level prediction counts for the 7 days ending at `as_of`.
pub async fn weekly_trend(db: &PgPool, user_id: Uuid, as_of: NaiveDate) -> AppResult<WeeklyTrend> {
    let start = as_of - chrono::Duration::days(TREND_WINDOW_DAYS - 1);

    let rows = sqlx::query_as::<_, (NaiveDate, StressLevel, i64)>(
        r#"
        SELECT created_at::date AS day, stress_level, COUNT(*)
        FROM predictions
        WHERE user_id = $1 AND created_at::date BETWEEN $2 AND $3
        GROUP BY day, stress_level
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(as_of)
    .fetch_all(db)
    .await?;

    Ok(build_series(&rows, as_of))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn empty_rows_yield_seven_zeroed_buckets() {
        let trend = build_series(&[], day("2026-08-23"));
        assert_eq!(trend.dates.len(), 7);
        assert_eq!(trend.dates[0], day("2026-08-17"));
        assert_eq!(trend.dates[6], day("2026-08-23"));
        assert_eq!(trend.stress_counts.low, vec![0; 7]);
        assert_eq!(trend.stress_counts.medium, vec![0; 7]);
        assert_eq!(trend.stress_counts.high, vec![0; 7]);
    }

    #[test]
    fn dates_ascend_and_end_at_as_of() {
        let trend = build_series(&[], day("2026-01-03"));
        for pair in trend.dates.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(*trend.dates.last().unwrap(), day("2026-01-03"));
    }

    #[test]
    fn same_day_low_low_high_buckets_correctly() {
        let as_of = day("2026-08-23");
        let rows = vec![
            (as_of, StressLevel::Low, 2),
            (as_of, StressLevel::High, 1),
        ];
        let trend = build_series(&rows, as_of);
        assert_eq!(trend.stress_counts.low[6], 2);
        assert_eq!(trend.stress_counts.medium[6], 0);
        assert_eq!(trend.stress_counts.high[6], 1);
    }

    #[test]
    fn per_day_sum_matches_total_rows() {
        let as_of = day("2026-08-23");
        let rows = vec![
            (day("2026-08-20"), StressLevel::Low, 1),
            (day("2026-08-20"), StressLevel::Medium, 4),
            (day("2026-08-20"), StressLevel::High, 2),
        ];
        let trend = build_series(&rows, as_of);
        let idx = trend
            .dates
            .iter()
            .position(|d| *d == day("2026-08-20"))
            .unwrap();
        let sum = trend.stress_counts.low[idx]
            + trend.stress_counts.medium[idx]
            + trend.stress_counts.high[idx];
        assert_eq!(sum, 7);
    }

    #[test]
    fn rows_outside_the_window_are_ignored() {
        let as_of = day("2026-08-23");
        let rows = vec![(day("2026-08-10"), StressLevel::High, 9)];
        let trend = build_series(&rows, as_of);
        assert_eq!(trend.stress_counts.high, vec![0; 7]);
    }

    #[test]
    fn build_series_is_repeatable() {
        let as_of = day("2026-08-23");
        let rows = vec![(as_of, StressLevel::Medium, 3)];
        let first = build_series(&rows, as_of);
        let second = build_series(&rows, as_of);
        assert_eq!(first.dates, second.dates);
        assert_eq!(first.stress_counts.medium, second.stress_counts.medium);
    }
}
