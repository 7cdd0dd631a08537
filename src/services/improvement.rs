//! Before/after improvement score.
//!
//! Levels map to severity ordinals (Low=1, Medium=2, High=3). Improvement
//! is measured relative to the "before" severity, regression relative to
//! the "after" severity, so the two directions are deliberately asymmetric
//! in magnitude: High→Low gives (3-1)/3*100 ≈ 66.7 while Low→High gives
//! -(3-1)/1*100 = -200.

use crate::models::prediction::StressLevel;

/// Signed percentage. Positive means stress went down.
pub fn improvement(before: StressLevel, after: StressLevel) -> f64 {
    let b = before.severity() as f64;
    let a = after.severity() as f64;

    if (b - a).abs() < f64::EPSILON {
        0.0
    } else if a < b {
        (b - a) / b * 100.0
    } else {
        -((a - b) / a * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_levels_score_zero() {
        for level in [StressLevel::Low, StressLevel::Medium, StressLevel::High] {
            assert_eq!(improvement(level, level), 0.0);
        }
    }

    #[test]
    fn improvement_is_positive_regression_negative() {
        assert!(improvement(StressLevel::High, StressLevel::Low) > 0.0);
        assert!(improvement(StressLevel::Medium, StressLevel::Low) > 0.0);
        assert!(improvement(StressLevel::Low, StressLevel::High) < 0.0);
        assert!(improvement(StressLevel::Low, StressLevel::Medium) < 0.0);
    }

    #[test]
    fn directions_are_asymmetric() {
        let down = improvement(StressLevel::High, StressLevel::Low);
        let up = improvement(StressLevel::Low, StressLevel::High);
        assert!((down - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(up, -200.0);
        assert!((down + up).abs() > 1.0);
    }

    #[test]
    fn single_step_scores() {
        assert_eq!(improvement(StressLevel::Medium, StressLevel::Low), 50.0);
        assert!((improvement(StressLevel::High, StressLevel::Medium) - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(improvement(StressLevel::Low, StressLevel::Medium), -50.0);
    }
}
