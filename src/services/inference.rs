//! Image classification seam.
//!
//! The rest of the system only ever sees a `Classification`; how it is
//! produced is behind the `StressClassifier` trait so a real model service
//! can be swapped in without touching the handlers.

use crate::models::prediction::{MoodTag, StressLevel, StressType};

#[derive(Debug, Clone, Copy)]
pub struct Classification {
    pub stress_level: StressLevel,
    pub mood_tag: MoodTag,
    pub stress_type: StressType,
    pub confidence: i32,
}

/// Synchronous image classification collaborator.
pub trait StressClassifier: Send + Sync {
    fn classify(&self, image: &[u8]) -> anyhow::Result<Classification>;
}

/// Stand-in classifier returning fixed values.
// TODO: Run MobileNetV2 prediction here once the model service exists.
pub struct MockClassifier;

impl StressClassifier for MockClassifier {
    fn classify(&self, image: &[u8]) -> anyhow::Result<Classification> {
        if image.is_empty() {
            anyhow::bail!("empty image payload");
        }
        Ok(Classification {
            stress_level: StressLevel::Medium,
            mood_tag: MoodTag::Neutral,
            stress_type: StressType::Work,
            confidence: 78,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_the_fixed_result() {
        let c = MockClassifier.classify(&[0u8; 16]).unwrap();
        assert_eq!(c.stress_level, StressLevel::Medium);
        assert_eq!(c.mood_tag, MoodTag::Neutral);
        assert_eq!(c.stress_type, StressType::Work);
        assert_eq!(c.confidence, 78);
    }

    #[test]
    fn mock_rejects_empty_payloads() {
        assert!(MockClassifier.classify(&[]).is_err());
    }
}
