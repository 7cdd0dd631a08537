//! Journal text analysis.
//!
//! A deterministic keyword scan stands in for real NLP, consistent with the
//! mocked image classifier: sentiment falls out of positive/negative word
//! counts, and matched words are kept as the entry's keyword list.

use crate::models::journal::Sentiment;
use crate::models::prediction::StressLevel;

const NEGATIVE_WORDS: &[&str] = &[
    "stressed", "stress", "anxious", "anxiety", "overwhelmed", "tired", "exhausted", "worried",
    "angry", "sad", "frustrated", "nervous", "pressure", "deadline", "burnout", "panic",
];

const POSITIVE_WORDS: &[&str] = &[
    "happy", "calm", "relaxed", "great", "good", "grateful", "peaceful", "excited", "rested",
    "proud", "hopeful", "energized",
];

const TITLE_WORDS: usize = 6;

/// Scan the text for sentiment words. Returns the overall sentiment and the
/// matched keywords in order of first appearance.
pub fn analyze_text(text: &str) -> (Sentiment, Vec<String>) {
    let mut keywords: Vec<String> = Vec::new();
    let mut positive = 0usize;
    let mut negative = 0usize;

    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let lowered = word.to_lowercase();
        let hit = if NEGATIVE_WORDS.contains(&lowered.as_str()) {
            negative += 1;
            true
        } else if POSITIVE_WORDS.contains(&lowered.as_str()) {
            positive += 1;
            true
        } else {
            false
        };

        if hit && !keywords.contains(&lowered) {
            keywords.push(lowered);
        }
    }

    let sentiment = match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    };

    (sentiment, keywords)
}

/// Text-only stress level for a sentiment.
pub fn sentiment_level(sentiment: Sentiment) -> StressLevel {
    match sentiment {
        Sentiment::Positive => StressLevel::Low,
        Sentiment::Neutral => StressLevel::Medium,
        Sentiment::Negative => StressLevel::High,
    }
}

/// Combined level for the entry: the worse of the text-derived level and
/// the image-derived one when an image was attached.
pub fn combine_levels(sentiment: Sentiment, image_level: Option<StressLevel>) -> StressLevel {
    let text_level = sentiment_level(sentiment);
    match image_level {
        Some(image) if image.severity() > text_level.severity() => image,
        _ => text_level,
    }
}

/// Derive a title from the leading words of the text.
pub fn derive_title(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().take(TITLE_WORDS + 1).collect();
    if words.is_empty() {
        return "Untitled entry".into();
    }
    if words.len() > TITLE_WORDS {
        format!("{}…", words[..TITLE_WORDS].join(" "))
    } else {
        words.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_words_dominate() {
        let (sentiment, keywords) =
            analyze_text("Deadline pressure all week, feeling stressed and exhausted.");
        assert_eq!(sentiment, Sentiment::Negative);
        assert!(keywords.contains(&"deadline".to_string()));
        assert!(keywords.contains(&"stressed".to_string()));
    }

    #[test]
    fn positive_words_dominate() {
        let (sentiment, _) = analyze_text("Felt calm and grateful after a peaceful walk.");
        assert_eq!(sentiment, Sentiment::Positive);
    }

    #[test]
    fn no_matches_is_neutral_with_empty_keywords() {
        let (sentiment, keywords) = analyze_text("Went to the store, bought groceries.");
        assert_eq!(sentiment, Sentiment::Neutral);
        assert!(keywords.is_empty());
    }

    #[test]
    fn keywords_are_deduplicated() {
        let (_, keywords) = analyze_text("Stressed, stressed, STRESSED.");
        assert_eq!(keywords, vec!["stressed".to_string()]);
    }

    #[test]
    fn combined_level_is_always_set_and_takes_the_worse() {
        assert_eq!(
            combine_levels(Sentiment::Positive, None),
            StressLevel::Low
        );
        assert_eq!(
            combine_levels(Sentiment::Positive, Some(StressLevel::High)),
            StressLevel::High
        );
        assert_eq!(
            combine_levels(Sentiment::Negative, Some(StressLevel::Low)),
            StressLevel::High
        );
        assert_eq!(
            combine_levels(Sentiment::Neutral, Some(StressLevel::Medium)),
            StressLevel::Medium
        );
    }

    #[test]
    fn title_derivation_truncates_long_text() {
        let title = derive_title("one two three four five six seven eight");
        assert_eq!(title, "one two three four five six…");
        assert_eq!(derive_title("short note"), "short note");
        assert_eq!(derive_title("   "), "Untitled entry");
    }
}
