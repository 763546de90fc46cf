//! Spoken duration estimate

use audiostories_core::{Duration, SpeechRate};

/// Average reading speed at rate 1.0
pub const BASE_WORDS_PER_MINUTE: f32 = 150.0;

/// Number of whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimated time to speak `text` at `rate`, at the base reading speed
pub fn estimate_duration(text: &str, rate: SpeechRate) -> Duration {
    estimate_duration_with(text, rate, BASE_WORDS_PER_MINUTE)
}

/// Estimated time to speak `text`.
///
/// `words / max(words_per_second, 1) * 1000` milliseconds, where
/// `words_per_second = words_per_minute / 60 * rate`.
pub fn estimate_duration_with(text: &str, rate: SpeechRate, words_per_minute: f32) -> Duration {
    let words_per_second = (f64::from(words_per_minute) / 60.0) * f64::from(rate.value());
    let millis = word_count(text) as f64 * 1000.0 / words_per_second.max(1.0);
    Duration::from_millis(millis as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("The quick fox"), 3);
        assert_eq!(word_count("  spaced\tout \n words  "), 3);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
    }

    #[test]
    fn test_estimate_at_normal_rate() {
        assert_eq!(
            estimate_duration("The quick fox", SpeechRate::NORMAL).as_millis(),
            1200
        );
    }

    #[test]
    fn test_estimate_at_bounds() {
        let text = "one two three four five";
        // 2.5 wps * 2.0 = 5 wps
        assert_eq!(estimate_duration(text, SpeechRate::clamped(2.0)).as_millis(), 1000);
        // 2.5 wps * 0.5 = 1.25 wps
        assert_eq!(estimate_duration(text, SpeechRate::clamped(0.5)).as_millis(), 4000);
    }

    #[test]
    fn test_words_per_second_floor_of_one() {
        // 60 wpm * 0.5 = 0.5 wps, floored to 1
        let rate = SpeechRate::clamped(0.5);
        assert_eq!(estimate_duration_with("a b c", rate, 60.0).as_millis(), 3000);
    }

    #[test]
    fn test_estimate_non_increasing_in_rate() {
        let text = "Once upon a time there was a quick brown fox who lived in the woods";
        let mut previous = u64::MAX;
        for step in 0..=30 {
            let rate = SpeechRate::clamped(0.5 + step as f32 * 0.05);
            let millis = estimate_duration(text, rate).as_millis();
            assert!(millis <= previous, "rate {} gave {} > {}", rate, millis, previous);
            previous = millis;
        }
    }

    #[test]
    fn test_empty_text_is_zero() {
        assert!(estimate_duration("", SpeechRate::NORMAL).is_zero());
    }
}
