//! Voice catalog filtering

use audiostories_core::Voice;

/// Name fragment marking network-quality voices
pub const NETWORK_VOICE_MARKER: &str = "network";

/// Locale voices must match
pub const REFERENCE_LOCALE: &str = "en-US";

/// Keeps voices whose name contains a marker and whose locale matches.
///
/// Locales compare case-insensitively with `_` and `-` treated alike, so
/// `en_US` and `en-us` both match `en-US`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceFilter {
    marker: String,
    locale: String,
}

impl Default for VoiceFilter {
    fn default() -> Self {
        Self::new(NETWORK_VOICE_MARKER, REFERENCE_LOCALE)
    }
}

impl VoiceFilter {
    pub fn new(marker: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            locale: normalize_locale(&locale.into()),
        }
    }

    pub fn matches(&self, voice: &Voice) -> bool {
        voice.name.contains(&self.marker) && normalize_locale(&voice.locale) == self.locale
    }

    /// Names of the matching voices, in catalog order
    pub fn apply(&self, voices: &[Voice]) -> Vec<String> {
        voices
            .iter()
            .filter(|voice| self.matches(voice))
            .map(|voice| voice.name.clone())
            .collect()
    }
}

fn normalize_locale(locale: &str) -> String {
    locale.replace('_', "-").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Voice> {
        vec![
            Voice::new("en-us-x-sfg-network", "en-US"),
            Voice::new("en-us-x-sfg-local", "en-US"),
            Voice::new("en-gb-x-rjs-network", "en-GB"),
            Voice::new("en-us-x-iol-network", "en_US"),
            Voice::new("fr-fr-x-vlf-local", "fr-FR"),
        ]
    }

    #[test]
    fn test_default_filter_keeps_two_of_five() {
        let names = VoiceFilter::default().apply(&catalog());
        assert_eq!(names, vec!["en-us-x-sfg-network", "en-us-x-iol-network"]);
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        let voice = Voice::new("en-us-NETWORK", "en-US");
        assert!(!VoiceFilter::default().matches(&voice));
    }

    #[test]
    fn test_custom_filter() {
        let filter = VoiceFilter::new("local", "fr_FR");
        assert_eq!(filter.apply(&catalog()), vec!["fr-fr-x-vlf-local"]);
    }

    #[test]
    fn test_empty_catalog() {
        assert!(VoiceFilter::default().apply(&[]).is_empty());
    }
}
