//! Word filtering module
//!
//! Every filter is a predicate over a cleaned word. A filter that returns
//! `true` from [`TextFilter::should_filter`] removes the word from the output.
//! Filters are built once from settings and shared read-only between worker
//! threads.

use crate::error::ConfigError;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Default letter for [`ContainsLetterFilter`]
pub const DEFAULT_LETTER: char = 't';

/// Default minimum length for [`MinimumLengthFilter`]
pub const DEFAULT_MINIMUM_LENGTH: usize = 3;

const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

/// A named, independently enableable word predicate
pub trait TextFilter: Send + Sync {
    /// Unique name used in diagnostics and settings
    fn name(&self) -> &str;

    fn is_enabled(&self) -> bool;

    /// Returns true if the word should be removed
    fn should_filter(&self, word: &str) -> bool;
}

/// Drops words containing a given letter (case-insensitive)
#[derive(Debug, Clone)]
pub struct ContainsLetterFilter {
    enabled: bool,
    letter: char,
}

impl ContainsLetterFilter {
    pub const NAME: &'static str = "ContainsLetterFilter";

    /// Build from a configured letter string
    ///
    /// Only the first character is used; an empty string falls back to
    /// [`DEFAULT_LETTER`].
    pub fn new(enabled: bool, letter: &str) -> Result<Self, ConfigError> {
        let letter = match letter.chars().next() {
            None => DEFAULT_LETTER,
            Some(c) if c.is_alphanumeric() => c.to_lowercase().next().unwrap_or(c),
            Some(_) => return Err(ConfigError::InvalidLetter(letter.to_string())),
        };

        Ok(Self { enabled, letter })
    }

    pub fn letter(&self) -> char {
        self.letter
    }
}

impl TextFilter for ContainsLetterFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    fn should_filter(&self, word: &str) -> bool {
        if !self.enabled || word.is_empty() {
            return false;
        }

        word.trim().to_lowercase().contains(self.letter)
    }
}

/// Drops words shorter than a minimum number of characters
#[derive(Debug, Clone)]
pub struct MinimumLengthFilter {
    enabled: bool,
    minimum_length: usize,
}

impl MinimumLengthFilter {
    pub const NAME: &'static str = "MinimumLengthFilter";

    pub fn new(enabled: bool, minimum_length: usize) -> Self {
        Self {
            enabled,
            minimum_length,
        }
    }

    pub fn minimum_length(&self) -> usize {
        self.minimum_length
    }
}

impl TextFilter for MinimumLengthFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    fn should_filter(&self, word: &str) -> bool {
        if !self.enabled {
            return false;
        }

        if word.is_empty() {
            return true;
        }

        word.trim().chars().count() < self.minimum_length
    }
}

/// Drops words with a vowel in the middle
///
/// Odd-length words have one middle character, even-length words two.
/// Words shorter than three characters are always kept. `y` does not count
/// as a vowel.
#[derive(Debug, Clone)]
pub struct VowelMiddleFilter {
    enabled: bool,
}

impl VowelMiddleFilter {
    pub const NAME: &'static str = "VowelMiddleFilter";

    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl TextFilter for VowelMiddleFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn should_filter(&self, word: &str) -> bool {
        if !self.enabled || word.is_empty() {
            return false;
        }

        let chars: Vec<char> = word.trim().to_lowercase().chars().collect();
        let len = chars.len();
        if len < 3 {
            return false;
        }

        let middle = len / 2;
        let middle_chars = if len % 2 == 1 {
            &chars[middle..=middle]
        } else {
            &chars[middle - 1..=middle]
        };

        middle_chars.iter().any(|c| VOWELS.contains(c))
    }
}

/// Drops words matching a regex pattern
#[derive(Debug, Clone)]
pub struct PatternFilter {
    enabled: bool,
    pattern: Regex,
}

impl PatternFilter {
    pub const NAME: &'static str = "PatternFilter";

    pub fn new(enabled: bool, pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source: e,
        })?;

        Ok(Self {
            enabled,
            pattern: regex,
        })
    }

    pub fn pattern_str(&self) -> &str {
        self.pattern.as_str()
    }
}

impl TextFilter for PatternFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    fn should_filter(&self, word: &str) -> bool {
        self.enabled && self.pattern.is_match(word)
    }
}

/// Ordered, immutable collection of filters
///
/// Filters are evaluated in insertion order.
#[derive(Clone, Default)]
pub struct FilterSet {
    filters: Vec<Arc<dyn TextFilter>>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter
    pub fn with<F: TextFilter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// The enabled subset, in order
    pub fn enabled(&self) -> Vec<Arc<dyn TextFilter>> {
        self.filters
            .iter()
            .filter(|f| f.is_enabled())
            .cloned()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn TextFilter>> {
        self.filters.iter()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl fmt::Debug for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.filters.iter().map(|flt| (flt.name(), flt.is_enabled())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("test", true)]
    #[case("cat", true)]
    #[case("battle", true)]
    #[case("hello", false)]
    #[case("world", false)]
    #[case("house", false)]
    #[case("TEST", true)]
    #[case("tEsT", true)]
    #[case("HELLO", false)]
    #[case("", false)]
    #[case("   ", false)]
    #[case("  test  ", true)]
    fn test_contains_letter(#[case] word: &str, #[case] expected: bool) {
        let filter = ContainsLetterFilter::new(true, "t").unwrap();
        assert_eq!(filter.should_filter(word), expected);
    }

    #[test]
    fn test_contains_letter_custom() {
        let filter = ContainsLetterFilter::new(true, "X").unwrap();

        assert_eq!(filter.letter(), 'x');
        assert!(filter.should_filter("exact"));
        assert!(!filter.should_filter("test"));
    }

    #[test]
    fn test_contains_letter_empty_defaults_to_t() {
        let filter = ContainsLetterFilter::new(true, "").unwrap();
        assert_eq!(filter.letter(), 't');
        assert!(filter.should_filter("test"));
    }

    #[test]
    fn test_contains_letter_rejects_punctuation() {
        let err = ContainsLetterFilter::new(true, "!").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLetter(ref s) if s == "!"));
    }

    #[test]
    fn test_contains_letter_disabled() {
        let filter = ContainsLetterFilter::new(false, "t").unwrap();
        assert!(!filter.is_enabled());
        assert!(!filter.should_filter("test"));
        assert_eq!(filter.name(), "ContainsLetterFilter");
    }

    #[rstest]
    #[case("a", true)]
    #[case("ab", true)]
    #[case("abc", false)]
    #[case("abcd", false)]
    #[case("", true)]
    #[case("  a  ", true)]
    #[case("  abc  ", false)]
    #[case("   ", true)]
    fn test_minimum_length(#[case] word: &str, #[case] expected: bool) {
        let filter = MinimumLengthFilter::new(true, 3);
        assert_eq!(filter.should_filter(word), expected);
    }

    #[test]
    fn test_minimum_length_custom() {
        let filter = MinimumLengthFilter::new(true, 5);

        assert_eq!(filter.minimum_length(), 5);
        assert!(filter.should_filter("test"));
        assert!(!filter.should_filter("testing"));
    }

    #[test]
    fn test_minimum_length_counts_chars() {
        let filter = MinimumLengthFilter::new(true, 3);
        assert!(!filter.should_filter("héé"));
    }

    #[test]
    fn test_minimum_length_disabled() {
        let filter = MinimumLengthFilter::new(false, 3);
        assert!(!filter.should_filter("a"));
        assert_eq!(filter.name(), "MinimumLengthFilter");
    }

    #[rstest]
    #[case("clean", true)]
    #[case("what", true)]
    #[case("currently", true)]
    #[case("the", false)]
    #[case("rather", false)]
    #[case("a", false)]
    #[case("at", false)]
    #[case("", false)]
    #[case("   ", false)]
    #[case("test", true)]
    #[case("word", true)]
    #[case("hello", false)]
    #[case("world", false)]
    #[case("CLEAN", true)]
    #[case("THE", false)]
    #[case("ClEaN", true)]
    fn test_vowel_middle(#[case] word: &str, #[case] expected: bool) {
        let filter = VowelMiddleFilter::new(true);
        assert_eq!(filter.should_filter(word), expected);
    }

    #[test]
    fn test_vowel_middle_disabled() {
        let filter = VowelMiddleFilter::new(false);
        assert!(!filter.should_filter("clean"));
        assert_eq!(filter.name(), "VowelMiddleFilter");
    }

    #[test]
    fn test_pattern_filter() {
        let filter = PatternFilter::new(true, r"^[0-9]+$").unwrap();

        assert!(filter.should_filter("2024"));
        assert!(!filter.should_filter("abc123"));
        assert_eq!(filter.pattern_str(), r"^[0-9]+$");
    }

    #[test]
    fn test_pattern_filter_invalid() {
        let err = PatternFilter::new(true, "([a-z").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn test_filter_set_enabled_keeps_order() {
        let set = FilterSet::new()
            .with(ContainsLetterFilter::new(true, "t").unwrap())
            .with(MinimumLengthFilter::new(false, 3))
            .with(VowelMiddleFilter::new(true));

        let names: Vec<_> = set.enabled().iter().map(|f| f.name().to_string()).collect();
        assert_eq!(names, vec!["ContainsLetterFilter", "VowelMiddleFilter"]);
        assert_eq!(set.len(), 3);
    }
}
