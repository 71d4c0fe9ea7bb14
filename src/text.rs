//! Word splitting and cleaning
//!
//! Words are split on runs of whitespace. Filters only ever see the cleaned
//! form of a word; the original token is what ends up in the output.

use std::borrow::Cow;

/// Split a line into words on one or more whitespace characters
#[inline]
pub fn split_words(line: &str) -> impl Iterator<Item = &str> {
    line.split_whitespace()
}

/// Strip every character that is not a letter or digit
///
/// Returns the input borrowed when it is already clean. May yield an empty
/// string (e.g. for `"--"`).
pub fn clean_word(word: &str) -> Cow<'_, str> {
    if word.chars().all(char::is_alphanumeric) {
        Cow::Borrowed(word)
    } else {
        Cow::Owned(word.chars().filter(|c| c.is_alphanumeric()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_collapses_whitespace() {
        let words: Vec<_> = split_words("Hello   world  test   ").collect();
        assert_eq!(words, vec!["Hello", "world", "test"]);
    }

    #[test]
    fn test_split_blank_line() {
        assert_eq!(split_words("").count(), 0);
        assert_eq!(split_words(" \t  ").count(), 0);
    }

    #[test]
    fn test_split_mixed_whitespace() {
        let words: Vec<_> = split_words("\tone\u{00A0}two\r\nthree").collect();
        assert_eq!(words, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_clean_borrows_when_clean() {
        assert!(matches!(clean_word("hello42"), Cow::Borrowed("hello42")));
    }

    #[test]
    fn test_clean_strips_punctuation() {
        assert_eq!(clean_word("world!"), "world");
        assert_eq!(clean_word("\"don't\""), "dont");
        assert_eq!(clean_word("e-mail,"), "email");
    }

    #[test]
    fn test_clean_keeps_unicode_letters() {
        assert_eq!(clean_word("naïve."), "naïve");
        assert_eq!(clean_word("Привет!"), "Привет");
    }

    #[test]
    fn test_clean_can_be_empty() {
        assert_eq!(clean_word("--"), "");
        assert_eq!(clean_word(""), "");
    }
}
