//! Command-line interface definition for text-filter
//!
//! Flags override values from the settings file.

use crate::config::Settings;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Filter the words of a text file
///
/// Splits the input into words, drops every word matched by an enabled
/// filter and prints the surviving words on one line.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "text-filter",
    version,
    about = "Chunked, parallel word filtering for text files",
    long_about = r#"
Reads a text file, splits it into words and removes every word matched by
one of the enabled filters. Words are processed in chunks on all cores and
joined back in their original order.

FILTERS:
    contains-letter   Drop words containing a letter (default: t)
    minimum-length    Drop words shorter than N characters (default: 3)
    vowel-middle      Drop words with a vowel in the middle
    pattern           Drop words matching a regex

EXAMPLES:
    # Use appsettings.json from the current directory
    text-filter

    # Explicit input, drop words containing 'e'
    text-filter -i book.txt --letter e

    # Only the minimum length filter, smaller chunks
    text-filter -i book.txt --disable contains-letter,vowel-middle --chunk-size 500

    # Also drop purely numeric tokens
    text-filter -i book.txt -p "^[0-9]+$"
"#
)]
pub struct Args {
    /// Input file (default: Processing.InputFilePath from settings)
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Settings file (default: ./appsettings.json if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the result to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Number of words per chunk
    #[arg(long, value_name = "NUM")]
    pub chunk_size: Option<usize>,

    /// Letter for the contains-letter filter
    #[arg(long, value_name = "CHAR")]
    pub letter: Option<String>,

    /// Minimum word length for the minimum-length filter
    #[arg(long, value_name = "NUM")]
    pub min_length: Option<usize>,

    /// Regex for the pattern filter (enables it)
    #[arg(short, long, value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Filters to enable
    #[arg(long, value_enum, value_delimiter = ',', value_name = "FILTER")]
    pub enable: Vec<FilterName>,

    /// Filters to disable (wins over --enable)
    #[arg(long, value_enum, value_delimiter = ',', value_name = "FILTER")]
    pub disable: Vec<FilterName>,

    /// Number of threads (default: auto-detect)
    #[arg(short = 't', long, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Read the input through a memory map
    #[arg(long, default_value_t = false)]
    pub mmap: bool,

    /// Show processing statistics
    #[arg(long, default_value_t = false)]
    pub stats: bool,

    /// Quiet mode - only the filtered text
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Filters addressable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterName {
    ContainsLetter,
    MinimumLength,
    VowelMiddle,
    Pattern,
}

impl Args {
    /// Layer the flags over loaded settings
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(ref input) = self.input {
            settings.processing.input_file_path = input.clone();
        }
        if let Some(chunk_size) = self.chunk_size {
            settings.processing.chunk_size = chunk_size;
        }

        let filters = &mut settings.text_filters;
        if let Some(ref letter) = self.letter {
            filters.contains_letter.letter = letter.clone();
        }
        if let Some(min_length) = self.min_length {
            filters.minimum_length.minimum_length = min_length;
        }
        if let Some(ref pattern) = self.pattern {
            filters.pattern.pattern = Some(pattern.clone());
            filters.pattern.enabled = true;
        }

        for (names, enabled) in [(&self.enable, true), (&self.disable, false)] {
            for name in names {
                match name {
                    FilterName::ContainsLetter => filters.contains_letter.enabled = enabled,
                    FilterName::MinimumLength => filters.minimum_length.enabled = enabled,
                    FilterName::VowelMiddle => filters.vowel_middle.enabled = enabled,
                    FilterName::Pattern => filters.pattern.enabled = enabled,
                }
            }
        }
    }
}
