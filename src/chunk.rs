//! Chunk processing
//!
//! A chunk is a bounded run of words taken from the input in order. Each
//! chunk is filtered on its own, so chunks can be handed to different worker
//! threads and stitched back together by index afterwards.

use crate::error::ChunkError;
use crate::filter::TextFilter;
use crate::text::clean_word;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// An ordered group of words with its position in the word stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    index: usize,
    words: Vec<String>,
}

impl Chunk {
    pub fn new(index: usize, words: Vec<String>) -> Self {
        Self { index, words }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Surviving words of one chunk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkResult {
    /// Kept words joined by single spaces
    pub text: String,
    pub kept: u64,
    pub dropped: u64,
    /// Words that were empty once cleaned
    pub skipped: u64,
}

/// Filter the words of a chunk
///
/// Kept words are emitted exactly as they appeared in the input. A panic
/// raised by a filter is reported as a [`ChunkError`] for this chunk.
pub fn process_chunk(
    chunk: &Chunk,
    filters: &[Arc<dyn TextFilter>],
) -> Result<ChunkResult, ChunkError> {
    panic::catch_unwind(AssertUnwindSafe(|| filter_words(chunk.words(), filters))).map_err(
        |payload| ChunkError {
            index: chunk.index(),
            cause: panic_message(payload.as_ref()),
        },
    )
}

fn filter_words(words: &[String], filters: &[Arc<dyn TextFilter>]) -> ChunkResult {
    let mut result = ChunkResult::default();

    for word in words {
        let clean = clean_word(word);
        if clean.trim().is_empty() {
            result.skipped += 1;
            continue;
        }

        if filters.iter().any(|f| f.should_filter(&clean)) {
            result.dropped += 1;
            continue;
        }

        if !result.text.is_empty() {
            result.text.push(' ');
        }
        result.text.push_str(word);
        result.kept += 1;
    }

    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "filter panicked".to_string()
    }
}
