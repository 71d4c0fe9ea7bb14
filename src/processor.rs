//! Core processing engine
//!
//! Streams words from a line source into fixed-size chunks, filters the
//! chunks in parallel on the rayon thread pool and joins the surviving words
//! back together in input order.

use crate::chunk::{process_chunk, Chunk, ChunkResult};
use crate::error::{ChunkError, ConfigError, ProcessingError};
use crate::filter::{FilterSet, TextFilter};
use crate::progress::ProcessingStats;
use crate::source::{FileLineSource, LineSource};
use crate::text::split_words;

use std::io;
use std::mem;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Default number of words per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Processor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorConfig {
    chunk_size: usize,
}

impl ProcessorConfig {
    pub fn new(chunk_size: usize) -> Result<Self, ConfigError> {
        if chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize);
        }
        Ok(Self { chunk_size })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Cooperative cancellation flag shared between a caller and a processing call
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

type ChunkOutcome = (usize, Result<ChunkResult, ChunkError>);

/// Main processor
pub struct Processor {
    config: ProcessorConfig,
    filters: FilterSet,
    source: Box<dyn LineSource>,
    stats: Arc<ProcessingStats>,
}

impl Processor {
    /// Create a processor reading files through [`FileLineSource`]
    pub fn new(config: ProcessorConfig, filters: FilterSet) -> Self {
        Self::with_source(config, filters, FileLineSource)
    }

    /// Create a processor with a custom line source
    pub fn with_source<S: LineSource + 'static>(
        config: ProcessorConfig,
        filters: FilterSet,
        source: S,
    ) -> Self {
        Self {
            config,
            filters,
            source: Box::new(source),
            stats: Arc::new(ProcessingStats::new()),
        }
    }

    /// Filter a file and return the surviving words joined by single spaces
    pub fn process_file(&self, path: &Path) -> Result<String, ProcessingError> {
        self.process_file_with_cancel(path, &CancellationToken::new())
    }

    /// Same as [`Processor::process_file`], stopping early once `cancel` fires
    pub fn process_file_with_cancel(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<String, ProcessingError> {
        let lines = self
            .source
            .read_lines(path)
            .map_err(|source| ProcessingError::SourceAccess {
                path: path.to_path_buf(),
                source,
            })?;

        let text = self.process_lines(path, lines, cancel)?;
        self.stats.complete_file();
        log::info!("Processed {:?} ({} bytes of output)", path, text.len());

        Ok(text)
    }

    /// Run the pipeline over lines that were already opened
    ///
    /// `path` is only used to label errors. Either the full result or an
    /// error is returned, never a partial string.
    pub fn process_lines<I>(
        &self,
        path: &Path,
        lines: I,
        cancel: &CancellationToken,
    ) -> Result<String, ProcessingError>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        let chunk_size = self.config.chunk_size;
        let capacity = chunk_size.min(DEFAULT_CHUNK_SIZE);
        let filters = self.filters.enabled();
        let halt = AtomicBool::new(false);
        // Lowest failed chunk index so far, usize::MAX while none failed
        let failed_at = AtomicUsize::new(usize::MAX);
        let (tx, rx) = crossbeam_channel::unbounded::<ChunkOutcome>();

        let mut buffer: Vec<String> = Vec::with_capacity(capacity);
        let mut chunk_count = 0usize;
        let mut line_count = 0u64;
        let mut word_count = 0u64;

        // The first chunk is held back until a second one exists, so a
        // single-chunk input is filtered inline without touching the pool.
        let drained = rayon::in_place_scope(|scope| -> Result<Option<Chunk>, ProcessingError> {
            let filters = &filters;
            let halt = &halt;
            let failed_at = &failed_at;

            let submit = |chunk: Chunk| {
                let tx = tx.clone();
                log::debug!("Dispatching chunk {} ({} words)", chunk.index(), chunk.len());

                scope.spawn(move |_| {
                    // Only chunks above the lowest failure so far are skipped
                    if cancel.is_cancelled()
                        || halt.load(Ordering::SeqCst)
                        || chunk.index() > failed_at.load(Ordering::SeqCst)
                    {
                        log::debug!("Skipping chunk {}", chunk.index());
                        return;
                    }

                    let outcome = process_chunk(&chunk, filters);
                    if outcome.is_err() {
                        failed_at.fetch_min(chunk.index(), Ordering::SeqCst);
                    }
                    // The receiver outlives the scope
                    let _ = tx.send((chunk.index(), outcome));
                });
            };

            let mut held: Option<Chunk> = None;
            let mut dispatch = |chunk: Chunk| {
                if chunk.index() == 0 {
                    held = Some(chunk);
                } else {
                    if let Some(first) = held.take() {
                        submit(first);
                    }
                    submit(chunk);
                }
            };

            let stopped = || {
                cancel.is_cancelled()
                    || halt.load(Ordering::SeqCst)
                    || failed_at.load(Ordering::SeqCst) != usize::MAX
            };

            for line in lines {
                if stopped() {
                    break;
                }

                let line = line.map_err(|source| {
                    halt.store(true, Ordering::SeqCst);
                    ProcessingError::SourceAccess {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                line_count += 1;

                for word in split_words(&line) {
                    buffer.push(word.to_string());
                    word_count += 1;

                    if buffer.len() == chunk_size {
                        let words = mem::replace(&mut buffer, Vec::with_capacity(capacity));
                        dispatch(Chunk::new(chunk_count, words));
                        chunk_count += 1;
                    }
                }
            }

            if !buffer.is_empty() && !stopped() {
                dispatch(Chunk::new(chunk_count, mem::take(&mut buffer)));
                chunk_count += 1;
            }

            Ok(held)
        });
        drop(tx);

        let held = drained?;
        if cancel.is_cancelled() {
            log::debug!("Processing of {:?} cancelled", path);
            return Err(ProcessingError::Cancelled {
                path: path.to_path_buf(),
            });
        }

        self.stats.add_lines(line_count);
        self.stats.add_words(word_count);
        self.stats.add_chunks(chunk_count as u64);

        if chunk_count == 0 {
            return Ok(String::new());
        }

        if let Some(only) = held {
            return self.process_single_chunk(path, &only, &filters);
        }

        let mut slots: Vec<Option<Result<ChunkResult, ChunkError>>> =
            (0..chunk_count).map(|_| None).collect();
        for (index, outcome) in rx.try_iter() {
            slots[index] = Some(outcome);
        }
        log::debug!("Joining {} chunks", chunk_count);

        self.join_chunks(path, slots)
    }

    /// Fast path for input that fits in one chunk
    fn process_single_chunk(
        &self,
        path: &Path,
        chunk: &Chunk,
        filters: &[Arc<dyn TextFilter>],
    ) -> Result<String, ProcessingError> {
        let result = process_chunk(chunk, filters).map_err(|source| {
            ProcessingError::ChunkProcessing {
                path: path.to_path_buf(),
                source,
            }
        })?;
        self.stats.record_chunk(&result);

        Ok(result.text.trim().to_string())
    }

    /// Join chunk results in index order
    fn join_chunks(
        &self,
        path: &Path,
        slots: Vec<Option<Result<ChunkResult, ChunkError>>>,
    ) -> Result<String, ProcessingError> {
        // Report the earliest failing chunk
        if let Some(source) = slots.iter().find_map(|slot| match slot {
            Some(Err(e)) => Some(e.clone()),
            _ => None,
        }) {
            return Err(ProcessingError::ChunkProcessing {
                path: path.to_path_buf(),
                source,
            });
        }

        let mut parts = Vec::with_capacity(slots.len());
        for (index, slot) in slots.into_iter().enumerate() {
            let result = match slot {
                Some(Ok(result)) => result,
                _ => {
                    return Err(ProcessingError::ChunkProcessing {
                        path: path.to_path_buf(),
                        source: ChunkError {
                            index,
                            cause: "chunk did not complete".to_string(),
                        },
                    })
                }
            };

            self.stats.record_chunk(&result);
            if !result.text.is_empty() {
                parts.push(result.text);
            }
        }

        Ok(parts.join(" ").trim().to_string())
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Get processing statistics
    pub fn stats(&self) -> Arc<ProcessingStats> {
        Arc::clone(&self.stats)
    }
}
