//! # Text Filter
//!
//! Reads a text file, splits it into words, drops every word matched by an
//! enabled filter and joins the surviving words into a single string.
//!
//! ## Features
//!
//! - **Chunked parallel filtering**: words are grouped into fixed-size chunks
//!   that are filtered on the rayon thread pool
//! - **Deterministic output**: chunk results are joined in input order no
//!   matter which chunk finishes first
//! - **Pluggable filters**: letter containment, minimum length, vowel in the
//!   middle and regex patterns, each enabled independently
//! - **Encoding detection**: input is transcoded to UTF-8 automatically
//! - **Cancellation**: long runs can be stopped through a [`CancellationToken`]
//!
//! ## Usage
//!
//! ```bash
//! # Filter input.txt with the settings in ./appsettings.json
//! text-filter
//!
//! # Drop words containing 'e' or shorter than 4 characters
//! text-filter -i book.txt --letter e --min-length 4
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use text_filter::filter::{ContainsLetterFilter, FilterSet};
//! use text_filter::processor::{Processor, ProcessorConfig};
//! use std::path::Path;
//!
//! let filters = FilterSet::new().with(ContainsLetterFilter::new(true, "t").unwrap());
//! let processor = Processor::new(ProcessorConfig::default(), filters);
//! let text = processor.process_file(Path::new("input.txt")).unwrap();
//! println!("{}", text);
//! ```

pub mod chunk;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod output;
pub mod processor;
pub mod progress;
pub mod source;
pub mod text;

pub use cli::Args;
pub use config::Settings;
pub use error::{ChunkError, ConfigError, ErrorKind, ProcessingError};
pub use filter::{FilterSet, TextFilter};
pub use processor::{CancellationToken, Processor, ProcessorConfig};
pub use source::{FileLineSource, LineSource, MmapLineSource};
