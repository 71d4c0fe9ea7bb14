//! Progress display module
//!
//! Styled console output, a spinner for running jobs and processing
//! statistics.

use crate::chunk::ChunkResult;

use bytesize::ByteSize;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Print the application banner
pub fn print_banner() {
    let banner = r#"
╔══════════════════════════════════════════════════════════════╗
║                         TEXT-FILTER                          ║
║          Chunked, parallel word filtering for text           ║
╚══════════════════════════════════════════════════════════════╝
"#;

    println!("{}", banner.green());
}

/// Print a section header
pub fn print_header(text: &str) {
    println!("\n{} {}", "▶".green(), text.green().bold());
}

/// Print an info message
pub fn print_info(text: &str) {
    println!("  {} {}", "ℹ".cyan(), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    println!("  {} {}", "✔".green(), text.green());
}

/// Print a warning message
pub fn print_warning(text: &str) {
    println!("  {} {}", "⚠".yellow(), text.yellow());
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".red(), text.red());
}

/// Print a bullet point
pub fn print_bullet(text: &str) {
    println!("  {} {}", "•".green(), text);
}

/// Create a styled spinner for indeterminate progress
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();

    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
    {
        pb.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
    }

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Processing statistics
///
/// Chunk counters are folded in by the processor once a chunk's result is
/// joined, never from worker threads.
#[derive(Debug)]
pub struct ProcessingStats {
    pub total_files: AtomicU64,
    pub processed_files: AtomicU64,
    pub total_bytes: AtomicU64,
    pub total_lines: AtomicU64,
    pub total_words: AtomicU64,
    pub chunks: AtomicU64,
    pub kept_words: AtomicU64,
    pub dropped_words: AtomicU64,
    pub skipped_words: AtomicU64,
    pub start_time: Instant,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self {
            total_files: AtomicU64::new(0),
            processed_files: AtomicU64::new(0),
            total_bytes: AtomicU64::new(0),
            total_lines: AtomicU64::new(0),
            total_words: AtomicU64::new(0),
            chunks: AtomicU64::new(0),
            kept_words: AtomicU64::new(0),
            dropped_words: AtomicU64::new(0),
            skipped_words: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn add_file(&self, size: u64) {
        self.total_files.fetch_add(1, Ordering::Relaxed);
        self.total_bytes.fetch_add(size, Ordering::Relaxed);
    }

    pub fn complete_file(&self) {
        self.processed_files.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_lines(&self, count: u64) {
        self.total_lines.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_words(&self, count: u64) {
        self.total_words.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_chunks(&self, count: u64) {
        self.chunks.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_chunk(&self, result: &ChunkResult) {
        self.kept_words.fetch_add(result.kept, Ordering::Relaxed);
        self.dropped_words.fetch_add(result.dropped, Ordering::Relaxed);
        self.skipped_words.fetch_add(result.skipped, Ordering::Relaxed);
    }

    pub fn get_total_files(&self) -> u64 {
        self.total_files.load(Ordering::Relaxed)
    }

    pub fn get_processed_files(&self) -> u64 {
        self.processed_files.load(Ordering::Relaxed)
    }

    pub fn get_total_bytes(&self) -> u64 {
        self.total_bytes.load(Ordering::Relaxed)
    }

    pub fn get_total_lines(&self) -> u64 {
        self.total_lines.load(Ordering::Relaxed)
    }

    pub fn get_total_words(&self) -> u64 {
        self.total_words.load(Ordering::Relaxed)
    }

    pub fn get_chunks(&self) -> u64 {
        self.chunks.load(Ordering::Relaxed)
    }

    pub fn get_kept_words(&self) -> u64 {
        self.kept_words.load(Ordering::Relaxed)
    }

    pub fn get_dropped_words(&self) -> u64 {
        self.dropped_words.load(Ordering::Relaxed)
    }

    pub fn get_skipped_words(&self) -> u64 {
        self.skipped_words.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn words_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.get_total_words() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Print final statistics
    pub fn print_summary(&self) {
        println!();
        println!("{}", "═".repeat(60).green());
        println!("{}", "                    PROCESSING COMPLETE".green().bold());
        println!("{}", "═".repeat(60).green());
        println!();

        println!(
            "  {} {}/{}",
            "Files processed:".green(),
            self.get_processed_files(),
            self.get_total_files()
        );
        println!(
            "  {} {}",
            "Data read:      ".green(),
            ByteSize(self.get_total_bytes())
        );
        println!();

        println!("  {} {}", "Lines:          ".green(), format_number(self.get_total_lines()));
        println!("  {} {}", "Words:          ".green(), format_number(self.get_total_words()));
        println!("  {} {}", "Chunks:         ".green(), format_number(self.get_chunks()));
        println!(
            "  {} {}",
            "Kept words:     ".green().bold(),
            format_number(self.get_kept_words()).green().bold()
        );
        println!(
            "  {} {}",
            "Filtered out:   ".yellow(),
            format_number(self.get_dropped_words())
        );

        let skipped = self.get_skipped_words();
        if skipped > 0 {
            println!("  {} {}", "Empty tokens:   ".yellow(), format_number(skipped));
        }

        println!();
        println!("  {} {}", "Duration:       ".green(), format_duration(self.elapsed()));
        println!(
            "  {} {:.2} words/sec",
            "Throughput:     ".green(),
            self.words_per_second()
        );
        println!();
        println!("{}", "═".repeat(60).green());
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousand separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
