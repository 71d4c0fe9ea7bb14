//! Text Filter - chunked, parallel word filtering
//!
//! Main entry point for the command-line application.

use clap::Parser;
use std::panic;
use std::process;

use text_filter::cli::Args;
use text_filter::config::Settings;
use text_filter::output::OutputTarget;
use text_filter::processor::Processor;
use text_filter::progress::{
    create_spinner, print_banner, print_bullet, print_error, print_header, print_info,
    print_success, print_warning,
};
use text_filter::source::MmapLineSource;

fn main() {
    let args = Args::parse();

    // Set up logging
    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    } else if args.quiet {
        std::env::set_var("RUST_LOG", "error");
    } else if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();
    route_panics_to_log();

    // Configure thread pool
    if let Some(threads) = args.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            log::warn!("Could not configure thread pool: {}", e);
        }
    }

    if let Err(e) = run(args) {
        print_error(&format!("{}", e));

        // Print chain of errors
        for cause in e.chain().skip(1) {
            print_error(&format!("  Caused by: {}", cause));
        }

        process::exit(1);
    }
}

/// Send panic reports to the log instead of stderr
///
/// Filter panics are already turned into chunk errors, which `main` prints.
fn route_panics_to_log() {
    panic::set_hook(Box::new(|info| log::debug!("{}", info)));
}

fn run(args: Args) -> anyhow::Result<()> {
    if !args.quiet {
        print_banner();
    }

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply_to(&mut settings);

    let filters = settings.build_filters()?;
    let config = settings.processor_config()?;
    let input = settings.processing.input_file_path.clone();

    if !args.quiet && args.verbose {
        print_config(&args, &settings);
    }

    if !input.is_file() {
        anyhow::bail!("Input file not found: {:?}", input);
    }

    let processor = if args.mmap {
        Processor::with_source(config, filters, MmapLineSource)
    } else {
        Processor::new(config, filters)
    };

    if processor.filters().enabled().is_empty() && !args.quiet {
        print_warning("All filters are disabled, every word will be kept");
    }

    let stats = processor.stats();
    stats.add_file(std::fs::metadata(&input)?.len());

    let spinner = if args.quiet {
        indicatif::ProgressBar::hidden()
    } else {
        create_spinner(&format!("Filtering {:?}...", input))
    };
    let result = processor.process_file(&input);
    spinner.finish_and_clear();
    let text = result?;

    let target = OutputTarget::new(args.output.clone(), args.quiet);
    let written = target.emit(&text)?;

    if !args.quiet {
        if let OutputTarget::File(ref path) = target {
            print_success(&format!("Output written to: {:?} ({} bytes)", path, written));
        }
        log::info!("Text filtering completed successfully");
    }

    if args.stats && !args.quiet {
        stats.print_summary();
    }

    Ok(())
}

/// Print configuration summary
fn print_config(args: &Args, settings: &Settings) {
    print_header("Configuration");

    print_info(&format!("Input:        {:?}", settings.processing.input_file_path));
    print_info(&format!("Chunk size:   {}", settings.processing.chunk_size));
    print_info(&format!("Threads:      {}", args.threads.unwrap_or_else(num_cpus::get)));
    print_info(&format!("Memory map:   {}", args.mmap));

    let filters = &settings.text_filters;
    print_info("Filters:");
    print_bullet(&format!(
        "ContainsLetterFilter ({}): letter '{}'",
        on_off(filters.contains_letter.enabled),
        filters.contains_letter.letter
    ));
    print_bullet(&format!(
        "MinimumLengthFilter ({}): minimum {}",
        on_off(filters.minimum_length.enabled),
        filters.minimum_length.minimum_length
    ));
    print_bullet(&format!(
        "VowelMiddleFilter ({})",
        on_off(filters.vowel_middle.enabled)
    ));
    if let Some(ref pattern) = filters.pattern.pattern {
        print_bullet(&format!(
            "PatternFilter ({}): {}",
            on_off(filters.pattern.enabled),
            pattern
        ));
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_filter::error::ErrorKind;
    use text_filter::filter::{FilterSet, TextFilter};
    use text_filter::processor::ProcessorConfig;

    struct Explode;

    impl TextFilter for Explode {
        fn name(&self) -> &str {
            "Explode"
        }

        fn is_enabled(&self) -> bool {
            true
        }

        fn should_filter(&self, _word: &str) -> bool {
            panic!("explode");
        }
    }

    #[test]
    fn test_filter_panic_still_reported_with_log_hook() {
        route_panics_to_log();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"one two three").unwrap();

        let processor = Processor::new(
            ProcessorConfig::new(1).unwrap(),
            FilterSet::new().with(Explode),
        );
        let err = processor.process_file(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ChunkProcessing);
        assert_eq!(err.chunk_index(), Some(0));
    }
}
