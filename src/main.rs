use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use site_sweep::{CrawlOutcome, Scan, ScanConfig, utils};

mod args;
use args::{Args, convert_mode};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();
    let config = build_config(&args)?;

    ::log::info!("starting scan of {}", config.seed_url);

    let budget = config.max_pages;
    let mut scan = Scan::with_config(config);

    // Finish the page in flight, then stop cleanly on Ctrl-C.
    let cancel = scan.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ::log::info!("interrupt received, finishing the current page");
            cancel.cancel();
        }
    });

    let bar = if args.quiet {
        None
    } else {
        Some(progress_bar(budget as u64))
    };
    if let Some(bar) = bar.clone() {
        scan = scan.on_progress(move |progress| {
            bar.set_position(progress.scanned as u64);
            bar.set_message(utils::elide(&progress.url, 48));
        });
    }

    let outcome = scan.run().await?;

    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }
    render_outcome(&outcome);

    Ok(())
}

/// Merge the config file (if any) with command-line overrides
fn build_config(args: &Args) -> Result<ScanConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config_file {
        Some(path) => ScanConfig::from_file(path)?,
        None => ScanConfig::new(
            args.url.as_deref().unwrap_or_default(),
            args.phrase.as_deref().unwrap_or_default(),
        ),
    };

    if let Some(url) = &args.url {
        config.seed_url = url.clone();
    }
    if let Some(phrase) = &args.phrase {
        config.phrase = phrase.clone();
    }
    if let Some(mode) = args.mode {
        config.mode = convert_mode(mode);
    }
    if let Some(max_pages) = args.max_pages {
        config.max_pages = max_pages;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.timeout_secs = timeout_secs;
    }

    Ok(config)
}

fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.green/dim}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("█▓░"),
    );
    bar
}

fn render_outcome(outcome: &CrawlOutcome) {
    println!(
        "Scanned {} page(s), {}.",
        outcome.pages_scanned, outcome.termination
    );

    if outcome.results.is_empty() {
        println!("No matches found.");
        return;
    }

    println!(
        "Matched {} page(s): {} occurrence(s) in text, {} in images.",
        outcome.pages_matched(),
        outcome.total_text_occurrences(),
        outcome.total_ocr_occurrences()
    );
    println!("{:<60} {:>6} {:>6} {:>7}", "URL", "text", "ocr", "visual");
    for result in &outcome.results {
        println!(
            "{:<60} {:>6} {:>6} {:>7}",
            result.url,
            result.text_count,
            result.ocr_count,
            if result.visual_text_detected { "yes" } else { "no" }
        );
    }
}
