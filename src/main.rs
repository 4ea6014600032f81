use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use logtally::cli::{self, Cli};
use logtally::report::{Report, StatusNames};
use logtally::sources::{self, FailurePolicy};
use logtally::{config, logging, output};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = config::load_config(cli.config.as_deref())?;

    let paths = if cli.paths.is_empty() {
        config.files.clone()
    } else {
        cli.paths.clone()
    };
    if paths.is_empty() {
        bail!("no log files given (pass paths or set `files` in the config file)");
    }

    let sources = sources::discover(&paths);

    let policy = if cli.skip_unreadable || config.skip_unreadable.unwrap_or(false) {
        FailurePolicy::Skip
    } else {
        FailurePolicy::Abort
    };

    let progress_cb = |current: usize, total: usize| {
        eprint!("\x1b[2K\rReading logs... {current}/{total}");
        let _ = std::io::stderr().flush();
    };
    let outcome = sources::collect(
        &sources,
        policy,
        if cli.quiet { None } else { Some(&progress_cb) },
    )
    .context("reading access logs")?;
    if !cli.quiet {
        eprint!("\x1b[2K\r");
        let _ = std::io::stderr().flush();
    }

    info!(
        sources = outcome.sources_read,
        skipped = outcome.skipped.len(),
        lines = outcome.stats.lines,
        matched = outcome.stats.matched,
        unmatched = outcome.stats.skipped(),
        "run complete"
    );

    if outcome.combined.is_empty() {
        eprintln!("No request lines found.");
        return Ok(());
    }

    if !cli.quiet {
        eprintln!(
            "Counted {} requests in {} lines from {} files.",
            outcome.stats.matched, outcome.stats.lines, outcome.sources_read
        );
    }

    let names = StatusNames::default().with_overrides(config.status_overrides());
    let mut report = Report::build(&outcome.combined, &names);
    if let Some(n) = cli.top.or(config.top) {
        report.truncate_endpoints(n);
    }

    match cli.format {
        cli::OutputFormat::Json => output::print_json(&report)?,
        cli::OutputFormat::Table => output::print_tables(&report),
    }

    Ok(())
}
