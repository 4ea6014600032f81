use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::aggregate::{aggregate_lines, merge, LineStats};
use crate::types::Aggregate;

/// Extension picked up when a directory is given as a source.
const LOG_EXTENSION: &str = "log";

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("cannot open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed reading {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SourceError {
    pub fn path(&self) -> &Path {
        match self {
            SourceError::Open { path, .. } | SourceError::Read { path, .. } => path,
        }
    }
}

/// What to do when a source cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    Abort,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub path: PathBuf,
}

impl SourceDescriptor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// A fully read source. Only complete sources are ever merged.
#[derive(Debug, Clone)]
pub struct SourceAggregate {
    pub source: SourceDescriptor,
    pub aggregate: Aggregate,
    pub stats: LineStats,
}

#[derive(Debug, Default)]
pub struct RunOutcome {
    pub combined: Aggregate,
    pub stats: LineStats,
    pub sources_read: usize,
    pub skipped: Vec<PathBuf>,
}

/// Expand paths into sources. Directories are walked for `*.log` files,
/// sorted per directory; anything else is taken as-is so a missing file is
/// reported when it is read.
pub fn discover(paths: &[PathBuf]) -> Vec<SourceDescriptor> {
    let mut sources = Vec::new();

    for path in paths {
        if !path.is_dir() {
            sources.push(SourceDescriptor::new(path));
            continue;
        }

        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == LOG_EXTENSION))
            .map(|e| e.into_path())
            .collect();
        found.sort();

        if found.is_empty() {
            warn!(dir = %path.display(), "no .log files found");
        }
        sources.extend(found.into_iter().map(SourceDescriptor::new));
    }

    sources
}

/// Read one source line by line and bucket it. Lines that are not valid
/// UTF-8 count as read but never match.
pub fn read_source(source: &SourceDescriptor) -> Result<SourceAggregate, SourceError> {
    let file = File::open(&source.path).map_err(|e| SourceError::Open {
        path: source.path.clone(),
        source: e,
    })?;

    let mut failure = None;
    let lines = BufReader::new(file)
        .split(b'\n')
        .map_while(|chunk| match chunk {
            Ok(bytes) => Some(String::from_utf8(bytes).unwrap_or_default()),
            Err(e) => {
                failure = Some(e);
                None
            }
        });
    let (aggregate, stats) = aggregate_lines(lines);

    if let Some(e) = failure {
        return Err(SourceError::Read {
            path: source.path.clone(),
            source: e,
        });
    }

    debug!(
        path = %source.path.display(),
        lines = stats.lines,
        matched = stats.matched,
        "source read"
    );

    Ok(SourceAggregate {
        source: source.clone(),
        aggregate,
        stats,
    })
}

/// Read all sources and fold them into one aggregate.
///
/// Sources are parsed in parallel, each into its own aggregate. Completed
/// aggregates are then committed in input order; a failed source either
/// aborts the run or is left out of the combined result.
pub fn collect(
    sources: &[SourceDescriptor],
    policy: FailurePolicy,
    progress: Option<&dyn Fn(usize, usize)>,
) -> Result<RunOutcome, SourceError> {
    let total = sources.len();

    let results: Vec<Result<SourceAggregate, SourceError>> =
        sources.par_iter().map(read_source).collect();

    let mut outcome = RunOutcome::default();
    let mut committed = Vec::with_capacity(total);
    for (i, result) in results.into_iter().enumerate() {
        if let Some(cb) = &progress {
            cb(i + 1, total);
        }

        match result {
            Ok(read) => {
                info!(
                    path = %read.source.path.display(),
                    lines = read.stats.lines,
                    matched = read.stats.matched,
                    buckets = read.aggregate.len(),
                    "source aggregated"
                );
                outcome.stats.lines += read.stats.lines;
                outcome.stats.matched += read.stats.matched;
                outcome.sources_read += 1;
                committed.push(read.aggregate);
            }
            Err(e) if policy == FailurePolicy::Skip => {
                warn!(path = %e.path().display(), error = %e, "skipping unreadable source");
                outcome.skipped.push(e.path().to_path_buf());
            }
            Err(e) => return Err(e),
        }
    }

    outcome.combined = merge(committed);
    Ok(outcome)
}
