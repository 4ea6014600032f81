use crate::parser::parse_line;
use crate::types::Aggregate;

/// Line counters for one source. `matched` always equals the source
/// aggregate's total count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStats {
    pub lines: u64,
    pub matched: u64,
}

impl LineStats {
    pub fn skipped(&self) -> u64 {
        self.lines - self.matched
    }
}

/// Parse and bucket every line. Lines that don't match are counted as read
/// and otherwise ignored.
pub fn aggregate_lines<I>(lines: I) -> (Aggregate, LineStats)
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut aggregate = Aggregate::default();
    let mut stats = LineStats::default();

    for line in lines {
        stats.lines += 1;
        if let Some(record) = parse_line(line.as_ref().trim_end_matches('\r')) {
            aggregate.ingest(&record);
            stats.matched += 1;
        }
    }

    (aggregate, stats)
}

/// Combine per-source aggregates. Every bucket, status and endpoint count is
/// summed key-wise, so the result does not depend on input order. No inputs
/// gives an empty aggregate.
pub fn merge<I>(aggregates: I) -> Aggregate
where
    I: IntoIterator<Item = Aggregate>,
{
    aggregates
        .into_iter()
        .fold(Aggregate::default(), |mut combined, next| {
            combined.absorb(next);
            combined
        })
}
