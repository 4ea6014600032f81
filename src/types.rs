use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Serialize, Serializer};

/// One matched access log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub timestamp: DateTime<FixedOffset>,
    pub method: String,
    pub endpoint: String,
    /// Three digits exactly as written in the log, leading zeros included.
    pub status_code: String,
    pub user_agent: String,
}

/// Minute-of-day bucket key. The date is dropped on purpose, so the same
/// clock minute on different days lands in one bucket.
///
/// Ordering is by (hour, minute), which matches the lexicographic order of
/// the zero-padded `HH:MM` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinuteKey {
    hour: u8,
    minute: u8,
}

impl MinuteKey {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Hour and minute as written in the log, in the line's own offset.
    pub fn from_timestamp(ts: &DateTime<FixedOffset>) -> Self {
        Self {
            hour: ts.hour() as u8,
            minute: ts.minute() as u8,
        }
    }
}

impl fmt::Display for MinuteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for MinuteKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Ordered counter map. Absent keys count as zero; `bump` is the single
/// create-or-increment step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally<K: Ord> {
    counts: BTreeMap<K, u64>,
}

impl<K: Ord> Default for Tally<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<K: Ord> Tally<K> {
    pub fn bump(&mut self, key: K, n: u64) {
        *self.counts.entry(key).or_insert(0) += n;
    }

    pub fn get<Q>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Add every count of `other` into this tally.
    pub fn absorb(&mut self, other: Tally<K>) {
        for (key, n) in other.counts {
            self.bump(key, n);
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.counts.iter().map(|(k, n)| (k, *n))
    }
}

impl<K: Ord> FromIterator<(K, u64)> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        let mut tally = Tally::default();
        for (key, n) in iter {
            tally.bump(key, n);
        }
        tally
    }
}

/// Counters for a single minute bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketStats {
    pub count: u64,
    pub status_codes: Tally<String>,
    pub endpoints: Tally<String>,
}

impl BucketStats {
    pub fn record(&mut self, record: &LogRecord) {
        self.count += 1;
        self.status_codes.bump(record.status_code.clone(), 1);
        self.endpoints.bump(record.endpoint.clone(), 1);
    }

    pub fn absorb(&mut self, other: BucketStats) {
        self.count += other.count;
        self.status_codes.absorb(other.status_codes);
        self.endpoints.absorb(other.endpoints);
    }
}

/// Buckets for one source, or the combination of several.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    buckets: BTreeMap<MinuteKey, BucketStats>,
}

impl Aggregate {
    pub fn ingest(&mut self, record: &LogRecord) {
        let key = MinuteKey::from_timestamp(&record.timestamp);
        self.buckets.entry(key).or_default().record(record);
    }

    pub fn absorb(&mut self, other: Aggregate) {
        for (key, stats) in other.buckets {
            self.buckets.entry(key).or_default().absorb(stats);
        }
    }

    pub fn bucket(&self, key: &MinuteKey) -> Option<&BucketStats> {
        self.buckets.get(key)
    }

    /// Buckets in ascending `HH:MM` order.
    pub fn buckets(&self) -> impl Iterator<Item = (&MinuteKey, &BucketStats)> {
        self.buckets.iter()
    }

    pub fn total_count(&self) -> u64 {
        self.buckets.values().map(|b| b.count).sum()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl FromIterator<(MinuteKey, BucketStats)> for Aggregate {
    fn from_iter<I: IntoIterator<Item = (MinuteKey, BucketStats)>>(iter: I) -> Self {
        let mut aggregate = Aggregate::default();
        for (key, stats) in iter {
            aggregate.buckets.entry(key).or_default().absorb(stats);
        }
        aggregate
    }
}
