use std::cmp::Reverse;
use std::collections::HashMap;

use serde::Serialize;

use crate::types::{Aggregate, MinuteKey, Tally};

const DEFAULT_STATUS_NAMES: &[(&str, &str)] = &[
    ("200", "OK"),
    ("404", "Not Found"),
    ("206", "Partial Content"),
    ("500", "Internal Server Error"),
    ("422", "Unprocessable Content"),
    ("400", "Bad Request"),
    ("401", "Unauthorized"),
];

/// Status code to display name. Codes without an entry resolve to the code
/// itself.
#[derive(Debug, Clone)]
pub struct StatusNames {
    names: HashMap<String, String>,
}

impl Default for StatusNames {
    fn default() -> Self {
        Self {
            names: DEFAULT_STATUS_NAMES
                .iter()
                .map(|(code, name)| (code.to_string(), name.to_string()))
                .collect(),
        }
    }
}

impl StatusNames {
    /// Add or replace names on top of the defaults.
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.names.extend(overrides);
        self
    }

    pub fn resolve(&self, code: &str) -> String {
        self.names
            .get(code)
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointRow {
    pub endpoint: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinuteRow {
    pub time: MinuteKey,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub name: String,
    pub status_code: String,
    pub count: u64,
}

/// The three views rendered for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub endpoints: Vec<EndpointRow>,
    pub per_minute: Vec<MinuteRow>,
    pub statuses: Vec<StatusRow>,
}

impl Report {
    pub fn build(aggregate: &Aggregate, names: &StatusNames) -> Self {
        Self {
            endpoints: endpoint_ranking(aggregate),
            per_minute: per_minute_series(aggregate),
            statuses: status_summary(aggregate, names),
        }
    }

    /// Keep only the `n` busiest endpoints.
    pub fn truncate_endpoints(&mut self, n: usize) {
        self.endpoints.truncate(n);
    }
}

/// Descending by count; equal counts keep the tally's ascending key order.
fn ranked<K: Ord + Clone>(tally: &Tally<K>) -> Vec<(K, u64)> {
    let mut rows: Vec<(K, u64)> = tally.iter().map(|(k, n)| (k.clone(), n)).collect();
    rows.sort_by_key(|(_, n)| Reverse(*n));
    rows
}

pub fn endpoint_ranking(aggregate: &Aggregate) -> Vec<EndpointRow> {
    let mut totals: Tally<String> = Tally::default();
    for (_, bucket) in aggregate.buckets() {
        for (endpoint, n) in bucket.endpoints.iter() {
            totals.bump(endpoint.clone(), n);
        }
    }

    ranked(&totals)
        .into_iter()
        .map(|(endpoint, count)| EndpointRow { endpoint, count })
        .collect()
}

pub fn per_minute_series(aggregate: &Aggregate) -> Vec<MinuteRow> {
    aggregate
        .buckets()
        .map(|(key, bucket)| MinuteRow {
            time: *key,
            count: bucket.count,
        })
        .collect()
}

pub fn status_summary(aggregate: &Aggregate, names: &StatusNames) -> Vec<StatusRow> {
    let mut totals: Tally<String> = Tally::default();
    for (_, bucket) in aggregate.buckets() {
        for (code, n) in bucket.status_codes.iter() {
            totals.bump(code.clone(), n);
        }
    }

    ranked(&totals)
        .into_iter()
        .map(|(code, count)| StatusRow {
            name: names.resolve(&code),
            status_code: code,
            count,
        })
        .collect()
}
