//! Batch summaries of web-server access logs.
//!
//! Lines are parsed into [`types::LogRecord`]s, counted into minute-of-day
//! buckets per source file, merged across files and turned into three
//! views: busiest endpoints, calls per minute and calls per status code.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod logging;
pub mod output;
pub mod parser;
pub mod report;
pub mod sources;
pub mod types;
