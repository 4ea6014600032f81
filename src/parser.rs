use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::LogRecord;

/// `<timestamp>:..."<method> <path> <rest>" <status> <bytes> "-" "<user-agent>"`
///
/// The prefix before the request is lazy: the first request-shaped quoted
/// segment is the request, anything request-like later on the line belongs to
/// the user agent.
static LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2} [+-]\d{2}:\d{2}):.*?"(\w+) ([^\s"]+) [^"]+" (\d{3}) \d+ "-" "(.+)""#,
    )
    .expect("access log pattern is valid")
});

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M %:z";

/// Parse one access log line. Anything that does not have the expected
/// shape, including impossible dates or times, yields `None`.
pub fn parse_line(line: &str) -> Option<LogRecord> {
    let caps = LINE_PATTERN.captures(line)?;

    let timestamp = DateTime::parse_from_str(&caps[1], TIMESTAMP_FORMAT).ok()?;
    Some(LogRecord {
        timestamp,
        method: caps[2].to_string(),
        endpoint: caps[3].to_string(),
        status_code: caps[4].to_string(),
        user_agent: caps[5].to_string(),
    })
}
