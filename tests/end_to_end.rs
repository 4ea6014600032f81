use std::fs;

use logtally::report::{Report, StatusNames};
use logtally::sources::{collect, discover, FailurePolicy};
use logtally::types::MinuteKey;
use tempfile::tempdir;

const DEV_LOG: &str = r#"Server listening on port 3000
2023-07-06 17:13 +00:00: "GET /api/users HTTP/1.1" 200 512 "-" "curl/7.68"
2023-07-06 17:13 +00:00: "GET /api/users HTTP/1.1" 404 12 "-" "curl/7.68"
2023-07-06 17:14 +00:00: "POST /api/items HTTP/1.1" 500 0 "-" "Mozilla/5.0"
"#;

const PROD_LOG: &str = r#"2023-07-09 17:13 +00:00: "GET /api/items HTTP/1.1" 200 99 "-" "Mozilla/5.0"
2023-07-09 09:00 +00:00: "GET /health HTTP/1.1" 999 2 "-" "probe"
not a request line
"#;

#[test]
fn two_files_produce_combined_report() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("api-dev-out.log"), DEV_LOG).unwrap();
    fs::write(dir.path().join("api-prod-out.log"), PROD_LOG).unwrap();

    let sources = discover(&[dir.path().to_path_buf()]);
    assert_eq!(sources.len(), 2);

    let outcome = collect(&sources, FailurePolicy::Abort, None).unwrap();
    assert_eq!(outcome.stats.lines, 7);
    assert_eq!(outcome.stats.matched, 5);
    assert_eq!(outcome.combined.total_count(), 5);

    let bucket = outcome
        .combined
        .bucket(&MinuteKey::new(17, 13).unwrap())
        .unwrap();
    assert_eq!(bucket.count, 3);

    let report = Report::build(&outcome.combined, &StatusNames::default());

    let endpoints: Vec<(&str, u64)> = report
        .endpoints
        .iter()
        .map(|r| (r.endpoint.as_str(), r.count))
        .collect();
    assert_eq!(
        endpoints,
        [("/api/items", 2), ("/api/users", 2), ("/health", 1)]
    );

    let minutes: Vec<(String, u64)> = report
        .per_minute
        .iter()
        .map(|r| (r.time.to_string(), r.count))
        .collect();
    assert_eq!(
        minutes,
        [
            ("09:00".to_string(), 1),
            ("17:13".to_string(), 3),
            ("17:14".to_string(), 1)
        ]
    );

    let statuses: Vec<(&str, &str, u64)> = report
        .statuses
        .iter()
        .map(|r| (r.name.as_str(), r.status_code.as_str(), r.count))
        .collect();
    assert_eq!(
        statuses,
        [
            ("OK", "200", 2),
            ("Not Found", "404", 1),
            ("Internal Server Error", "500", 1),
            ("999", "999", 1)
        ]
    );
}

#[test]
fn file_order_does_not_change_result() {
    let dir = tempdir().unwrap();
    let dev = dir.path().join("dev.log");
    let prod = dir.path().join("prod.log");
    fs::write(&dev, DEV_LOG).unwrap();
    fs::write(&prod, PROD_LOG).unwrap();

    let forward = collect(
        &discover(&[dev.clone(), prod.clone()]),
        FailurePolicy::Abort,
        None,
    )
    .unwrap();
    let backward = collect(&discover(&[prod, dev]), FailurePolicy::Abort, None).unwrap();

    assert_eq!(forward.combined, backward.combined);
}

#[test]
fn file_without_requests_contributes_nothing() {
    let dir = tempdir().unwrap();
    let dev = dir.path().join("dev.log");
    let banner = dir.path().join("banner.log");
    fs::write(&dev, DEV_LOG).unwrap();
    fs::write(&banner, "booting\nready\n").unwrap();

    let alone = collect(&discover(&[dev.clone()]), FailurePolicy::Abort, None).unwrap();
    let with_banner = collect(&discover(&[dev, banner]), FailurePolicy::Abort, None).unwrap();

    assert_eq!(alone.combined, with_banner.combined);
    assert_eq!(with_banner.sources_read, 2);
}
