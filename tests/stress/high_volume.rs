//! Larger runs that exercise connection reuse and counter contention

use crate::support::{self, PREFIX};
use hammer::{run_load_test, LoadTestConfig, Strategy};
use std::time::Instant;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_ten_thousand_requests_through_pool() {
    let server = support::hello_target().await;
    let config = LoadTestConfig::new(server.url(PREFIX), 10_000, "(high volume) ");

    let start = Instant::now();
    let report = run_load_test(config, &Strategy::BoundedPool { workers: 50 })
        .await
        .unwrap();

    println!("\n{report}");
    println!("✓ 10k requests in {:?}", start.elapsed());

    assert_eq!(report.success_count, 10_000);
    assert_eq!(report.completed(), 10_000);
    assert!(report.requests_per_second > 0.0);

    server.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_capped_unbounded_matches_pool_accounting() {
    let server = support::rotating_target().await;
    let config = LoadTestConfig::new(server.url(PREFIX), 3_000, "(capped unbounded) ");

    let report = run_load_test(
        config,
        &Strategy::Unbounded {
            max_in_flight: Some(64),
        },
    )
    .await
    .unwrap();

    assert_eq!(report.success_count, 1_000);
    assert_eq!(report.not_found_count, 1_000);
    assert_eq!(report.other_failure_count, 1_000);

    server.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_refused_connections_under_concurrency() {
    let config = LoadTestConfig::new(support::refused_url(), 2_000, "(refused) ");

    for strategy in [
        Strategy::BoundedPool { workers: 100 },
        Strategy::Unbounded {
            max_in_flight: Some(200),
        },
    ] {
        let report = run_load_test(config.clone(), &strategy).await.unwrap();
        assert_eq!(report.other_failure_count, 2_000, "{strategy}");
        assert_eq!(report.requests_per_second, 0.0);
    }
}
