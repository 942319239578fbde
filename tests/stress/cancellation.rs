//! Cancelling a run part-way through

use crate::support::PREFIX;
use axum::routing::get;
use axum::Router;
use hammer::target::{TargetServer, HELLO_BODY};
use hammer::{LoadTest, LoadTestConfig, Strategy};
use std::time::Duration;

async fn slow_target() -> TargetServer {
    let app = Router::new().route(
        &format!("/{PREFIX}"),
        get(|| async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            HELLO_BODY
        }),
    );
    TargetServer::start(app).await.unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cancel_mid_run_accounts_for_every_attempt() {
    let server = slow_target().await;

    for strategy in [
        Strategy::Sequential,
        Strategy::BoundedPool { workers: 10 },
        Strategy::Unbounded {
            max_in_flight: Some(10),
        },
    ] {
        let load_test =
            LoadTest::new(LoadTestConfig::new(server.url(PREFIX), 5_000, "(cancelled) ")).unwrap();
        let cancel = load_test.cancel_token();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            cancel.cancel();
        });

        let report = load_test.run(&strategy).await.unwrap();
        println!("✓ {strategy}: {} done, {} skipped", report.completed(), report.skipped_count);

        assert!(report.was_cancelled(), "{strategy}");
        assert_eq!(report.completed() + report.skipped_count, 5_000, "{strategy}");
        // Everything that was dispatched ran against a healthy target
        assert_eq!(report.success_count, report.completed(), "{strategy}");
    }

    server.shutdown().await;
}
