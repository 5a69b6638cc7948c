//! Concurrent append behavior across independent handles.
//!
//! Each task uses its own `Ledger`/`DurableAppender` handle against the same
//! file, standing in for independent station processes. Advisory locks
//! conflict between separate handles even inside one process, so the retry
//! protocol is exercised for real.

use std::collections::HashSet;
use std::time::Duration;

use labelforge_store::{DurableAppender, Ledger, NoopObserver, OverflowSink, RetryPolicy};
use tempfile::TempDir;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appenders_commit_every_record_intact() {
    let dir = TempDir::new().unwrap();
    let ledger_path = dir.path().join("inventory.txt");

    const STATIONS: usize = 4;
    const RECORDS_PER_STATION: usize = 25;

    let mut tasks = Vec::new();
    for station in 0..STATIONS {
        let appender = DurableAppender::with_policy(
            Ledger::new(&ledger_path),
            OverflowSink::in_dir(dir.path()),
            RetryPolicy {
                max_attempts: 1_000,
                delay: Duration::from_millis(1),
            },
        );

        tasks.push(tokio::spawn(async move {
            for i in 0..RECORDS_PER_STATION {
                appender
                    .commit(&format!("station-{station}/record-{i:02}"), &NoopObserver)
                    .await
                    .unwrap();
            }
        }));
    }

    for task in tasks {
        task.await.unwrap();
    }

    let ledger = Ledger::new(&ledger_path);
    let records = ledger.contents().unwrap();

    // Every commit landed, nothing was torn or duplicated.
    assert_eq!(records.len(), STATIONS * RECORDS_PER_STATION);
    assert_eq!(ledger.count().unwrap(), records.len());

    let unique: HashSet<&String> = records.iter().collect();
    assert_eq!(unique.len(), records.len());

    for station in 0..STATIONS {
        for i in 0..RECORDS_PER_STATION {
            let expected = format!("station-{station}/record-{i:02}");
            assert!(records.contains(&expected), "missing {expected}");
        }
    }

    // Per-station issue order survives even when stations interleave.
    for station in 0..STATIONS {
        let prefix = format!("station-{station}/");
        let own: Vec<&String> = records.iter().filter(|r| r.starts_with(&prefix)).collect();
        let mut sorted = own.clone();
        sorted.sort();
        assert_eq!(own, sorted);
    }

    // Nothing was desperate enough to overflow.
    assert!(!dir.path().join("lost-inventory.txt").exists());
}
