//! End-to-end station workflow against temp durable state.
//!
//! Rendering and spooling collaborators are test doubles; the counter,
//! ledger and overflow files are the real thing.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fs2::FileExt;
use tempfile::TempDir;

use labelforge_core::{LabelSpec, StickerKind};
use labelforge_render::{LabelRenderer, PrintDispatcher, PrintError, RenderError, RenderJob};
use labelforge_station::types::{InventoryRequest, PlainRequest};
use labelforge_station::{PrintStation, StationError, StatusSink};
use labelforge_store::{
    AppendError, DurableAppender, Ledger, OverflowSink, RetryPolicy, SerialCounter,
};

/// Renderer double: writes a record file and a page file, reports both.
struct FakeRenderer {
    dir: PathBuf,
}

#[async_trait]
impl LabelRenderer for FakeRenderer {
    async fn render(&self, job: &RenderJob) -> Result<Vec<PathBuf>, RenderError> {
        let name = match job {
            RenderJob::Inventory { name, .. } => name.clone(),
            RenderJob::Plain { text } => text.clone(),
        };

        let page = self.dir.join(format!("{name}.pdf"));
        fs::write(&page, "%PDF").unwrap();

        match job {
            RenderJob::Inventory { .. } => {
                let record = self.dir.join(format!("{name}.json"));
                fs::write(&record, "{}").unwrap();
                Ok(vec![record, page])
            }
            RenderJob::Plain { .. } => Ok(vec![page]),
        }
    }
}

/// Renderer double that always fails.
struct BrokenRenderer;

#[async_trait]
impl LabelRenderer for BrokenRenderer {
    async fn render(&self, _job: &RenderJob) -> Result<Vec<PathBuf>, RenderError> {
        Err(RenderError::Failed { status: Some(1) })
    }
}

/// Dispatcher double: records every (artifact, destination) call.
#[derive(Default)]
struct FakePrinter {
    calls: Mutex<Vec<(PathBuf, String)>>,
}

#[async_trait]
impl PrintDispatcher for FakePrinter {
    async fn dispatch(&self, artifact: &Path, destination: &str) -> Result<(), PrintError> {
        self.calls
            .lock()
            .unwrap()
            .push((artifact.to_path_buf(), destination.to_string()));
        Ok(())
    }
}

/// Status double: captures every message.
#[derive(Default)]
struct CapturedStatus {
    messages: Mutex<Vec<String>>,
}

impl CapturedStatus {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl StatusSink for CapturedStatus {
    fn message(&self, text: &str) {
        self.messages.lock().unwrap().push(text.to_string());
    }
}

struct Fixture {
    dir: TempDir,
    station: PrintStation,
    printer: Arc<FakePrinter>,
    status: Arc<CapturedStatus>,
}

fn fixture_with_policy(policy: RetryPolicy) -> Fixture {
    let dir = TempDir::new().unwrap();

    let counter = SerialCounter::new(dir.path().join("counter.txt"));
    counter.seed(41).unwrap();

    let renderer = Arc::new(FakeRenderer {
        dir: dir.path().to_path_buf(),
    });
    let printer = Arc::new(FakePrinter::default());
    let status = Arc::new(CapturedStatus::default());

    let station = PrintStation::new(
        counter,
        DurableAppender::with_policy(
            Ledger::new(dir.path().join("inventory.txt")),
            OverflowSink::in_dir(dir.path()),
            policy,
        ),
        renderer.clone(),
        renderer,
        printer.clone(),
        status.clone(),
        "labelwriter",
    );

    Fixture {
        dir,
        station,
        printer,
        status,
    }
}

fn fixture() -> Fixture {
    fixture_with_policy(RetryPolicy {
        max_attempts: 10,
        delay: Duration::from_millis(1),
    })
}

fn inventory_request(labels: u32, kind: StickerKind, serialized: bool) -> InventoryRequest {
    InventoryRequest {
        spec: LabelSpec::new("Parts", "Widget", "Blue", "a widget"),
        kind,
        labels,
        serialized,
    }
}

#[tokio::test]
async fn inventory_job_records_and_prints() {
    let fx = fixture();

    let receipt = fx
        .station
        .print_inventory(&inventory_request(1, StickerKind::NormalSingle, true))
        .await
        .unwrap();

    assert_eq!(receipt.name, "Widget042");
    assert_eq!(receipt.serial, Some(42));
    assert_eq!(receipt.labels, 1);
    assert_eq!(receipt.stickers, 1);

    // The record (the artifact path) is durably in the ledger.
    let ledger = Ledger::new(fx.dir.path().join("inventory.txt"));
    let records = ledger.contents().unwrap();
    assert_eq!(records, receipt.records);
    assert_eq!(records.len(), 1);
    assert!(records[0].ends_with("Widget042.json"));

    // One sticker, one dispatch, right queue.
    let calls = fx.printer.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0.ends_with("Widget042.pdf"));
    assert_eq!(calls[0].1, "labelwriter");

    // The operator saw the job start and finish.
    let messages = fx.status.messages();
    assert!(messages[0].starts_with("Preparing Parts / Widget042"));
    assert_eq!(messages.last().unwrap(), "Queued 1 sticker of Widget042");
}

#[tokio::test]
async fn double_sticker_request_rounds_up_and_prints_per_sticker() {
    let fx = fixture();

    let receipt = fx
        .station
        .print_inventory(&inventory_request(3, StickerKind::NormalDouble, false))
        .await
        .unwrap();

    // 3 labels on double stock -> 4 labels -> 2 stickers -> 2 dispatches.
    assert_eq!(receipt.labels, 4);
    assert_eq!(receipt.stickers, 2);
    assert_eq!(receipt.serial, None);
    assert_eq!(receipt.name, "Widget");
    assert_eq!(fx.printer.calls.lock().unwrap().len(), 2);

    let messages = fx.status.messages();
    assert!(messages.contains(&"Printing # 1 of 2...".to_string()));
    assert!(messages.contains(&"Printing # 2 of 2...".to_string()));
    assert_eq!(messages.last().unwrap(), "Queued 2 stickers of Widget");
}

#[tokio::test]
async fn blank_title_fails_validation_before_any_side_effect() {
    let fx = fixture();

    let request = InventoryRequest {
        spec: LabelSpec::new("Parts", "   ", "", ""),
        kind: StickerKind::NormalSingle,
        labels: 1,
        serialized: true,
    };
    let err = fx.station.print_inventory(&request).await.unwrap_err();

    assert!(matches!(err, StationError::Domain(_)));
    // Neither counter nor ledger moved.
    let counter = SerialCounter::new(fx.dir.path().join("counter.txt"));
    assert_eq!(counter.get().unwrap(), 41);
    assert!(!fx.dir.path().join("inventory.txt").exists());
    assert!(fx.printer.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn contended_ledger_diverts_to_overflow_and_fails_the_job() {
    let fx = fixture();

    // Another "process" holds the ledger lock for good.
    let ledger_path = fx.dir.path().join("inventory.txt");
    Ledger::new(&ledger_path).append("seed").unwrap();
    let holder = File::open(&ledger_path).unwrap();
    holder.try_lock_exclusive().unwrap();

    let err = fx
        .station
        .print_inventory(&inventory_request(1, StickerKind::NormalSingle, true))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StationError::Append(AppendError::Overflowed { attempts: 10 })
    ));

    // Exactly one record in the overflow sink, none new in the ledger.
    let overflowed = fs::read_to_string(fx.dir.path().join("lost-inventory.txt")).unwrap();
    assert_eq!(overflowed.lines().count(), 1);
    assert!(overflowed.contains("Widget042.json"));

    holder.unlock().unwrap();
    assert_eq!(
        Ledger::new(&ledger_path).contents().unwrap(),
        vec!["seed"]
    );

    // The operator watched every retry and the terminal outcome.
    let messages = fx.status.messages();
    let waits = messages
        .iter()
        .filter(|m| m.starts_with("Waiting for inventory..."))
        .count();
    assert_eq!(waits, 10);
    assert!(
        messages
            .iter()
            .any(|m| m == "Could not queue Widget042 for inventory!")
    );
    // Nothing was printed for a failed job.
    assert!(fx.printer.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn render_failure_is_surfaced_and_fatal() {
    let fx = fixture();
    let printer = Arc::new(FakePrinter::default());
    let status = Arc::new(CapturedStatus::default());

    let counter = SerialCounter::new(fx.dir.path().join("counter.txt"));
    let station = PrintStation::new(
        counter,
        DurableAppender::new(
            Ledger::new(fx.dir.path().join("inventory.txt")),
            OverflowSink::in_dir(fx.dir.path()),
        ),
        Arc::new(BrokenRenderer),
        Arc::new(BrokenRenderer),
        printer.clone(),
        status.clone(),
        "labelwriter",
    );

    let err = station
        .print_inventory(&inventory_request(1, StickerKind::NormalSingle, false))
        .await
        .unwrap_err();

    assert!(matches!(err, StationError::Render(_)));
    assert!(
        status
            .messages()
            .contains(&"Error preparing sticker!!!".to_string())
    );
    assert!(printer.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn plain_job_prints_without_touching_the_ledger() {
    let fx = fixture();

    let receipt = fx
        .station
        .print_plain(&PlainRequest {
            text: "  spare keys  ".into(),
            kind: StickerKind::NormalDouble,
            labels: 2,
        })
        .await
        .unwrap();

    assert_eq!(receipt.name, "spare keys");
    assert_eq!(receipt.stickers, 1);
    assert!(receipt.records.is_empty());
    assert!(receipt.serial.is_none());

    // No inventory side effects at all.
    assert!(!fx.dir.path().join("inventory.txt").exists());
    let counter = SerialCounter::new(fx.dir.path().join("counter.txt"));
    assert_eq!(counter.get().unwrap(), 41);

    let calls = fx.printer.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0.ends_with("spare keys.pdf"));
}

#[tokio::test]
async fn blank_plain_text_is_rejected() {
    let fx = fixture();

    let err = fx
        .station
        .print_plain(&PlainRequest {
            text: "   ".into(),
            kind: StickerKind::NormalSingle,
            labels: 1,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, StationError::Domain(_)));
    assert!(fx.printer.calls.lock().unwrap().is_empty());
}
