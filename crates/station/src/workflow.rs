//! Station print workflow: plan, allocate, render, record, dispatch.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use labelforge_core::{DomainError, PlainLabel, SheetPlan, serial_name};
use labelforge_render::{LabelRenderer, PrintDispatcher, PrintError, RenderError, RenderJob};
use labelforge_store::{
    AppendError, AppendEvent, AppendObserver, DurableAppender, SerialCounter, StoreError,
};

use crate::status::StatusSink;
use crate::types::{InventoryRequest, JobReceipt, PlainRequest};

/// Artifact extensions the creator may emit for inventory records.
const RECORD_EXTENSIONS: [&str; 3] = ["txt", "dat", "json"];
/// Extension of the printable page artifact.
const PRINT_EXTENSION: &str = "pdf";

/// Failure of a station print job.
#[derive(Debug, Error)]
pub enum StationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("serial allocation failed: {0}")]
    Counter(#[source] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// The creator finished but never reported a printable artifact.
    #[error("label creator produced no print artifact")]
    MissingPrintArtifact,

    #[error(transparent)]
    Append(#[from] AppendError),

    #[error("printing copy {copy} failed: {source}")]
    Print {
        copy: u32,
        #[source]
        source: PrintError,
    },
}

/// One label station.
///
/// All shared durable state is held as explicit handles — counter, ledger
/// and overflow sink arrive from the caller, never as ambient files opened
/// ad hoc. Several stations (processes) may point at the same files; only
/// the counter is unprotected against that (see [`SerialCounter`]).
pub struct PrintStation {
    counter: SerialCounter,
    appender: DurableAppender,
    inventory_renderer: Arc<dyn LabelRenderer>,
    plain_renderer: Arc<dyn LabelRenderer>,
    dispatcher: Arc<dyn PrintDispatcher>,
    status: Arc<dyn StatusSink>,
    destination: String,
}

impl PrintStation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        counter: SerialCounter,
        appender: DurableAppender,
        inventory_renderer: Arc<dyn LabelRenderer>,
        plain_renderer: Arc<dyn LabelRenderer>,
        dispatcher: Arc<dyn PrintDispatcher>,
        status: Arc<dyn StatusSink>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            counter,
            appender,
            inventory_renderer,
            plain_renderer,
            dispatcher,
            status,
            destination: destination.into(),
        }
    }

    /// Run one inventory label job end to end.
    pub async fn print_inventory(
        &self,
        request: &InventoryRequest,
    ) -> Result<JobReceipt, StationError> {
        let spec = request.spec.clone().normalized();
        spec.validate()?;

        let plan = SheetPlan::plan(request.kind, request.labels);

        let serial = if request.serialized {
            Some(self.counter.increment().map_err(StationError::Counter)?)
        } else {
            None
        };
        let name = match serial {
            Some(serial) => serial_name(&spec.title, serial),
            None => spec.title.clone(),
        };

        self.status.message(&format!(
            "Preparing {} / {} / {}...",
            spec.category, name, spec.subtitle
        ));
        tracing::info!(%name, labels = plan.labels, stickers = plan.stickers, "inventory job started");

        let job = RenderJob::Inventory {
            category: spec.category.clone(),
            name: name.clone(),
            subtitle: spec.subtitle.clone(),
            description: spec.description.clone(),
        };
        let artifacts = match self.inventory_renderer.render(&job).await {
            Ok(artifacts) => artifacts,
            Err(err) => {
                self.status.message("Error preparing sticker!!!");
                return Err(err.into());
            }
        };

        let mut print_artifact: Option<PathBuf> = None;
        let mut records: Vec<String> = Vec::new();
        for artifact in &artifacts {
            if has_extension(artifact, &RECORD_EXTENSIONS) {
                records.push(artifact.to_string_lossy().into_owned());
            } else if has_extension(artifact, &[PRINT_EXTENSION]) {
                print_artifact = Some(artifact.clone());
            }
        }

        for record in &records {
            self.record_inventory(record, &name).await?;
        }

        let print_artifact = print_artifact.ok_or(StationError::MissingPrintArtifact)?;
        self.print_copies(&print_artifact, plan.stickers, &name)
            .await?;

        Ok(JobReceipt {
            job_id: Uuid::now_v7(),
            created_at: Utc::now(),
            name,
            labels: plan.labels,
            stickers: plan.stickers,
            serial,
            records,
        })
    }

    /// Run one plain-text label job end to end. No serial, no ledger record.
    pub async fn print_plain(&self, request: &PlainRequest) -> Result<JobReceipt, StationError> {
        let label = PlainLabel::new(&request.text)?;
        let plan = SheetPlan::plan(request.kind, request.labels);

        self.status.message(&format!("Preparing {label}..."));
        tracing::info!(text = label.text(), stickers = plan.stickers, "plain job started");

        let job = RenderJob::Plain {
            text: label.text().to_string(),
        };
        let artifacts = match self.plain_renderer.render(&job).await {
            Ok(artifacts) => artifacts,
            Err(err) => {
                self.status.message("Error preparing sticker!!!");
                return Err(err.into());
            }
        };

        let print_artifact = artifacts
            .into_iter()
            .next()
            .ok_or(StationError::MissingPrintArtifact)?;
        self.print_copies(&print_artifact, plan.stickers, label.text())
            .await?;

        Ok(JobReceipt {
            job_id: Uuid::now_v7(),
            created_at: Utc::now(),
            name: label.text().to_string(),
            labels: plan.labels,
            stickers: plan.stickers,
            serial: None,
            records: Vec::new(),
        })
    }

    /// Durably append one inventory record, narrating progress and outcome.
    async fn record_inventory(&self, record: &str, name: &str) -> Result<(), StationError> {
        let observer = StatusRelay {
            status: self.status.as_ref(),
            name,
        };
        self.appender.commit(record, &observer).await?;
        Ok(())
    }

    async fn print_copies(
        &self,
        artifact: &Path,
        copies: u32,
        name: &str,
    ) -> Result<(), StationError> {
        for copy in 1..=copies {
            self.status
                .message(&format!("Printing # {copy} of {copies}..."));

            if let Err(source) = self.dispatcher.dispatch(artifact, &self.destination).await {
                self.status
                    .message(&format!("Error printing copy # {copy}!!!"));
                return Err(StationError::Print { copy, source });
            }
        }

        let noun = if copies == 1 { "sticker" } else { "stickers" };
        self.status
            .message(&format!("Queued {copies} {noun} of {name}"));
        Ok(())
    }
}

/// Bridges append notifications onto the operator status line.
struct StatusRelay<'a> {
    status: &'a dyn StatusSink,
    name: &'a str,
}

impl AppendObserver for StatusRelay<'_> {
    fn notify(&self, event: AppendEvent) {
        match event {
            AppendEvent::Contended { attempt, .. } => {
                self.status
                    .message(&format!("Waiting for inventory... {attempt}"));
            }
            AppendEvent::Committed => {}
            AppendEvent::Overflowed { .. } => {
                self.status
                    .message(&format!("Could not queue {} for inventory!", self.name));
            }
            AppendEvent::Lost => {
                self.status
                    .message(&format!("Inventory record for {} may be LOST!", self.name));
            }
        }
    }
}

fn has_extension(path: &Path, candidates: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            candidates.iter().any(|c| *c == ext)
        })
        .unwrap_or(false)
}
