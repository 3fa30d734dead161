//! Hooks for watching uploads being decoded.
//!
//! [`ingest_upload`](super::ingest_upload) reports every decode attempt for a supported file to
//! the configured [`IngestionObserver`]: row and column counts for a decoded upload, and a
//! severity for one that failed. Uploads rejected for their extension never reach an observer.

use std::fmt;
use std::sync::Arc;

use crate::error::{SweepError, SweepResult};
use crate::types::Table;

use super::unified::IngestionFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the file was skipped).
    Error,
    /// Critical error (typically I/O failures).
    Critical,
}

/// Context about an ingestion attempt.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// Declared name of the uploaded file.
    pub file_name: String,
    /// Format used for decoding.
    pub format: IngestionFormat,
}

/// Minimal stats reported on successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Number of decoded rows.
    pub rows: usize,
    /// Number of decoded columns.
    pub columns: usize,
}

/// Receives the outcome of each upload decode.
pub trait IngestionObserver: Send + Sync {
    /// Called when decoding succeeds.
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    /// Called when decoding fails.
    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &SweepError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &SweepError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &SweepError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &SweepError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Report a decode result to `observer`, alerting when the failure severity reaches `alert_at_or_above`.
pub(crate) fn report_outcome(
    observer: &dyn IngestionObserver,
    ctx: &IngestionContext,
    result: &SweepResult<Table>,
    alert_at_or_above: IngestionSeverity,
) {
    match result {
        Ok(table) => observer.on_success(
            ctx,
            IngestionStats {
                rows: table.row_count(),
                columns: table.column_count(),
            },
        ),
        Err(e) => {
            let severity = severity_for_error(e);
            observer.on_failure(ctx, severity, e);
            if severity >= alert_at_or_above {
                observer.on_alert(ctx, severity, e);
            }
        }
    }
}

/// Severity of a decode failure: I/O problems are critical, malformed content is an error.
pub fn severity_for_error(e: &SweepError) -> IngestionSeverity {
    match e {
        SweepError::Io(_) => IngestionSeverity::Critical,
        SweepError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        _ => IngestionSeverity::Error,
    }
}

/// Forwards ingestion events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IngestionObserver for TracingObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        tracing::info!(
            file = %ctx.file_name,
            format = ?ctx.format,
            rows = stats.rows,
            columns = stats.columns,
            "ingested"
        );
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &SweepError) {
        tracing::warn!(
            file = %ctx.file_name,
            format = ?ctx.format,
            severity = ?severity,
            error = %error,
            "ingestion failed"
        );
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &SweepError) {
        tracing::error!(
            file = %ctx.file_name,
            format = ?ctx.format,
            severity = ?severity,
            error = %error,
            "ingestion alert"
        );
    }
}
