//! File-based logging module for cd-shell
//!
//! This module sets up tracing-based logging that writes to a file instead of stdout,
//! since the application uses a TUI that occupies the terminal. A second layer
//! forwards every event to the [`Diagnostics`] dispatcher so panels can watch
//! the diagnostic stream without replacing the logger.

use std::fmt;
use std::path::Path;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::NonBlocking;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self as fmt_layer, format::FmtSpan, MakeWriter},
    layer::{Context, Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::diagnostics::{DiagnosticRecord, Diagnostics};

const LOG_DIR: &str = ".logs";
const LOG_FILE_PREFIX: &str = "cd-shell";
const DEFAULT_FILTER: &str = "cd_shell=debug,warn";

/// Initialize the logging system.
///
/// Logs are written to `.logs/cd-shell.YYYY-MM-DD.log` with daily rotation.
/// The log level can be controlled via the `RUST_LOG` environment variable.
/// `RUST_LOG` only filters the file; the diagnostics dispatcher always sees
/// every event, and stays installed when the log file cannot be opened.
///
/// Default log levels:
/// - `cd_shell` modules: DEBUG
/// - Other crates: WARN
pub fn init_logging(diagnostics: Diagnostics) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (writer, file_error) = match file_writer() {
        Ok(writer) => (Some(writer), None),
        Err(e) => (None, Some(e)),
    };

    build_subscriber(diagnostics, filter, writer).try_init()?;

    if let Some(e) = file_error {
        return Err(e.context("Log file unavailable, diagnostics only"));
    }
    tracing::info!("Logging initialized - logs written to {}/", LOG_DIR);

    Ok(())
}

fn file_writer() -> anyhow::Result<NonBlocking> {
    let log_dir = Path::new(LOG_DIR);
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, LOG_FILE_PREFIX);

    // Non-blocking writer so rendering never waits on disk
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard must live as long as the process
    Box::leak(Box::new(guard));

    Ok(non_blocking)
}

/// Registry with an optional filtered file layer and an unfiltered
/// diagnostics layer
fn build_subscriber<W>(
    diagnostics: Diagnostics,
    filter: EnvFilter,
    writer: Option<W>,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let file_layer = writer.map(|writer| {
        fmt_layer::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(filter)
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(DiagnosticLayer::new(diagnostics))
}

/// Forwards tracing events to the diagnostics dispatcher
pub struct DiagnosticLayer {
    diagnostics: Diagnostics,
}

impl DiagnosticLayer {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }
}

impl<S: Subscriber> Layer<S> for DiagnosticLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if self.diagnostics.observer_count() == 0 {
            return;
        }
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        self.diagnostics.dispatch(&DiagnosticRecord::new(
            *metadata.level(),
            metadata.target(),
            visitor.message,
        ));
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
}
