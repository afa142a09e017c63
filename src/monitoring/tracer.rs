/*!
 * Structured Tracing
 * Subscriber setup for the binary and a span for whole scheduler sessions
 */

use crate::core::limits::ENV_TRACE_JSON;
use crate::scheduler::RunReport;
use std::time::Instant;
use tracing::{debug, info, span, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

/// Initialize structured tracing
///
/// The library never calls this; only the binary installs a subscriber.
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - TURNSCHED_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .init();
        debug!("Structured tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
        debug!("Structured tracing initialized");
    }
}

/// Generate a unique trace ID for session correlation
pub fn generate_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span covering one scheduler session, from first order to final report
pub struct SessionSpan {
    span: Span,
    start: Instant,
    trace_id: String,
}

impl SessionSpan {
    pub fn new(levels: usize, quantum: u64) -> Self {
        let trace_id = generate_trace_id();

        let span = span!(
            Level::INFO,
            "session",
            trace_id = %trace_id,
            levels = levels,
            quantum = quantum,
            turns = tracing::field::Empty,
            minutes_worked = tracing::field::Empty,
            completed = tracing::field::Empty,
            rejected = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            trace_id,
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn record_report(&self, report: &RunReport) {
        self.span.record("turns", report.turns);
        self.span.record("minutes_worked", report.minutes_worked);
        self.span.record("completed", report.completed);
    }

    pub fn record_rejected(&self, count: usize) {
        self.span.record("rejected", count);
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for SessionSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let _entered = self.span.enter();
        self.span.record("duration_us", duration.as_micros() as u64);
        info!(
            trace_id = %self.trace_id,
            duration_us = duration.as_micros() as u64,
            "session finished"
        );
    }
}
