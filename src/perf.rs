//! Timing spans and the debug event log, both carried by `tracing`.
//!
//! [`scope`] opens a span under [`PERF_TARGET`]; the subscriber built in
//! `main` reports its busy time when it closes, but only with `--perf`.
//! [`log_event`] emits under [`EVENT_TARGET`], which only the file layer from
//! [`debug_log_layer`] records.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing::span::EnteredSpan;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::{Directive, ParseError, Targets};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::registry::LookupSpan;

pub const PERF_TARGET: &str = "tategaki::perf";
pub const EVENT_TARGET: &str = "tategaki::event";

/// Time the rest of the enclosing block.
pub fn scope(name: &'static str) -> EnteredSpan {
    tracing::info_span!(target: PERF_TARGET, "scope", name).entered()
}

/// Record an editor or render event in the debug log.
pub fn log_event(name: &str, detail: impl AsRef<str>) {
    tracing::trace!(target: EVENT_TARGET, event = name, "{}", detail.as_ref());
}

/// Filter directive that turns timing spans on.
///
/// # Errors
/// Only if the target name stops being a valid directive.
pub fn perf_directive() -> Result<Directive, ParseError> {
    format!("{PERF_TARGET}=info").parse()
}

/// Layer writing events and timing spans to `path`.
///
/// # Errors
/// Fails if the file cannot be created.
pub fn debug_log_layer<S>(path: &Path) -> std::io::Result<impl Layer<S>>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let mut file = File::create(path)?;
    writeln!(file, "tategaki debug log start")?;
    Ok(tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(
            Targets::new()
                .with_target(EVENT_TARGET, Level::TRACE)
                .with_target(PERF_TARGET, Level::INFO),
        ))
}
