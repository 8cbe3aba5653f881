//! JSON-lines trace output for binder sessions.
//!
//! With the `trace` feature, [`init_tracing`] installs the global subscriber:
//! one JSON object per event and per closed span, appended to
//! `<log_dir>/nep-trace.jsonl`. Without the feature it installs nothing and
//! returns `Ok(None)`.

use std::path::Path;

use crate::EngineError;

pub const TRACE_FILE: &str = "nep-trace.jsonl";

#[cfg(feature = "trace")]
const DEFAULT_FILTER: &str = "nep_engine=debug,nep_session=debug,nep_core=debug";

/// Flushes buffered trace lines when dropped. Hold it until exit.
#[must_use]
pub struct TraceGuard {
    #[cfg(feature = "trace")]
    _worker: tracing_appender::non_blocking::WorkerGuard,
}

#[cfg(feature = "trace")]
pub fn init_tracing(log_dir: &Path) -> Result<Option<TraceGuard>, EngineError> {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    std::fs::create_dir_all(log_dir).map_err(|source| EngineError::Io {
        path: log_dir.display().to_string(),
        source,
    })?;
    let appender = tracing_appender::rolling::never(log_dir, TRACE_FILE);
    let (writer, worker) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .json()
        .with_writer(writer)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .try_init()
        .map_err(|e| EngineError::InvalidData(format!("trace subscriber: {e}")))?;

    Ok(Some(TraceGuard { _worker: worker }))
}

#[cfg(not(feature = "trace"))]
pub fn init_tracing(_log_dir: &Path) -> Result<Option<TraceGuard>, EngineError> {
    Ok(None)
}
