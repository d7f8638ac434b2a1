//! Telemetry utilities for request-scoped tracing metadata and global subscriber management.

use std::any::type_name_of_val;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use log::LevelFilter;
use thiserror::Error;
use tokio::task_local;
use tracing::Instrument;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::Layer,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};
use uuid::Uuid;

use crate::config::AppConfig;

/// Header carrying the request correlation ID in both directions.
pub const TRACE_ID_HEADER: HeaderName = HeaderName::from_static("x-trace-id");

/// Trace context containing request correlation ID.
#[derive(Debug, Clone)]
pub struct TraceContext {
    pub trace_id: String,
}

task_local! {
    static ACTIVE_TRACE_CONTEXT: TraceContext;
}

/// Errors that can occur while initializing global telemetry.
#[derive(Debug, Error)]
pub enum TelemetryInitError {
    #[error("failed to install log tracer bridge: {0}")]
    LogTracer(#[from] log::SetLoggerError),
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] TryInitError),
}

static TELEMETRY_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize global tracing/logging exactly once, wiring `log::` macros into the tracing pipeline.
pub fn init_tracing(config: &AppConfig) -> Result<(), TelemetryInitError> {
    if TELEMETRY_INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Ok(());
    }

    // sqlx and sea-orm log through `log`; bridge them before the subscriber goes in.
    if let Err(err) = LogTracer::builder()
        .with_max_level(LevelFilter::Trace)
        .init()
    {
        let logger_type = type_name_of_val(log::logger());
        if !logger_type.contains("LogTracer") {
            eprintln!(
                "Warning: Failed to install log tracer bridge: {}. `log::` records will not reach the tracing subscriber.",
                err
            );
        }
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let fmt_layer = match config.log_format.as_str() {
        "pretty" => fmt::layer().pretty().boxed(),
        _ => fmt::layer().json().boxed(),
    };

    if let Err(err) = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
    {
        TELEMETRY_INITIALIZED.store(false, Ordering::SeqCst);
        eprintln!(
            "Warning: Failed to set global tracing subscriber: {}. Default subscriber remains in effect.",
            err
        );
    }

    Ok(())
}

/// Execute `future` within the provided trace context, making it available through task-local
/// storage for the duration of the request.
pub async fn with_trace_context<Fut, R>(context: TraceContext, future: Fut) -> R
where
    Fut: std::future::Future<Output = R>,
{
    ACTIVE_TRACE_CONTEXT.scope(context, future).await
}

/// Get the currently active trace ID, if one has been set for the running task.
pub fn current_trace_id() -> Option<String> {
    ACTIVE_TRACE_CONTEXT
        .try_with(|ctx| ctx.trace_id.clone())
        .ok()
}

/// Middleware assigning every request a trace ID.
///
/// An incoming `X-Trace-Id` header is reused when present; otherwise a UUID is
/// generated. The ID is scoped to the request task, attached to the request
/// span and echoed back in the response headers.
pub async fn trace_middleware(mut request: Request, next: Next) -> Response {
    let trace_id = request
        .headers()
        .get(&TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty() && value.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let context = TraceContext {
        trace_id: trace_id.clone(),
    };
    request.extensions_mut().insert(context.clone());

    let span = tracing::info_span!(
        "request",
        trace_id = %trace_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    let mut response = with_trace_context(context, next.run(request))
        .instrument(span)
        .await;

    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }

    response
}
