//! Observability setup for lifeassist: structured logging with optional
//! OpenTelemetry span export.

pub mod tracing_setup;
