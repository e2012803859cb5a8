//! Observability setup for storm: structured logging and optional
//! OpenTelemetry trace export.

pub mod tracing_setup;
