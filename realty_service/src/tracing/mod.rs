//! Tracing and observability module.
//!
//! Provides distributed tracing capabilities for the realty service.

/// Tracer configuration and initialization.
pub mod tracer;
