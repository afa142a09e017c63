/*!
 * Monitoring
 * Structured tracing setup and session spans
 */

mod tracer;

pub use tracer::{generate_trace_id, init_tracing, SessionSpan};
