/*!
 * Monitoring Module
 * Tracing bootstrap
 */

pub mod tracer;

pub use tracer::init_tracing;
