//! Resume typesetting engine.
//!
//! Turns unstructured résumé text into a compiled PDF in three stages:
//! parsing (AI-assisted with a deterministic heuristic fallback), LaTeX
//! synthesis (injection-safe escaping, conditional section assembly), and
//! resilient compilation against an unreliable remote renderer (corruption
//! detection, bounded retry, local pdflatex fast path).
//!
//! HTTP routing, uploads, and persistence live in the surrounding service;
//! this crate takes a text (or record) and hands back artifacts.

pub mod config;
pub mod errors;
pub mod latex;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod sanitize;
pub mod tailor;

pub use config::Config;
pub use errors::EngineError;
pub use models::StructuredRecord;
pub use pipeline::{run, run_record, Mode, PipelineOutcome};
pub use render::{FallbackRenderer, Renderer};

/// Routes tracing output through the test harness's capture so `RUST_LOG`
/// works in test runs. First caller wins; later calls are no-ops.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
