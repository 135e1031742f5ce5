use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_TEXLIVE_URL: &str = "https://texlive.net/cgi-bin/latexcgi";

/// Engine configuration loaded from environment variables.
///
/// Nothing here is strictly required: a missing `GEMINI_API_KEY` simply
/// disables the AI parsing path (the heuristic fallback takes over), and the
/// remaining values default to sensible local settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the Gemini extraction endpoint. `None` forces the
    /// heuristic fallback for every parse.
    pub gemini_api_key: Option<String>,
    /// Remote LaTeX compilation endpoint.
    pub texlive_url: String,
    /// Directory where .tex and .pdf artifacts are written.
    pub output_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            texlive_url: std::env::var("TEXLIVE_URL")
                .unwrap_or_else(|_| DEFAULT_TEXLIVE_URL.to_string()),
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("output")),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Installs the global tracing subscriber with the configured filter.
    /// Safe to call more than once; only the first call takes effect.
    pub fn init_tracing(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(&self.rust_log))
            .try_init();
    }
}
