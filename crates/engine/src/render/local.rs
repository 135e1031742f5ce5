//! Local pdflatex compilation path.
//!
//! When a pdflatex binary is on PATH it is cheaper and more reliable than
//! the remote service, so the fallback renderer tries it first. Compilation
//! runs in a throwaway temp directory; only the produced PDF is moved to the
//! target path.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::render::Renderer;

/// A hung local compiler must not stall the pipeline any longer than the
/// remote path would.
const COMPILE_TIMEOUT: Duration = Duration::from_secs(120);

pub struct LocalTex;

impl LocalTex {
    /// Probes for pdflatex on PATH; `None` disables the local path entirely.
    pub async fn detect() -> Option<Self> {
        let probe = Command::new("pdflatex").arg("--version").output().await;
        match probe {
            Ok(output) if output.status.success() => {
                debug!("pdflatex found on PATH, local compilation enabled");
                Some(LocalTex)
            }
            _ => {
                debug!("pdflatex not available, local compilation disabled");
                None
            }
        }
    }

    async fn compile(&self, latex: &str, output_path: &Path) -> bool {
        let workdir = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => {
                warn!("Could not create temp dir for local compilation: {e}");
                return false;
            }
        };
        let tex_path = workdir.path().join("document.tex");
        if let Err(e) = tokio::fs::write(&tex_path, latex).await {
            warn!("Could not write tex source for local compilation: {e}");
            return false;
        }

        let run = Command::new("pdflatex")
            .arg("-interaction=nonstopmode")
            .arg("-halt-on-error")
            .arg("-output-directory")
            .arg(workdir.path())
            .arg(&tex_path)
            .output();

        let output = match tokio::time::timeout(COMPILE_TIMEOUT, run).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!("pdflatex failed to run: {e}");
                return false;
            }
            Err(_) => {
                warn!("pdflatex timed out after {COMPILE_TIMEOUT:?}");
                return false;
            }
        };

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            warn!(
                "pdflatex exited with {}: {}",
                output.status,
                stdout.lines().rev().take(5).collect::<Vec<_>>().join(" | ")
            );
            return false;
        }

        let produced = workdir.path().join("document.pdf");
        if let Some(parent) = output_path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                warn!("Could not create output directory {parent:?}: {e}");
            }
        }
        match tokio::fs::copy(&produced, output_path).await {
            Ok(bytes) => {
                debug!("Local compilation produced {bytes} bytes at {output_path:?}");
                true
            }
            Err(e) => {
                warn!("pdflatex reported success but no PDF was produced: {e}");
                false
            }
        }
    }
}

#[async_trait]
impl Renderer for LocalTex {
    async fn render(&self, latex: &str, output_path: &Path) -> bool {
        self.compile(latex, output_path).await
    }
}
