//! PDF rendering: remote TeXlive compilation, an optional local pdflatex
//! fast path, artifact validation, and the bounded retry orchestrator.

pub mod local;
pub mod retry;
pub mod texlive;
pub mod validate;

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

/// A LaTeX-to-PDF renderer. Local and remote paths are interchangeable from
/// the orchestrator's perspective: given a document and a target path, either
/// the artifact lands there and the call reports `true`, or it reports
/// `false` and the orchestrator decides whether to retry.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, latex: &str, output_path: &Path) -> bool;
}

/// Tries the local pdflatex path first as an optimization, falling back to
/// the remote service when the local path is unavailable or fails.
pub struct FallbackRenderer<L = local::LocalTex, R = texlive::TexliveClient> {
    local: Option<L>,
    remote: R,
}

impl FallbackRenderer {
    /// Probes for a local pdflatex install and wires up both paths.
    pub async fn detect(texlive_url: String) -> Self {
        Self {
            local: local::LocalTex::detect().await,
            remote: texlive::TexliveClient::new(texlive_url),
        }
    }
}

impl<L: Renderer, R: Renderer> FallbackRenderer<L, R> {
    pub fn new(local: Option<L>, remote: R) -> Self {
        Self { local, remote }
    }
}

#[async_trait]
impl<L: Renderer, R: Renderer> Renderer for FallbackRenderer<L, R> {
    async fn render(&self, latex: &str, output_path: &Path) -> bool {
        if let Some(local) = &self.local {
            if local.render(latex, output_path).await {
                return true;
            }
            debug!("Local compilation failed, falling back to remote service");
        }
        self.remote.render(latex, output_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FlagRenderer {
        calls: AtomicU32,
        succeed: bool,
    }

    impl FlagRenderer {
        fn new(succeed: bool) -> Self {
            Self {
                calls: AtomicU32::new(0),
                succeed,
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Renderer for FlagRenderer {
        async fn render(&self, _latex: &str, _output_path: &Path) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.succeed
        }
    }

    #[tokio::test]
    async fn test_local_success_never_reaches_remote() {
        let renderer = FallbackRenderer::new(Some(FlagRenderer::new(true)), FlagRenderer::new(true));
        assert!(renderer.render("doc", Path::new("out.pdf")).await);
        assert_eq!(renderer.local.as_ref().unwrap().calls(), 1);
        assert_eq!(renderer.remote.calls(), 0);
    }

    #[tokio::test]
    async fn test_local_failure_falls_back_to_remote() {
        let renderer =
            FallbackRenderer::new(Some(FlagRenderer::new(false)), FlagRenderer::new(true));
        assert!(renderer.render("doc", Path::new("out.pdf")).await);
        assert_eq!(renderer.local.as_ref().unwrap().calls(), 1);
        assert_eq!(renderer.remote.calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_local_path_goes_straight_to_remote() {
        let renderer = FallbackRenderer::new(None::<FlagRenderer>, FlagRenderer::new(true));
        assert!(renderer.render("doc", Path::new("out.pdf")).await);
        assert_eq!(renderer.remote.calls(), 1);
    }

    #[tokio::test]
    async fn test_both_paths_failing_reports_failure() {
        let renderer =
            FallbackRenderer::new(Some(FlagRenderer::new(false)), FlagRenderer::new(false));
        assert!(!renderer.render("doc", Path::new("out.pdf")).await);
        assert_eq!(renderer.remote.calls(), 1);
    }
}
