//! Remote compilation client for a TeXlive.net-style CGI endpoint.
//!
//! The service accepts a multipart form and answers one of two ways: a
//! redirect to a download location for the produced PDF, or the PDF bytes
//! directly with a matching content type. Redirects are never followed
//! automatically; the one expected hop is fetched manually under its own
//! timeout so a misbehaving service cannot bounce us around.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, redirect, Client, StatusCode};
use tracing::{error, info, warn};

use crate::render::Renderer;

/// Compilation blocks the pipeline, so the submission carries a hard timeout.
const COMPILE_TIMEOUT: Duration = Duration::from_secs(120);
/// Separate, shorter budget for the redirect-follow download.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);
/// Logical name the document is submitted under; the service compiles it
/// as-is, the real output name is chosen by the caller.
const LOGICAL_FILENAME: &str = "document.tex";
const ENGINE: &str = "pdflatex";

pub struct TexliveClient {
    client: Client,
    base_url: String,
}

impl TexliveClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(COMPILE_TIMEOUT)
                .redirect(redirect::Policy::none())
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
        }
    }

    /// Submits the document and writes the produced PDF to `output_path`.
    async fn compile(&self, latex: &str, output_path: &Path) -> bool {
        let form = multipart::Form::new()
            .text("filecontents[]", latex.to_string())
            .text("filename[]", LOGICAL_FILENAME)
            .text("engine", ENGINE)
            .text("return", "pdf");

        info!(
            "Submitting {} bytes of LaTeX to {} (engine: {ENGINE})",
            latex.len(),
            self.base_url
        );

        let response = match self.client.post(&self.base_url).multipart(form).send().await {
            Ok(r) => r,
            Err(e) => {
                error!("Compilation request failed: {e}");
                return false;
            }
        };

        match response.status() {
            StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND => {
                let Some(location) = response
                    .headers()
                    .get(reqwest::header::LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .map(String::from)
                else {
                    error!("Compilation service redirected without a Location header");
                    return false;
                };
                self.download_artifact(&location, output_path).await
            }
            StatusCode::OK => {
                let content_type = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                if content_type.contains("application/pdf") {
                    write_artifact(response, output_path).await
                } else {
                    let body = response.text().await.unwrap_or_default();
                    error!(
                        "Compilation failed: content type {content_type:?}, body: {}",
                        snippet(&body)
                    );
                    false
                }
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                error!("Compilation service returned {status}: {}", snippet(&body));
                false
            }
        }
    }

    /// Follows the single expected redirect hop to fetch the PDF.
    async fn download_artifact(&self, location: &str, output_path: &Path) -> bool {
        let url = self.absolutize(location);
        info!("Following redirect to {url}");

        let response = match self
            .client
            .get(&url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                error!("Artifact download failed: {e}");
                return false;
            }
        };

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Artifact download returned {status}: {}", snippet(&body));
            return false;
        }
        write_artifact(response, output_path).await
    }

    /// Resolves a relative redirect location against the service origin.
    fn absolutize(&self, location: &str) -> String {
        if !location.starts_with('/') {
            return location.to_string();
        }
        format!("{}{location}", origin(&self.base_url))
    }
}

#[async_trait]
impl Renderer for TexliveClient {
    async fn render(&self, latex: &str, output_path: &Path) -> bool {
        self.compile(latex, output_path).await
    }
}

async fn write_artifact(response: reqwest::Response, output_path: &Path) -> bool {
    let bytes = match response.bytes().await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to read artifact body: {e}");
            return false;
        }
    };
    if let Some(parent) = output_path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            warn!("Could not create output directory {parent:?}: {e}");
        }
    }
    match tokio::fs::write(output_path, &bytes).await {
        Ok(()) => {
            info!("PDF written to {output_path:?} ({} bytes)", bytes.len());
            true
        }
        Err(e) => {
            error!("Failed to write artifact to {output_path:?}: {e}");
            false
        }
    }
}

/// `scheme://host` part of a URL, for resolving relative redirects.
fn origin(url: &str) -> &str {
    let Some(scheme_end) = url.find("://") else {
        return url;
    };
    match url[scheme_end + 3..].find('/') {
        Some(path_start) => &url[..scheme_end + 3 + path_start],
        None => url,
    }
}

/// First 1000 characters of an error body, for diagnostics.
fn snippet(body: &str) -> &str {
    match body.char_indices().nth(1000) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
