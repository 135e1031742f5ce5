//! Artifact validation: detects structurally corrupt PDFs.
//!
//! The remote compilation service occasionally returns truncated or
//! non-PDF bodies; these checks catch the cheap, unambiguous cases. The
//! deep structural parse is deliberately advisory: a parser error on a file
//! of plausible size is NOT treated as corruption, since strict PDF parsers
//! reject plenty of real-world output. Only an explicit zero-page document
//! counts as corrupt at that stage.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

/// Anything smaller than this cannot be a PDF at all.
pub const MIN_PLAUSIBLE_BYTES: u64 = 100;
/// Above this size, a file with a valid header is accepted without deeper
/// inspection. The retry orchestrator reuses this threshold for its
/// final-attempt acceptance policy.
pub const LIKELY_VALID_BYTES: u64 = 1024;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Returns whether the artifact at `path` is corrupted.
///
/// Checks short-circuit in order: missing file, implausible size, bad
/// binary signature, likely-valid size, then the advisory structural parse.
pub fn is_corrupted(path: &Path) -> bool {
    let size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) => {
            warn!("Artifact missing at {path:?}: {e}");
            return true;
        }
    };

    if size < MIN_PLAUSIBLE_BYTES {
        warn!("Artifact implausibly small ({size} bytes) at {path:?}");
        return true;
    }

    if !has_pdf_header(path) {
        warn!("Artifact at {path:?} does not start with {PDF_MAGIC:?}");
        return true;
    }

    if size > LIKELY_VALID_BYTES {
        debug!("Artifact accepted on size + header ({size} bytes)");
        return false;
    }

    // Small file with a valid header: attempt a structural parse, but treat
    // a parse error as advisory only.
    match lopdf::Document::load(path) {
        Ok(doc) => {
            let pages = doc.get_pages().len();
            if pages == 0 {
                warn!("Artifact at {path:?} declares zero pages");
                true
            } else {
                debug!("Artifact parsed structurally ({pages} pages, {size} bytes)");
                false
            }
        }
        Err(e) => {
            warn!("Structural parse failed ({e}) on plausible-size artifact, accepting anyway");
            false
        }
    }
}

fn has_pdf_header(path: &Path) -> bool {
    let mut header = [0u8; 5];
    match File::open(path).and_then(|mut f| f.read_exact(&mut header)) {
        Ok(()) => header == PDF_MAGIC,
        Err(_) => false,
    }
}
