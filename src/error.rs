//! Error types for the txt2brl library.
//!
//! Two distinct types reflect two distinct failure modes:
//!
//! * [`BrailleError`] — **Fatal**: the transcription cannot proceed at all
//!   (empty input, unusable line width, bad configuration). Returned as
//!   `Err(BrailleError)` from the top-level `transcribe*` functions before
//!   any pipeline stage runs. A half-embossed document wastes physical
//!   media, so the pipeline never emits a partial result on these.
//!
//! * [`TranscriptionWarning`] — **Non-fatal**: a condition the pipeline
//!   degraded around (contraction tables unavailable, characters with no
//!   Braille mapping, paper too narrow for the configured width). Stored on
//!   [`crate::output::BrailleDocument::warnings`] so callers can disclose
//!   the degradation to the reader instead of losing the whole document.
//!
//! The separation lets callers decide their own tolerance: surface warnings
//! in a UI banner, log and continue, or treat any warning as a hard error.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the txt2brl library.
///
/// Degraded-mode conditions use [`TranscriptionWarning`] and are stored on
/// [`crate::output::BrailleDocument`] rather than propagated here.
#[derive(Debug, Error)]
pub enum BrailleError {
    // ── Validation errors (rejected before any stage runs) ────────────────
    /// The input contained no printable text after formatting.
    #[error("Input text is empty — nothing to transcribe")]
    EmptyInput,

    /// The configured line width cannot fit an indicator cell plus one
    /// letter cell.
    #[error("Line width {got} is too small: a Braille line needs at least 4 cells")]
    LineWidthTooSmall { got: usize },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Braille file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal condition recorded on the finished document.
///
/// Warnings never abort a job: the primary design goal is to always return
/// usable Braille for whatever was given, with graceful feature loss.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum TranscriptionWarning {
    /// The requested contraction backend was unavailable; transcription
    /// continued with a lesser one (or with uncontracted Grade 1).
    #[error("Contraction backend '{requested}' unavailable ({reason}); used '{actual}'")]
    ContractionFallback {
        requested: String,
        actual: String,
        reason: String,
    },

    /// Characters with no Braille mapping were passed through unchanged.
    #[error("{total} character(s) across {distinct} distinct code point(s) had no Braille mapping and were passed through")]
    UnsupportedCharacters { distinct: usize, total: usize },

    /// The configured line width exceeds what the selected paper can
    /// physically hold; an embosser would clip the right edge.
    #[error("Line width of {cells_required} cells exceeds the paper's capacity of {cells_available}")]
    PaperOverflow {
        cells_required: usize,
        cells_available: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_width_display() {
        let e = BrailleError::LineWidthTooSmall { got: 2 };
        let msg = e.to_string();
        assert!(msg.contains('2'), "got: {msg}");
        assert!(msg.contains("at least 4"));
    }

    #[test]
    fn contraction_fallback_display() {
        let w = TranscriptionWarning::ContractionFallback {
            requested: "external".into(),
            actual: "none".into(),
            reason: "table file not found".into(),
        };
        let msg = w.to_string();
        assert!(msg.contains("external"));
        assert!(msg.contains("none"));
    }

    #[test]
    fn paper_overflow_display() {
        let w = TranscriptionWarning::PaperOverflow {
            cells_required: 40,
            cells_available: 31,
        };
        assert!(w.to_string().contains("40"));
        assert!(w.to_string().contains("31"));
    }
}
