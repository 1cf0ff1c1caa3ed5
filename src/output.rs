//! Output types: the immutable result of a transcription job.
//!
//! A [`BrailleDocument`] is constructed once by the orchestrator and then
//! handed to external renderers (PDF preview, embosser G-code) and to the
//! UI layer purely for read access. Everything is serde-serializable so a
//! web layer can forward it as-is.

use crate::config::Grade;
use crate::error::TranscriptionWarning;
use crate::pipeline::format::FormattedLine;
use crate::pipeline::layout::DocumentLayout;
use serde::{Deserialize, Serialize};

/// One encoded Braille line.
///
/// Invariant: `cell_count() <= line_width`. Each Braille character occupies
/// one visual column regardless of how many source characters produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrailleLine {
    /// Braille Unicode code points plus plain spaces.
    pub cells: String,
    /// Index of the originating [`FormattedLine`] in
    /// [`BrailleDocument::formatted`] — a back-reference, not ownership.
    pub source_line: usize,
}

impl BrailleLine {
    /// Visual column count of this line.
    pub fn cell_count(&self) -> usize {
        self.cells.chars().count()
    }
}

/// A fixed-size page of Braille lines. Pages own their lines; lines are
/// never shared across pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BraillePage {
    /// 1-indexed page number.
    pub page_number: usize,
    pub lines: Vec<BrailleLine>,
    /// Cached `lines.len()`, kept for UI consumers of the serialized form.
    pub line_count: usize,
    /// Sum of Braille-cell counts on this page (not source characters).
    pub char_count: usize,
}

/// Pagination summary record for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationSummary {
    pub total_pages: usize,
    /// Page capacity in cells: `line_width × lines_per_page`.
    pub chars_per_page: usize,
    pub lines_per_page: usize,
}

/// Counters and timings for one transcription job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptionStats {
    pub total_pages: usize,
    pub total_lines: usize,
    /// Total Braille cells emitted across all pages.
    pub total_cells: usize,
    /// Characters with no Braille mapping, passed through unchanged.
    /// A diagnostic counter, never an error.
    pub unsupported_chars: usize,
    /// Whole-word and letter-group contractions applied.
    pub contraction_hits: usize,
    pub format_duration_ms: u64,
    pub encode_duration_ms: u64,
    pub layout_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// The finished, paginated, laid-out Braille document.
///
/// Immutable once built: no downstream component may mutate it, so it can
/// be shared freely between the preview renderer, the embosser driver, and
/// the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrailleDocument {
    /// Grade requested for the job. Check [`Self::contraction_degraded`]
    /// to learn whether Grade 2 actually ran with reduced or no tables.
    pub grade: Grade,
    pub pages: Vec<BraillePage>,
    /// The formatted source lines, referenced by
    /// [`BrailleLine::source_line`].
    pub formatted: Vec<FormattedLine>,
    pub pagination: PaginationSummary,
    /// Physical embosser layout, consumed identically by PDF and G-code
    /// renderers.
    pub layout: DocumentLayout,
    pub warnings: Vec<TranscriptionWarning>,
    pub stats: TranscriptionStats,
}

impl BrailleDocument {
    /// The full Braille text: lines joined with `\n`, pages separated by a
    /// form feed (the page-break convention of embosser-ready files).
    pub fn braille_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| {
                p.lines
                    .iter()
                    .map(|l| l.cells.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n\u{000C}\n")
    }

    /// Whether the contraction backend was downgraded from what the job
    /// requested (for "Grade 1 fallback used" UI disclosure).
    pub fn contraction_degraded(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, TranscriptionWarning::ContractionFallback { .. }))
    }

    /// Resolve a line's back-reference to its formatted source line.
    pub fn source_of(&self, line: &BrailleLine) -> Option<&FormattedLine> {
        self.formatted.get(line.source_line)
    }
}
