//! Full-document transcription entry points.
//!
//! This module wires the pipeline stages together: format the source text,
//! resolve the contraction backend, encode every line, paginate, and compute
//! the physical layout. Per-character problems are downgraded to warnings on
//! the finished document; only unusable input or configuration aborts the
//! job.

use crate::config::BrailleConfig;
use crate::error::{BrailleError, TranscriptionWarning};
use crate::output::{BrailleDocument, PaginationSummary, TranscriptionStats};
use crate::pipeline::format::LineKind;
use crate::pipeline::{contract, encode, format, layout, paginate};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Transcribe plain text into a paginated Braille document.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `text` — Source text (any line-ending convention)
/// * `config` — Transcription configuration
///
/// # Returns
/// `Ok(BrailleDocument)` on success, even when characters had no Braille
/// mapping or the contraction backend degraded (check `document.warnings`).
///
/// # Errors
/// Returns `Err(BrailleError)` only for fatal conditions:
/// - Input with no printable characters
/// - A line width too small to hold an indicator plus a letter
pub fn transcribe(
    text: impl AsRef<str>,
    config: &BrailleConfig,
) -> Result<BrailleDocument, BrailleError> {
    let total_start = Instant::now();
    let text = text.as_ref();
    config.validate()?;
    info!(
        "Starting transcription: {} chars, {}, width {}",
        text.chars().count(),
        config.grade,
        config.line_width
    );

    // ── Step 1: Format source text into lines ────────────────────────────
    let format_start = Instant::now();
    let mut formatted = Vec::new();
    if let Some(ref title) = config.title {
        formatted.extend(format::title_lines(title, config.line_width));
    }
    formatted.extend(format::format_lines(text, config.line_width));
    let format_duration_ms = format_start.elapsed().as_millis() as u64;

    if !formatted.iter().any(|l| l.kind != LineKind::Blank) {
        return Err(BrailleError::EmptyInput);
    }
    debug!("Formatted into {} lines", formatted.len());

    // ── Step 2: Resolve contraction backend ──────────────────────────────
    let (provider, mut warnings) = contract::resolve_provider(config);

    // ── Step 3: Encode lines to Braille cells ────────────────────────────
    let encode_start = Instant::now();
    let mut diag = encode::EncodeDiagnostics::default();
    let mut braille_lines = Vec::with_capacity(formatted.len());
    for (index, line) in formatted.iter().enumerate() {
        braille_lines.extend(encode::encode_line(
            line,
            index,
            config.grade,
            provider.as_ref(),
            config.line_width,
            &mut diag,
        ));
    }
    let encode_duration_ms = encode_start.elapsed().as_millis() as u64;
    debug!(
        "Encoded {} Braille lines ({} contraction hits)",
        braille_lines.len(),
        diag.contraction_hits
    );

    if !diag.unsupported_distinct.is_empty() {
        warnings.push(TranscriptionWarning::UnsupportedCharacters {
            distinct: diag.unsupported_distinct.len(),
            total: diag.unsupported_total,
        });
    }

    // ── Step 4: Paginate ──────────────────────────────────────────────────
    let pages = paginate::paginate(braille_lines, config.lines_per_page);

    // ── Step 5: Physical layout ───────────────────────────────────────────
    let layout_start = Instant::now();
    let paper = config.paper.spec();
    if config.line_width > paper.cell_capacity() {
        warnings.push(TranscriptionWarning::PaperOverflow {
            cells_required: config.line_width,
            cells_available: paper.cell_capacity(),
        });
    }
    let layout = layout::layout_document(&pages, &paper);
    let layout_duration_ms = layout_start.elapsed().as_millis() as u64;

    // ── Step 6: Assemble document ─────────────────────────────────────────
    let stats = TranscriptionStats {
        total_pages: pages.len(),
        total_lines: pages.iter().map(|p| p.line_count).sum(),
        total_cells: pages.iter().map(|p| p.char_count).sum(),
        unsupported_chars: diag.unsupported_total,
        contraction_hits: diag.contraction_hits,
        format_duration_ms,
        encode_duration_ms,
        layout_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Transcription complete: {} pages, {} cells, {}ms total",
        stats.total_pages, stats.total_cells, stats.total_duration_ms
    );

    Ok(BrailleDocument {
        grade: config.grade,
        pagination: PaginationSummary {
            total_pages: pages.len(),
            chars_per_page: config.line_width * config.lines_per_page,
            lines_per_page: config.lines_per_page,
        },
        pages,
        formatted,
        layout,
        warnings,
        stats,
    })
}

/// Transcribe text and write the Braille output directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files. The file
/// holds Unicode Braille lines joined with `\n`, pages separated by a form
/// feed.
pub fn transcribe_to_file(
    text: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &BrailleConfig,
) -> Result<TranscriptionStats, BrailleError> {
    let document = transcribe(text, config)?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| BrailleError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
    }

    let tmp_path = path.with_extension("brl.tmp");
    std::fs::write(&tmp_path, document.braille_text()).map_err(|e| {
        BrailleError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    std::fs::rename(&tmp_path, path).map_err(|e| BrailleError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(document.stats)
}
