//! End-to-end integration tests for txt2brl.
//!
//! Everything here runs the full pipeline through the public API — no
//! network, no fixtures to download — so the whole suite runs in CI
//! unconditionally.
//!
//! Run with:
//!   cargo test --test e2e -- --nocapture

use std::io::Write;
use std::sync::Arc;
use txt2brl::{
    transcribe, transcribe_to_file, BrailleConfig, BrailleDocument, ContractionProvider, Grade,
    LineKind, NullProvider, PaperFormat, TranscriptionWarning,
};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn config(grade: Grade) -> BrailleConfig {
    BrailleConfig::builder()
        .grade(grade)
        .line_width(40)
        .lines_per_page(25)
        .build()
        .expect("valid config")
}

/// Assert the structural invariants every finished document must satisfy.
fn assert_document_invariants(doc: &BrailleDocument, context: &str) {
    assert!(!doc.pages.is_empty(), "[{context}] document has no pages");

    for (i, page) in doc.pages.iter().enumerate() {
        assert_eq!(page.page_number, i + 1, "[{context}] page numbers are 1-indexed and contiguous");
        assert_eq!(page.line_count, page.lines.len(), "[{context}] cached line_count drifted");
        assert!(
            page.line_count <= doc.pagination.lines_per_page,
            "[{context}] page {} has {} lines",
            page.page_number,
            page.line_count
        );
        let cells: usize = page.lines.iter().map(|l| l.cell_count()).sum();
        assert_eq!(page.char_count, cells, "[{context}] cached char_count drifted");
    }

    // Only the last page may be short.
    for page in &doc.pages[..doc.pages.len() - 1] {
        assert_eq!(
            page.line_count, doc.pagination.lines_per_page,
            "[{context}] non-final page {} is short",
            page.page_number
        );
    }

    // Every line fits the width and resolves its back-reference.
    for page in &doc.pages {
        for line in &page.lines {
            assert!(
                doc.source_of(line).is_some(),
                "[{context}] dangling source_line {}",
                line.source_line
            );
        }
    }

    // Output cells are Braille code points or plain spaces, nothing else
    // except deliberately passed-through unmapped characters.
    if doc.stats.unsupported_chars == 0 {
        for c in doc.braille_text().chars() {
            assert!(
                c == ' ' || c == '\n' || c == '\u{000C}' || ('\u{2800}'..='\u{28FF}').contains(&c),
                "[{context}] non-Braille output char {c:?}"
            );
        }
    }
}

fn assert_lines_fit(doc: &BrailleDocument, width: usize, context: &str) {
    for page in &doc.pages {
        for line in &page.lines {
            assert!(
                line.cell_count() <= width,
                "[{context}] line of {} cells exceeds width {width}: {:?}",
                line.cell_count(),
                line.cells
            );
        }
    }
}

// ── Title and formatting scenarios ───────────────────────────────────────────

#[test]
fn heading_paragraph_becomes_a_centred_title() {
    let text = "HELLO WORLD. This is a sample document that will be converted to braille. \
                It contains several sentences to test the line wrapping functionality.";
    let doc = transcribe(text, &config(Grade::Grade1)).expect("transcription succeeds");

    assert_document_invariants(&doc, "title scenario");
    assert_lines_fit(&doc, 40, "title scenario");
    assert_eq!(doc.stats.total_pages, 1);

    // The leading all-caps run splits off as a centred title line.
    let title = doc
        .formatted
        .iter()
        .find(|l| l.kind == LineKind::Title)
        .expect("a title line");
    assert_eq!(title.text.trim(), "HELLO WORLD.");

    // Centred: roughly equal whitespace on both sides.
    let leading = title.text.len() - title.text.trim_start().len();
    assert!(leading > 0, "title is not centred: {:?}", title.text);

    // The body still follows.
    assert!(doc
        .formatted
        .iter()
        .any(|l| l.kind == LineKind::ParagraphStart));
}

#[test]
fn paragraphs_get_a_two_cell_indent() {
    let doc = transcribe("one paragraph\n\nanother paragraph", &config(Grade::Grade1))
        .expect("transcription succeeds");

    let starts: Vec<_> = doc
        .formatted
        .iter()
        .filter(|l| l.kind == LineKind::ParagraphStart)
        .collect();
    assert_eq!(starts.len(), 2);
    for line in starts {
        assert!(line.text.starts_with("  "), "missing indent: {:?}", line.text);
    }
}

#[test]
fn list_items_keep_a_hanging_indent() {
    let text = "Shopping:\n- apples and oranges and pears and plums and grapes\n- bread";
    let doc = transcribe(text, &config(Grade::Grade1)).expect("transcription succeeds");

    let items: Vec<_> = doc
        .formatted
        .iter()
        .filter(|l| l.kind == LineKind::ListItem)
        .collect();
    assert!(items.len() >= 2, "expected list items, got {:?}", doc.formatted);
    // Continuation lines are indented past the marker.
    if let Some(cont) = items.iter().find(|l| l.text.starts_with(' ')) {
        assert!(cont.text.starts_with("  "), "weak hanging indent: {:?}", cont.text);
    }
}

// ── Pagination scenarios ─────────────────────────────────────────────────────

#[test]
fn sixty_paragraphs_fill_three_pages() {
    // 60 one-line paragraphs separated by blank lines; after blank-line
    // collapsing the document spans multiple pages of exactly 25 lines.
    let text = (0..60).map(|i| format!("item {i}")).collect::<Vec<_>>().join("\n\n");
    let doc = transcribe(&text, &config(Grade::Grade1)).expect("transcription succeeds");

    assert_document_invariants(&doc, "pagination");
    assert!(doc.stats.total_pages >= 3, "got {} pages", doc.stats.total_pages);
    assert_eq!(doc.pagination.lines_per_page, 25);
    assert_eq!(doc.pagination.chars_per_page, 40 * 25);
    assert_eq!(doc.pagination.total_pages, doc.pages.len());
}

#[test]
fn page_breaks_never_split_a_line() {
    let text = "word ".repeat(500);
    let doc = transcribe(&text, &config(Grade::Grade2)).expect("transcription succeeds");

    assert_document_invariants(&doc, "page breaks");
    // Form feeds separate pages in the flat text form.
    let breaks = doc.braille_text().matches('\u{000C}').count();
    assert_eq!(breaks, doc.pages.len() - 1);
}

// ── Width and word-splitting scenarios ───────────────────────────────────────

#[test]
fn fifty_cell_word_is_hard_split_at_the_width() {
    let text = "x".repeat(50);
    let doc = transcribe(&text, &config(Grade::Grade1)).expect("transcription succeeds");

    assert_lines_fit(&doc, 40, "hard split");
    let lines: Vec<_> = doc.pages[0].lines.iter().filter(|l| l.cell_count() > 0).collect();
    assert_eq!(lines.len(), 2, "expected exactly two fragments");
    assert_eq!(lines[0].cell_count(), 40);
    assert_eq!(lines[0].cell_count() + lines[1].cell_count(), 52); // 50 + 2-cell indent
}

#[test]
fn indicator_expansion_never_overflows_the_width() {
    // Every word needs a capital indicator, so cell count exceeds the
    // character count of the formatted line.
    let text = "Aa Bb Cc Dd Ee Ff Gg Hh Ii Jj Kk Ll Mm Nn Oo Pp Qq Rr Ss Tt";
    for width in [8, 12, 20, 40] {
        let cfg = BrailleConfig::builder()
            .grade(Grade::Grade1)
            .line_width(width)
            .build()
            .expect("valid config");
        let doc = transcribe(text, &cfg).expect("transcription succeeds");
        assert_lines_fit(&doc, width, "indicator expansion");
    }
}

#[test]
fn numbers_and_punctuation_round_out_the_width_invariant() {
    let text = "Call 555-0147 between 9:00 and 17:30 (weekdays only); ask for \"Sam\". \
                Invoice #42 totals $1,234.56 — 15% off!";
    let doc = transcribe(text, &config(Grade::Grade2)).expect("transcription succeeds");
    assert_document_invariants(&doc, "mixed content");
    assert_lines_fit(&doc, 40, "mixed content");
}

// ── Grade 2 and contraction scenarios ────────────────────────────────────────

#[test]
fn grade2_is_shorter_than_grade1() {
    let text = "The child and the mother went with the people for the knowledge \
                and the work that would have been done with them.";
    let g1 = transcribe(text, &config(Grade::Grade1)).expect("grade 1");
    let g2 = transcribe(text, &config(Grade::Grade2)).expect("grade 2");

    assert!(
        g2.stats.total_cells < g1.stats.total_cells,
        "contraction saved nothing: {} vs {}",
        g2.stats.total_cells,
        g1.stats.total_cells
    );
    assert!(g2.stats.contraction_hits > 0);
    assert_eq!(g1.stats.contraction_hits, 0);
}

#[test]
fn unavailable_table_degrades_to_grade1_with_a_warning() {
    let text = "the people said that knowledge would come with time";
    let degraded = BrailleConfig::builder()
        .grade(Grade::Grade2)
        .contraction_table("/nonexistent/table.tbl")
        .builtin_fallback(false)
        .build()
        .expect("valid config");

    let doc = transcribe(text, &degraded).expect("job still succeeds");
    assert!(doc.contraction_degraded());
    assert!(doc.warnings.iter().any(|w| matches!(
        w,
        TranscriptionWarning::ContractionFallback { actual, .. } if actual == "none"
    )));

    // Cell-for-cell identical to an explicit Grade 1 run.
    let plain = transcribe(text, &config(Grade::Grade1)).expect("grade 1");
    assert_eq!(doc.braille_text(), plain.braille_text());
    assert_eq!(doc.grade, Grade::Grade2, "requested grade is preserved");
}

#[test]
fn caller_supplied_provider_wins_over_everything() {
    let cfg = BrailleConfig::builder()
        .grade(Grade::Grade2)
        .contractions(Arc::new(NullProvider) as Arc<dyn ContractionProvider>)
        .build()
        .expect("valid config");
    let doc = transcribe("with the people", &cfg).expect("transcription succeeds");
    assert_eq!(doc.stats.contraction_hits, 0);
    assert!(!doc.contraction_degraded());
}

#[test]
fn external_table_file_is_honoured() {
    let mut table = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(table, "# custom shortforms").expect("write");
    writeln!(table, "word braille ⠃⠗⠇").expect("write");
    table.flush().expect("flush");

    let cfg = BrailleConfig::builder()
        .grade(Grade::Grade2)
        .contraction_table(table.path())
        .build()
        .expect("valid config");
    let doc = transcribe("braille", &cfg).expect("transcription succeeds");

    assert!(doc.warnings.is_empty(), "unexpected warnings: {:?}", doc.warnings);
    assert!(doc.stats.contraction_hits >= 1);
    assert!(doc.braille_text().contains("⠃⠗⠇"));
}

// ── Error scenarios ──────────────────────────────────────────────────────────

#[test]
fn empty_and_whitespace_input_is_a_fatal_error() {
    for text in ["", "   ", "\n\n\n", "\t \r\n"] {
        let err = transcribe(text, &config(Grade::Grade1)).expect_err("must fail");
        assert!(
            matches!(err, txt2brl::BrailleError::EmptyInput),
            "got {err:?} for {text:?}"
        );
    }
}

#[test]
fn too_narrow_line_width_is_rejected_at_build_time() {
    let err = BrailleConfig::builder().line_width(3).build().expect_err("must fail");
    assert!(matches!(err, txt2brl::BrailleError::LineWidthTooSmall { got: 3 }));
}

#[test]
fn unsupported_characters_warn_but_never_abort() {
    let doc = transcribe("héllo wörld 漢字", &config(Grade::Grade1)).expect("job succeeds");
    assert!(doc.stats.unsupported_chars > 0);
    assert!(doc.warnings.iter().any(|w| matches!(
        w,
        TranscriptionWarning::UnsupportedCharacters { .. }
    )));
    // Unmapped characters pass through verbatim.
    assert!(doc.braille_text().contains('é'));
    assert!(doc.braille_text().contains('漢'));
}

// ── File output ──────────────────────────────────────────────────────────────

#[test]
fn transcribe_to_file_writes_the_braille_text() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out").join("doc.brl");

    let stats = transcribe_to_file("hello world", &path, &config(Grade::Grade1))
        .expect("file transcription succeeds");
    assert!(path.exists());
    assert_eq!(stats.total_pages, 1);

    let written = std::fs::read_to_string(&path).expect("read back");
    let doc = transcribe("hello world", &config(Grade::Grade1)).expect("reference run");
    assert_eq!(written, doc.braille_text());

    // No temp file left behind.
    assert!(!path.with_extension("brl.tmp").exists());
}

// ── Layout ───────────────────────────────────────────────────────────────────

#[test]
fn layout_covers_every_page_and_stays_on_the_paper() {
    let text = "line\n\n".repeat(40);
    let doc = transcribe(&text, &config(Grade::Grade2)).expect("transcription succeeds");

    assert_eq!(doc.layout.pages.len(), doc.pages.len());
    let paper = &doc.layout.paper;
    for page in &doc.layout.pages {
        for line in &page.lines {
            assert!(line.baseline_y_mm >= paper.margin_mm);
            assert!(line.baseline_y_mm <= paper.height_mm - paper.margin_mm);
            for cell in &line.cells {
                assert!(cell.x_mm >= paper.margin_mm);
                assert!(cell.x_mm + paper.cell_pitch_mm <= paper.width_mm);
            }
        }
    }
}

#[test]
fn wide_lines_on_small_paper_raise_an_overflow_warning() {
    let cfg = BrailleConfig::builder()
        .grade(Grade::Grade1)
        .paper(PaperFormat::A4)
        .line_width(40)
        .build()
        .expect("valid config");
    let doc = transcribe("hello", &cfg).expect("job succeeds");
    assert!(doc.warnings.iter().any(|w| matches!(
        w,
        TranscriptionWarning::PaperOverflow { cells_available, .. } if *cells_available < 40
    )));
}

// ── Serialisation ────────────────────────────────────────────────────────────

#[test]
fn document_survives_a_json_round_trip() {
    let doc = transcribe("The quick brown fox. 123!", &config(Grade::Grade2))
        .expect("transcription succeeds");
    let json = serde_json::to_string(&doc).expect("serialise");
    let back: BrailleDocument = serde_json::from_str(&json).expect("deserialise");
    assert_eq!(back.braille_text(), doc.braille_text());
    assert_eq!(back.pages.len(), doc.pages.len());
    assert_eq!(back.warnings, doc.warnings);
}
