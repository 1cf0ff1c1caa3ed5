//! Line formatting: reflow normalized prose into Braille-legal lines.
//!
//! Braille transcription has hard print conventions that this stage
//! enforces *before* any cell encoding happens:
//!
//! - every line fits the configured cell width, indentation included
//! - paragraphs open with a 2-cell indent; continuation lines do not
//! - titles are detected, centered, and set off with blank lines
//! - list items keep a hanging indent so wrapped text aligns under the
//!   item text, not under the marker
//! - a word longer than the width is hard-split, never dropped
//!
//! Output ordering is stable and equals input paragraph order; no
//! reordering or deduplication occurs. Each rule is independently testable.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Paragraph opening indent, budgeted out of the line width.
pub const PARAGRAPH_INDENT: &str = "  ";

/// Structural role of one formatted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    /// Centered heading line, set off with blank lines, never indented.
    Title,
    /// First line of a paragraph, carrying the 2-cell indent.
    ParagraphStart,
    /// Continuation line of a wrapped paragraph, unindented.
    ParagraphCont,
    /// List item line (first or wrapped continuation with hanging indent).
    ListItem,
    /// Empty separator line.
    Blank,
}

/// One print-convention-compliant line of pre-Braille text.
///
/// Invariant: `text.chars().count() <= line_width` — indentation is part of
/// `text` and counted against the width budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedLine {
    pub kind: LineKind,
    pub text: String,
}

impl FormattedLine {
    fn blank() -> Self {
        Self {
            kind: LineKind::Blank,
            text: String::new(),
        }
    }

    /// Visual column count (not bytes — the text may carry any Unicode).
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}

/// Recognized list markers: `-`, `*`, `•` bullets and `1.` / `1)` numbering.
static RE_LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([-*•‣⁃]|\d+[.)])\s+").unwrap());

/// Trailing sentence punctuation, which disqualifies a standalone title.
fn ends_sentence(text: &str) -> bool {
    matches!(text.chars().last(), Some('.') | Some('!') | Some('?'))
}

/// A word counts as ALL-CAPS when it contains at least one letter and no
/// lowercase letters; digits and punctuation are transparent.
fn is_caps_word(word: &str) -> bool {
    word.chars().any(|c| c.is_alphabetic()) && !word.chars().any(|c| c.is_lowercase())
}

/// Normalise raw input before structural analysis: unify line endings and
/// expand tabs to two spaces so downstream width accounting sees only
/// spaces and newlines.
pub fn normalize_input(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\t', "  ")
}

/// Reflow `text` into Braille-legal [`FormattedLine`]s at `line_width`.
///
/// Paragraphs are split on blank-line boundaries; inside a block, lines
/// carrying a list marker are treated per-line while ordinary lines merge
/// into one paragraph. An empty or whitespace-only input yields an empty
/// vector (the orchestrator turns that into a fatal error).
pub fn format_lines(text: &str, line_width: usize) -> Vec<FormattedLine> {
    let normalized = normalize_input(text);
    let mut out: Vec<FormattedLine> = Vec::new();

    for block in normalized.split("\n\n") {
        let mut paragraph: Vec<&str> = Vec::new();

        for raw_line in block.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            if RE_LIST_MARKER.is_match(line) {
                flush_paragraph(&mut out, &mut paragraph, line_width);
                emit_list_item(&mut out, line, line_width);
            } else {
                paragraph.push(line);
            }
        }
        flush_paragraph(&mut out, &mut paragraph, line_width);
        out.push(FormattedLine::blank());
    }

    collapse_blanks(out)
}

/// Format a document title supplied out-of-band (configuration, not body
/// text): uppercased, wrapped, centered, followed by a blank line.
pub fn title_lines(title: &str, line_width: usize) -> Vec<FormattedLine> {
    let upper = normalize_input(title).to_uppercase();
    let words: Vec<&str> = upper.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }
    let mut out: Vec<FormattedLine> = wrap_words(&words, line_width, line_width)
        .into_iter()
        .map(|l| centered_title(&l, line_width))
        .collect();
    out.push(FormattedLine::blank());
    out
}

// ── Paragraph classification ─────────────────────────────────────────────

fn flush_paragraph(out: &mut Vec<FormattedLine>, paragraph: &mut Vec<&str>, line_width: usize) {
    if paragraph.is_empty() {
        return;
    }
    let text = paragraph.join(" ");
    paragraph.clear();
    emit_paragraph(out, &text, line_width);
}

fn emit_paragraph(out: &mut Vec<FormattedLine>, text: &str, line_width: usize) {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return;
    }

    // Standalone title: entirely upper-case, no terminal sentence
    // punctuation, fits on one line.
    if words.iter().all(|w| is_caps_word(w))
        && !ends_sentence(text)
        && text.chars().count() <= line_width
    {
        emit_title(out, text, line_width);
        return;
    }

    // Inline heading: a leading ALL-CAPS run ending at a sentence boundary,
    // followed by mixed-case prose ("HELLO WORLD. This is..."). The caps run
    // splits off as a title; the remainder wraps as an ordinary paragraph.
    let caps_len = words.iter().take_while(|w| is_caps_word(w)).count();
    if caps_len > 0 && caps_len < words.len() {
        let prefix = words[..caps_len].join(" ");
        if ends_sentence(&prefix) && prefix.chars().count() <= line_width {
            emit_title(out, &prefix, line_width);
            emit_body(out, &words[caps_len..], line_width);
            return;
        }
    }

    emit_body(out, &words, line_width);
}

fn emit_title(out: &mut Vec<FormattedLine>, text: &str, line_width: usize) {
    out.push(FormattedLine::blank());
    out.push(centered_title(text, line_width));
    out.push(FormattedLine::blank());
}

fn centered_title(text: &str, line_width: usize) -> FormattedLine {
    let pad = line_width.saturating_sub(text.chars().count()) / 2;
    FormattedLine {
        kind: LineKind::Title,
        text: format!("{}{}", " ".repeat(pad), text),
    }
}

fn emit_body(out: &mut Vec<FormattedLine>, words: &[&str], line_width: usize) {
    let first_avail = line_width.saturating_sub(PARAGRAPH_INDENT.len());
    let lines = wrap_words(words, first_avail, line_width);
    for (i, line) in lines.into_iter().enumerate() {
        if i == 0 {
            out.push(FormattedLine {
                kind: LineKind::ParagraphStart,
                text: format!("{PARAGRAPH_INDENT}{line}"),
            });
        } else {
            out.push(FormattedLine {
                kind: LineKind::ParagraphCont,
                text: line,
            });
        }
    }
}

fn emit_list_item(out: &mut Vec<FormattedLine>, line: &str, line_width: usize) {
    let caps = RE_LIST_MARKER
        .captures(line)
        .expect("caller matched the marker");
    // Normalise marker spacing to exactly one space after the marker.
    let marker = format!("{} ", &caps[1]);
    let marker_width = marker.chars().count();
    let content = &line[caps.get(0).unwrap().end()..];

    let avail = line_width.saturating_sub(marker_width);
    let words: Vec<&str> = content.split_whitespace().collect();
    let hanging = " ".repeat(marker_width);

    for (i, wrapped) in wrap_words(&words, avail, avail).into_iter().enumerate() {
        let text = if i == 0 {
            format!("{marker}{wrapped}")
        } else {
            format!("{hanging}{wrapped}")
        };
        out.push(FormattedLine {
            kind: LineKind::ListItem,
            text,
        });
    }
}

// ── Word wrapping ────────────────────────────────────────────────────────

/// Greedy word wrap with distinct budgets for the first and continuation
/// lines. A single word longer than its budget is hard-split at the width
/// boundary — never silently dropped.
fn wrap_words(words: &[&str], first_avail: usize, cont_avail: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    let avail = |lines: &Vec<String>| {
        if lines.is_empty() {
            first_avail.max(1)
        } else {
            cont_avail.max(1)
        }
    };

    for word in words {
        let mut word_chars: Vec<char> = word.chars().collect();

        // Hard-split oversized words.
        while word_chars.len() > avail(&lines) {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            let budget = avail(&lines);
            let head: String = word_chars.drain(..budget).collect();
            lines.push(head);
        }

        let word_width = word_chars.len();
        if word_width == 0 {
            continue;
        }
        let sep = usize::from(!current.is_empty());
        if current_width + sep + word_width > avail(&lines) {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_width += 1;
        }
        current.extend(word_chars.iter());
        current_width += word_width;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Collapse runs of blank lines to one and strip blanks from both ends of
/// the document.
fn collapse_blanks(lines: Vec<FormattedLine>) -> Vec<FormattedLine> {
    let mut out: Vec<FormattedLine> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.kind == LineKind::Blank
            && matches!(out.last(), None | Some(FormattedLine { kind: LineKind::Blank, .. }))
        {
            continue;
        }
        out.push(line);
    }
    while matches!(out.last(), Some(l) if l.kind == LineKind::Blank) {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widths_ok(lines: &[FormattedLine], width: usize) {
        for l in lines {
            assert!(
                l.width() <= width,
                "line exceeds width {}: {:?}",
                width,
                l
            );
        }
    }

    #[test]
    fn empty_input_yields_no_lines() {
        assert!(format_lines("", 40).is_empty());
        assert!(format_lines("  \n\n  \n", 40).is_empty());
    }

    #[test]
    fn paragraph_first_line_is_indented() {
        let lines = format_lines("The quick brown fox jumps over the lazy dog near the river bank today.", 40);
        widths_ok(&lines, 40);
        assert_eq!(lines[0].kind, LineKind::ParagraphStart);
        assert!(lines[0].text.starts_with(PARAGRAPH_INDENT));
        assert_eq!(lines[1].kind, LineKind::ParagraphCont);
        assert!(!lines[1].text.starts_with(' '));
    }

    #[test]
    fn standalone_caps_block_becomes_title() {
        let lines = format_lines("CHAPTER ONE\n\nIt was a dark night.", 40);
        assert_eq!(lines[0].kind, LineKind::Title);
        assert!(lines[0].text.trim() == "CHAPTER ONE");
        // Centered: (40 - 11) / 2 = 14 leading spaces.
        assert!(lines[0].text.starts_with(&" ".repeat(14)));
        assert_eq!(lines[1].kind, LineKind::Blank);
        assert_eq!(lines[2].kind, LineKind::ParagraphStart);
    }

    #[test]
    fn inline_caps_heading_splits_off() {
        let lines = format_lines(
            "HELLO WORLD. This is a test sentence that is definitely longer than forty characters wide.",
            40,
        );
        widths_ok(&lines, 40);
        assert_eq!(lines[0].kind, LineKind::Title);
        assert_eq!(lines[0].text.trim(), "HELLO WORLD.");
        assert_eq!(lines[1].kind, LineKind::Blank);
        assert_eq!(lines[2].kind, LineKind::ParagraphStart);
        assert!(lines[2].text.starts_with("  This"));
    }

    #[test]
    fn caps_sentence_without_following_prose_is_a_paragraph() {
        // Terminal punctuation disqualifies the standalone-title rule.
        let lines = format_lines("STOP RIGHT THERE.", 40);
        assert_eq!(lines[0].kind, LineKind::ParagraphStart);
    }

    #[test]
    fn long_caps_paragraph_is_not_a_title() {
        let caps = "A VERY LONG SHOUTED PARAGRAPH THAT GOES WELL PAST THE WIDTH LIMIT";
        let lines = format_lines(caps, 40);
        widths_ok(&lines, 40);
        assert!(lines.iter().all(|l| l.kind != LineKind::Title));
    }

    #[test]
    fn list_items_get_hanging_indent() {
        let lines = format_lines(
            "- first item with enough words to wrap past the configured width limit\n- second",
            30,
        );
        widths_ok(&lines, 30);
        assert_eq!(lines[0].kind, LineKind::ListItem);
        assert!(lines[0].text.starts_with("- first"));
        assert_eq!(lines[1].kind, LineKind::ListItem);
        assert!(lines[1].text.starts_with("  "), "hanging indent expected");
        assert!(!lines[1].text.starts_with("- "));
        assert!(lines.iter().any(|l| l.text.starts_with("- second")));
    }

    #[test]
    fn numbered_list_marker_width_sets_hang() {
        let lines = format_lines(
            "12. a numbered item long enough that its continuation must wrap somewhere",
            30,
        );
        widths_ok(&lines, 30);
        assert!(lines[0].text.starts_with("12. "));
        // Continuation aligns under the item text: 4 columns ("12. ").
        assert!(lines[1].text.starts_with("    "));
        assert_eq!(lines[1].text.chars().take_while(|c| *c == ' ').count(), 4);
    }

    #[test]
    fn oversized_word_is_hard_split() {
        let word = "x".repeat(50);
        let lines = format_lines(&word, 40);
        widths_ok(&lines, 40);
        let total: usize = lines
            .iter()
            .map(|l| l.text.trim_start().chars().count())
            .sum();
        assert_eq!(total, 50, "no characters may be lost");
        assert_eq!(lines.len(), 2);
        // Indent budgets the first line to 38 usable columns.
        assert_eq!(lines[0].width(), 40);
    }

    #[test]
    fn blank_runs_collapse() {
        let lines = format_lines("one\n\n\n\n\ntwo", 40);
        let blanks = lines.iter().filter(|l| l.kind == LineKind::Blank).count();
        assert_eq!(blanks, 1);
        assert_ne!(lines.first().unwrap().kind, LineKind::Blank);
        assert_ne!(lines.last().unwrap().kind, LineKind::Blank);
    }

    #[test]
    fn title_lines_uppercase_and_center() {
        let lines = title_lines("My report", 40);
        assert_eq!(lines[0].kind, LineKind::Title);
        assert_eq!(lines[0].text.trim(), "MY REPORT");
        assert_eq!(lines.last().unwrap().kind, LineKind::Blank);
    }

    #[test]
    fn crlf_and_tabs_are_normalized() {
        let lines = format_lines("alpha\r\nbeta\tgamma", 40);
        widths_ok(&lines, 40);
        assert!(lines[0].text.contains("alpha beta"));
        assert!(!lines.iter().any(|l| l.text.contains('\t')));
    }
}
