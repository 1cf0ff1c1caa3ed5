//! Character encoding: formatted text lines → Unicode Braille cells.
//!
//! The codec is a **total** function over its input: every character
//! produces *some* output. Letters, digits, and punctuation map through the
//! standard cell tables; anything unmapped (emoji, non-Latin scripts, stray
//! control bytes) passes through unchanged and bumps a diagnostic counter.
//! Transcription must never stall on novel input — an unmapped character is
//! a counter, not an error.
//!
//! Contextual rules:
//!
//! - digits get one number sign ⠼ on each non-digit → digit transition
//! - a single capital letter gets one capital sign ⠠
//! - a word whose letters are all uppercase (two or more) gets one
//!   capitalized-word indicator ⠠⠠ instead of a sign per letter
//!
//! Indicators make encoded lines *longer* than their source text, so a
//! formatted line at the width limit can overflow once encoded. The codec
//! resolves that here — splitting at the last space cell inside the width,
//! else hard — so the cells-per-line invariant holds unconditionally and
//! no later stage re-wraps.

use crate::config::Grade;
use crate::output::BrailleLine;
use crate::pipeline::contract::ContractionProvider;
use crate::pipeline::format::{FormattedLine, LineKind};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Capital sign: prefixes a capital letter (doubled for a whole word).
pub const CAPITAL_SIGN: char = '⠠';
/// Number sign: prefixes a digit run.
pub const NUMBER_SIGN: char = '⠼';

/// Cells for `a`–`z`. Digits `1`–`9`, `0` reuse the `a`–`j` cells behind a
/// number sign.
const LETTER_CELLS: [char; 26] = [
    '⠁', '⠃', '⠉', '⠙', '⠑', '⠋', '⠛', '⠓', '⠊', '⠚', '⠅', '⠇', '⠍', '⠝', '⠕', '⠏', '⠟', '⠗',
    '⠎', '⠞', '⠥', '⠧', '⠺', '⠭', '⠽', '⠵',
];

fn letter_cell(c: char) -> Option<char> {
    c.is_ascii_lowercase()
        .then(|| LETTER_CELLS[(c as u8 - b'a') as usize])
}

fn digit_cell(c: char) -> Option<char> {
    match c {
        '1'..='9' => Some(LETTER_CELLS[(c as u8 - b'1') as usize]),
        '0' => Some(LETTER_CELLS[9]),
        _ => None,
    }
}

/// Punctuation cells. Several marks need two cells (a prefix cell plus a
/// base cell); a Braille "column" is still one `char` per cell.
static PUNCT_CELLS: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ('.', "⠲"),
        (',', "⠂"),
        ('?', "⠦"),
        ('!', "⠖"),
        (';', "⠆"),
        (':', "⠒"),
        ('-', "⠤"),
        ('(', "⠐⠣"),
        (')', "⠐⠜"),
        ('"', "⠐⠦"),
        ('\'', "⠄"),
        ('/', "⠌"),
        ('\\', "⠡"),
        ('@', "⠈⠁"),
        ('#', "⠼"),
        ('$', "⠈⠎"),
        ('%', "⠨⠴"),
        ('&', "⠈⠯"),
        ('*', "⠈⠔"),
        ('+', "⠬"),
        ('=', "⠨⠅"),
        ('<', "⠈⠣"),
        ('>', "⠈⠜"),
        ('[', "⠪"),
        (']', "⠻"),
        ('{', "⠸⠣"),
        ('}', "⠸⠜"),
        ('_', "⠨⠤"),
    ])
});

/// Per-job diagnostic counters, aggregated into the document stats.
#[derive(Debug, Default)]
pub struct EncodeDiagnostics {
    /// Total occurrences of characters with no Braille mapping.
    pub unsupported_total: usize,
    /// The distinct unmapped code points seen.
    pub unsupported_distinct: HashSet<char>,
    /// Whole-word and letter-group contractions applied.
    pub contraction_hits: usize,
}

impl EncodeDiagnostics {
    fn unsupported(&mut self, c: char) {
        self.unsupported_total += 1;
        self.unsupported_distinct.insert(c);
    }
}

/// Carries the digit context across one line so the number sign is emitted
/// once per run, not once per digit. Reset at line start: lines are the
/// deterministic unit of the pipeline.
#[derive(Debug, Default)]
struct EncodeContext {
    digit_mode: bool,
}

/// Encode one formatted line into one or more Braille lines.
///
/// Usually one line comes out; more only when capital/number indicators
/// push the cell count past `line_width` (see module docs).
pub fn encode_line(
    line: &FormattedLine,
    source_index: usize,
    grade: Grade,
    provider: &dyn ContractionProvider,
    line_width: usize,
    diag: &mut EncodeDiagnostics,
) -> Vec<BrailleLine> {
    if line.kind == LineKind::Blank {
        return vec![BrailleLine {
            cells: String::new(),
            source_line: source_index,
        }];
    }

    let mut cells = String::new();
    let mut ctx = EncodeContext::default();
    let mut word = String::new();

    for c in line.text.chars() {
        if c == ' ' {
            if !word.is_empty() {
                encode_word(&word, grade, provider, &mut ctx, &mut cells, diag);
                word.clear();
            }
            cells.push(' ');
            ctx.digit_mode = false;
        } else {
            word.push(c);
        }
    }
    if !word.is_empty() {
        encode_word(&word, grade, provider, &mut ctx, &mut cells, diag);
    }

    split_overflow(&cells, line_width)
        .into_iter()
        .map(|chunk| BrailleLine {
            cells: chunk,
            source_line: source_index,
        })
        .collect()
}

// ── Word encoding ────────────────────────────────────────────────────────

fn encode_word(
    word: &str,
    grade: Grade,
    provider: &dyn ContractionProvider,
    ctx: &mut EncodeContext,
    out: &mut String,
    diag: &mut EncodeDiagnostics,
) {
    let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    let whole_word_caps = letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase());
    if whole_word_caps {
        out.push(CAPITAL_SIGN);
        out.push(CAPITAL_SIGN);
    }

    // Split surrounding punctuation off the contractible core: tables are
    // word-boundary-aligned, so "(the)" must still contract "the".
    let chars: Vec<char> = word.chars().collect();
    let core_start = chars
        .iter()
        .position(|c| c.is_alphanumeric())
        .unwrap_or(chars.len());
    let core_end = chars
        .iter()
        .rposition(|c| c.is_alphanumeric())
        .map_or(core_start, |i| i + 1);

    encode_chars(&chars[..core_start], whole_word_caps, ctx, out, diag);
    encode_core(
        &chars[core_start..core_end],
        grade,
        provider,
        whole_word_caps,
        ctx,
        out,
        diag,
    );
    encode_chars(&chars[core_end..], whole_word_caps, ctx, out, diag);
}

fn encode_core(
    core: &[char],
    grade: Grade,
    provider: &dyn ContractionProvider,
    whole_word_caps: bool,
    ctx: &mut EncodeContext,
    out: &mut String,
    diag: &mut EncodeDiagnostics,
) {
    if core.is_empty() {
        return;
    }

    // Contractions operate on lowercase text. A capitalized word (initial
    // capital only) keeps its single capital sign in front of the
    // contraction; words with interior capitals are left uncontracted.
    let initial_cap_only = !whole_word_caps
        && core[0].is_uppercase()
        && core[1..].iter().all(|c| !c.is_uppercase());
    let contractible = grade == Grade::Grade2
        && core.iter().all(|c| c.is_ascii_alphabetic())
        && (whole_word_caps || initial_cap_only || core.iter().all(|c| !c.is_uppercase()));

    if !contractible {
        encode_chars(core, whole_word_caps, ctx, out, diag);
        return;
    }

    if initial_cap_only {
        out.push(CAPITAL_SIGN);
    }
    let lower: String = core.iter().flat_map(|c| c.to_lowercase()).collect();

    if let Some(cells) = provider.whole_word(&lower) {
        out.push_str(cells);
        diag.contraction_hits += 1;
        ctx.digit_mode = false;
        return;
    }

    // Greedy longest-match groups over the residue; anything the tables
    // miss falls back to per-character Grade 1.
    let mut rest = lower.as_str();
    while !rest.is_empty() {
        if let Some((consumed, cells)) = provider.group_prefix(rest) {
            out.push_str(cells);
            diag.contraction_hits += 1;
            ctx.digit_mode = false;
            let bytes: usize = rest.chars().take(consumed).map(char::len_utf8).sum();
            rest = &rest[bytes..];
        } else {
            let c = rest.chars().next().unwrap();
            encode_char(c, true, ctx, out, diag);
            rest = &rest[c.len_utf8()..];
        }
    }
}

fn encode_chars(
    chars: &[char],
    caps_suppressed: bool,
    ctx: &mut EncodeContext,
    out: &mut String,
    diag: &mut EncodeDiagnostics,
) {
    for &c in chars {
        encode_char(c, caps_suppressed, ctx, out, diag);
    }
}

/// Encode one character. Total: unmapped input passes through unchanged.
fn encode_char(
    c: char,
    caps_suppressed: bool,
    ctx: &mut EncodeContext,
    out: &mut String,
    diag: &mut EncodeDiagnostics,
) {
    if let Some(cell) = digit_cell(c) {
        if !ctx.digit_mode {
            out.push(NUMBER_SIGN);
            ctx.digit_mode = true;
        }
        out.push(cell);
        return;
    }
    ctx.digit_mode = false;

    match c {
        ' ' => out.push(' '),
        // Tabs expand to two spaces, carriage returns are dropped; the
        // formatter already normalises both, but the codec stays total.
        '\t' => out.push_str("  "),
        '\r' => {}
        _ => {
            if c.is_ascii_uppercase() {
                if !caps_suppressed {
                    out.push(CAPITAL_SIGN);
                }
                out.push(letter_cell(c.to_ascii_lowercase()).unwrap());
            } else if let Some(cell) = letter_cell(c) {
                out.push(cell);
            } else if let Some(cells) = PUNCT_CELLS.get(&c) {
                out.push_str(cells);
            } else {
                out.push(c);
                diag.unsupported(c);
            }
        }
    }
}

// ── Overflow splitting ───────────────────────────────────────────────────

/// Split an encoded line into width-legal chunks. Prefers the last space
/// cell inside the budget; hard-splits a spaceless run. Continuation
/// chunks are left-trimmed so indicators stay flush with the margin.
fn split_overflow(cells: &str, line_width: usize) -> Vec<String> {
    let chars: Vec<char> = cells.chars().collect();
    if chars.len() <= line_width {
        return vec![cells.to_string()];
    }

    let mut chunks = Vec::new();
    let mut rest = &chars[..];
    while rest.len() > line_width {
        let cut = rest[..line_width]
            .iter()
            .rposition(|&c| c == ' ')
            .filter(|&i| i > 0)
            .unwrap_or(line_width);
        chunks.push(rest[..cut].iter().collect::<String>());
        let mut next = cut;
        while next < rest.len() && rest[next] == ' ' {
            next += 1;
        }
        rest = &rest[next..];
    }
    if !rest.is_empty() {
        chunks.push(rest.iter().collect());
    }
    chunks
}

// ── Grade 1 decoding ─────────────────────────────────────────────────────

static REVERSE_LETTERS: Lazy<HashMap<char, char>> = Lazy::new(|| {
    LETTER_CELLS
        .iter()
        .enumerate()
        .map(|(i, &cell)| (cell, (b'a' + i as u8) as char))
        .collect()
});

static REVERSE_PUNCT: Lazy<HashMap<char, char>> = Lazy::new(|| {
    HashMap::from([
        ('⠲', '.'),
        ('⠂', ','),
        ('⠦', '?'),
        ('⠖', '!'),
        ('⠆', ';'),
        ('⠒', ':'),
        ('⠤', '-'),
        ('⠄', '\''),
    ])
});

/// Decode uncontracted Grade 1 cells back to text.
///
/// Recovers the case and digit structure of ASCII input: capital signs,
/// the capitalized-word indicator, and number signs are interpreted, and
/// the single-cell punctuation marks are reversed. Cells outside that set
/// pass through unchanged — decoding is total, like encoding.
pub fn decode_grade1(cells: &str) -> String {
    let mut out = String::with_capacity(cells.len());
    let mut chars = cells.chars().peekable();
    let mut caps_word = false;
    let mut number_mode = false;

    while let Some(c) = chars.next() {
        match c {
            CAPITAL_SIGN => {
                if chars.peek() == Some(&CAPITAL_SIGN) {
                    chars.next();
                    caps_word = true;
                } else if let Some(&next) = chars.peek() {
                    if let Some(&letter) = REVERSE_LETTERS.get(&next) {
                        chars.next();
                        out.push(letter.to_ascii_uppercase());
                    }
                }
                number_mode = false;
            }
            NUMBER_SIGN => number_mode = true,
            ' ' => {
                out.push(' ');
                caps_word = false;
                number_mode = false;
            }
            _ => {
                if let Some(&letter) = REVERSE_LETTERS.get(&c) {
                    if number_mode && letter <= 'j' {
                        let digit = if letter == 'j' {
                            '0'
                        } else {
                            (b'1' + (letter as u8 - b'a')) as char
                        };
                        out.push(digit);
                    } else {
                        number_mode = false;
                        out.push(if caps_word {
                            letter.to_ascii_uppercase()
                        } else {
                            letter
                        });
                    }
                } else if let Some(&p) = REVERSE_PUNCT.get(&c) {
                    number_mode = false;
                    out.push(p);
                } else {
                    number_mode = false;
                    out.push(c);
                }
            }
        }
    }
    out
}
