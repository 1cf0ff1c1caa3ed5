//! Grade 2 contraction backends.
//!
//! Grade 2 Braille abbreviates whole words (`the` → ⠮) and letter groups
//! (`ing` → ⠬). The tables live behind the [`ContractionProvider`] trait so
//! availability is decided **once per job**, not per character: scattering
//! "is the table loaded?" checks through the codec would make per-line
//! behaviour non-deterministic within a single document.
//!
//! Three implementations, probed most- to least-specific by
//! [`resolve_provider`]:
//!
//! 1. [`FileTables`] — an external table file (config path or the
//!    `TXT2BRL_CONTRACTION_TABLE` environment variable)
//! 2. [`BuiltinTables`] — a reduced built-in table compiled into the crate
//! 3. [`NullProvider`] — no contractions at all; Grade 2 output becomes
//!    byte-identical to Grade 1
//!
//! A failed external load is never an error: it degrades one level down and
//! records a [`TranscriptionWarning::ContractionFallback`] so the caller can
//! disclose "reduced contractions used" to the reader.

use crate::config::{BrailleConfig, Grade};
use crate::error::TranscriptionWarning;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Environment variable naming an external contraction table file.
pub const ENV_CONTRACTION_TABLE: &str = "TXT2BRL_CONTRACTION_TABLE";

/// Capability interface for Grade 2 contraction lookup.
///
/// Both lookups operate on lowercase text; capitalization indicators are the
/// codec's concern, not the table's.
pub trait ContractionProvider: Send + Sync {
    /// Short backend name, used in warnings and logs.
    fn name(&self) -> &str;

    /// Braille cells replacing the entire word, if a whole-word contraction
    /// exists. `word` carries no surrounding punctuation.
    fn whole_word(&self, word: &str) -> Option<&str>;

    /// Longest letter-group contraction matching a prefix of `rest`.
    /// Returns `(consumed_chars, cells)`.
    fn group_prefix(&self, rest: &str) -> Option<(usize, &str)>;
}

// ── Null backend ─────────────────────────────────────────────────────────

/// Backend with no contractions: every lookup misses, so Grade 2 encoding
/// collapses to per-character Grade 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProvider;

impl ContractionProvider for NullProvider {
    fn name(&self) -> &str {
        "none"
    }

    fn whole_word(&self, _word: &str) -> Option<&str> {
        None
    }

    fn group_prefix(&self, _rest: &str) -> Option<(usize, &str)> {
        None
    }
}

// ── Built-in reduced tables ──────────────────────────────────────────────

/// Whole-word contractions (lowercase word → cells).
static WORD_TABLE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Strong one-cell words
        ("and", "⠯"),
        ("for", "⠿"),
        ("of", "⠷"),
        ("the", "⠮"),
        ("with", "⠾"),
        // Shortforms
        ("about", "⠁⠃"),
        ("above", "⠁⠃⠧"),
        ("according", "⠁⠉⠉"),
        ("across", "⠁⠉⠗"),
        ("after", "⠁⠋"),
        ("afternoon", "⠁⠋⠝"),
        ("afterward", "⠁⠋⠺"),
        ("again", "⠁⠛"),
        ("against", "⠁⠛⠌"),
        ("almost", "⠁⠇⠍"),
        ("already", "⠁⠇⠗"),
        ("also", "⠁⠇"),
        ("although", "⠁⠇⠹"),
        ("altogether", "⠁⠇⠞"),
        ("always", "⠁⠇⠺"),
        ("because", "⠃⠉"),
        ("before", "⠃⠋"),
        ("behind", "⠃⠓"),
        ("below", "⠃⠇"),
        ("beneath", "⠃⠢"),
        ("beside", "⠃⠎"),
        ("between", "⠃⠞"),
        ("beyond", "⠃⠽"),
        ("braille", "⠃⠗⠇"),
        ("children", "⠡⠝"),
        ("conceive", "⠒⠉⠧"),
        ("could", "⠉⠙"),
        ("deceive", "⠙⠉⠧"),
        ("declare", "⠙⠉⠇"),
        ("either", "⠑⠊"),
        ("first", "⠋⠌"),
        ("friend", "⠋⠗"),
        ("good", "⠛⠙"),
        ("great", "⠛⠗⠞"),
        ("herself", "⠓⠻⠋"),
        ("himself", "⠓⠍⠋"),
        ("immediate", "⠊⠍⠍"),
        ("its", "⠭"),
        ("itself", "⠭⠋"),
        ("letter", "⠇⠗"),
        ("little", "⠇⠇"),
        ("much", "⠍⠡"),
        ("must", "⠍⠌"),
        ("myself", "⠍⠽⠋"),
        ("necessary", "⠝⠑⠉"),
        ("neither", "⠝⠑⠊"),
        ("oneself", "⠕⠝⠋"),
        ("ourselves", "⠳⠗⠧⠎"),
        ("paid", "⠏⠙"),
        ("perceive", "⠏⠻⠉⠧"),
        ("perhaps", "⠏⠻⠓"),
        ("quick", "⠟⠅"),
        ("receive", "⠗⠉⠧"),
        ("rejoice", "⠗⠚⠉"),
        ("said", "⠎⠙"),
        ("should", "⠩⠙"),
        ("such", "⠎⠡"),
        ("themselves", "⠹⠍⠧⠎"),
        ("through", "⠹⠗⠳"),
        ("today", "⠞⠙"),
        ("together", "⠞⠛⠗"),
        ("tomorrow", "⠞⠍"),
        ("tonight", "⠞⠝"),
        ("would", "⠺⠙"),
        ("your", "⠽⠗"),
        ("yourself", "⠽⠗⠋"),
        ("yourselves", "⠽⠗⠧⠎"),
    ])
});

/// Letter-group contractions, ordered longest-first so a linear scan
/// implements greedy longest-match.
static GROUP_TABLE: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    let mut groups = vec![
        ("with", "⠾"),
        ("the", "⠮"),
        ("and", "⠯"),
        ("for", "⠿"),
        ("ing", "⠬"),
        ("ch", "⠡"),
        ("gh", "⠣"),
        ("sh", "⠩"),
        ("th", "⠹"),
        ("wh", "⠱"),
        ("ed", "⠫"),
        ("er", "⠻"),
        ("ou", "⠳"),
        ("ow", "⠪"),
        ("st", "⠌"),
        ("ar", "⠜"),
        ("en", "⠢"),
        ("in", "⠔"),
        ("of", "⠷"),
    ];
    groups.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    groups
});

/// Reduced contraction tables compiled into the crate.
///
/// Covers the strong one-cell words, the common shortforms, and the
/// two-to-four letter groups. A certified transcription table is far larger;
/// this is the graceful middle ground when no external table is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinTables;

impl ContractionProvider for BuiltinTables {
    fn name(&self) -> &str {
        "builtin"
    }

    fn whole_word(&self, word: &str) -> Option<&str> {
        WORD_TABLE.get(word).copied()
    }

    fn group_prefix(&self, rest: &str) -> Option<(usize, &str)> {
        GROUP_TABLE
            .iter()
            .find(|(pat, _)| rest.starts_with(pat))
            .map(|(pat, cells)| (pat.chars().count(), *cells))
    }
}

// ── External table file ──────────────────────────────────────────────────

/// Contraction tables loaded from an external file.
///
/// Format: one entry per line, three whitespace-separated fields —
/// `word|group`, the lowercase pattern, and the replacement cells. Blank
/// lines and lines starting with `#` are ignored.
///
/// ```text
/// word   the   ⠮
/// group  ing   ⠬
/// ```
pub struct FileTables {
    path: String,
    words: HashMap<String, String>,
    /// Sorted longest-first for greedy matching.
    groups: Vec<(String, String)>,
}

impl FileTables {
    /// Load a table file. Entries that do not parse are skipped with a log
    /// line rather than failing the whole load; an unreadable file is an
    /// `Err` so the caller can fall back.
    pub fn load(path: &Path) -> io::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut words = HashMap::new();
        let mut groups = Vec::new();

        for (lineno, line) in raw.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next(), fields.next()) {
                (Some("word"), Some(pat), Some(cells)) => {
                    words.insert(pat.to_lowercase(), cells.to_string());
                }
                (Some("group"), Some(pat), Some(cells)) => {
                    groups.push((pat.to_lowercase(), cells.to_string()));
                }
                _ => {
                    debug!("Skipping malformed table entry at {}:{}", path.display(), lineno + 1);
                }
            }
        }

        if words.is_empty() && groups.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "table file contains no usable entries",
            ));
        }

        groups.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Ok(Self {
            path: path.display().to_string(),
            words,
            groups,
        })
    }

    /// Number of loaded entries, for logs.
    pub fn len(&self) -> usize {
        self.words.len() + self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContractionProvider for FileTables {
    fn name(&self) -> &str {
        "external"
    }

    fn whole_word(&self, word: &str) -> Option<&str> {
        self.words.get(word).map(String::as_str)
    }

    fn group_prefix(&self, rest: &str) -> Option<(usize, &str)> {
        self.groups
            .iter()
            .find(|(pat, _)| rest.starts_with(pat.as_str()))
            .map(|(pat, cells)| (pat.chars().count(), cells.as_str()))
    }
}

impl std::fmt::Debug for FileTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileTables")
            .field("path", &self.path)
            .field("words", &self.words.len())
            .field("groups", &self.groups.len())
            .finish()
    }
}

// ── Capability probe ─────────────────────────────────────────────────────

/// Resolve the contraction backend for one job, most- to least-specific.
///
/// The fallback chain lets library users and CLI users each set exactly as
/// much as they need:
///
/// 1. **Pre-built provider** (`config.contractions`) — the caller
///    constructed the backend entirely; used as-is. Useful in tests or when
///    the caller wraps tables in custom logic.
/// 2. **Config table path** (`config.contraction_table`) — an explicit
///    external table file.
/// 3. **Environment** (`TXT2BRL_CONTRACTION_TABLE`) — a table chosen at the
///    execution-environment level (shell profile, CI, container image).
/// 4. **Built-in reduced tables** — always compiled in, unless the caller
///    disabled them with `builtin_fallback(false)`.
/// 5. **Null** — pure Grade 1 behaviour.
///
/// For Grade 1 jobs the probe is skipped entirely and [`NullProvider`] is
/// returned with no warnings.
pub fn resolve_provider(
    config: &BrailleConfig,
) -> (Arc<dyn ContractionProvider>, Vec<TranscriptionWarning>) {
    let mut warnings = Vec::new();

    if config.grade == Grade::Grade1 {
        return (Arc::new(NullProvider), warnings);
    }

    // 1) User-provided backend takes priority
    if let Some(ref provider) = config.contractions {
        debug!("Using caller-supplied contraction backend '{}'", provider.name());
        return (Arc::clone(provider), warnings);
    }

    // 2) Config table path, 3) environment table path
    let external = config
        .contraction_table
        .clone()
        .map(|p| ("config", p))
        .or_else(|| {
            std::env::var(ENV_CONTRACTION_TABLE)
                .ok()
                .filter(|v| !v.is_empty())
                .map(|v| ("environment", std::path::PathBuf::from(v)))
        });

    if let Some((origin, path)) = external {
        match FileTables::load(&path) {
            Ok(tables) => {
                debug!(
                    "Loaded external contraction table from {} ({} entries, via {})",
                    path.display(),
                    tables.len(),
                    origin
                );
                return (Arc::new(tables), warnings);
            }
            Err(e) => {
                let (fallback, actual): (Arc<dyn ContractionProvider>, &str) =
                    if config.builtin_fallback {
                        (Arc::new(BuiltinTables), "builtin")
                    } else {
                        (Arc::new(NullProvider), "none")
                    };
                warn!(
                    "External contraction table '{}' unavailable ({}); degrading to '{}'",
                    path.display(),
                    e,
                    actual
                );
                warnings.push(TranscriptionWarning::ContractionFallback {
                    requested: "external".into(),
                    actual: actual.into(),
                    reason: e.to_string(),
                });
                return (fallback, warnings);
            }
        }
    }

    // 4) Built-in tables, 5) null
    if config.builtin_fallback {
        (Arc::new(BuiltinTables), warnings)
    } else {
        warnings.push(TranscriptionWarning::ContractionFallback {
            requested: "builtin".into(),
            actual: "none".into(),
            reason: "built-in tables disabled by configuration".into(),
        });
        (Arc::new(NullProvider), warnings)
    }
}
