//! # txt2brl
//!
//! Transcribe plain text into paginated Unicode Braille, ready for an
//! embosser or a tactile preview.
//!
//! ## Why this crate?
//!
//! Naïve character-by-character Braille converters ignore everything that
//! makes embossed output readable: fixed-width lines, page boundaries,
//! centred titles, hanging list indents, capital and number indicators, and
//! Grade 2 contractions. This crate runs the full pipeline deterministically
//! and returns a document whose physical layout (millimetre dot coordinates)
//! is computed once and shared by every renderer.
//!
//! ## Pipeline Overview
//!
//! ```text
//! text
//!  │
//!  ├─ 1. Format    normalise, detect titles/lists, wrap to line width
//!  ├─ 2. Contract  resolve the contraction backend (probed once per job)
//!  ├─ 3. Encode    letters, digits, punctuation → Braille cells + indicators
//!  ├─ 4. Paginate  chunk lines into fixed-size pages
//!  ├─ 5. Layout    assign mm coordinates to every cell and dot
//!  └─ 6. Output    BrailleDocument + warnings + per-stage stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use txt2brl::{transcribe, BrailleConfig, Grade};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BrailleConfig::builder()
//!     .grade(Grade::Grade2)
//!     .line_width(40)
//!     .lines_per_page(25)
//!     .build()?;
//! let doc = transcribe("Hello world", &config)?;
//! println!("{}", doc.braille_text());
//! eprintln!("{} pages, {} cells", doc.stats.total_pages, doc.stats.total_cells);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `txt2brl` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! txt2brl = { version = "0.3", default-features = false }
//! ```
//!
//! ## Grades
//!
//! | Grade | Meaning | Output size |
//! |-------|---------|-------------|
//! | 1 | Uncontracted: one cell per letter plus indicators | baseline |
//! | 2 | Contracted: whole-word and letter-group signs applied | ~20–30% shorter |
//!
//! Grade 2 degrades gracefully: when no contraction table is available the
//! job still succeeds, produces Grade 1 cells, and records a
//! [`TranscriptionWarning::ContractionFallback`] on the document.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod transcribe;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{BrailleConfig, BrailleConfigBuilder, Grade};
pub use error::{BrailleError, TranscriptionWarning};
pub use output::{
    BrailleDocument, BrailleLine, BraillePage, PaginationSummary, TranscriptionStats,
};
pub use pipeline::contract::{
    BuiltinTables, ContractionProvider, FileTables, NullProvider, ENV_CONTRACTION_TABLE,
};
pub use pipeline::format::{FormattedLine, LineKind};
pub use pipeline::layout::{DocumentLayout, PaperFormat, PaperSpec};
pub use transcribe::{transcribe, transcribe_to_file};
