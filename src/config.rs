//! Configuration types for text-to-Braille transcription.
//!
//! All transcription behaviour is controlled through [`BrailleConfig`],
//! built via its [`BrailleConfigBuilder`]. Keeping every knob in one struct
//! makes it trivial to share configs across threads (jobs are independent
//! and may run fully in parallel), serialise them for logging, and diff two
//! runs to understand why their outputs differ. Formatting constants are
//! never read from ambient state — they travel with the job.
//!
//! # Design choice: builder over constructor
//! A many-field constructor is unreadable and breaks on every new field.
//! The builder lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::BrailleError;
use crate::pipeline::contract::ContractionProvider;
use crate::pipeline::layout::PaperFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Braille grade: uncontracted or contracted transliteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Grade {
    /// One-to-one letter/number/punctuation transliteration.
    Grade1,
    /// Contracted Braille using whole-word and letter-group abbreviations.
    /// (default — this is what embossed books actually use)
    #[default]
    Grade2,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Grade1 => write!(f, "grade 1"),
            Grade::Grade2 => write!(f, "grade 2"),
        }
    }
}

/// Configuration for one transcription job.
///
/// Built via [`BrailleConfig::builder()`] or [`BrailleConfig::default()`].
///
/// # Example
/// ```rust
/// use txt2brl::{BrailleConfig, Grade};
///
/// let config = BrailleConfig::builder()
///     .grade(Grade::Grade1)
///     .line_width(32)
///     .lines_per_page(28)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct BrailleConfig {
    /// Braille grade. Default: [`Grade::Grade2`].
    pub grade: Grade,

    /// Maximum Braille cells per line. Range: 4–128. Default: 40.
    ///
    /// 40 cells is the width of standard US interpoint Braille paper.
    /// Indentation is budgeted out of this width, never added after
    /// wrapping, so no emitted line ever exceeds it.
    pub line_width: usize,

    /// Lines per embossed page. Default: 25 (standard Braille paper).
    pub lines_per_page: usize,

    /// Physical paper preset used by the layout stage. Default:
    /// [`PaperFormat::Standard`] (11.5 in × 11 in US Braille paper).
    pub paper: PaperFormat,

    /// Optional document title, emitted as a centered title line before the
    /// body.
    pub title: Option<String>,

    /// Pre-constructed contraction backend. Takes precedence over
    /// `contraction_table` and the environment probe.
    pub contractions: Option<Arc<dyn ContractionProvider>>,

    /// Path to an external contraction table file. Checked before the
    /// `TXT2BRL_CONTRACTION_TABLE` environment variable.
    pub contraction_table: Option<PathBuf>,

    /// Fall back to the built-in reduced tables when no external table is
    /// available. Default: true. Disabling this makes a failed external
    /// load degrade straight to Grade 1 behaviour.
    pub builtin_fallback: bool,
}

impl Default for BrailleConfig {
    fn default() -> Self {
        Self {
            grade: Grade::default(),
            line_width: 40,
            lines_per_page: 25,
            paper: PaperFormat::default(),
            title: None,
            contractions: None,
            contraction_table: None,
            builtin_fallback: true,
        }
    }
}

impl fmt::Debug for BrailleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrailleConfig")
            .field("grade", &self.grade)
            .field("line_width", &self.line_width)
            .field("lines_per_page", &self.lines_per_page)
            .field("paper", &self.paper)
            .field("title", &self.title)
            .field(
                "contractions",
                &self.contractions.as_ref().map(|p| p.name().to_string()),
            )
            .field("contraction_table", &self.contraction_table)
            .field("builtin_fallback", &self.builtin_fallback)
            .finish()
    }
}

impl BrailleConfig {
    /// Create a new builder for `BrailleConfig`.
    pub fn builder() -> BrailleConfigBuilder {
        BrailleConfigBuilder {
            config: Self::default(),
        }
    }

    /// Validate the invariants a job relies on. Called by the orchestrator
    /// before any stage runs, and by [`BrailleConfigBuilder::build`].
    pub fn validate(&self) -> Result<(), BrailleError> {
        if self.line_width < 4 {
            return Err(BrailleError::LineWidthTooSmall {
                got: self.line_width,
            });
        }
        if self.line_width > 128 {
            return Err(BrailleError::InvalidConfig(format!(
                "Line width must be ≤ 128 cells, got {}",
                self.line_width
            )));
        }
        if self.lines_per_page == 0 {
            return Err(BrailleError::InvalidConfig(
                "Lines per page must be ≥ 1".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`BrailleConfig`].
#[derive(Debug)]
pub struct BrailleConfigBuilder {
    config: BrailleConfig,
}

impl BrailleConfigBuilder {
    pub fn grade(mut self, grade: Grade) -> Self {
        self.config.grade = grade;
        self
    }

    pub fn line_width(mut self, cells: usize) -> Self {
        self.config.line_width = cells;
        self
    }

    pub fn lines_per_page(mut self, lines: usize) -> Self {
        self.config.lines_per_page = lines;
        self
    }

    pub fn paper(mut self, paper: PaperFormat) -> Self {
        self.config.paper = paper;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    pub fn contractions(mut self, provider: Arc<dyn ContractionProvider>) -> Self {
        self.config.contractions = Some(provider);
        self
    }

    pub fn contraction_table(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.contraction_table = Some(path.into());
        self
    }

    pub fn builtin_fallback(mut self, enabled: bool) -> Self {
        self.config.builtin_fallback = enabled;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BrailleConfig, BrailleError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
