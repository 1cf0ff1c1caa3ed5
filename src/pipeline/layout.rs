//! Physical embosser layout: pages of cells → millimetre coordinates.
//!
//! Pure arithmetic, no I/O. The produced [`DocumentLayout`] is consumed
//! identically by a PDF renderer (vector drawing of preview dots) and a
//! machine-control-code renderer (embossing head coordinates); neither may
//! recompute pagination or wrapping — this stage is the single source of
//! physical truth.
//!
//! The constants follow standard interpoint Braille geometry: 6.0 mm
//! between cell origins, 10.0 mm between line baselines, 2.5 mm between the
//! two dot columns (and between dot rows) inside one cell, 1.44 mm dot
//! diameter.

use crate::output::BraillePage;
use serde::{Deserialize, Serialize};

/// Named physical paper preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperFormat {
    /// 11.5 in × 11 in US Braille paper (default). Fits the standard
    /// 40-cell × 25-line page.
    #[default]
    Standard,
    /// 8.5 in × 11 in letter paper (roughly 31 cells wide).
    Letter,
    /// 210 mm × 297 mm A4 paper (roughly 30 cells wide).
    A4,
}

impl PaperFormat {
    /// Expand the preset into its physical constants.
    pub fn spec(self) -> PaperSpec {
        match self {
            PaperFormat::Standard => PaperSpec::new(self, 292.1, 279.4),
            PaperFormat::Letter => PaperSpec::new(self, 215.9, 279.4),
            PaperFormat::A4 => PaperSpec::new(self, 210.0, 297.0),
        }
    }
}

impl std::str::FromStr for PaperFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" | "braille" => Ok(PaperFormat::Standard),
            "letter" => Ok(PaperFormat::Letter),
            "a4" => Ok(PaperFormat::A4),
            other => Err(format!(
                "Unknown paper format '{other}' (expected: standard, letter, a4)"
            )),
        }
    }
}

/// Physical constants of one paper format, all in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaperSpec {
    pub format: PaperFormat,
    pub width_mm: f64,
    pub height_mm: f64,
    /// Margin on every edge. Half an inch — the clamp zone of common
    /// embossers.
    pub margin_mm: f64,
    /// Horizontal distance between cell origins.
    pub cell_pitch_mm: f64,
    /// Vertical distance between line baselines.
    pub line_pitch_mm: f64,
    /// Distance between the two dot columns (and between dot rows) within
    /// one cell.
    pub dot_pitch_mm: f64,
    pub dot_diameter_mm: f64,
}

impl PaperSpec {
    fn new(format: PaperFormat, width_mm: f64, height_mm: f64) -> Self {
        Self {
            format,
            width_mm,
            height_mm,
            margin_mm: 12.7,
            cell_pitch_mm: 6.0,
            line_pitch_mm: 10.0,
            dot_pitch_mm: 2.5,
            dot_diameter_mm: 1.44,
        }
    }

    /// How many cells fit on one physical line.
    pub fn cell_capacity(&self) -> usize {
        ((self.width_mm - 2.0 * self.margin_mm) / self.cell_pitch_mm).floor() as usize
    }

    /// How many lines fit on one physical page.
    pub fn line_capacity(&self) -> usize {
        ((self.height_mm - 2.0 * self.margin_mm) / self.line_pitch_mm).floor() as usize
    }
}

impl Default for PaperSpec {
    fn default() -> Self {
        PaperFormat::Standard.spec()
    }
}

/// Position of one cell on a line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellLayout {
    /// 0-indexed column on the line (spaces included, so the preview
    /// renderer can draw shadow cells).
    pub column: usize,
    /// Left edge of the cell from the paper's left edge.
    pub x_mm: f64,
}

/// Position of one line on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineLayout {
    /// 0-indexed row on the page.
    pub row: usize,
    /// Baseline (top dot row) from the paper's top edge.
    pub baseline_y_mm: f64,
    pub cells: Vec<CellLayout>,
}

/// Layout of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_number: usize,
    pub lines: Vec<LineLayout>,
}

/// Layout of the whole document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentLayout {
    pub paper: PaperSpec,
    pub pages: Vec<PageLayout>,
}

/// Compute per-cell physical coordinates for every page.
pub fn layout_document(pages: &[BraillePage], paper: &PaperSpec) -> DocumentLayout {
    DocumentLayout {
        paper: *paper,
        pages: pages.iter().map(|p| layout_page(p, paper)).collect(),
    }
}

fn layout_page(page: &BraillePage, paper: &PaperSpec) -> PageLayout {
    let lines = page
        .lines
        .iter()
        .enumerate()
        .map(|(row, line)| LineLayout {
            row,
            baseline_y_mm: paper.margin_mm + row as f64 * paper.line_pitch_mm,
            cells: (0..line.cell_count())
                .map(|column| CellLayout {
                    column,
                    x_mm: paper.margin_mm + column as f64 * paper.cell_pitch_mm,
                })
                .collect(),
        })
        .collect();
    PageLayout {
        page_number: page.page_number,
        lines,
    }
}

/// Decompose a Braille cell into physical dot offsets from the cell origin
/// (left edge, baseline).
///
/// Unicode encodes the dot pattern in the code point itself: bit *n* of
/// `cell − U+2800` is dot *n + 1*, with dots 1–3 down the left column and
/// dots 4–6 down the right. Spaces and non-Braille characters yield no
/// dots, so renderers can feed every cell through without filtering.
pub fn dot_offsets(cell: char, paper: &PaperSpec) -> Vec<(f64, f64)> {
    let code = cell as u32;
    if !(0x2800..=0x28FF).contains(&code) {
        return Vec::new();
    }
    let bits = code - 0x2800;
    (0..6)
        .filter(|dot| bits & (1 << dot) != 0)
        .map(|dot| {
            let (col, row) = (dot / 3, dot % 3);
            (
                col as f64 * paper.dot_pitch_mm,
                row as f64 * paper.dot_pitch_mm,
            )
        })
        .collect()
}
