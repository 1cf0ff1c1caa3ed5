//! Pipeline stages for text-to-Braille transcription.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. load a different contraction table) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ format ──▶ encode ──▶ paginate ──▶ layout
//! (text)    (wrap)     (cells)    (pages)      (mm coords)
//! ```
//!
//! 1. [`format`]   — normalise, detect titles and list items, wrap words to
//!    the configured line width
//! 2. [`contract`] — contraction table backends and the provider fallback
//!    chain; probed once per job, never mid-document
//! 3. [`encode`]   — map each formatted line to Braille cells, applying
//!    capital/number indicators and (Grade 2) contractions
//! 4. [`paginate`] — chunk the encoded lines into fixed-size pages
//! 5. [`layout`]   — assign millimetre coordinates to every cell for the
//!    embosser and preview renderers

pub mod contract;
pub mod encode;
pub mod format;
pub mod layout;
pub mod paginate;
