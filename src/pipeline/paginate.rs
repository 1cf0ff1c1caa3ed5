//! Pagination: chunk the encoded line stream into fixed-size pages.
//!
//! Greedy and deliberately simple: page *n* holds lines
//! `[(n-1)·lines_per_page, n·lines_per_page)`, 1-indexed. A line is the
//! atomic unit — no line ever spans two pages — and the final page is left
//! short rather than padded. Per-page `char_count` sums Braille cells (not
//! source characters) so UI diagnostics stay exact.

use crate::output::{BrailleLine, BraillePage};

/// Split `lines` into pages of at most `lines_per_page` lines.
///
/// `lines_per_page` is validated ≥ 1 by the configuration before the
/// pipeline runs.
pub fn paginate(lines: Vec<BrailleLine>, lines_per_page: usize) -> Vec<BraillePage> {
    let mut pages = Vec::with_capacity(lines.len().div_ceil(lines_per_page.max(1)));
    let mut current: Vec<BrailleLine> = Vec::with_capacity(lines_per_page);

    for line in lines {
        current.push(line);
        if current.len() == lines_per_page {
            push_page(&mut pages, std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        push_page(&mut pages, current);
    }
    pages
}

fn push_page(pages: &mut Vec<BraillePage>, lines: Vec<BrailleLine>) {
    let char_count = lines.iter().map(BrailleLine::cell_count).sum();
    pages.push(BraillePage {
        page_number: pages.len() + 1,
        line_count: lines.len(),
        char_count,
        lines,
    });
}
