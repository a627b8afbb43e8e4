//! Partitioning a window of reference sites into conserved and variable spans.
//!
//! Classification happens in two passes:
//!
//! 1. **Marking**: every site starts out conserved. Each covered site that fails the
//!    strong-consensus test marks itself and every site within `context_size` positions on
//!    either side as variable. Marks accumulate: a site is conserved only if it lies outside
//!    the context of every disagreement in the window.
//! 2. **Run detection**: consecutive sites with the same classification are merged into
//!    maximal [`Span`]s, which therefore alternate in type and tile the window exactly.

use crate::errors::Result;
use crate::site::{ReferenceSite, SpanType};

/// A maximal run of sites sharing one classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Classification shared by every site in the span
    pub span_type: SpanType,
    /// First reference coordinate (1-based, inclusive)
    pub start: usize,
    /// Last reference coordinate (1-based, inclusive)
    pub stop: usize,
    /// Index of the span's first site in the window's site list
    pub offset: usize,
}

impl Span {
    /// Number of reference coordinates covered.
    #[must_use]
    pub fn size(&self) -> usize {
        self.stop - self.start + 1
    }

    /// Returns true if the span is conserved.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        self.span_type == SpanType::Conserved
    }

    /// The span's sites within the window it was derived from.
    #[must_use]
    pub fn sites<'a>(&self, sites: &'a [ReferenceSite]) -> &'a [ReferenceSite] {
        let end = (self.offset + self.size()).min(sites.len());
        &sites[self.offset.min(end)..end]
    }
}

/// Marks each site conserved or variable.
///
/// Returns the number of sites marked variable.
pub fn mark_sites(
    sites: &mut [ReferenceSite],
    context_size: usize,
    max_disagreeing_fraction: f64,
) -> usize {
    let n = sites.len();
    // Difference array of how many disagreement contexts cover each site.
    let mut coverage = vec![0i64; n + 1];
    for (i, site) in sites.iter().enumerate() {
        if site.is_covered() && !site.is_strongly_conserved(max_disagreeing_fraction) {
            let lo = i.saturating_sub(context_size);
            let hi = i.saturating_add(context_size).min(n - 1);
            coverage[lo] += 1;
            coverage[hi + 1] -= 1;
        }
    }

    let mut variable = 0;
    let mut running = 0i64;
    for (site, delta) in sites.iter_mut().zip(coverage) {
        running += delta;
        if running > 0 {
            site.set_classification(SpanType::Variable);
            variable += 1;
        } else {
            site.set_classification(SpanType::Conserved);
        }
    }
    variable
}

/// Merges classified sites into alternating, window-tiling spans.
///
/// An empty site list produces no spans.
///
/// # Errors
///
/// Returns [`crate::ReduceError::UnsetClassification`] if any site is unclassified.
pub fn find_spans(sites: &[ReferenceSite]) -> Result<Vec<Span>> {
    let mut spans = Vec::new();
    let Some(first) = sites.first() else {
        return Ok(spans);
    };

    let mut expected = first.classification()?;
    let mut begin = 0;
    for (i, site) in sites.iter().enumerate().skip(1) {
        if site.classification()? != expected {
            spans.push(make_span(sites, begin, i - 1, expected));
            expected = expected.opposite();
            begin = i;
        }
    }
    spans.push(make_span(sites, begin, sites.len() - 1, expected));

    Ok(spans)
}

/// Marks `sites` and returns the resulting spans.
///
/// # Errors
///
/// Propagates errors from [`find_spans`].
pub fn classify(
    sites: &mut [ReferenceSite],
    context_size: usize,
    max_disagreeing_fraction: f64,
) -> Result<Vec<Span>> {
    mark_sites(sites, context_size, max_disagreeing_fraction);
    find_spans(sites)
}

fn make_span(sites: &[ReferenceSite], first: usize, last: usize, span_type: SpanType) -> Span {
    Span { span_type, start: sites[first].position(), stop: sites[last].position(), offset: first }
}
