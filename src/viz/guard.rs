//! Oversized-dataset guard: render-cost circuit breaker for summary figures.

use crate::models::Period;

/// Largest summary cell count rendered interactively.
pub const SUMMARY_CELL_THRESHOLD: usize = (367 * 8) / 2;

/// Largest time-index length rendered with one tick per entry; longer indexes
/// are also considered oversized by the guard.
pub const XAXIS_LENGTH_THRESHOLD: usize = 12 * 2 * 5;

/// Raw series tables above this cell count are always drawn as lines, never
/// bars.
pub const SERIES_CELL_THRESHOLD: usize = 366 * 8;

/// Message carried by the placeholder figure.
pub const OVERSIZED_MESSAGE: &str = "dataset above threshold";

/// Outcome of the guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderDecision {
    /// Proceed with full rendering.
    Render,
    /// Substitute a static placeholder figure.
    Placeholder,
}

/// Decide whether a summary of the given shape is safe to render.
///
/// Yearly-granularity data has already been downsampled upstream and is
/// always small enough, so it renders regardless of the raw counts. This is
/// purely a rendering-cost rule, not a correctness rule.
pub fn decide(cell_count: usize, index_len: usize, period: Period) -> RenderDecision {
    let oversized = cell_count > SUMMARY_CELL_THRESHOLD || index_len > XAXIS_LENGTH_THRESHOLD;
    if oversized && period != Period::Yearly {
        RenderDecision::Placeholder
    } else {
        RenderDecision::Render
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_match_the_documented_constants() {
        assert_eq!(SUMMARY_CELL_THRESHOLD, 1468);
        assert_eq!(XAXIS_LENGTH_THRESHOLD, 120);
    }

    #[test]
    fn small_summaries_render() {
        assert_eq!(decide(1468, 120, Period::Daily), RenderDecision::Render);
        assert_eq!(decide(1, 1, Period::Monthly), RenderDecision::Render);
    }

    #[test]
    fn oversized_non_yearly_summaries_get_the_placeholder() {
        assert_eq!(decide(1469, 10, Period::Daily), RenderDecision::Placeholder);
        assert_eq!(
            decide(10, 121, Period::Monthly),
            RenderDecision::Placeholder
        );
    }

    #[test]
    fn yearly_summaries_always_render() {
        assert_eq!(decide(10_000, 500, Period::Yearly), RenderDecision::Render);
    }
}
