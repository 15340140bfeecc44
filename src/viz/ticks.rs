//! Axis tick planning: sequential positions with period-formatted labels.
//!
//! Traces are plotted against sequential integer x positions rather than raw
//! dates, so irregular calendar gaps do not distort bar spacing; the
//! timestamp-derived labels produced here are attached separately.

use chrono::NaiveDate;

use super::guard::XAXIS_LENGTH_THRESHOLD;
use crate::models::Period;

/// Planned tick positions and display labels for one x-axis.
#[derive(Debug, Clone, PartialEq)]
pub struct TickPlan {
    /// Zero-based sequential positions, strictly increasing.
    pub positions: Vec<f64>,
    /// One display label per position.
    pub labels: Vec<String>,
}

fn label_format(period: Period) -> &'static str {
    match period {
        Period::Yearly => "%Y",
        Period::Monthly => "%B %Y",
        // Daily formatting is also the fallback for biweekly buckets.
        Period::Daily | Period::Biweekly => "%d %b %Y",
    }
}

/// Plan ticks for a time index.
///
/// Indexes up to [`XAXIS_LENGTH_THRESHOLD`] entries get one tick per entry;
/// longer indexes are decimated to every second entry to keep label density
/// readable at chart width.
pub fn plan(index: &[NaiveDate], period: Period) -> TickPlan {
    let fmt = label_format(period);
    let stride = if index.len() <= XAXIS_LENGTH_THRESHOLD {
        1
    } else {
        2
    };

    let mut positions = Vec::with_capacity(index.len().div_ceil(stride));
    let mut labels = Vec::with_capacity(positions.capacity());
    for (pos, date) in index.iter().enumerate().step_by(stride) {
        positions.push(pos as f64);
        labels.push(date.format(fmt).to_string());
    }
    TickPlan { positions, labels }
}
