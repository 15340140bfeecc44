//! Watermark stamps for subplot rows.
//!
//! Each subplot row beyond the first receives one stamp anchored at its
//! domain center, placed at low opacity under the data. The typed plotly
//! layout has no image overlays, so the stamp is a text annotation carrying
//! the theme's watermark text; shells that want the picture variant can
//! overlay [`crate::theme::ChartTheme::watermark_source`] when
//! post-processing the figure JSON.

use plotly::common::{Anchor, Font};
use plotly::layout::Annotation;

use crate::theme::ChartTheme;

/// Build the watermark stamp for one subplot (1-based).
pub fn stamp(theme: &ChartTheme, subplot: usize) -> Annotation {
    let axis = if subplot == 1 {
        String::new()
    } else {
        subplot.to_string()
    };
    Annotation::new()
        .name("watermark")
        .text(&theme.watermark_text)
        .x_ref(&format!("x{axis} domain"))
        .y_ref(&format!("y{axis} domain"))
        .x(0.5)
        .y(0.5)
        .x_anchor(Anchor::Center)
        .y_anchor(Anchor::Middle)
        .show_arrow(false)
        .opacity(0.1)
        .font(Font::new().size(40))
}

/// Stamps for every subplot row beyond the first of a `rows`-high figure.
pub fn stamps(theme: &ChartTheme, rows: usize) -> Vec<Annotation> {
    (2..=rows).map(|n| stamp(theme, n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_row_is_left_unstamped() {
        let theme = ChartTheme::default();
        assert!(stamps(&theme, 1).is_empty());
        assert_eq!(stamps(&theme, 3).len(), 2);
    }

    #[test]
    fn stamp_anchors_to_the_subplot_domain() {
        let theme = ChartTheme::default();
        let json = serde_json::to_value(stamp(&theme, 2)).unwrap();
        assert_eq!(json["xref"], "x2 domain");
        assert_eq!(json["yref"], "y2 domain");
        assert_eq!(json["opacity"], 0.1);
    }
}
