//! Chart theme configuration.
//!
//! The dashboard's theme registry is an external collaborator; this module
//! defines the interface it must satisfy: an ordered color cycle, a
//! translucent font-color token, and the watermark fields. The theme is an
//! explicit value passed into every builder call - there is no process-wide
//! template state.

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// Alpha substring expected inside [`ChartTheme::font_color_rgba`]; gridline
/// variants are derived by textual substitution of this token.
pub const FONT_COLOR_ALPHA: &str = "0.4";

/// Theme values consumed by the figure builders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartTheme {
    /// Ordered, non-empty color cycle for station traces.
    pub colorway: Vec<String>,
    /// Translucent font color, e.g. `"rgba(42,63,95,0.4)"`. Must contain the
    /// `"0.4"` alpha component so gridline variants can be derived from it.
    pub font_color_rgba: String,
    /// Text stamped as the per-subplot watermark.
    pub watermark_text: String,
    /// Image URI for shells that overlay a picture watermark when
    /// post-processing the figure JSON.
    pub watermark_source: String,
}

impl ChartTheme {
    /// Build a theme, validating the color cycle and the font-color token.
    pub fn new(colorway: Vec<String>, font_color_rgba: String) -> Result<Self> {
        ensure!(!colorway.is_empty(), "theme colorway must not be empty");
        ensure!(
            font_color_rgba.contains(FONT_COLOR_ALPHA),
            "font color `{font_color_rgba}` has no `{FONT_COLOR_ALPHA}` alpha component"
        );
        Ok(Self {
            colorway,
            font_color_rgba,
            ..Self::default()
        })
    }

    /// Color for the n-th logical group, cycling past the end of the colorway.
    pub fn color(&self, idx: usize) -> &str {
        &self.colorway[idx % self.colorway.len()]
    }

    /// Gridline color at a lighter alpha (`"0.2"` for grouped summaries,
    /// `"0.1"` for stacked ones).
    pub fn gridline_color(&self, alpha: &str) -> String {
        self.font_color_rgba.replace(FONT_COLOR_ALPHA, alpha)
    }
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            colorway: [
                "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692",
                "#b6e880", "#ff97ff", "#fecb52",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            font_color_rgba: "rgba(42,63,95,0.4)".to_string(),
            watermark_text: "rainviz".to_string(),
            watermark_source: "assets/watermark.png".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gridline_color_substitutes_alpha() {
        let theme = ChartTheme::default();
        assert_eq!(theme.gridline_color("0.2"), "rgba(42,63,95,0.2)");
        assert_eq!(theme.gridline_color("0.1"), "rgba(42,63,95,0.1)");
    }

    #[test]
    fn color_cycles_past_the_colorway() {
        let theme = ChartTheme::new(
            vec!["#111111".into(), "#222222".into()],
            "rgba(0,0,0,0.4)".into(),
        )
        .unwrap();
        assert_eq!(theme.color(0), "#111111");
        assert_eq!(theme.color(3), "#222222");
    }

    #[test]
    fn rejects_empty_colorway_and_opaque_font_color() {
        assert!(ChartTheme::new(vec![], "rgba(0,0,0,0.4)".into()).is_err());
        assert!(ChartTheme::new(vec!["#fff".into()], "rgb(0,0,0)".into()).is_err());
    }
}
