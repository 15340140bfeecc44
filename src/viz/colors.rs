//! Positional color assignment for flattened trace lists.

use crate::theme::ChartTheme;

/// Reserved color of the derived filler ("border") bar in stacked figures.
pub const FILLER_COLOR: &str = "darkgray";

/// Build the color list for `n_groups` logical groups whose traces repeat
/// `multiplier` times in the flattened, row-major trace list.
///
/// The base list is a prefix of the theme colorway when it is long enough,
/// otherwise the colorway cycled round-robin to `n_groups`. The base is then
/// concatenated `multiplier` times so that group `i` receives the same color
/// in every repetition (e.g. the max row and the sum row of one station).
pub fn assign(theme: &ChartTheme, n_groups: usize, multiplier: usize) -> Vec<String> {
    let base: Vec<String> = if n_groups <= theme.colorway.len() {
        theme.colorway[..n_groups].to_vec()
    } else {
        theme
            .colorway
            .iter()
            .cycle()
            .take(n_groups)
            .cloned()
            .collect()
    };

    let mut colors = Vec::with_capacity(n_groups * multiplier);
    for _ in 0..multiplier {
        colors.extend_from_slice(&base);
    }
    colors
}

/// Fixed three-color palette of the stacked rain/dry figure, repeated once
/// per station row: wet days, dry days, then the filler bar.
///
/// This is an override, not an instance of the cycling rule above.
pub fn rain_dry_palette(theme: &ChartTheme, rows: usize) -> Vec<String> {
    let triple = [
        theme.color(0).to_string(),
        theme.color(1).to_string(),
        FILLER_COLOR.to_string(),
    ];
    let mut colors = Vec::with_capacity(3 * rows);
    for _ in 0..rows {
        colors.extend_from_slice(&triple);
    }
    colors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_taken_when_the_colorway_suffices() {
        let theme = ChartTheme::default();
        let colors = assign(&theme, 3, 2);
        assert_eq!(colors.len(), 6);
        assert_eq!(colors[..3], theme.colorway[..3]);
        assert_eq!(colors[3..], theme.colorway[..3]);
    }

    #[test]
    fn colorway_cycles_for_many_groups() {
        let theme = ChartTheme::default();
        let n = theme.colorway.len() + 2;
        let colors = assign(&theme, n, 1);
        assert_eq!(colors.len(), n);
        assert_eq!(colors[theme.colorway.len()], theme.colorway[0]);
        assert_eq!(colors[theme.colorway.len() + 1], theme.colorway[1]);
    }

    #[test]
    fn stacked_palette_reserves_the_filler_color() {
        let theme = ChartTheme::default();
        let colors = rain_dry_palette(&theme, 2);
        assert_eq!(colors.len(), 6);
        assert_eq!(colors[2], FILLER_COLOR);
        assert_eq!(colors[5], FILLER_COLOR);
        assert_eq!(colors[0], theme.colorway[0]);
        assert_eq!(colors[4], theme.colorway[1]);
    }
}
