//! OLS trendline generation and hover annotation.
//!
//! The regression itself is a black box producing slope/intercept/R² and a
//! fitted line; its trace carries a fixed library-format hover string. The
//! one place that text-parses statistics back out of that string is
//! [`extract_equation`] - everything else consumes the typed [`OlsFit`].

use std::sync::OnceLock;

use log::warn;
use regex::Regex;

/// Hover text of a regression trace for which no fit could be produced.
pub const EMPTY_ANNOTATION: &str = "<extra></extra>";

/// Slope/intercept/R² of an ordinary-least-squares fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OlsFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// A generated regression trace before it is folded into a figure.
#[derive(Debug, Clone)]
pub struct RegressionLine {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub hover_template: String,
    pub name: String,
    pub show_legend: bool,
}

/// Fit y = slope * x + intercept over the finite pairs of `x`/`y`.
///
/// Returns `None` for degenerate input: fewer than two finite pairs, or zero
/// x-variance.
pub fn fit(x: &[f64], y: &[f64]) -> Option<OlsFit> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| (*a, *b))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;
    let sxx = pairs.iter().map(|(a, _)| (a - mean_x).powi(2)).sum::<f64>();
    if sxx == 0.0 {
        return None;
    }
    let sxy = pairs
        .iter()
        .map(|(a, b)| (a - mean_x) * (b - mean_y))
        .sum::<f64>();

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let ss_tot = pairs.iter().map(|(_, b)| (b - mean_y).powi(2)).sum::<f64>();
    let ss_res = pairs
        .iter()
        .map(|(a, b)| (b - (slope * a + intercept)).powi(2))
        .sum::<f64>();
    let r_squared = if ss_tot == 0.0 {
        1.0
    } else {
        1.0 - ss_res / ss_tot
    };

    Some(OlsFit {
        slope,
        intercept,
        r_squared,
    })
}

/// Generate the regression trace for the given points.
///
/// The hover string follows the library format the annotator expects:
/// equation and R² between `<br>` delimiters. Degenerate input yields an
/// empty line whose hover equals [`EMPTY_ANNOTATION`].
pub fn regression_line(x: &[f64], y: &[f64], x_name: &str, y_name: &str) -> RegressionLine {
    match fit(x, y) {
        Some(ols) => {
            let mut xs: Vec<f64> = x
                .iter()
                .zip(y)
                .filter(|(a, b)| a.is_finite() && b.is_finite())
                .map(|(a, _)| *a)
                .collect();
            xs.sort_by(|a, b| a.total_cmp(b));
            let ys: Vec<f64> = xs.iter().map(|v| ols.slope * v + ols.intercept).collect();
            let hover_template = format!(
                "<b>OLS trendline</b><br>{y_name} = {:.4} * {x_name} + {:.4}<br>\
                 R<sup>2</sup>={:.4}<br><br>{y_name}=%{{y}}<br>{x_name}=%{{x}}<extra></extra>",
                ols.slope, ols.intercept, ols.r_squared
            );
            RegressionLine {
                x: xs,
                y: ys,
                hover_template,
                name: String::new(),
                show_legend: false,
            }
        }
        None => RegressionLine {
            x: Vec::new(),
            y: Vec::new(),
            hover_template: EMPTY_ANNOTATION.to_string(),
            name: String::new(),
            show_legend: false,
        },
    }
}

fn equation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new("<br>(.+)<br>R.+=([0-9.]+)<br>").expect("equation pattern compiles")
    })
}

/// Pull (equation, R²) out of a library-format hover string.
///
/// This is the narrow adapter for the fixed upstream hover format; no other
/// code text-parses regression statistics.
pub fn extract_equation(hover: &str) -> Option<(String, String)> {
    let caps = equation_pattern().captures(hover)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

/// Rewrite the regression trace's hover text into the stylized annotation and
/// force it to be a named, legend-visible trace.
///
/// The hover is only rewritten when the equation and R² can be extracted; the
/// exact [`EMPTY_ANNOTATION`] sentinel means no regression could be fit
/// (fewer than two points, or degenerate input) and is skipped silently.
/// `x_unit` is appended to the hovered x value (e.g. `" mm"`).
pub fn annotate(line: &mut RegressionLine, x_unit: &str) {
    if line.hover_template != EMPTY_ANNOTATION {
        match extract_equation(&line.hover_template) {
            Some((equation, r2)) => {
                line.hover_template = format!(
                    "<b>OLS trendline</b><br><i>{equation}</i><br>\
                     <i>R<sup>2</sup>: {r2}</i><br><b>%{{y}} mm</b> (trend)<br>\
                     <i>%{{x}}{x_unit}</i><extra></extra>"
                );
            }
            None => {
                // Unexpected upstream format; keep the hover as-is.
                warn!(
                    "regression hover text did not match the equation pattern: {}",
                    line.hover_template
                );
            }
        }
    }
    line.name = "trendline".to_string();
    line.show_legend = true;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_recovers_a_perfect_line() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [3.0, 5.0, 7.0, 9.0];
        let ols = fit(&x, &y).unwrap();
        assert!((ols.slope - 2.0).abs() < 1e-12);
        assert!((ols.intercept - 1.0).abs() < 1e-12);
        assert!((ols.r_squared - 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_input_has_no_fit() {
        assert!(fit(&[1.0], &[2.0]).is_none());
        assert!(fit(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).is_none());
        assert!(fit(&[1.0, f64::NAN], &[2.0, 3.0]).is_none());
    }

    #[test]
    fn extraction_matches_the_fixed_pattern() {
        let (equation, r2) = extract_equation("<br>y=2x+1<br>R^2=0.95<br>").unwrap();
        assert_eq!(equation, "y=2x+1");
        assert_eq!(r2, "0.95");
        assert!(extract_equation(EMPTY_ANNOTATION).is_none());
    }

    #[test]
    fn annotate_rewrites_only_fitted_lines() {
        let mut fitted = regression_line(&[1.0, 2.0, 3.0], &[3.0, 5.0, 7.0], "number", "sum");
        annotate(&mut fitted, "");
        assert!(fitted.hover_template.contains("<b>OLS trendline</b>"));
        assert!(fitted.hover_template.contains("<i>sum = 2.0000 * number + 1.0000</i>"));
        assert!(fitted.hover_template.contains("R<sup>2</sup>: 1.0000"));
        assert_eq!(fitted.name, "trendline");
        assert!(fitted.show_legend);

        let mut empty = regression_line(&[1.0], &[1.0], "x", "y");
        annotate(&mut empty, " mm");
        assert_eq!(empty.hover_template, EMPTY_ANNOTATION);
        assert_eq!(empty.name, "trendline");
    }
}
