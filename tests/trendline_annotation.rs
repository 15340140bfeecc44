use rainviz_rs::viz::trendline::{self, EMPTY_ANNOTATION};

#[test]
fn extracts_equation_and_r2_from_the_fixed_pattern() {
    let (equation, r2) = trendline::extract_equation("<br>y=2x+1<br>R^2=0.95<br>").unwrap();
    assert_eq!(equation, "y=2x+1");
    assert_eq!(r2, "0.95");
}

#[test]
fn sentinel_hover_is_left_untouched() {
    let mut line = trendline::regression_line(&[1.0], &[5.0], "x", "y");
    assert_eq!(line.hover_template, EMPTY_ANNOTATION);
    trendline::annotate(&mut line, "");
    assert_eq!(line.hover_template, EMPTY_ANNOTATION);
}

#[test]
fn generated_hover_round_trips_through_the_annotator() {
    // y = 2x + 1 fits exactly.
    let mut line = trendline::regression_line(
        &[1.0, 2.0, 3.0, 4.0],
        &[3.0, 5.0, 7.0, 9.0],
        "number",
        "sum",
    );
    assert!(line.hover_template.contains("R<sup>2</sup>=1.0000"));

    trendline::annotate(&mut line, "");
    assert!(line.hover_template.starts_with("<b>OLS trendline</b>"));
    assert!(line.hover_template.contains("<i>sum = 2.0000 * number + 1.0000</i>"));
    assert!(line.hover_template.contains("<i>R<sup>2</sup>: 1.0000</i>"));
    assert!(line.hover_template.contains("%{y} mm</b> (trend)"));
    assert_eq!(line.name, "trendline");
    assert!(line.show_legend);
}

#[test]
fn annotator_appends_the_x_unit() {
    let mut line =
        trendline::regression_line(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0], "STA A", "y");
    trendline::annotate(&mut line, " mm");
    assert!(line.hover_template.contains("<i>%{x} mm</i>"));
}

#[test]
fn fitted_line_covers_the_finite_points_in_order() {
    let line = trendline::regression_line(
        &[3.0, 1.0, f64::NAN, 2.0],
        &[7.0, 3.0, 1.0, 5.0],
        "x",
        "y",
    );
    assert_eq!(line.x, vec![1.0, 2.0, 3.0]);
    assert_eq!(line.y, vec![3.0, 5.0, 7.0]);
}
