use rainviz_rs::models::Period;
use rainviz_rs::viz::guard::{
    self, RenderDecision, SUMMARY_CELL_THRESHOLD, XAXIS_LENGTH_THRESHOLD,
};

#[test]
fn within_both_thresholds_always_renders() {
    for period in [Period::Daily, Period::Biweekly, Period::Monthly, Period::Yearly] {
        assert_eq!(
            guard::decide(SUMMARY_CELL_THRESHOLD, XAXIS_LENGTH_THRESHOLD, period),
            RenderDecision::Render,
            "cell/index counts at the threshold must render for {period:?}"
        );
    }
}

#[test]
fn oversized_cells_trigger_the_placeholder_unless_yearly() {
    assert_eq!(
        guard::decide(SUMMARY_CELL_THRESHOLD + 1, 10, Period::Daily),
        RenderDecision::Placeholder
    );
    assert_eq!(
        guard::decide(SUMMARY_CELL_THRESHOLD + 1, 10, Period::Monthly),
        RenderDecision::Placeholder
    );
    assert_eq!(
        guard::decide(SUMMARY_CELL_THRESHOLD + 1, 10, Period::Yearly),
        RenderDecision::Render
    );
}

#[test]
fn long_index_triggers_the_placeholder_unless_yearly() {
    assert_eq!(
        guard::decide(10, XAXIS_LENGTH_THRESHOLD + 1, Period::Biweekly),
        RenderDecision::Placeholder
    );
    assert_eq!(
        guard::decide(10, XAXIS_LENGTH_THRESHOLD + 1, Period::Yearly),
        RenderDecision::Render
    );
}

#[test]
fn threshold_values_are_fixed() {
    // (367 * 8) / 2 and 12 * 2 * 5: changing either silently changes which
    // dashboards fall back to the placeholder.
    assert_eq!(SUMMARY_CELL_THRESHOLD, 1468);
    assert_eq!(XAXIS_LENGTH_THRESHOLD, 120);
}
