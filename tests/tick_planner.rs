use chrono::NaiveDate;
use rainviz_rs::models::Period;
use rainviz_rs::viz::ticks;

fn daily_index(len: usize) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2019, 6, 1).unwrap();
    (0..len)
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect()
}

#[test]
fn positions_and_labels_always_pair_up() {
    for len in [1, 7, 120, 121, 365] {
        let plan = ticks::plan(&daily_index(len), Period::Daily);
        assert_eq!(plan.positions.len(), plan.labels.len(), "len {len}");
    }
}

#[test]
fn short_indexes_keep_every_entry() {
    let plan = ticks::plan(&daily_index(120), Period::Daily);
    assert_eq!(plan.positions.len(), 120);
    assert_eq!(plan.positions[0], 0.0);
    assert_eq!(plan.positions[119], 119.0);
}

#[test]
fn long_indexes_are_decimated_to_ceil_half() {
    for len in [121usize, 200, 365] {
        let plan = ticks::plan(&daily_index(len), Period::Daily);
        assert_eq!(plan.positions.len(), len.div_ceil(2), "len {len}");
        assert!(
            plan.positions.windows(2).all(|w| w[0] < w[1]),
            "positions must be strictly increasing for len {len}"
        );
    }
}

#[test]
fn period_controls_the_label_format() {
    let index = vec![NaiveDate::from_ymd_opt(2020, 2, 5).unwrap()];
    assert_eq!(ticks::plan(&index, Period::Daily).labels[0], "05 Feb 2020");
    assert_eq!(ticks::plan(&index, Period::Biweekly).labels[0], "05 Feb 2020");
    assert_eq!(ticks::plan(&index, Period::Monthly).labels[0], "February 2020");
    assert_eq!(ticks::plan(&index, Period::Yearly).labels[0], "2020");
}
