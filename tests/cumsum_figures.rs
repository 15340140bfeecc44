use chrono::NaiveDate;
use rainviz_rs::models::{SeriesColumn, SeriesTable};
use rainviz_rs::viz;
use rainviz_rs::ChartTheme;
use serde_json::Value;

fn yearly_cumsum(columns: Vec<(&str, Vec<f64>)>) -> SeriesTable {
    let len = columns[0].1.len();
    let index: Vec<NaiveDate> = (0..len)
        .map(|i| NaiveDate::from_ymd_opt(2000 + i as i32, 1, 1).unwrap())
        .collect();
    let columns = columns
        .into_iter()
        .map(|(name, values)| SeriesColumn {
            name: name.to_string(),
            values: values.into_iter().map(Some).collect(),
        })
        .collect();
    SeriesTable::new(index, columns).unwrap()
}

fn figure_json(graph: &viz::Graph) -> Value {
    serde_json::to_value(&graph.figure).expect("figure serializes")
}

#[test]
fn cumulative_sum_plots_positions_with_year_labels_and_a_trendline() {
    // Perfectly linear cumulative sums: y = 100x + 50 over positions 1..=5.
    let table = yearly_cumsum(vec![(
        "STA A",
        vec![150.0, 250.0, 350.0, 450.0, 550.0],
    )]);
    let theme = ChartTheme::default();
    let graph = viz::cumulative_sum(&table, &theme, None).unwrap();
    assert!(!graph.static_plot);

    let v = figure_json(&graph);
    let data = v["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);

    let scatter = &data[0];
    assert_eq!(scatter["name"], "STA A");
    assert_eq!(scatter["x"][0], 1.0);
    assert_eq!(scatter["x"][4], 5.0);
    assert_eq!(scatter["mode"], "lines+markers");
    assert_eq!(scatter["line"]["dash"], "dashdot");
    assert_eq!(scatter["marker"]["size"], 12);
    assert_eq!(
        scatter["hovertemplate"],
        "STA A<br><b>%{y} mm</b><br><i>%{x}</i><extra></extra>"
    );

    let trend = &data[1];
    assert_eq!(trend["name"], "trendline");
    assert_eq!(trend["showlegend"], true);
    let hover = trend["hovertemplate"].as_str().unwrap();
    assert!(hover.starts_with("<b>OLS trendline</b>"));
    assert!(hover.contains("STA A = 100.0000 * number + 50.0000"));
    assert!(hover.contains("<i>R<sup>2</sup>: 1.0000</i>"));
    assert_eq!(trend["line"]["color"], theme.colorway[1].as_str());

    // Sequential tick positions relabeled with the index years.
    assert_eq!(v["layout"]["xaxis"]["tickvals"][0], 1.0);
    assert_eq!(v["layout"]["xaxis"]["ticktext"][0], "2000");
    assert_eq!(v["layout"]["xaxis"]["ticktext"][4], "2004");
    assert_eq!(v["layout"]["yaxis"]["tickformat"], ".0f");
}

#[test]
fn cumulative_sum_defaults_to_the_first_column() {
    let table = yearly_cumsum(vec![
        ("STA A", vec![1.0, 2.0]),
        ("STA B", vec![10.0, 20.0]),
    ]);
    let theme = ChartTheme::default();
    let graph = viz::cumulative_sum(&table, &theme, None).unwrap();
    assert_eq!(figure_json(&graph)["data"][0]["name"], "STA A");

    let graph = viz::cumulative_sum(&table, &theme, Some("STA B")).unwrap();
    assert_eq!(figure_json(&graph)["data"][0]["name"], "STA B");

    assert!(viz::cumulative_sum(&table, &theme, Some("STA X")).is_err());
}

#[test]
fn cross_correlation_uses_the_mean_of_the_other_stations() {
    let table = yearly_cumsum(vec![
        ("STA A", vec![1.0, 2.0, 3.0]),
        ("STA B", vec![2.0, 4.0, 6.0]),
        ("STA C", vec![4.0, 8.0, 12.0]),
    ]);
    let theme = ChartTheme::default();
    let graph = viz::scatter_with_trendline(&table, &theme, "STA A").unwrap();
    let v = figure_json(&graph);
    let data = v["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);

    // y = mean(STA B, STA C) = 3x for x = STA A.
    assert_eq!(data[0]["y"][0], 3.0);
    assert_eq!(data[0]["y"][2], 9.0);
    assert_eq!(data[1]["name"], "trendline");
    let hover = data[1]["hovertemplate"].as_str().unwrap();
    assert!(hover.contains("y = 3.0000 * STA A + 0.0000"));
    assert!(hover.contains("<i>%{x} mm</i>"));

    assert_eq!(
        v["layout"]["xaxis"]["title"]["text"],
        "<b>Cumulative Annual STA A (mm)</b>"
    );
    assert_eq!(v["layout"]["xaxis"]["tickformat"], ".0f");
}

#[test]
fn cross_correlation_requires_a_second_station() {
    let table = yearly_cumsum(vec![("STA A", vec![1.0, 2.0])]);
    let theme = ChartTheme::default();
    assert!(viz::scatter_with_trendline(&table, &theme, "STA A").is_err());
}
