//! Panel layout building: turns a summary table into per-row trace sets.
//!
//! All bar traces are plotted at sequential integer x positions (`0..n-1`)
//! rather than actual timestamps; the timestamp-derived labels come from the
//! tick planner. This decouples bar spacing from calendar irregularities
//! (missing days, variable month lengths).

use anyhow::{Result, bail};
use chrono::NaiveDate;
use log::debug;
use plotly::Trace;
use plotly::common::{HoverInfo, Line, Marker, Mode};
use plotly::{Bar, Scatter};

use crate::models::{Metric, SummaryTable};

/// Subplot rows are addressed through the `x`/`y` .. `x8`/`y8` axis family.
pub const MAX_SUBPLOT_ROWS: usize = 8;

fn positions(len: usize) -> Vec<f64> {
    (0..len).map(|i| i as f64).collect()
}

fn on_row(bar: Box<Bar<f64, f64>>, row: usize) -> Box<Bar<f64, f64>> {
    if row == 1 {
        bar
    } else {
        bar.x_axis(&format!("x{row}")).y_axis(&format!("y{row}"))
    }
}

/// Build the grouped max/sum trace list: one subplot row per requested
/// metric, one bar per station within each row.
///
/// Traces are returned flattened in row-major order, matching the positional
/// palette produced by [`super::colors::assign`] with
/// `multiplier = metrics.len()`.
pub fn grouped_rows(
    summary: &SummaryTable,
    metrics: &[Metric],
    palette: &[String],
) -> Result<Vec<Box<dyn Trace>>> {
    let x = positions(summary.index().len());
    let n_stations = summary.stations().len();
    let mut traces: Vec<Box<dyn Trace>> = Vec::with_capacity(metrics.len() * n_stations);

    for (row0, metric) in metrics.iter().enumerate() {
        for (col, station) in summary.stations().iter().enumerate() {
            let Some(values) = station.metrics.values(*metric) else {
                bail!("metric `{}` is not plottable as bars", metric.label());
            };
            let color = palette[row0 * n_stations + col].clone();
            let bar = Bar::new(x.clone(), values.to_vec())
                .name(&format!("{} ({})", station.name, metric.label()))
                .legend_group(&station.name)
                .legend_group_title(station.name.as_str())
                .marker(Marker::new().color(color));
            traces.push(on_row(bar, row0 + 1));
        }
    }
    debug!(
        "grouped panel: {} traces across {} rows",
        traces.len(),
        metrics.len()
    );
    Ok(traces)
}

/// Build the stacked rain/dry trace list: one subplot row per station, with
/// the station's wet and dry counts topped up by the derived filler bar.
///
/// The filler counts toward the stack height so every stack reaches the
/// station's `max(days)` ceiling, but it is excluded from tooltips and shown
/// in the legend under the station's group with an italic "(border)" label,
/// after the two real metrics.
pub fn stacked_rows(summary: &SummaryTable, palette: &[String]) -> Vec<Box<dyn Trace>> {
    let x = positions(summary.index().len());
    let mut traces: Vec<Box<dyn Trace>> = Vec::with_capacity(summary.stations().len() * 3);

    for (row0, station) in summary.stations().iter().enumerate() {
        let row = row0 + 1;
        for (slot, metric) in [Metric::NRain, Metric::NDry].into_iter().enumerate() {
            let values = station
                .metrics
                .values(metric)
                .unwrap_or_default()
                .to_vec();
            let bar = Bar::new(x.clone(), values)
                .name(&format!("{} ({})", station.name, metric.label()))
                .legend_group(&station.name)
                .legend_group_title(station.name.as_str())
                .hover_template(&format!(
                    "{}<br>{}: %{{y}}<extra></extra>",
                    station.name,
                    metric.label()
                ))
                .marker(
                    Marker::new()
                        .color(palette[row0 * 3 + slot].clone())
                        .line(Line::new().width(0.0)),
                );
            traces.push(on_row(bar, row));
        }

        let filler = Bar::new(x.clone(), station.metrics.n_left())
            .name(&format!("<i>{} (border)</i>", station.name))
            .legend_group(&station.name)
            .legend_group_title(station.name.as_str())
            .show_legend(true)
            .hover_info(HoverInfo::Skip)
            .marker(
                Marker::new()
                    .color(palette[row0 * 3 + 2].clone())
                    .opacity(1.0)
                    .line(Line::new().width(0.0)),
            );
        traces.push(on_row(filler, row));
    }
    debug!(
        "stacked panel: {} traces across {} rows",
        traces.len(),
        summary.stations().len()
    );
    traces
}

/// Maximum-rainfall events of one station within one period granularity:
/// the long-form reshape of a summary table's `max`/`max_date` columns.
#[derive(Debug, Clone)]
pub struct MaxEvents {
    pub station: String,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

/// Reshape the per-period summary tables into long form keyed by
/// (period, station), dropping buckets without a recorded event date.
///
/// Every registry station appears in every period (possibly with no events)
/// so that positional coloring stays aligned with the station order.
pub fn collect_max_events(summaries: &[SummaryTable]) -> Vec<Vec<MaxEvents>> {
    summaries
        .iter()
        .map(|summary| {
            summary
                .stations()
                .iter()
                .map(|station| {
                    let mut dates = Vec::new();
                    let mut values = Vec::new();
                    for (date, value) in station.metrics.max_date.iter().zip(&station.metrics.max)
                    {
                        if let Some(date) = date
                            && value.is_finite()
                        {
                            dates.push(*date);
                            values.push(*value);
                        }
                    }
                    MaxEvents {
                        station: station.name.clone(),
                        dates,
                        values,
                    }
                })
                .collect()
        })
        .collect()
}

/// Build the bubble trace list for the maximum-event figure: one subplot row
/// per period, one marker series per station, bubble diameter scaled so the
/// period's largest event spans `bubble_size` pixels.
pub fn bubble_rows(
    events_by_period: &[Vec<MaxEvents>],
    period_labels: &[&str],
    bubble_sizes: &[f64],
    palette: &[String],
) -> Vec<Box<dyn Trace>> {
    let mut traces: Vec<Box<dyn Trace>> = Vec::new();

    for (row0, (events, (label, bubble_size))) in events_by_period
        .iter()
        .zip(period_labels.iter().zip(bubble_sizes))
        .enumerate()
    {
        let row = row0 + 1;
        let vmax = events
            .iter()
            .flat_map(|e| e.values.iter().cloned())
            .fold(0.0, f64::max);

        for (col, series) in events.iter().enumerate() {
            let diameters: Vec<usize> = series
                .values
                .iter()
                .map(|v| {
                    if vmax > 0.0 {
                        (bubble_size * (v / vmax).sqrt()).round() as usize
                    } else {
                        0
                    }
                })
                .collect();
            let hover_text: Vec<String> = series
                .dates
                .iter()
                .zip(&series.values)
                .map(|(date, value)| format!("{}<br>{} mm", date.format("%d %B %Y"), value))
                .collect();
            let stations: Vec<String> = vec![series.station.clone(); series.dates.len()];

            let mut scatter = Scatter::new(series.dates.clone(), stations)
                .mode(Mode::Markers)
                .name(label)
                .legend_group(&series.station)
                .legend_group_title(series.station.as_str())
                .hover_template("<i>%{y}</i><br>%{text}<extra></extra>")
                .text_array(hover_text)
                .marker(
                    Marker::new()
                        .color(palette[row0 * events.len() + col].clone())
                        .size_array(diameters)
                        .line(Line::new().width(0.0)),
                );
            if row > 1 {
                scatter = scatter
                    .x_axis(&format!("x{row}"))
                    .y_axis(&format!("y{row}"));
            }
            traces.push(scatter);
        }
    }
    traces
}
