//! Figure composition: turn validated tables into embeddable chart objects.
//!
//! - Raw multi-station charts: lines, stacked/grouped bars
//! - Summary figures: grouped max/sum, stacked rain/dry, maximum-event bubbles
//! - Cumulative-sum scatters with annotated OLS trendlines
//! - Oversized datasets short-circuit to a static placeholder figure
//!
//! Every entry point builds its figure from scratch and returns ownership to
//! the caller; nothing is cached or shared between calls apart from the
//! read-only [`ChartTheme`].

pub mod colors;
pub mod guard;
pub mod panels;
pub mod ticks;
pub mod trendline;
pub mod watermark;

pub use guard::RenderDecision;

use anyhow::{Result, anyhow, bail, ensure};
use plotly::common::{Anchor, DashType, Font, Line, Marker, MarkerSymbol, Mode, Title};
use plotly::layout::{
    Annotation, Axis, BarMode, DragMode, GroupClick, HoverMode, ItemSizing, Layout, Legend, Margin,
};
use plotly::{Bar, Configuration, Plot, Scatter};

use crate::models::{Metric, Period, SeriesTable, SummaryTable};
use crate::theme::ChartTheme;

/// An embeddable chart object: the composed figure plus the interactivity
/// flag the dashboard shell passes to the renderer.
pub struct Graph {
    pub figure: Plot,
    /// True for placeholder figures that must be rendered non-interactive.
    pub static_plot: bool,
}

impl Graph {
    /// Wrap a fully rendered, interactive figure.
    pub fn interactive(figure: Plot) -> Self {
        Self {
            figure,
            static_plot: false,
        }
    }

    /// Wrap a placeholder figure, marking it non-interactive.
    pub fn static_placeholder(mut figure: Plot) -> Self {
        figure.set_configuration(Configuration::new().static_plot(true));
        Self {
            figure,
            static_plot: true,
        }
    }
}

/// How raw per-station bars are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarArrangement {
    Stacked,
    Grouped,
}

fn raw_series_layout() -> Layout {
    Layout::new()
        .title(Title::with_text("<b>Rainfall Each Station</b>"))
        .x_axis(Axis::new().title(Title::with_text("<b>Date</b>")))
        .y_axis(Axis::new().title(Title::with_text("<b>Rainfall (mm)</b>")))
        .legend(Legend::new().title(Title::with_text("Stations")))
}

/// Raw multi-station line chart.
pub fn rainfall_scatter(series: &SeriesTable, theme: &ChartTheme) -> Graph {
    let mut figure = Plot::new();
    for (i, col) in series.columns().iter().enumerate() {
        figure.add_trace(
            Scatter::new(series.index().to_vec(), col.values.clone())
                .mode(Mode::Lines)
                .name(&col.name)
                .line(Line::new().color(theme.color(i).to_string())),
        );
    }
    figure.set_layout(raw_series_layout().hover_mode(HoverMode::Closest));
    Graph::interactive(figure)
}

/// Raw multi-station bar chart.
///
/// Stacked bars reverse the column order (first station ends up on top of the
/// stack) and drop the bar gap; grouped bars keep the order with a 0.2 gap.
pub fn rainfall_bars(series: &SeriesTable, arrangement: BarArrangement, theme: &ChartTheme) -> Graph {
    let columns: Vec<&crate::models::SeriesColumn> = match arrangement {
        BarArrangement::Stacked => series.columns().iter().rev().collect(),
        BarArrangement::Grouped => series.columns().iter().collect(),
    };
    let (bar_mode, bar_gap) = match arrangement {
        BarArrangement::Stacked => (BarMode::Stack, 0.0),
        BarArrangement::Grouped => (BarMode::Group, 0.2),
    };

    let mut figure = Plot::new();
    for (i, col) in columns.into_iter().enumerate() {
        figure.add_trace(
            Bar::new(series.index().to_vec(), col.values.clone())
                .name(&col.name)
                .marker(Marker::new().color(theme.color(i).to_string())),
        );
    }
    figure.set_layout(
        raw_series_layout()
            .hover_mode(HoverMode::XUnified)
            .bar_mode(bar_mode)
            .bar_gap(bar_gap),
    );
    Graph::interactive(figure)
}

/// Raw chart with the size policy applied: tables above
/// [`guard::SERIES_CELL_THRESHOLD`] cells are always drawn as lines (bars are
/// unreadable at that density), smaller ones honor the requested arrangement.
pub fn rainfall_figure(
    series: &SeriesTable,
    arrangement: Option<BarArrangement>,
    theme: &ChartTheme,
) -> Graph {
    if series.cell_count() > guard::SERIES_CELL_THRESHOLD {
        return rainfall_scatter(series, theme);
    }
    match arrangement {
        Some(arrangement) => rainfall_bars(series, arrangement, theme),
        None => rainfall_scatter(series, theme),
    }
}

/// Static placeholder figure carrying an optional message.
pub fn empty_figure(theme: &ChartTheme, text: &str, size: usize) -> Plot {
    let hidden_axis = || {
        Axis::new()
            .show_grid(false)
            .show_tick_labels(false)
            .zero_line(false)
    };
    let message = Annotation::new()
        .name("text")
        .text(&format!("<i>{text}</i>"))
        .opacity(0.3)
        .font(Font::new().size(size))
        .x_ref("x domain")
        .y_ref("y domain")
        .x(0.5)
        .y(0.05)
        .show_arrow(false);

    let mut figure = Plot::new();
    figure.add_trace(Scatter::new(Vec::<f64>::new(), Vec::<f64>::new()).show_legend(false));
    figure.set_layout(
        Layout::new()
            .x_axis(hidden_axis())
            .y_axis(hidden_axis())
            .margin(Margin::new().top(55).left(55).right(55).bottom(55))
            .annotations(vec![message, watermark::stamp(theme, 1)])
            .height(450),
    );
    figure
}

fn oversized_placeholder(theme: &ChartTheme) -> Graph {
    Graph::static_placeholder(empty_figure(theme, guard::OVERSIZED_MESSAGE, 40))
}

/// Vertical subplot domains, top row first, as (y0, y1) pairs.
fn row_domains(rows: usize, vertical_spacing: f64) -> Vec<(f64, f64)> {
    let gap = if rows > 1 { vertical_spacing } else { 0.0 };
    let height = (1.0 - gap * (rows as f64 - 1.0)) / rows as f64;
    (0..rows)
        .map(|r| {
            let top = 1.0 - r as f64 * (height + gap);
            (top - height, top)
        })
        .collect()
}

fn subplot_title_annotations(titles: &[String], domains: &[(f64, f64)]) -> Vec<Annotation> {
    titles
        .iter()
        .zip(domains)
        .map(|(text, (_, top))| {
            Annotation::new()
                .text(text.as_str())
                .x_ref("paper")
                .y_ref("paper")
                .x(0.5)
                .y(*top)
                .x_anchor(Anchor::Center)
                .y_anchor(Anchor::Bottom)
                .show_arrow(false)
                .font(Font::new().size(16))
        })
        .collect()
}

fn with_row_axes(layout: Layout, row: usize, x_axis: Axis, y_axis: Axis) -> Result<Layout> {
    Ok(match row {
        1 => layout.x_axis(x_axis).y_axis(y_axis),
        2 => layout.x_axis2(x_axis).y_axis2(y_axis),
        3 => layout.x_axis3(x_axis).y_axis3(y_axis),
        4 => layout.x_axis4(x_axis).y_axis4(y_axis),
        5 => layout.x_axis5(x_axis).y_axis5(y_axis),
        6 => layout.x_axis6(x_axis).y_axis6(y_axis),
        7 => layout.x_axis7(x_axis).y_axis7(y_axis),
        8 => layout.x_axis8(x_axis).y_axis8(y_axis),
        _ => bail!(
            "subplot figures support at most {} rows",
            panels::MAX_SUBPLOT_ROWS
        ),
    })
}

fn resolve_titles(
    subplot_titles: Option<&[&str]>,
    defaults: Vec<String>,
    rows: usize,
) -> Result<Vec<String>> {
    match subplot_titles {
        Some(titles) => {
            ensure!(
                titles.len() == rows,
                "expected {rows} subplot titles, got {}",
                titles.len()
            );
            Ok(titles.iter().map(|t| t.to_string()).collect())
        }
        None => Ok(defaults),
    }
}

fn summary_legend() -> Legend {
    Legend::new()
        .title(Title::with_text("<b>Stations</b>"))
        .group_click(GroupClick::ToggleItem)
}

/// Grouped summary figure: one subplot row per metric (defaults `max`, `sum`),
/// side-by-side bars per station within each row.
pub fn summary_maximum_sum(
    summary: &SummaryTable,
    theme: &ChartTheme,
    title: &str,
    period: Period,
) -> Result<Graph> {
    summary_maximum_sum_with(
        summary,
        theme,
        &[Metric::Max, Metric::Sum],
        None,
        title,
        period,
    )
}

/// Grouped summary figure with explicit metric rows and subplot titles.
pub fn summary_maximum_sum_with(
    summary: &SummaryTable,
    theme: &ChartTheme,
    metrics: &[Metric],
    subplot_titles: Option<&[&str]>,
    title: &str,
    period: Period,
) -> Result<Graph> {
    ensure!(!metrics.is_empty(), "at least one metric row is required");
    let rows = metrics.len();
    ensure!(
        rows <= panels::MAX_SUBPLOT_ROWS,
        "subplot figures support at most {} rows",
        panels::MAX_SUBPLOT_ROWS
    );

    if guard::decide(summary.cell_count(), summary.index().len(), period)
        == RenderDecision::Placeholder
    {
        return Ok(oversized_placeholder(theme));
    }

    let palette = colors::assign(theme, summary.stations().len(), rows);
    let traces = panels::grouped_rows(summary, metrics, &palette)?;

    let plan = ticks::plan(summary.index(), period);
    let grid = theme.gridline_color("0.2");
    let domains = row_domains(rows, 0.05);

    let mut layout = Layout::new()
        .title(Title::with_text(title))
        .bar_mode(BarMode::Group)
        .bar_gap(0.2)
        .hover_mode(HoverMode::X)
        .drag_mode(DragMode::Zoom)
        .height(800)
        .legend(summary_legend());

    for (row0, (y0, y1)) in domains.iter().enumerate() {
        let row = row0 + 1;
        let bottom = row == rows;
        let mut x_axis = Axis::new()
            .domain(&[0.0, 1.0])
            .tick_values(plan.positions.clone())
            .tick_text(plan.labels.clone())
            .grid_color(grid.clone())
            .grid_width(2)
            .show_tick_labels(bottom);
        if bottom {
            x_axis = x_axis.title(Title::with_text("<b>Date</b>"));
        }
        let y_axis = Axis::new()
            .domain(&[*y0, *y1])
            .grid_color(grid.clone())
            .grid_width(2)
            .fixed_range(true)
            .title(Title::with_text("<b>Rainfall (mm)</b>"));
        layout = with_row_axes(layout, row, x_axis, y_axis)?;
    }

    let titles = resolve_titles(
        subplot_titles,
        metrics.iter().map(|m| m.label().to_string()).collect(),
        rows,
    )?;
    let mut annotations = subplot_title_annotations(&titles, &domains);
    annotations.extend(watermark::stamps(theme, rows));
    layout = layout.annotations(annotations);

    let mut figure = Plot::new();
    figure.add_traces(traces);
    figure.set_layout(layout);
    Ok(Graph::interactive(figure))
}

/// Stacked summary figure: one subplot row per station, wet/dry day counts
/// stacked and topped up by the filler bar to the station's `max(days)`.
pub fn summary_rain_dry(
    summary: &SummaryTable,
    theme: &ChartTheme,
    title: &str,
    period: Period,
) -> Result<Graph> {
    summary_rain_dry_with(summary, theme, None, title, period)
}

/// Stacked summary figure with explicit subplot titles.
pub fn summary_rain_dry_with(
    summary: &SummaryTable,
    theme: &ChartTheme,
    subplot_titles: Option<&[&str]>,
    title: &str,
    period: Period,
) -> Result<Graph> {
    let rows = summary.stations().len();
    ensure!(
        rows <= panels::MAX_SUBPLOT_ROWS,
        "stacked figures support at most {} stations",
        panels::MAX_SUBPLOT_ROWS
    );

    if guard::decide(summary.cell_count(), summary.index().len(), period)
        == RenderDecision::Placeholder
    {
        return Ok(oversized_placeholder(theme));
    }

    let palette = colors::rain_dry_palette(theme, rows);
    let traces = panels::stacked_rows(summary, &palette);

    let plan = ticks::plan(summary.index(), period);
    let grid = theme.gridline_color("0.1");
    let domains = row_domains(rows, 0.2 / rows as f64);
    // Shared visual ceiling across every station's stack.
    let days_ceiling = summary
        .stations()
        .iter()
        .map(|s| s.metrics.days_ceiling())
        .fold(0.0, f64::max);

    let mut layout = Layout::new()
        .title(Title::with_text(title))
        .bar_mode(BarMode::Stack)
        .bar_gap(0.0)
        .hover_mode(HoverMode::X)
        .drag_mode(DragMode::Zoom)
        .height(600.max(250 * rows))
        .legend(summary_legend());

    for (row0, (y0, y1)) in domains.iter().enumerate() {
        let row = row0 + 1;
        let bottom = row == rows;
        let mut x_axis = Axis::new()
            .domain(&[0.0, 1.0])
            .tick_values(plan.positions.clone())
            .tick_text(plan.labels.clone())
            .grid_color(grid.clone())
            .grid_width(2)
            .show_tick_labels(bottom);
        if bottom {
            x_axis = x_axis.title(Title::with_text("<b>Date</b>"));
        }
        let y_axis = Axis::new()
            .domain(&[*y0, *y1])
            .range(vec![0.0, days_ceiling])
            .grid_color(grid.clone())
            .grid_width(2)
            .fixed_range(true)
            .title(Title::with_text("<b>Days</b>"));
        layout = with_row_axes(layout, row, x_axis, y_axis)?;
    }

    let titles = resolve_titles(
        subplot_titles,
        summary.station_names().map(|s| s.to_string()).collect(),
        rows,
    )?;
    let mut annotations = subplot_title_annotations(&titles, &domains);
    annotations.extend(watermark::stamps(theme, rows));
    layout = layout.annotations(annotations);

    let mut figure = Plot::new();
    figure.add_traces(traces);
    figure.set_layout(layout);
    Ok(Graph::interactive(figure))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Maximum-event bubble figure over the default biweekly/monthly/yearly
/// period tables.
pub fn summary_maximum_date(
    summaries: &[SummaryTable],
    theme: &ChartTheme,
    title: &str,
) -> Result<Graph> {
    summary_maximum_date_with(
        summaries,
        theme,
        None,
        title,
        &["biweekly", "monthly", "yearly"],
        &[10.0, 10.0, 10.0],
    )
}

/// Maximum-event bubble figure: reshapes the per-period tables into long form
/// keyed by (period, station), one subplot row per period.
pub fn summary_maximum_date_with(
    summaries: &[SummaryTable],
    theme: &ChartTheme,
    subplot_titles: Option<&[&str]>,
    title: &str,
    period_labels: &[&str],
    bubble_sizes: &[f64],
) -> Result<Graph> {
    ensure!(!summaries.is_empty(), "at least one period table is required");
    let rows = summaries.len();
    ensure!(
        rows <= panels::MAX_SUBPLOT_ROWS,
        "subplot figures support at most {} rows",
        panels::MAX_SUBPLOT_ROWS
    );
    ensure!(
        period_labels.len() == rows && bubble_sizes.len() == rows,
        "expected {rows} period labels and bubble sizes"
    );
    let registry: Vec<&str> = summaries[0].station_names().collect();
    for summary in &summaries[1..] {
        ensure!(
            summary.station_names().eq(registry.iter().cloned()),
            "period tables must share one station registry"
        );
    }

    let palette = colors::assign(theme, registry.len(), rows);
    let events = panels::collect_max_events(summaries);
    let traces = panels::bubble_rows(&events, period_labels, bubble_sizes, &palette);

    let grid = theme.gridline_color("0.1");
    let domains = row_domains(rows, 0.05);

    let mut layout = Layout::new()
        .title(Title::with_text(title))
        .height(800)
        .drag_mode(DragMode::Zoom)
        .hover_mode(HoverMode::X)
        .hover_distance(50)
        .legend(summary_legend().item_sizing(ItemSizing::Constant));

    for (row0, (y0, y1)) in domains.iter().enumerate() {
        let row = row0 + 1;
        let bottom = row == rows;
        let mut x_axis = Axis::new()
            .domain(&[0.0, 1.0])
            .grid_color(grid.clone())
            .grid_width(2)
            .show_spikes(true)
            .show_tick_labels(bottom);
        if bottom {
            x_axis = x_axis.title(Title::with_text("<b>Date</b>"));
        }
        let y_axis = Axis::new()
            .domain(&[*y0, *y1])
            .grid_color(grid.clone())
            .grid_width(2)
            .fixed_range(true)
            .title(Title::with_text("<b>Station</b>"));
        layout = with_row_axes(layout, row, x_axis, y_axis)?;
    }

    let titles = resolve_titles(
        subplot_titles,
        period_labels.iter().map(|p| capitalize(p)).collect(),
        rows,
    )?;
    let mut annotations = subplot_title_annotations(&titles, &domains);
    annotations.extend(watermark::stamps(theme, rows));
    layout = layout.annotations(annotations);

    let mut figure = Plot::new();
    figure.add_traces(traces);
    figure.set_layout(layout);
    Ok(Graph::interactive(figure))
}

/// Cumulative-sum scatter with an annotated OLS trendline for one station.
///
/// Points are plotted against sequential positions `1..=n`; the x ticks are
/// relabeled with the index years.
pub fn cumulative_sum(
    table: &SeriesTable,
    theme: &ChartTheme,
    column: Option<&str>,
) -> Result<Graph> {
    let col = match column {
        Some(name) => table
            .column(name)
            .ok_or_else(|| anyhow!("unknown station `{name}`"))?,
        None => &table.columns()[0],
    };
    let n = table.index().len();
    let xs: Vec<f64> = (1..=n).map(|i| i as f64).collect();
    let ys: Vec<f64> = col.values.iter().map(|v| v.unwrap_or(f64::NAN)).collect();

    let scatter = Scatter::new(xs.clone(), ys.clone())
        .mode(Mode::LinesMarkers)
        .name(&col.name)
        .line(Line::new().dash(DashType::DashDot).width(1.0))
        .marker(Marker::new().size(12).symbol(MarkerSymbol::Circle))
        .hover_template(&format!(
            "{}<br><b>%{{y}} mm</b><br><i>%{{x}}</i><extra></extra>",
            col.name
        ));

    let mut line = trendline::regression_line(&xs, &ys, "number", &col.name);
    trendline::annotate(&mut line, "");
    let trend = Scatter::new(line.x, line.y)
        .mode(Mode::Lines)
        .name(&line.name)
        .show_legend(line.show_legend)
        .hover_template(&line.hover_template)
        .line(Line::new().color(theme.color(1).to_string()));

    let years: Vec<String> = table
        .index()
        .iter()
        .map(|d| d.format("%Y").to_string())
        .collect();
    let layout = Layout::new()
        .x_axis(
            Axis::new()
                .title(Title::with_text("<b>Year</b>"))
                .tick_values(xs)
                .tick_text(years),
        )
        .y_axis(
            Axis::new()
                .title(Title::with_text("<b>Cumulative Annual (mm)</b>"))
                .tick_format(".0f"),
        )
        .margin(Margin::new().left(0).top(35).bottom(0).right(0));

    let mut figure = Plot::new();
    figure.add_trace(scatter);
    figure.add_trace(trend);
    figure.set_layout(layout);
    Ok(Graph::interactive(figure))
}

/// Cross-correlation scatter: one station's cumulative sums against the mean
/// of every other station's, with an annotated OLS trendline.
pub fn scatter_with_trendline(
    table: &SeriesTable,
    theme: &ChartTheme,
    column: &str,
) -> Result<Graph> {
    ensure!(
        table.columns().len() >= 2,
        "cross-correlation needs at least two stations"
    );
    let col = table
        .column(column)
        .ok_or_else(|| anyhow!("unknown station `{column}`"))?;

    let xs: Vec<f64> = col.values.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
    let ys: Vec<f64> = (0..table.index().len())
        .map(|i| {
            let mut sum = 0.0;
            let mut count = 0usize;
            for other in table.columns().iter().filter(|c| c.name != col.name) {
                if let Some(v) = other.values[i]
                    && v.is_finite()
                {
                    sum += v;
                    count += 1;
                }
            }
            if count > 0 { sum / count as f64 } else { f64::NAN }
        })
        .collect();

    let scatter = Scatter::new(xs.clone(), ys.clone())
        .mode(Mode::LinesMarkers)
        .name(&col.name)
        .line(Line::new().dash(DashType::DashDot).width(1.0))
        .marker(Marker::new().size(12).symbol(MarkerSymbol::Circle))
        .hover_template(&format!(
            "{}<br><b>y: %{{y}} mm<br><i>x: %{{x}} mm</i></b><extra></extra>",
            col.name
        ));

    let mut line = trendline::regression_line(&xs, &ys, &col.name, "y");
    trendline::annotate(&mut line, " mm");
    let trend = Scatter::new(line.x, line.y)
        .mode(Mode::Lines)
        .name(&line.name)
        .show_legend(line.show_legend)
        .hover_template(&line.hover_template)
        .line(Line::new().color(theme.color(1).to_string()));

    let layout = Layout::new()
        .x_axis(
            Axis::new()
                .title(Title::with_text(format!(
                    "<b>Cumulative Annual {column} (mm)</b>"
                )))
                .tick_format(".0f"),
        )
        .y_axis(
            Axis::new()
                .title(Title::with_text(
                    "<b>Cumulative Average Annual References (mm)</b>",
                ))
                .tick_format(".0f"),
        )
        .margin(Margin::new().left(0).top(35).bottom(0).right(0));

    let mut figure = Plot::new();
    figure.add_trace(scatter);
    figure.add_trace(trend);
    figure.set_layout(layout);
    Ok(Graph::interactive(figure))
}
