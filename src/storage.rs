//! CSV ingestion and figure export.
//!
//! Two input shapes are supported, matching what the aggregation stage
//! produces:
//! - series CSV: a `DATE` column followed by one column per station
//! - summary CSV: two header rows (stations, then metric labels) over a date
//!   index, six metric columns per station

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, anyhow, ensure};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};

use crate::models::{Metric, SeriesColumn, SeriesTable, StationMetrics, SummaryTable};
use crate::viz::Graph;

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date `{raw}`, expected YYYY-MM-DD"))
}

fn parse_value(raw: &str) -> Result<f64> {
    if raw.is_empty() {
        // Missing summary cells arrive as empty fields.
        return Ok(f64::NAN);
    }
    raw.parse::<f64>()
        .with_context(|| format!("invalid numeric value `{raw}`"))
}

/// Load a wide series table: `DATE` column plus one column per station.
/// Empty cells become missing observations.
pub fn load_series_csv<P: AsRef<Path>>(path: P) -> Result<SeriesTable> {
    let mut rdr = ReaderBuilder::new().from_path(path.as_ref())?;
    let headers = rdr.headers()?.clone();
    ensure!(
        headers.len() >= 2,
        "series csv needs a date column and at least one station column"
    );
    let names: Vec<String> = headers.iter().skip(1).map(|s| s.trim().to_string()).collect();

    let mut index: Vec<NaiveDate> = Vec::new();
    let mut values: Vec<Vec<Option<f64>>> = vec![Vec::new(); names.len()];
    for record in rdr.records() {
        let record = record?;
        index.push(parse_date(record.get(0).unwrap_or_default())?);
        for (i, column) in values.iter_mut().enumerate() {
            let raw = record.get(i + 1).map(str::trim).unwrap_or_default();
            column.push(if raw.is_empty() {
                None
            } else {
                Some(parse_value(raw)?)
            });
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, values)| SeriesColumn { name, values })
        .collect();
    Ok(SeriesTable::new(index, columns)?)
}

/// Load a multi-station summary table from a CSV with two header rows: the
/// first labels stations (repeated or left blank across their metric
/// columns), the second labels metrics. An optional third line carrying only
/// the index name is skipped.
pub fn load_summary_csv<P: AsRef<Path>>(path: P) -> Result<SummaryTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path.as_ref())?;
    let records: Vec<StringRecord> = rdr.records().collect::<Result<_, _>>()?;
    ensure!(
        records.len() >= 3,
        "summary csv needs two header rows and at least one data row"
    );

    let stations_row = &records[0];
    let metrics_row = &records[1];
    ensure!(
        stations_row.len() == metrics_row.len(),
        "header rows disagree on column count"
    );

    // Column descriptors, skipping the index column. Blank station cells
    // continue the station to their left.
    let mut columns: Vec<(String, Metric)> = Vec::new();
    let mut current = String::new();
    for i in 1..stations_row.len() {
        let station = stations_row.get(i).map(str::trim).unwrap_or_default();
        if !station.is_empty() {
            current = station.to_string();
        }
        ensure!(!current.is_empty(), "column {i} has no station label");
        let label = metrics_row.get(i).map(str::trim).unwrap_or_default();
        let metric =
            Metric::parse(label).ok_or_else(|| anyhow!("unknown metric column `{label}`"))?;
        columns.push((current.clone(), metric));
    }

    // First-seen station order becomes the registry order.
    let mut order: Vec<String> = Vec::new();
    for (station, _) in &columns {
        if !order.iter().any(|s| s == station) {
            order.push(station.clone());
        }
    }
    let mut metrics_map: HashMap<String, StationMetrics> = order
        .iter()
        .map(|s| (s.clone(), StationMetrics::default()))
        .collect();

    let mut data_start = 2;
    if let Some(record) = records.get(2)
        && record.iter().skip(1).all(|c| c.trim().is_empty())
    {
        // index-name line some writers emit below the headers
        data_start = 3;
    }

    let mut index: Vec<NaiveDate> = Vec::new();
    for record in &records[data_start..] {
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        index.push(parse_date(record.get(0).unwrap_or_default())?);
        for (slot, (station, metric)) in columns.iter().enumerate() {
            let raw = record.get(slot + 1).map(str::trim).unwrap_or_default();
            let entry = metrics_map
                .get_mut(station)
                .ok_or_else(|| anyhow!("station `{station}` missing from registry"))?;
            match metric {
                Metric::MaxDate => entry.max_date.push(if raw.is_empty() {
                    None
                } else {
                    Some(parse_date(raw)?)
                }),
                Metric::Days => entry.days.push(parse_value(raw)?),
                Metric::Max => entry.max.push(parse_value(raw)?),
                Metric::Sum => entry.sum.push(parse_value(raw)?),
                Metric::NRain => entry.n_rain.push(parse_value(raw)?),
                Metric::NDry => entry.n_dry.push(parse_value(raw)?),
            }
        }
    }

    let stations = order
        .into_iter()
        .map(|name| {
            let metrics = metrics_map
                .remove(&name)
                .ok_or_else(|| anyhow!("station `{name}` missing from registry"))?;
            Ok((name, metrics))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(SummaryTable::new(index, stations)?)
}

/// Write the figure as a standalone HTML document for embedding.
pub fn save_html<P: AsRef<Path>>(graph: &Graph, path: P) -> Result<()> {
    graph.figure.write_html(path.as_ref());
    Ok(())
}
