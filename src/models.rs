use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of metric columns each station carries in a summary table.
pub const METRIC_COUNT: usize = 6;

/// Named summary statistic tracked per station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    /// Bucket length in days.
    Days,
    /// Maximum rainfall within the bucket (mm).
    Max,
    /// Total rainfall within the bucket (mm).
    Sum,
    /// Count of wet days.
    NRain,
    /// Count of dry days.
    NDry,
    /// Date of the maximum rainfall event.
    MaxDate,
}

impl Metric {
    /// Wire label as produced by the aggregation pipeline.
    pub fn label(&self) -> &'static str {
        match *self {
            Metric::Days => "days",
            Metric::Max => "max",
            Metric::Sum => "sum",
            Metric::NRain => "n_rain",
            Metric::NDry => "n_dry",
            Metric::MaxDate => "max_date",
        }
    }

    /// Parse a wire label back into a metric.
    pub fn parse(label: &str) -> Option<Metric> {
        match label.trim() {
            "days" => Some(Metric::Days),
            "max" => Some(Metric::Max),
            "sum" => Some(Metric::Sum),
            "n_rain" => Some(Metric::NRain),
            "n_dry" => Some(Metric::NDry),
            "max_date" => Some(Metric::MaxDate),
            _ => None,
        }
    }
}

/// Temporal bucket size of a summary row. Affects tick-label formatting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    Daily,
    Biweekly,
    Monthly,
    Yearly,
}

impl Period {
    /// Parse a period label, case-insensitively.
    ///
    /// A missing or unrecognized label falls back to `Daily` so the guard and
    /// tick planner stay total over their documented domain.
    pub fn from_label(label: Option<&str>) -> Period {
        match label.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("biweekly") => Period::Biweekly,
            Some("monthly") => Period::Monthly,
            Some("yearly") => Period::Yearly,
            _ => Period::Daily,
        }
    }

    pub fn label(&self) -> &'static str {
        match *self {
            Period::Daily => "daily",
            Period::Biweekly => "biweekly",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
        }
    }
}

/// Schema violation detected while ingesting tabular data.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("time index is empty")]
    EmptyIndex,
    #[error("station `{station}`: column `{column}` has {len} values, expected {expected}")]
    LengthMismatch {
        station: String,
        column: &'static str,
        len: usize,
        expected: usize,
    },
    #[error("duplicate station `{0}`")]
    DuplicateStation(String),
    #[error("table has no station columns")]
    NoStations,
}

/// One station column of a raw (wide) series table. Missing observations are `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Wide table of raw or pre-aggregated values: one time index, one column per
/// station. Feeds the raw scatter/bar figures and the cumulative-sum figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesTable {
    index: Vec<NaiveDate>,
    columns: Vec<SeriesColumn>,
}

impl SeriesTable {
    /// Validate and build a series table.
    ///
    /// Every column must match the index length; station names must be unique.
    /// Column order is preserved as given (first-seen order, never sorted).
    pub fn new(index: Vec<NaiveDate>, columns: Vec<SeriesColumn>) -> Result<Self, SchemaError> {
        if index.is_empty() {
            return Err(SchemaError::EmptyIndex);
        }
        if columns.is_empty() {
            return Err(SchemaError::NoStations);
        }
        for (i, col) in columns.iter().enumerate() {
            if col.values.len() != index.len() {
                return Err(SchemaError::LengthMismatch {
                    station: col.name.clone(),
                    column: "values",
                    len: col.values.len(),
                    expected: index.len(),
                });
            }
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(SchemaError::DuplicateStation(col.name.clone()));
            }
        }
        Ok(Self { index, columns })
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn columns(&self) -> &[SeriesColumn] {
        &self.columns
    }

    /// Look up a column by station name.
    pub fn column(&self, name: &str) -> Option<&SeriesColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Total number of data cells (index length x station count).
    pub fn cell_count(&self) -> usize {
        self.index.len() * self.columns.len()
    }
}

/// Fixed record of metric series for one station. All vectors share the
/// table's index length.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationMetrics {
    pub days: Vec<f64>,
    pub max: Vec<f64>,
    pub sum: Vec<f64>,
    pub n_rain: Vec<f64>,
    pub n_dry: Vec<f64>,
    pub max_date: Vec<Option<NaiveDate>>,
}

impl StationMetrics {
    /// Numeric series for a metric; `None` for `MaxDate` (date-typed).
    pub fn values(&self, metric: Metric) -> Option<&[f64]> {
        match metric {
            Metric::Days => Some(&self.days),
            Metric::Max => Some(&self.max),
            Metric::Sum => Some(&self.sum),
            Metric::NRain => Some(&self.n_rain),
            Metric::NDry => Some(&self.n_dry),
            Metric::MaxDate => None,
        }
    }

    /// The station's stack ceiling: the largest `days` value it reports.
    pub fn days_ceiling(&self) -> f64 {
        self.days.iter().cloned().fold(0.0, f64::max)
    }

    /// Derived filler series: `max(days) - n_rain - n_dry` per row.
    ///
    /// Never supplied upstream; rendered as the zero-hover "border" bar so
    /// every stack reaches the station's ceiling.
    pub fn n_left(&self) -> Vec<f64> {
        let ceiling = self.days_ceiling();
        self.n_rain
            .iter()
            .zip(&self.n_dry)
            .map(|(rain, dry)| ceiling - rain - dry)
            .collect()
    }
}

/// One entry of the ordered station registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationSummary {
    pub name: String,
    pub metrics: StationMetrics,
}

/// Multi-station summary table: one shared time index plus an ordered station
/// registry, each station carrying the fixed [`StationMetrics`] record.
///
/// The registry preserves first-seen order across all chart types so station
/// ordering and coloring stay consistent within one dashboard session. All
/// stations share the single index; inputs with divergent per-station index
/// lengths must be aligned upstream and are rejected here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryTable {
    index: Vec<NaiveDate>,
    stations: Vec<StationSummary>,
}

impl SummaryTable {
    /// Validate and build a summary table from (station, record) pairs.
    pub fn new(
        index: Vec<NaiveDate>,
        stations: Vec<(String, StationMetrics)>,
    ) -> Result<Self, SchemaError> {
        if index.is_empty() {
            return Err(SchemaError::EmptyIndex);
        }
        if stations.is_empty() {
            return Err(SchemaError::NoStations);
        }
        let expected = index.len();
        let mut registry: Vec<StationSummary> = Vec::with_capacity(stations.len());
        for (name, metrics) in stations {
            if registry.iter().any(|s| s.name == name) {
                return Err(SchemaError::DuplicateStation(name));
            }
            let lengths: [(&'static str, usize); 6] = [
                ("days", metrics.days.len()),
                ("max", metrics.max.len()),
                ("sum", metrics.sum.len()),
                ("n_rain", metrics.n_rain.len()),
                ("n_dry", metrics.n_dry.len()),
                ("max_date", metrics.max_date.len()),
            ];
            for (column, len) in lengths {
                if len != expected {
                    return Err(SchemaError::LengthMismatch {
                        station: name.clone(),
                        column,
                        len,
                        expected,
                    });
                }
            }
            registry.push(StationSummary { name, metrics });
        }
        Ok(Self {
            index,
            stations: registry,
        })
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn stations(&self) -> &[StationSummary] {
        &self.stations
    }

    /// Station names in registry (first-seen) order.
    pub fn station_names(&self) -> impl Iterator<Item = &str> {
        self.stations.iter().map(|s| s.name.as_str())
    }

    /// Total number of data cells, counting all six metric columns per
    /// station (matches the flattened column count of the upstream table).
    pub fn cell_count(&self) -> usize {
        self.index.len() * self.stations.len() * METRIC_COUNT
    }
}
