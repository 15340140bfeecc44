//! rainviz-rs
//!
//! A lightweight Rust library for composing interactive rainfall dashboard
//! figures from multi-station summaries. Pairs with the `rainviz` CLI.
//!
//! ### Features
//! - Raw multi-station rainfall charts (lines, stacked/grouped bars)
//! - Summary figures: grouped max/sum bars, stacked rain/dry day counts,
//!   maximum-event bubble charts across period granularities
//! - Cumulative-sum scatter plots with annotated OLS trendlines
//! - Oversized-dataset guard that swaps in a static placeholder figure
//!
//! ### Example
//! ```no_run
//! use rainviz_rs::{ChartTheme, Period, storage, viz};
//!
//! let summary = storage::load_summary_csv("summary_monthly.csv")?;
//! let theme = ChartTheme::default();
//! let graph = viz::summary_maximum_sum(
//!     &summary,
//!     &theme,
//!     "<b>Monthly: Maximum & Total Rainfall</b>",
//!     Period::Monthly,
//! )?;
//! storage::save_html(&graph, "summary.html")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod models;
pub mod storage;
pub mod theme;
pub mod viz;

pub use models::{Metric, Period, SeriesTable, SummaryTable};
pub use theme::ChartTheme;
pub use viz::Graph;
