use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use rainviz_rs::{ChartTheme, Period, storage, viz};

#[derive(Parser, Debug)]
#[command(
    name = "rainviz",
    version,
    about = "Compose rainfall dashboard figures from station CSV data"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Raw multi-station chart from a series CSV (lines, or bars when small).
    Series(SeriesArgs),
    /// Summary figure from a two-header summary CSV.
    Summary(SummaryArgs),
    /// Cumulative-sum scatter with an OLS trendline from a yearly series CSV.
    Cumsum(CumsumArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum BarsOpt {
    Stack,
    Group,
}

#[derive(ValueEnum, Clone, Debug)]
enum SummaryKind {
    /// Grouped max/sum bars, one subplot row per metric.
    MaxSum,
    /// Stacked rain/dry day counts, one subplot row per station.
    RainDry,
}

#[derive(Args, Debug)]
struct SeriesArgs {
    /// Input CSV: DATE column plus one column per station.
    #[arg(short, long)]
    input: PathBuf,
    /// Draw bars instead of lines (ignored for oversized tables).
    #[arg(long, value_enum)]
    bars: Option<BarsOpt>,
    /// Output HTML path.
    #[arg(short, long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    /// Input CSV with two header rows (stations, metrics).
    #[arg(short, long)]
    input: PathBuf,
    /// Which summary figure to compose.
    #[arg(long, value_enum)]
    kind: SummaryKind,
    /// Period granularity of the summary rows (daily, biweekly, monthly, yearly).
    #[arg(long)]
    period: Option<String>,
    /// Figure title.
    #[arg(long, default_value = "Summary Rainfall")]
    title: String,
    /// Output HTML path.
    #[arg(short, long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct CumsumArgs {
    /// Input CSV of yearly cumulative sums per station.
    #[arg(short, long)]
    input: PathBuf,
    /// Station column to plot (defaults to the first column).
    #[arg(long)]
    station: Option<String>,
    /// Plot the station against the mean of the remaining stations instead.
    #[arg(long, default_value_t = false)]
    consistency: bool,
    /// Output HTML path.
    #[arg(short, long)]
    out: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Series(args) => cmd_series(args),
        Command::Summary(args) => cmd_summary(args),
        Command::Cumsum(args) => cmd_cumsum(args),
    }
}

fn cmd_series(args: SeriesArgs) -> Result<()> {
    let table = storage::load_series_csv(&args.input)?;
    let theme = ChartTheme::default();
    let arrangement = args.bars.map(|b| match b {
        BarsOpt::Stack => viz::BarArrangement::Stacked,
        BarsOpt::Group => viz::BarArrangement::Grouped,
    });
    let graph = viz::rainfall_figure(&table, arrangement, &theme);
    storage::save_html(&graph, &args.out)?;
    eprintln!("Wrote figure to {}", args.out.display());
    Ok(())
}

fn cmd_summary(args: SummaryArgs) -> Result<()> {
    let table = storage::load_summary_csv(&args.input)?;
    let theme = ChartTheme::default();
    let period = Period::from_label(args.period.as_deref());
    let graph = match args.kind {
        SummaryKind::MaxSum => viz::summary_maximum_sum(&table, &theme, &args.title, period)?,
        SummaryKind::RainDry => viz::summary_rain_dry(&table, &theme, &args.title, period)?,
    };
    if graph.static_plot {
        eprintln!("Dataset above threshold; wrote a static placeholder");
    }
    storage::save_html(&graph, &args.out)?;
    eprintln!("Wrote figure to {}", args.out.display());
    Ok(())
}

fn cmd_cumsum(args: CumsumArgs) -> Result<()> {
    let table = storage::load_series_csv(&args.input)?;
    let theme = ChartTheme::default();
    let graph = if args.consistency {
        let station = match args.station.as_deref() {
            Some(name) => name.to_string(),
            None => table.columns()[0].name.clone(),
        };
        viz::scatter_with_trendline(&table, &theme, &station)?
    } else {
        viz::cumulative_sum(&table, &theme, args.station.as_deref())?
    };
    storage::save_html(&graph, &args.out)?;
    eprintln!("Wrote figure to {}", args.out.display());
    Ok(())
}
