//! serptrends CLI - run the comparison pipeline over exported API
//! responses.
//!
//! Usage:
//!   serptrends compare <current.json> <previous.json> [--daily <daily.json>]
//!       --site <url> --start <YYYY-MM-DD> --end <YYYY-MM-DD>
//!       [--grouping <query|page|query-page>] [--config <serptrends.toml>]
//!       [--out <dir>]
//!
//! The JSON files are raw query-response bodies (the `rows` array as
//! the API returns it), so a report can be rebuilt offline without
//! credentials.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use serptrends::client::{
    parse_response, ClientError, CtrScale, QueryRequest, SearchAnalyticsClient, SiteEntry,
};
use serptrends::config::Settings;
use serptrends::export;
use serptrends::model::{DateRange, Dimension, FetchResult, Grouping};
use serptrends::report::{self, Report};

#[derive(Parser)]
#[command(name = "serptrends")]
#[command(about = "Period-over-period trend analysis for search analytics data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two periods from exported response files and write CSVs
    Compare {
        /// Response body for the current period
        current: PathBuf,

        /// Response body for the previous period
        previous: PathBuf,

        /// Optional date-granular response body for trend charts
        #[arg(long)]
        daily: Option<PathBuf>,

        /// Site URL the exports came from (label only)
        #[arg(long)]
        site: String,

        /// Current period start date (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Current period end date (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,

        /// Grouping dimension(s) of the exports
        #[arg(long, default_value = "query")]
        grouping: GroupingArg,

        /// Path to serptrends.toml
        #[arg(long, default_value = "serptrends.toml")]
        config: PathBuf,

        /// Output directory for the CSV files
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum GroupingArg {
    Query,
    Page,
    QueryPage,
}

impl From<GroupingArg> for Grouping {
    fn from(arg: GroupingArg) -> Self {
        match arg {
            GroupingArg::Query => Grouping::Query,
            GroupingArg::Page => Grouping::Page,
            GroupingArg::QueryPage => Grouping::QueryPage,
        }
    }
}

/// Serves pre-exported response bodies instead of calling the API.
/// Requests carrying the date dimension get the daily export; the
/// others are routed by start date.
struct FixtureClient {
    current_range: DateRange,
    current: serde_json::Value,
    previous: serde_json::Value,
    daily: Option<serde_json::Value>,
    ctr_scale: CtrScale,
}

impl SearchAnalyticsClient for FixtureClient {
    fn query(&self, _site: &str, request: &QueryRequest) -> Result<FetchResult, ClientError> {
        let body = if request.dimensions.contains(&Dimension::Date) {
            match &self.daily {
                Some(body) => body,
                None => {
                    return Ok(FetchResult::new(
                        Vec::new(),
                        request.range(),
                        request.dimensions.clone(),
                    ))
                }
            }
        } else if request.start_date == self.current_range.start {
            &self.current
        } else {
            &self.previous
        };

        let rows = parse_response(body, &request.dimensions, self.ctr_scale)?;
        Ok(FetchResult::new(
            rows,
            request.range(),
            request.dimensions.clone(),
        ))
    }

    fn list_sites(&self) -> Result<Vec<SiteEntry>, ClientError> {
        Ok(Vec::new())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Commands::Compare {
            current,
            previous,
            daily,
            site,
            start,
            end,
            grouping,
            config,
            out,
        } => match run_compare(
            &current, &previous, daily.as_deref(), &site, start, end, grouping.into(), &config,
            &out,
        ) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        },
    }
}

#[allow(clippy::too_many_arguments)]
fn run_compare(
    current_path: &Path,
    previous_path: &Path,
    daily_path: Option<&Path>,
    site: &str,
    start: NaiveDate,
    end: NaiveDate,
    grouping: Grouping,
    config_path: &Path,
    out_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load_or_default(config_path)?;
    let mut options = settings.report_options();
    if daily_path.is_none() {
        options.include_trend = false;
    }

    let range = DateRange::new(start, end);
    let client = FixtureClient {
        current_range: range,
        current: read_json(current_path)?,
        previous: read_json(previous_path)?,
        daily: daily_path.map(read_json).transpose()?,
        ctr_scale: settings.client.ctr_scale,
    };

    let report = report::generate(&client, site, range, grouping, &options)?;

    if report.is_empty() {
        println!(
            "no data for {} in {} or {}",
            site, report.range, report.previous_range
        );
        return Ok(());
    }

    fs::create_dir_all(out_dir)?;
    write_csvs(&report, out_dir)?;

    println!(
        "{}: {} keys compared ({} vs {})",
        site,
        report.comparison.len(),
        report.range,
        report.previous_range
    );
    println!(
        "top movers: {}, declining with rising reach: {}",
        report.top_movers.len(),
        report.declining_reach.len()
    );
    Ok(())
}

fn write_csvs(report: &Report, out_dir: &Path) -> std::io::Result<()> {
    let mut f = fs::File::create(out_dir.join("comparison.csv"))?;
    export::write_comparison_csv(&mut f, &report.comparison)?;

    let mut f = fs::File::create(out_dir.join("summary.csv"))?;
    export::write_aggregated_csv(&mut f, &report.current_summary)?;

    let mut f = fs::File::create(out_dir.join("top_movers.csv"))?;
    export::write_comparison_csv(&mut f, &report.top_movers)?;

    let mut f = fs::File::create(out_dir.join("declining_reach.csv"))?;
    export::write_comparison_csv(&mut f, &report.declining_reach)?;

    if let Some(trend) = &report.trend {
        let mut f = fs::File::create(out_dir.join("trend.csv"))?;
        export::write_chart_csv(&mut f, trend)?;
    }
    if !report.daily.is_empty() {
        let mut f = fs::File::create(out_dir.join("daily.csv"))?;
        export::write_daily_csv(&mut f, &report.daily)?;
    }
    Ok(())
}

fn read_json(path: &Path) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
