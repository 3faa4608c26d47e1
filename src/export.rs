//! CSV serialization of report tables.
//!
//! Comma-separated, header row matching the struct field names exactly.
//! Floats go through `ryu` so the shortest round-trippable decimal is
//! written. Fields containing commas, quotes, or newlines are quoted
//! per RFC 4180 (queries routinely contain commas).
//!
//! Writers take any `io::Write` sink; callers own file naming and
//! download plumbing.

use std::io::{self, Write};

use crate::model::{AggregatedRow, ComparisonRow, MetricRow};
use crate::trend::{ChartTable, DailyTotal};

const AGGREGATED_HEADER: &str = "key,clicks,impressions,ctr,position";
const COMPARISON_HEADER: &str = "key,clicks_current,clicks_previous,impressions_current,\
impressions_previous,ctr_current,ctr_previous,position_current,position_previous,\
clicks_diff,ctr_diff,impressions_diff,position_diff,clicks_pct_change";
const RAW_HEADER: &str = "date,key,clicks,impressions,ctr,position";
const DAILY_HEADER: &str = "date,clicks,unique_pages";

/// Period-level summary table (key, sums, means).
pub fn write_aggregated_csv<W: Write>(w: &mut W, rows: &[AggregatedRow]) -> io::Result<()> {
    writeln!(w, "{}", AGGREGATED_HEADER)?;
    let mut buf = ryu::Buffer::new();
    for row in rows {
        let mut line = Vec::with_capacity(5);
        line.push(field(&row.key.label()));
        line.push(row.clicks.to_string());
        line.push(row.impressions.to_string());
        line.push(buf.format(row.ctr).to_string());
        line.push(buf.format(row.position).to_string());
        writeln!(w, "{}", line.join(","))?;
    }
    Ok(())
}

/// Full comparison table; column order matches the `ComparisonRow`
/// field order.
pub fn write_comparison_csv<W: Write>(w: &mut W, rows: &[ComparisonRow]) -> io::Result<()> {
    writeln!(w, "{}", COMPARISON_HEADER)?;
    let mut buf = ryu::Buffer::new();
    for row in rows {
        let mut line = Vec::with_capacity(14);
        line.push(field(&row.key.label()));
        line.push(row.clicks_current.to_string());
        line.push(row.clicks_previous.to_string());
        line.push(row.impressions_current.to_string());
        line.push(row.impressions_previous.to_string());
        line.push(buf.format(row.ctr_current).to_string());
        line.push(buf.format(row.ctr_previous).to_string());
        line.push(buf.format(row.position_current).to_string());
        line.push(buf.format(row.position_previous).to_string());
        line.push(row.clicks_diff.to_string());
        line.push(buf.format(row.ctr_diff).to_string());
        line.push(row.impressions_diff.to_string());
        line.push(buf.format(row.position_diff).to_string());
        line.push(buf.format(row.clicks_pct_change).to_string());
        writeln!(w, "{}", line.join(","))?;
    }
    Ok(())
}

/// Raw date-granular rows, the "download raw data" export.
pub fn write_raw_csv<W: Write>(w: &mut W, rows: &[MetricRow]) -> io::Result<()> {
    writeln!(w, "{}", RAW_HEADER)?;
    let mut buf = ryu::Buffer::new();
    for row in rows {
        let date = row.date.map(|d| d.to_string()).unwrap_or_default();
        let mut line = Vec::with_capacity(6);
        line.push(date);
        line.push(field(&row.key.label()));
        line.push(row.clicks.to_string());
        line.push(row.impressions.to_string());
        line.push(buf.format(row.ctr).to_string());
        line.push(buf.format(row.position).to_string());
        writeln!(w, "{}", line.join(","))?;
    }
    Ok(())
}

/// The dense chart grid: `date` column followed by one column per key.
pub fn write_chart_csv<W: Write>(w: &mut W, table: &ChartTable) -> io::Result<()> {
    let mut header = vec!["date".to_string()];
    header.extend(table.columns.iter().map(|k| field(&k.label())));
    writeln!(w, "{}", header.join(","))?;

    for (date, row) in table.dates.iter().zip(&table.values) {
        let mut line = vec![date.to_string()];
        line.extend(row.iter().map(u64::to_string));
        writeln!(w, "{}", line.join(","))?;
    }
    Ok(())
}

/// Per-date totals for the overview line charts.
pub fn write_daily_csv<W: Write>(w: &mut W, rows: &[DailyTotal]) -> io::Result<()> {
    writeln!(w, "{}", DAILY_HEADER)?;
    for row in rows {
        writeln!(w, "{},{},{}", row.date, row.clicks, row.unique_pages)?;
    }
    Ok(())
}

/// Quote a field when it contains a delimiter, quote, or newline.
fn field(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
