// Plain-text and JSON views of a prepared dashboard.
use crate::error::{EngineError, ErrorKind, Result};
use shared::models::Dashboard;
use shared::utils::{format_money, format_percent, format_volume};
use std::fmt::Write;

/// Rows shown in the "Historical Data" table.
pub const HEAD_ROWS: usize = 5;

pub fn render_text(title: &str, dashboard: &Dashboard, head_rows: usize) -> String {
    let label = dashboard.currency_label.as_str();
    let stats = &dashboard.statistics;
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(
        out,
        "{} | {} | {} to {} | {} bars",
        dashboard.symbol,
        dashboard.time_frame,
        dashboard.range.start,
        dashboard.range.end,
        dashboard.series.len()
    );

    let _ = writeln!(out, "\nHistorical Data");
    let _ = writeln!(
        out,
        "{:<12}{:>14}{:>14}{:>14}{:>14}{:>18}",
        "Date", "Open", "High", "Low", "Close", "Volume"
    );
    for bar in dashboard.series.head(head_rows) {
        let _ = writeln!(
            out,
            "{:<12}{:>14.2}{:>14.2}{:>14.2}{:>14.2}{:>18}",
            bar.date.to_string(),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            format_volume(bar.volume)
        );
    }

    let _ = writeln!(out, "\nKey Statistics");
    let rows = [
        ("Highest Closing Price", format_money(label, Some(stats.max))),
        ("Lowest Closing Price", format_money(label, Some(stats.min))),
        ("Average Closing Price", format_money(label, Some(stats.mean))),
        ("Median Closing Price", format_money(label, Some(stats.median))),
        ("25th Percentile", format_money(label, Some(stats.p25))),
        ("75th Percentile", format_money(label, Some(stats.p75))),
        ("Standard Deviation", format_money(label, stats.stddev)),
        ("Average Percentage Change", format_percent(stats.mean_pct_change)),
    ];
    for (name, value) in rows {
        let _ = writeln!(out, "{:<28}{}", name, value);
    }

    let ma = &dashboard.moving_averages;
    let _ = writeln!(out, "\nMoving Averages (latest)");
    let _ = writeln!(out, "{:<28}{}", "50-Day MA", format_money(label, ma.ma50.last().copied().flatten()));
    let _ = writeln!(out, "{:<28}{}", "200-Day MA", format_money(label, ma.ma200.last().copied().flatten()));

    out
}

pub fn render_json(dashboard: &Dashboard) -> Result<String> {
    Ok(serde_json::to_string_pretty(dashboard)?)
}

/// Message shown to the end user when a refresh fails.
pub fn render_failure(err: &EngineError) -> String {
    match err.kind() {
        ErrorKind::InvalidArgument => format!("Please check your input. {}", err),
        ErrorKind::FetchFailure => format!("Could not load market data. {}", err),
        ErrorKind::InsufficientData => {
            format!("No data available for this selection. {}", err)
        }
        ErrorKind::Config => format!("The dashboard is misconfigured. {}", err),
    }
}
