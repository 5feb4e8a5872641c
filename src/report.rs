//! Plain-text rendering of an analysis for the headless `analyze` binary.

use std::fmt::Write;

use crate::chart::price_series;
use crate::format::{format_pct_f64, format_usd_f64};
use crate::tables::{headers, render_rows, Column, FORECAST_COLUMNS, HISTORICAL_COLUMNS};
use crate::types::{AnalysisResponse, TableRow};

pub fn render_report(resp: &AnalysisResponse, years: u32) -> String {
    let s = &resp.summary;
    let mut out = String::new();

    let heading = if s.name.is_empty() {
        format!("My Valuation of {}", s.ticker)
    } else {
        format!("My Valuation of {} ({})", s.ticker, s.name)
    };
    let _ = writeln!(out, "{heading}");
    let _ = writeln!(out, "Based on mid case assumptions");
    let _ = writeln!(out, "  Current stock price     {}", format_usd_f64(s.current_price));
    let _ = writeln!(out, "  Target price            {}", format_usd_f64(s.target_price_mid));
    let _ = writeln!(
        out,
        "  Potential total return  {} over {years} years",
        format_pct_f64(s.total_return_mid)
    );
    let _ = writeln!(out, "  Annualized              {} / year", format_pct_f64(s.annualized_mid));

    if !resp.forecast_table.is_empty() {
        let _ = writeln!(out, "\nPrice Forecast");
        for p in price_series(s, years) {
            let _ = writeln!(out, "  {:<5} {}", p.label, format_usd_f64(p.price));
        }
    }

    let _ = writeln!(out, "\nHistorical");
    out.push_str(&render_text_table(&resp.hist_table, &HISTORICAL_COLUMNS));
    let _ = writeln!(out, "\nForecast Scenarios");
    out.push_str(&render_text_table(&resp.forecast_table, &FORECAST_COLUMNS));
    out
}

/// Left-aligned columns sized to their widest cell.
fn render_text_table(rows: &[TableRow], columns: &[Column]) -> String {
    let header = headers(columns);
    let body = render_rows(rows, columns);

    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(i, h)| {
            body.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header_cells: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    for cells in std::iter::once(&header_cells).chain(body.iter()) {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{c:<w$}", w = *w))
            .collect();
        let _ = writeln!(out, "  {}", line.join("  ").trim_end());
    }
    out
}
