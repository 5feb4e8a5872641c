use crate::format::{format_cell, format_fixed, format_label, format_pct, format_usd};
use crate::types::TableRow;

/// How a column's raw value is turned into display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFormat {
    Label,
    Cell,
    Pct,
    Fixed1,
    Usd,
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub title: &'static str,
    /// Key in the service's row object.
    pub key: &'static str,
    /// Fallback: first key with this prefix, used when `key` is absent.
    pub key_prefix: Option<&'static str>,
    pub format: CellFormat,
}

const fn col(title: &'static str, key: &'static str, format: CellFormat) -> Column {
    Column { title, key, key_prefix: None, format }
}

pub const HISTORICAL_COLUMNS: [Column; 4] = [
    col("Metric", "Metric", CellFormat::Label),
    col("1 Year", "1 Year", CellFormat::Cell),
    col("5 Years", "5 Years", CellFormat::Cell),
    col("10 Years", "10 Years", CellFormat::Cell),
];

pub const FORECAST_COLUMNS: [Column; 7] = [
    col("Scenario", "Scenario", CellFormat::Label),
    col("Rev CAGR", "Revenue Growth (CAGR)", CellFormat::Pct),
    col("Margin", "Net Income Margin", CellFormat::Pct),
    col("Exit P/E", "Exit P/E", CellFormat::Fixed1),
    // The service names this column after the horizon's end year.
    Column {
        title: "Target",
        key: "Target Price 2030E",
        key_prefix: Some("Target Price"),
        format: CellFormat::Usd,
    },
    col("Total", "Total Return", CellFormat::Pct),
    col("IRR", "IRR (Annual Return)", CellFormat::Pct),
];

impl Column {
    fn lookup<'a>(&self, row: &'a TableRow) -> Option<&'a serde_json::Value> {
        row.get(self.key).or_else(|| {
            let prefix = self.key_prefix?;
            row.iter()
                .find(|(k, _)| k.starts_with(prefix))
                .map(|(_, v)| v)
        })
    }

    pub fn render(&self, row: &TableRow) -> String {
        let value = self.lookup(row);
        match self.format {
            CellFormat::Label => format_label(value),
            CellFormat::Cell => format_cell(value),
            CellFormat::Pct => format_pct(value),
            CellFormat::Fixed1 => format_fixed(value, 1),
            CellFormat::Usd => format_usd(value),
        }
    }
}

pub fn headers(columns: &[Column]) -> Vec<&'static str> {
    columns.iter().map(|c| c.title).collect()
}

/// Display text for every row, one `String` per column.
pub fn render_rows(rows: &[TableRow], columns: &[Column]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| columns.iter().map(|c| c.render(row)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(v: serde_json::Value) -> TableRow {
        match v {
            serde_json::Value::Object(map) => map,
            _ => panic!("row fixture must be an object"),
        }
    }

    #[test]
    fn historical_row_renders_cells() {
        let rows = vec![row(json!({
            "Metric": "Share Price",
            "1 Year": 0.18,
            "5 Years": 2.345,
            "10 Years": null
        }))];
        assert_eq!(
            render_rows(&rows, &HISTORICAL_COLUMNS),
            vec![vec!["Share Price", "18.0%", "2.35", "—"]]
        );
    }

    #[test]
    fn forecast_row_renders_each_format() {
        let rows = vec![row(json!({
            "Scenario": "Mid",
            "Revenue Growth (CAGR)": 0.18,
            "Net Income Margin": 0.27,
            "Exit P/E": 30,
            "Target Price 2030E": 150,
            "Total Return": 0.5,
            "IRR (Annual Return)": 0.1067
        }))];
        assert_eq!(
            render_rows(&rows, &FORECAST_COLUMNS),
            vec![vec!["Mid", "18.0%", "27.0%", "30.0", "$150.00", "50.0%", "10.7%"]]
        );
    }

    #[test]
    fn target_column_falls_back_to_prefix() {
        let r = row(json!({ "Target Price 2031E": 212.4 }));
        assert_eq!(FORECAST_COLUMNS[4].render(&r), "$212.40");
    }

    #[test]
    fn missing_columns_render_placeholder() {
        let r = row(json!({ "Scenario": "Low" }));
        let rendered: Vec<String> = FORECAST_COLUMNS.iter().map(|c| c.render(&r)).collect();
        assert_eq!(rendered, vec!["Low", "—", "—", "—", "—", "—", "—"]);
    }

    #[test]
    fn headers_follow_column_order() {
        assert_eq!(headers(&HISTORICAL_COLUMNS), ["Metric", "1 Year", "5 Years", "10 Years"]);
    }
}
