use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::chart::{plot_data, price_bounds};
use crate::dashboard::{Dashboard, Focus};
use crate::format::{format_pct_f64, format_usd_f64};
use crate::tables::{headers, render_rows, Column, FORECAST_COLUMNS, HISTORICAL_COLUMNS};
use crate::types::{Summary, TableRow};

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

pub fn render(f: &mut Frame, dash: &Dashboard) {
    let area = f.area();
    let error_height = if dash.error.is_some() { 3 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // header + inputs
            Constraint::Length(error_height), // error banner
            Constraint::Min(0),               // body
            Constraint::Length(1),            // footer
        ])
        .split(area);

    render_header(f, dash, chunks[0]);
    if let Some(err) = &dash.error {
        render_error(f, err, chunks[1]);
    }
    match &dash.summary {
        Some(summary) => render_results(f, dash, summary, chunks[2]),
        None => render_placeholder(f, chunks[2]),
    }
    render_footer(f, chunks[3]);
}

fn render_header(f: &mut Frame, dash: &Dashboard, area: Rect) {
    let field_style = |focus: Focus| {
        if dash.focus == focus {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        }
    };

    let (button_text, button_color) = if dash.loading {
        (" Loading... ", Color::DarkGray)
    } else {
        (" Analyze ", Color::Green)
    };

    let ticker = if dash.ticker.is_empty() { "Ticker (e.g. NOW)" } else { dash.ticker.as_str() };

    let spans = vec![
        Span::styled(
            " My Valuation Dashboard  ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("│  Ticker "),
        Span::styled(format!(" {ticker} "), field_style(Focus::Ticker)),
        Span::raw("  Years "),
        Span::styled(format!(" {} ", dash.years_forward), field_style(Focus::Years)),
        Span::raw("  "),
        Span::styled(
            button_text,
            Style::default().fg(Color::Black).bg(button_color).add_modifier(Modifier::BOLD),
        ),
    ];

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(paragraph, area);
}

fn render_error(f: &mut Frame, err: &str, area: Rect) {
    let paragraph = Paragraph::new(Span::styled(err.to_string(), Style::default().fg(Color::Red)))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    f.render_widget(paragraph, area);
}

fn render_placeholder(f: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(
        "  Enter a ticker and a horizon, then press Enter to generate the valuation.",
    )
    .style(Style::default().fg(Color::DarkGray))
    .block(panel(" Valuation "));
    f.render_widget(paragraph, area);
}

fn render_results(f: &mut Frame, dash: &Dashboard, summary: &Summary, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(12), Constraint::Min(0)])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[0]);
    render_card(f, summary, dash.analyzed_years, top[0]);
    render_chart(f, dash, top[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[1]);
    render_table(f, " Historical ", &dash.hist, &HISTORICAL_COLUMNS, bottom[0]);
    render_table(f, " Forecast Scenarios ", &dash.forecast, &FORECAST_COLUMNS, bottom[1]);
}

// ---------------------------------------------------------------------------
// Panels
// ---------------------------------------------------------------------------

fn render_card(f: &mut Frame, summary: &Summary, years: u32, area: Rect) {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(Span::styled(format!("My Valuation of {}", summary.ticker), label)),
        Line::from(Span::styled(
            "Based on mid case assumptions",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Current stock price     ", label),
            Span::styled(format_usd_f64(summary.current_price), value),
        ]),
        Line::from(vec![
            Span::styled("Target price            ", label),
            Span::styled(format_usd_f64(summary.target_price_mid), value),
        ]),
        Line::from(vec![
            Span::styled("Potential total return  ", label),
            Span::styled(
                format!("{} over {years} years", format_pct_f64(summary.total_return_mid)),
                value,
            ),
        ]),
        Line::from(vec![
            Span::styled("Annualized              ", label),
            Span::styled(format!("{} / year", format_pct_f64(summary.annualized_mid)), value),
        ]),
    ];

    let title = if summary.name.is_empty() {
        format!(" {} ", summary.ticker)
    } else {
        format!(" {} ", summary.name)
    };
    f.render_widget(Paragraph::new(lines).block(panel(&title)), area);
}

fn render_chart(f: &mut Frame, dash: &Dashboard, area: Rect) {
    let points = dash.chart_points();
    if points.is_empty() {
        let paragraph = Paragraph::new("  No forecast scenarios returned")
            .style(Style::default().fg(Color::DarkGray))
            .block(panel(" Price Forecast "));
        f.render_widget(paragraph, area);
        return;
    }

    let data = plot_data(&points);
    let [y_min, y_max] = price_bounds(&points);
    let x_max = (points.len() - 1).max(1) as f64;

    let datasets = vec![Dataset::default()
        .name("mid case")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Yellow))
        .data(&data)];

    let x_labels: Vec<Span> = points.iter().map(|p| Span::raw(p.label.clone())).collect();
    let y_labels = vec![
        Span::raw(format_usd_f64(y_min)),
        Span::raw(format_usd_f64((y_min + y_max) / 2.0)),
        Span::raw(format_usd_f64(y_max)),
    ];

    let chart = Chart::new(datasets)
        .block(panel(" Price Forecast "))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(y_labels),
        );
    f.render_widget(chart, area);
}

fn render_table(f: &mut Frame, title: &str, rows: &[TableRow], columns: &[Column], area: Rect) {
    let header_cells = headers(columns)
        .into_iter()
        .map(|h| Cell::from(h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1);

    let body: Vec<Row> = render_rows(rows, columns)
        .into_iter()
        .map(|cells| {
            Row::new(cells.into_iter().enumerate().map(|(i, text)| {
                let style = if i == 0 {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::Cyan)
                };
                Cell::from(text).style(style)
            }))
        })
        .collect();

    let widths: Vec<Constraint> = columns
        .iter()
        .enumerate()
        .map(|(i, _)| if i == 0 { Constraint::Min(12) } else { Constraint::Length(9) })
        .collect();

    let table = Table::new(body, widths).header(header).block(panel(title));
    f.render_widget(table, area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" [Enter] ", Style::default().fg(Color::Yellow)),
        Span::raw("analyze  "),
        Span::styled("[Tab] ", Style::default().fg(Color::Yellow)),
        Span::raw("switch field  "),
        Span::styled("[↑↓] ", Style::default().fg(Color::Yellow)),
        Span::raw("years  "),
        Span::styled("[Esc] ", Style::default().fg(Color::Yellow)),
        Span::raw("quit"),
    ]);
    f.render_widget(Paragraph::new(line).style(Style::default().fg(Color::White)), area);
}

fn panel(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::AnalysisOutcome;
    use crate::types::AnalysisResponse;
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;

    fn screen(dash: &Dashboard) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| render(f, dash)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn empty_dashboard_shows_inputs_and_hint() {
        let dash = Dashboard::new(None, "NOW", 4);
        let text = screen(&dash);
        assert!(text.contains("My Valuation Dashboard"));
        assert!(text.contains(" NOW "));
        assert!(text.contains("Analyze"));
        assert!(text.contains("press Enter"));
    }

    #[test]
    fn error_banner_is_drawn() {
        let mut dash = Dashboard::new(None, "NOW", 4);
        dash.begin_analyze();
        assert!(screen(&dash).contains("API URL not configured"));
    }

    #[test]
    fn results_render_card_and_tables() {
        let mut dash = Dashboard::new(None, "NOW", 4);
        let resp: AnalysisResponse = serde_json::from_value(json!({
            "summary": {
                "ticker": "NOW",
                "name": "ServiceNow",
                "current_price": 100.0,
                "target_price_mid": 150.0,
                "total_return_mid": 0.5,
                "annualized_mid": 0.1067
            },
            "hist_table": [{ "Metric": "EPS Growth", "1 Year": 0.05, "5 Years": 2.345, "10 Years": null }],
            "forecast_table": [{ "Scenario": "Mid", "Total Return": 0.5, "Exit P/E": 30 }]
        }))
        .unwrap();
        dash.finish_analyze(AnalysisOutcome { years_forward: 4, result: Ok(resp) });

        let text = screen(&dash);
        assert!(text.contains("My Valuation of NOW"));
        assert!(text.contains("$100.00"));
        assert!(text.contains("$150.00"));
        assert!(text.contains("50.0% over 4 years"));
        assert!(text.contains("10.7% / year"));
        assert!(text.contains("Price Forecast"));
        assert!(text.contains("EPS Growth"));
        assert!(text.contains("2.35"));
        assert!(text.contains("Forecast Scenarios"));
        assert!(text.contains("30.0"));
    }
}
