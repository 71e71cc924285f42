//! UI rendering for the TUI.
//!
//! Defines the dashboard layout: title bar, two result tables, the defect
//! trend chart, and a status line.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::app::App;
use super::widgets::{ResultTableView, TrendChart};
use crate::dashboard::{PanelData, PanelKind};

/// Renders the whole dashboard.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_title(frame, app, chunks[0]);
    render_body(frame, app, chunks[1]);
    render_status(frame, app, chunks[2]);
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            "capwatch",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" · Titos Cap Inspection Dashboard · "),
        Span::styled(&app.connection, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_body(frame: &mut Frame, app: &App, area: Rect) {
    let Some(data) = &app.data else {
        let text = if app.is_refreshing {
            "Loading dashboard data..."
        } else {
            "No data. Press r to refresh."
        };
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let tables = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    if let Some(panel) = data.panel(PanelKind::Inspections) {
        render_table_panel(frame, panel, tables[0]);
    }
    if let Some(panel) = data.panel(PanelKind::BottleSummary) {
        render_table_panel(frame, panel, tables[1]);
    }

    render_trend_panel(frame, app, rows[1]);
}

fn render_table_panel(frame: &mut Frame, panel: &PanelData, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(panel.title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &panel.result {
        Ok(table) => frame.render_widget(ResultTableView::new(table), inner),
        Err(msg) => render_error(frame, msg, inner),
    }
}

fn render_trend_panel(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Defects Over Time");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(data) = &app.data else { return };
    match &data.series {
        Ok(series) if series.is_empty() => {
            frame.render_widget(
                Paragraph::new("(no defect data)").style(Style::default().fg(Color::DarkGray)),
                inner,
            );
        }
        Ok(series) => frame.render_widget(TrendChart::new(series), inner),
        Err(msg) => render_error(frame, msg, inner),
    }
}

fn render_error(frame: &mut Frame, message: &str, area: Rect) {
    frame.render_widget(
        Paragraph::new(message.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    frame.render_widget(
        Paragraph::new(app.status_text()).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
