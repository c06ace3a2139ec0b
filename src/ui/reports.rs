use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Spans,
    widgets::{Block, Borders, Paragraph},
};

use crate::models::{ClientStatus, TaskStatus};

/// Everything the reports screen shows, computed up front from the loaded
/// collections.
pub struct ReportSummary {
    pub range_label: String,
    pub client_count: usize,
    pub active_clients: usize,
    pub appointment_count: usize,
    pub task_count: usize,
    pub total_aum: f64,
    pub total_net_worth: f64,
    pub client_statuses: Vec<(ClientStatus, usize)>,
    pub task_statuses: Vec<(TaskStatus, usize)>,
    pub monthly_appointments: Vec<(String, usize)>,
    pub top_clients: Vec<(String, f64)>,
}

pub struct ReportsState {
    pub summary: ReportSummary,
}

impl ReportsState {
    pub fn new(summary: ReportSummary) -> Self {
        Self { summary }
    }
}

pub enum ReportsAction {
    Back,
}

pub fn render_reports<B: Backend>(frame: &mut Frame<B>, state: &mut ReportsState) {
    let summary = &state.summary;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Min(6),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(frame.size());

    let title = Paragraph::new(format!("Reports  -  {}", summary.range_label))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let totals = Paragraph::new(vec![
        Spans::from(format!(
            "Clients: {} ({} active)   Appointments: {}   Tasks: {}",
            summary.client_count,
            summary.active_clients,
            summary.appointment_count,
            summary.task_count
        )),
        Spans::from(format!(
            "Assets under management: ${:.2}   Combined net worth: ${:.2}",
            summary.total_aum, summary.total_net_worth
        )),
    ])
    .block(Block::default().title("Overview").borders(Borders::ALL));
    frame.render_widget(totals, chunks[1]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[2]);

    let mut left_lines = vec![Spans::from(section_header("Client status"))];
    for (status, count) in &summary.client_statuses {
        left_lines.push(Spans::from(format!("  {status}: {count}")));
    }
    left_lines.push(Spans::from(""));
    left_lines.push(Spans::from(section_header("Task status")));
    for (status, count) in &summary.task_statuses {
        left_lines.push(Spans::from(format!("  {status}: {count}")));
    }
    let left = Paragraph::new(left_lines)
        .block(Block::default().title("Breakdown").borders(Borders::ALL));
    frame.render_widget(left, columns[0]);

    let mut right_lines = vec![Spans::from(section_header("Appointments per month"))];
    for (month, count) in &summary.monthly_appointments {
        right_lines.push(Spans::from(format!("  {month}: {count}")));
    }
    right_lines.push(Spans::from(""));
    right_lines.push(Spans::from(section_header("Top clients by AUM")));
    for (name, aum) in &summary.top_clients {
        right_lines.push(Spans::from(format!("  {name}: ${aum:.2}")));
    }
    let right = Paragraph::new(right_lines)
        .block(Block::default().title("Activity").borders(Borders::ALL));
    frame.render_widget(right, columns[1]);

    let help = Paragraph::new("<Esc> Back").block(Block::default().borders(Borders::TOP));
    frame.render_widget(help, chunks[3]);
}

fn section_header(text: &str) -> tui::text::Span<'_> {
    tui::text::Span::styled(text, Style::default().add_modifier(Modifier::UNDERLINED))
}

pub fn handle_input(_state: &mut ReportsState) -> Result<Option<ReportsAction>> {
    if let Event::Key(key) = event::read()? {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter) {
            return Ok(Some(ReportsAction::Back));
        }
    }
    Ok(None)
}
