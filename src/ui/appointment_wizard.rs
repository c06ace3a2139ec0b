use anyhow::Result;
use chrono::Utc;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
};

use super::components::fields::{TextField, parse_datetime, parse_optional_id};
use crate::models::{Appointment, AppointmentStatus};

const TITLE: usize = 0;
const DESCRIPTION: usize = 1;
const START: usize = 2;
const END: usize = 3;
const LOCATION: usize = 4;
const MEETING_LINK: usize = 5;
const CLIENT_ID: usize = 6;

pub struct AppointmentWizardState {
    advisor_id: i32,
    existing: Option<Appointment>,
    fields: Vec<TextField>,
    current_field: usize,
    editing: bool,
    pub error: Option<String>,
}

impl AppointmentWizardState {
    pub fn new(advisor_id: i32) -> Self {
        Self {
            advisor_id,
            existing: None,
            fields: vec![
                TextField::new("Title *"),
                TextField::new("Description"),
                TextField::new("Start (YYYY-MM-DD HH:MM) *"),
                TextField::new("End (YYYY-MM-DD HH:MM) *"),
                TextField::new("Location"),
                TextField::new("Meeting Link"),
                TextField::new("Client Id"),
            ],
            current_field: 0,
            editing: false,
            error: None,
        }
    }

    pub fn from_existing(appointment: Appointment) -> Self {
        let fields = vec![
            TextField::with_value("Title *", appointment.title.clone()),
            TextField::with_value("Description", appointment.description.clone()),
            TextField::with_value(
                "Start (YYYY-MM-DD HH:MM) *",
                appointment.start_time.format("%Y-%m-%d %H:%M").to_string(),
            ),
            TextField::with_value(
                "End (YYYY-MM-DD HH:MM) *",
                appointment.end_time.format("%Y-%m-%d %H:%M").to_string(),
            ),
            TextField::with_value("Location", appointment.location.clone()),
            TextField::with_value(
                "Meeting Link",
                appointment.meeting_link.clone().unwrap_or_default(),
            ),
            TextField::with_value(
                "Client Id",
                appointment
                    .client_id
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
            ),
        ];

        Self {
            advisor_id: appointment.advisor_id,
            existing: Some(appointment),
            fields,
            current_field: 0,
            editing: false,
            error: None,
        }
    }

    fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % self.fields.len();
    }

    fn previous_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            self.fields.len() - 1
        } else {
            self.current_field - 1
        };
    }

    fn build(&self) -> Result<Appointment, String> {
        if self.fields[TITLE].is_empty() {
            return Err("Title is required.".to_string());
        }
        let start_time = parse_datetime(&self.fields[START].value)
            .ok_or_else(|| "Start must look like 2025-03-01 10:00.".to_string())?;
        let end_time = parse_datetime(&self.fields[END].value)
            .ok_or_else(|| "End must look like 2025-03-01 11:00.".to_string())?;
        if end_time <= start_time {
            return Err("End must be after start.".to_string());
        }

        let meeting_link = self.fields[MEETING_LINK].value.trim().to_string();

        Ok(Appointment {
            id: self.existing.as_ref().map_or(0, |a| a.id),
            advisor_id: self.advisor_id,
            client_id: parse_optional_id(&self.fields[CLIENT_ID].value),
            title: self.fields[TITLE].value.trim().to_string(),
            description: self.fields[DESCRIPTION].value.trim().to_string(),
            start_time,
            end_time,
            location: self.fields[LOCATION].value.trim().to_string(),
            meeting_link: if meeting_link.is_empty() {
                None
            } else {
                Some(meeting_link)
            },
            status: self
                .existing
                .as_ref()
                .map_or(AppointmentStatus::Scheduled, |a| a.status),
            created_at: self.existing.as_ref().map_or_else(Utc::now, |a| a.created_at),
        })
    }
}

pub enum AppointmentWizardAction {
    Cancel,
    Save(Appointment),
}

pub fn render_appointment_wizard<B: Backend>(
    frame: &mut Frame<B>,
    state: &mut AppointmentWizardState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(9),
                Constraint::Length(2),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(frame.size());

    let title_text = if state.existing.is_none() {
        "New Appointment"
    } else {
        "Edit Appointment"
    };
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let lines: Vec<Spans> = state
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let style = if i == state.current_field {
                if state.editing {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::Cyan)
                }
            } else {
                Style::default()
            };
            Spans::from(Span::styled(
                format!("{}: {}", field.label, field.value),
                style,
            ))
        })
        .collect();

    let form = Paragraph::new(lines).block(
        Block::default()
            .title("Appointment Details")
            .borders(Borders::ALL),
    );
    frame.render_widget(form, chunks[1]);

    if let Some(error) = &state.error {
        let error_line = Paragraph::new(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(error_line, chunks[2]);
    }

    let help = Paragraph::new("<Up/Down> Field | <E> Edit | <Enter> Save | <Esc> Cancel")
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help, chunks[3]);
}

pub fn handle_input(state: &mut AppointmentWizardState) -> Result<Option<AppointmentWizardAction>> {
    if let Event::Key(key) = event::read()? {
        if state.editing {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => state.editing = false,
                KeyCode::Tab => {
                    state.editing = false;
                    state.next_field();
                }
                code => state.fields[state.current_field].handle_key(code),
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Esc => return Ok(Some(AppointmentWizardAction::Cancel)),
            KeyCode::Down | KeyCode::Tab => state.next_field(),
            KeyCode::Up => state.previous_field(),
            KeyCode::Char('e') => state.editing = true,
            KeyCode::Enter => match state.build() {
                Ok(appointment) => return Ok(Some(AppointmentWizardAction::Save(appointment))),
                Err(message) => state.error = Some(message),
            },
            _ => {}
        }
    }
    Ok(None)
}
