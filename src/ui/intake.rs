use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
};

use super::centered_rect;
use super::components::fields::{TextField, parse_date, parse_time};
use crate::models::{NewConsultationRequest, RequestType};

const FIRST_NAME: usize = 0;
const LAST_NAME: usize = 1;
const EMAIL: usize = 2;
const PHONE: usize = 3;
const PREFERRED_DATE: usize = 4;
const PREFERRED_TIME: usize = 5;
const MESSAGE: usize = 6;

const REQUEST_TYPES: [RequestType; 4] = [
    RequestType::Initial,
    RequestType::FollowUp,
    RequestType::Pension,
    RequestType::Business,
];

/// Public consultation intake form. Requires no sign-in.
pub struct IntakeState {
    fields: Vec<TextField>,
    request_type: RequestType,
    current_field: usize,
    editing: bool,
    pub error: Option<String>,
    pub submitted: bool,
}

impl IntakeState {
    pub fn new() -> Self {
        Self {
            fields: vec![
                TextField::new("First Name *"),
                TextField::new("Last Name *"),
                TextField::new("Email *"),
                TextField::new("Phone"),
                TextField::new("Preferred Date (YYYY-MM-DD) *"),
                TextField::new("Preferred Time (HH:MM) *"),
                TextField::new("Message"),
            ],
            request_type: RequestType::Initial,
            current_field: 0,
            editing: false,
            error: None,
            submitted: false,
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

    fn cycle_request_type(&mut self) {
        let i = REQUEST_TYPES
            .iter()
            .position(|t| *t == self.request_type)
            .unwrap_or(0);
        self.request_type = REQUEST_TYPES[(i + 1) % REQUEST_TYPES.len()];
    }

    /// Required-field presence is the only validation this form does.
    fn build(&self) -> Result<NewConsultationRequest, String> {
        let value = |i: usize| self.fields[i].value.trim().to_string();

        if self.fields[FIRST_NAME].is_empty()
            || self.fields[LAST_NAME].is_empty()
            || self.fields[EMAIL].is_empty()
        {
            return Err("Name and email are required.".to_string());
        }
        let preferred_date = parse_date(&self.fields[PREFERRED_DATE].value)
            .ok_or_else(|| "Preferred date must look like 2025-03-01.".to_string())?;
        let preferred_time = parse_time(&self.fields[PREFERRED_TIME].value)
            .ok_or_else(|| "Preferred time must look like 10:00.".to_string())?;

        let optional = |i: usize| {
            let v = value(i);
            if v.is_empty() { None } else { Some(v) }
        };

        Ok(NewConsultationRequest {
            first_name: value(FIRST_NAME),
            last_name: value(LAST_NAME),
            email: value(EMAIL),
            phone: optional(PHONE),
            preferred_date,
            preferred_time,
            message: optional(MESSAGE),
            request_type: self.request_type,
        })
    }
}

pub enum IntakeAction {
    Submit(NewConsultationRequest),
    Cancel,
}

pub fn render_intake<B: Backend>(frame: &mut Frame<B>, state: &mut IntakeState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(2),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(frame.size());

    let title = Paragraph::new("Request a Consultation")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let mut lines: Vec<Spans> = state
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
    lines.push(Spans::from(""));
    lines.push(Spans::from(format!(
        "Consultation Type: {}  (press <T> to change)",
        state.request_type.label()
    )));

    let form = Paragraph::new(lines).block(
        Block::default()
            .title("Your Details")
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

    let help =
        Paragraph::new("<Up/Down> Field | <E> Edit | <T> Type | <Enter> Submit | <Esc> Back")
            .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help, chunks[3]);

    if state.submitted {
        let popup = Paragraph::new(vec![
            Spans::from(""),
            Spans::from("Thank you! Your request was received."),
            Spans::from("Our team will review it and be in touch."),
            Spans::from(""),
            Spans::from("<Enter> Done"),
        ])
        .block(Block::default().title("Request Sent").borders(Borders::ALL))
        .style(Style::default().fg(Color::White).bg(Color::Black));
        frame.render_widget(popup, centered_rect(50, 30, frame.size()));
    }
}

pub fn handle_input(state: &mut IntakeState) -> Result<Option<IntakeAction>> {
    if let Event::Key(key) = event::read()? {
        if state.submitted {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                return Ok(Some(IntakeAction::Cancel));
            }
            return Ok(None);
        }

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
            KeyCode::Esc => return Ok(Some(IntakeAction::Cancel)),
            KeyCode::Down | KeyCode::Tab => state.next_field(),
            KeyCode::Up => state.previous_field(),
            KeyCode::Char('e') => state.editing = true,
            KeyCode::Char('t') => state.cycle_request_type(),
            KeyCode::Enter => match state.build() {
                Ok(request) => {
                    state.error = None;
                    return Ok(Some(IntakeAction::Submit(request)));
                }
                Err(message) => state.error = Some(message),
            },
            _ => {}
        }
    }
    Ok(None)
}
