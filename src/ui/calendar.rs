use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Spans,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::centered_rect;
use crate::models::{Appointment, AppointmentStatus};

pub struct CalendarState {
    advisor_id: i32,
    appointments: Vec<Appointment>,
    list_state: ListState,
    show_delete_confirmation: bool,
}

impl CalendarState {
    pub fn new(advisor_id: i32, appointments: Vec<Appointment>) -> Self {
        let mut list_state = ListState::default();
        if !appointments.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            advisor_id,
            appointments,
            list_state,
            show_delete_confirmation: false,
        }
    }

    pub fn next(&mut self) {
        if self.appointments.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i >= self.appointments.len() - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.appointments.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => self.appointments.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    pub fn selected_appointment(&self) -> Option<&Appointment> {
        self.list_state
            .selected()
            .and_then(|i| self.appointments.get(i))
    }

    pub fn selected_appointment_id(&self) -> Option<i32> {
        self.selected_appointment().map(|a| a.id)
    }

    pub fn advisor_id(&self) -> i32 {
        self.advisor_id
    }
}

pub enum CalendarAction {
    Back,
    NewAppointment,
    EditAppointment(i32),
    DeleteAppointment(i32),
    SetStatus(i32, AppointmentStatus),
}

pub fn render_calendar<B: Backend>(frame: &mut Frame<B>, state: &mut CalendarState) {
    let size = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(size);

    let items: Vec<ListItem> = state
        .appointments
        .iter()
        .map(|appointment| {
            let line = format!(
                "{}  {:<30} {}",
                appointment.start_time.format("%Y-%m-%d %H:%M"),
                appointment.title,
                appointment.status
            );
            let style = match appointment.status {
                AppointmentStatus::Cancelled => Style::default().fg(Color::DarkGray),
                AppointmentStatus::Completed => Style::default().fg(Color::Green),
                _ => Style::default(),
            };
            ListItem::new(Spans::from(line)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title("Calendar").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(list, chunks[0], &mut state.list_state);

    let buttons = Paragraph::new(
        "<N> New | <E> Edit | <C> Complete | <X> Cancel Appt | <D> Delete | <Esc> Back",
    )
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(buttons, chunks[1]);

    if state.show_delete_confirmation {
        let popup = Paragraph::new(vec![
            Spans::from(""),
            Spans::from("Are you sure you want to delete this appointment?"),
            Spans::from(""),
            Spans::from("<Y> Yes  <N> No"),
        ])
        .block(Block::default().title("Confirm Delete").borders(Borders::ALL))
        .style(Style::default().fg(Color::White).bg(Color::Black));
        frame.render_widget(popup, centered_rect(50, 20, size));
    }
}

pub fn handle_input(state: &mut CalendarState) -> Result<Option<CalendarAction>> {
    if let Event::Key(key) = event::read()? {
        if state.show_delete_confirmation {
            match key.code {
                KeyCode::Char('y') => {
                    if let Some(id) = state.selected_appointment_id() {
                        state.toggle_delete_confirmation();
                        return Ok(Some(CalendarAction::DeleteAppointment(id)));
                    }
                }
                KeyCode::Char('n') | KeyCode::Esc => state.toggle_delete_confirmation(),
                _ => {}
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Some(CalendarAction::Back)),
            KeyCode::Char('n') => return Ok(Some(CalendarAction::NewAppointment)),
            KeyCode::Char('e') => {
                if let Some(id) = state.selected_appointment_id() {
                    return Ok(Some(CalendarAction::EditAppointment(id)));
                }
            }
            KeyCode::Char('c') => {
                if let Some(id) = state.selected_appointment_id() {
                    return Ok(Some(CalendarAction::SetStatus(
                        id,
                        AppointmentStatus::Completed,
                    )));
                }
            }
            KeyCode::Char('x') => {
                if let Some(id) = state.selected_appointment_id() {
                    return Ok(Some(CalendarAction::SetStatus(
                        id,
                        AppointmentStatus::Cancelled,
                    )));
                }
            }
            KeyCode::Char('d') => {
                if state.selected_appointment().is_some() {
                    state.toggle_delete_confirmation();
                }
            }
            KeyCode::Down => state.next(),
            KeyCode::Up => state.previous(),
            _ => {}
        }
    }
    Ok(None)
}
