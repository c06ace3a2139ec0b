use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::centered_rect;
use crate::consultation::ReviewDecision;
use crate::models::{ConsultationRequest, RequestStatus};

const FILTERS: [Option<RequestStatus>; 5] = [
    None,
    Some(RequestStatus::Pending),
    Some(RequestStatus::Approved),
    Some(RequestStatus::Declined),
    Some(RequestStatus::Completed),
];

/// Notes entry for an approve/decline in flight.
struct ReviewDraft {
    id: i32,
    decision: ReviewDecision,
    notes: String,
}

/// Admin review queue for consultation requests.
pub struct ConsultationsState {
    requests: Vec<ConsultationRequest>,
    filter: Option<RequestStatus>,
    list_state: ListState,
    review: Option<ReviewDraft>,
}

impl ConsultationsState {
    pub fn new(requests: Vec<ConsultationRequest>) -> Self {
        let mut list_state = ListState::default();
        if !requests.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            requests,
            filter: None,
            list_state,
            review: None,
        }
    }

    fn filtered(&self) -> Vec<&ConsultationRequest> {
        self.requests
            .iter()
            .filter(|r| self.filter.is_none_or(|status| r.status == status))
            .collect()
    }

    fn cycle_filter(&mut self) {
        let i = FILTERS.iter().position(|f| *f == self.filter).unwrap_or(0);
        self.filter = FILTERS[(i + 1) % FILTERS.len()];
        let len = self.filtered().len();
        self.list_state
            .select(if len == 0 { None } else { Some(0) });
    }

    fn next(&mut self) {
        let len = self.filtered().len();
        if len == 0 {
            return;
        }
        let i = self.list_state.selected().map_or(0, |i| (i + 1) % len);
        self.list_state.select(Some(i));
    }

    fn previous(&mut self) {
        let len = self.filtered().len();
        if len == 0 {
            return;
        }
        let i = self
            .list_state
            .selected()
            .map_or(0, |i| if i == 0 { len - 1 } else { i - 1 });
        self.list_state.select(Some(i));
    }

    fn selected(&self) -> Option<&ConsultationRequest> {
        let filtered = self.filtered();
        self.list_state
            .selected()
            .and_then(|i| filtered.get(i).copied())
    }
}

pub enum ConsultationAction {
    Back,
    Review {
        id: i32,
        decision: ReviewDecision,
        notes: Option<String>,
    },
    Promote(i32),
}

pub fn render_consultations<B: Backend>(frame: &mut Frame<B>, state: &mut ConsultationsState) {
    let size = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(6),
                Constraint::Length(7),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(size);

    let filter_label = state
        .filter
        .map_or("all".to_string(), |status| status.to_string());
    let items: Vec<ListItem> = state
        .filtered()
        .iter()
        .map(|request| {
            let line = format!(
                "{}  {:<24} {:<12} {:<10} {}",
                request.created_at.format("%Y-%m-%d"),
                request.requester_name(),
                request.request_type,
                request.status,
                request.email
            );
            let style = match request.status {
                RequestStatus::Pending => Style::default().fg(Color::Yellow),
                RequestStatus::Approved => Style::default().fg(Color::Green),
                RequestStatus::Declined => Style::default().fg(Color::Red),
                RequestStatus::Completed => Style::default().fg(Color::DarkGray),
            };
            ListItem::new(Spans::from(line)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!("Consultation Requests ({filter_label})"))
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(list, chunks[0], &mut state.list_state);

    let detail_lines = match state.selected() {
        Some(request) => vec![
            Spans::from(format!(
                "Requested slot: {} at {}",
                request.preferred_date, request.preferred_time
            )),
            Spans::from(format!(
                "Phone: {}",
                request.phone.as_deref().unwrap_or("-")
            )),
            Spans::from(format!(
                "Message: {}",
                request.message.as_deref().unwrap_or("-")
            )),
            Spans::from(format!(
                "Admin notes: {}",
                request.admin_notes.as_deref().unwrap_or("-")
            )),
            Spans::from(format!(
                "Appointment: {}",
                request
                    .appointment_id
                    .map(|id| format!("#{id}"))
                    .unwrap_or_else(|| "not scheduled".to_string())
            )),
        ],
        None => vec![Spans::from("No request selected.")],
    };
    let details = Paragraph::new(detail_lines)
        .block(Block::default().title("Details").borders(Borders::ALL));
    frame.render_widget(details, chunks[1]);

    let help = Paragraph::new(
        "<A> Approve | <D> Decline | <P> Schedule Appointment | <F> Filter | <Esc> Back",
    )
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help, chunks[2]);

    if let Some(draft) = &state.review {
        let verb = match draft.decision {
            ReviewDecision::Approved => "Approve",
            ReviewDecision::Declined => "Decline",
        };
        let popup = Paragraph::new(vec![
            Spans::from(""),
            Spans::from(format!("{verb} request #{}", draft.id)),
            Spans::from(""),
            Spans::from(Span::styled(
                format!("Notes: {}", draft.notes),
                Style::default().fg(Color::Yellow),
            )),
            Spans::from(""),
            Spans::from("<Enter> Confirm  <Esc> Cancel"),
        ])
        .block(Block::default().title("Review").borders(Borders::ALL))
        .style(Style::default().fg(Color::White).bg(Color::Black));
        frame.render_widget(popup, centered_rect(60, 30, size));
    }
}

pub fn handle_input(state: &mut ConsultationsState) -> Result<Option<ConsultationAction>> {
    if let Event::Key(key) = event::read()? {
        if state.review.is_some() {
            match key.code {
                KeyCode::Esc => state.review = None,
                KeyCode::Enter => {
                    if let Some(draft) = state.review.take() {
                        let notes = draft.notes.trim().to_string();
                        return Ok(Some(ConsultationAction::Review {
                            id: draft.id,
                            decision: draft.decision,
                            notes: if notes.is_empty() { None } else { Some(notes) },
                        }));
                    }
                }
                KeyCode::Char(c) => {
                    if let Some(draft) = &mut state.review {
                        draft.notes.push(c);
                    }
                }
                KeyCode::Backspace => {
                    if let Some(draft) = &mut state.review {
                        draft.notes.pop();
                    }
                }
                _ => {}
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Some(ConsultationAction::Back)),
            KeyCode::Char('f') => state.cycle_filter(),
            KeyCode::Char('a') => {
                if let Some(id) = state.selected().map(|r| r.id) {
                    state.review = Some(ReviewDraft {
                        id,
                        decision: ReviewDecision::Approved,
                        notes: String::new(),
                    });
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = state.selected().map(|r| r.id) {
                    state.review = Some(ReviewDraft {
                        id,
                        decision: ReviewDecision::Declined,
                        notes: String::new(),
                    });
                }
            }
            KeyCode::Char('p') => {
                if let Some(request) = state.selected() {
                    // Declined and completed requests stay where they are.
                    if matches!(
                        request.status,
                        RequestStatus::Pending | RequestStatus::Approved
                    ) {
                        return Ok(Some(ConsultationAction::Promote(request.id)));
                    }
                }
            }
            KeyCode::Down => state.next(),
            KeyCode::Up => state.previous(),
            _ => {}
        }
    }
    Ok(None)
}
