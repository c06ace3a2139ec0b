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

use super::components::fields::TextField;
use crate::models::{Advisor, AdvisorRole};

const EMAIL: usize = 0;
const PASSWORD: usize = 1;
const FIRST_NAME: usize = 2;
const LAST_NAME: usize = 3;

/// Payload for a new system user: an auth account plus an advisor row.
pub struct NewAdvisorAccount {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: AdvisorRole,
}

struct AddForm {
    fields: Vec<TextField>,
    role: AdvisorRole,
    current_field: usize,
    editing: bool,
}

impl AddForm {
    fn new() -> Self {
        Self {
            fields: vec![
                TextField::new("Email *"),
                TextField::new("Password *"),
                TextField::new("First Name *"),
                TextField::new("Last Name *"),
            ],
            role: AdvisorRole::Advisor,
            current_field: 0,
            editing: false,
        }
    }

    fn is_valid(&self) -> bool {
        self.fields.iter().all(|f| !f.is_empty())
    }
}

/// Name edit for an existing user; typing goes straight into the focused
/// field.
struct EditDraft {
    id: i32,
    first_name: TextField,
    last_name: TextField,
    on_last: bool,
}

/// Admin user management: list, add, rename, toggle role and active flag.
pub struct AdvisorsState {
    advisors: Vec<Advisor>,
    list_state: ListState,
    add_form: Option<AddForm>,
    edit_draft: Option<EditDraft>,
}

impl AdvisorsState {
    pub fn new(advisors: Vec<Advisor>) -> Self {
        let mut list_state = ListState::default();
        if !advisors.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            advisors,
            list_state,
            add_form: None,
            edit_draft: None,
        }
    }

    fn next(&mut self) {
        if self.advisors.is_empty() {
            return;
        }
        let i = self
            .list_state
            .selected()
            .map_or(0, |i| (i + 1) % self.advisors.len());
        self.list_state.select(Some(i));
    }

    fn previous(&mut self) {
        if self.advisors.is_empty() {
            return;
        }
        let i = self.list_state.selected().map_or(0, |i| {
            if i == 0 { self.advisors.len() - 1 } else { i - 1 }
        });
        self.list_state.select(Some(i));
    }

    fn selected(&self) -> Option<&Advisor> {
        self.list_state.selected().and_then(|i| self.advisors.get(i))
    }
}

pub enum AdvisorAction {
    Back,
    Create(NewAdvisorAccount),
    Rename {
        id: i32,
        first_name: String,
        last_name: String,
    },
    ToggleActive(i32, bool),
    ToggleRole(i32, AdvisorRole),
}

pub fn render_advisors<B: Backend>(frame: &mut Frame<B>, state: &mut AdvisorsState) {
    let size = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(3)].as_ref())
        .split(size);

    let active = state.advisors.iter().filter(|a| a.is_active).count();
    let admins = state
        .advisors
        .iter()
        .filter(|a| a.role == AdvisorRole::Admin)
        .count();
    let summary = Paragraph::new(format!(
        "{} users  |  {} active  |  {} admins",
        state.advisors.len(),
        active,
        admins
    ))
    .block(Block::default().title("User Management").borders(Borders::ALL));
    frame.render_widget(summary, chunks[0]);

    let items: Vec<ListItem> = state
        .advisors
        .iter()
        .map(|advisor| {
            let line = format!(
                "{:<28} {:<28} {:<8} {}",
                advisor.full_name(),
                advisor.email,
                advisor.role,
                if advisor.is_active { "active" } else { "inactive" }
            );
            let style = if advisor.is_active {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            ListItem::new(Spans::from(line)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title("Advisors").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(list, chunks[1], &mut state.list_state);

    let help = Paragraph::new(
        "<N> Add User | <E> Rename | <T> Toggle Active | <R> Toggle Role | <Esc> Back",
    )
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help, chunks[2]);

    if let Some(draft) = &state.edit_draft {
        let focused = Style::default().fg(Color::Yellow);
        let blurred = Style::default();
        let popup = Paragraph::new(vec![
            Spans::from(""),
            Spans::from(Span::styled(
                format!("First Name: {}", draft.first_name.value),
                if draft.on_last { blurred } else { focused },
            )),
            Spans::from(Span::styled(
                format!("Last Name: {}", draft.last_name.value),
                if draft.on_last { focused } else { blurred },
            )),
            Spans::from(""),
            Spans::from("<Tab> Switch  <Enter> Save  <Esc> Cancel"),
        ])
        .block(Block::default().title("Rename User").borders(Borders::ALL))
        .style(Style::default().fg(Color::White).bg(Color::Black));
        frame.render_widget(popup, super::centered_rect(50, 30, size));
    }

    if let Some(form) = &state.add_form {
        let mut lines: Vec<Spans> = form
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let style = if i == form.current_field {
                    if form.editing {
                        Style::default().fg(Color::Yellow)
                    } else {
                        Style::default().fg(Color::Cyan)
                    }
                } else {
                    Style::default()
                };
                let shown = if i == PASSWORD {
                    "*".repeat(field.value.chars().count())
                } else {
                    field.value.clone()
                };
                Spans::from(Span::styled(format!("{}: {}", field.label, shown), style))
            })
            .collect();
        lines.push(Spans::from(""));
        lines.push(Spans::from(format!(
            "Role: {}  (press <R> to change)",
            form.role
        )));
        lines.push(Spans::from(""));
        lines.push(Spans::from("<Enter> Create  <Esc> Cancel"));

        let popup = Paragraph::new(lines)
            .block(Block::default().title("Add User").borders(Borders::ALL))
            .style(Style::default().fg(Color::White).bg(Color::Black));
        frame.render_widget(popup, super::centered_rect(60, 50, size));
    }
}

pub fn handle_input(state: &mut AdvisorsState) -> Result<Option<AdvisorAction>> {
    if let Event::Key(key) = event::read()? {
        if state.edit_draft.is_some() {
            match key.code {
                KeyCode::Esc => state.edit_draft = None,
                KeyCode::Tab => {
                    if let Some(draft) = &mut state.edit_draft {
                        draft.on_last = !draft.on_last;
                    }
                }
                KeyCode::Enter => {
                    if let Some(draft) = state.edit_draft.take() {
                        return Ok(Some(AdvisorAction::Rename {
                            id: draft.id,
                            first_name: draft.first_name.value.trim().to_string(),
                            last_name: draft.last_name.value.trim().to_string(),
                        }));
                    }
                }
                code => {
                    if let Some(draft) = &mut state.edit_draft {
                        if draft.on_last {
                            draft.last_name.handle_key(code);
                        } else {
                            draft.first_name.handle_key(code);
                        }
                    }
                }
            }
            return Ok(None);
        }

        if state.add_form.is_some() {
            let mut action = None;
            if let Some(form) = &mut state.add_form {
                if form.editing {
                    match key.code {
                        KeyCode::Esc | KeyCode::Enter => form.editing = false,
                        KeyCode::Tab => {
                            form.editing = false;
                            form.current_field = (form.current_field + 1) % form.fields.len();
                        }
                        code => form.fields[form.current_field].handle_key(code),
                    }
                    return Ok(None);
                }

                match key.code {
                    KeyCode::Esc => action = Some(None),
                    KeyCode::Down | KeyCode::Tab => {
                        form.current_field = (form.current_field + 1) % form.fields.len();
                    }
                    KeyCode::Up => {
                        form.current_field = if form.current_field == 0 {
                            form.fields.len() - 1
                        } else {
                            form.current_field - 1
                        };
                    }
                    KeyCode::Char('e') => form.editing = true,
                    KeyCode::Char('r') => {
                        form.role = match form.role {
                            AdvisorRole::Admin => AdvisorRole::Advisor,
                            AdvisorRole::Advisor => AdvisorRole::Admin,
                        };
                    }
                    KeyCode::Enter => {
                        if form.is_valid() {
                            action = Some(Some(NewAdvisorAccount {
                                email: form.fields[EMAIL].value.trim().to_string(),
                                password: form.fields[PASSWORD].value.clone(),
                                first_name: form.fields[FIRST_NAME].value.trim().to_string(),
                                last_name: form.fields[LAST_NAME].value.trim().to_string(),
                                role: form.role,
                            }));
                        }
                    }
                    _ => {}
                }
            }

            // Leaving the popup, with or without a payload.
            if let Some(created) = action {
                state.add_form = None;
                if let Some(account) = created {
                    return Ok(Some(AdvisorAction::Create(account)));
                }
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Some(AdvisorAction::Back)),
            KeyCode::Char('n') => state.add_form = Some(AddForm::new()),
            KeyCode::Char('e') => {
                let draft = state.selected().map(|advisor| EditDraft {
                    id: advisor.id,
                    first_name: TextField::with_value("First Name", advisor.first_name.clone()),
                    last_name: TextField::with_value("Last Name", advisor.last_name.clone()),
                    on_last: false,
                });
                if draft.is_some() {
                    state.edit_draft = draft;
                }
            }
            KeyCode::Char('t') => {
                if let Some(advisor) = state.selected() {
                    return Ok(Some(AdvisorAction::ToggleActive(
                        advisor.id,
                        !advisor.is_active,
                    )));
                }
            }
            KeyCode::Char('r') => {
                if let Some(advisor) = state.selected() {
                    let role = match advisor.role {
                        AdvisorRole::Admin => AdvisorRole::Advisor,
                        AdvisorRole::Advisor => AdvisorRole::Admin,
                    };
                    return Ok(Some(AdvisorAction::ToggleRole(advisor.id, role)));
                }
            }
            KeyCode::Down => state.next(),
            KeyCode::Up => state.previous(),
            _ => {}
        }
    }
    Ok(None)
}
