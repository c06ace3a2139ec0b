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

use super::components::fields::TextField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    Advisor,
    Admin,
}

#[derive(Clone, Copy, PartialEq)]
enum LoginField {
    Email,
    Password,
}

pub struct LoginState {
    pub mode: LoginMode,
    email: TextField,
    password: TextField,
    current_field: LoginField,
    editing: bool,
    /// Inline failure message; login failures never leave this screen.
    pub error: Option<String>,
}

impl LoginState {
    pub fn new(mode: LoginMode) -> Self {
        Self {
            mode,
            email: TextField::new("Email"),
            password: TextField::new("Password"),
            current_field: LoginField::Email,
            editing: false,
            error: None,
        }
    }

    fn next_field(&mut self) {
        self.current_field = match self.current_field {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    fn is_valid(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

pub enum LoginAction {
    Submit { email: String, password: String },
    Back,
}

pub fn render_login<B: Backend>(frame: &mut Frame<B>, state: &mut LoginState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(frame.size());

    let title_text = match state.mode {
        LoginMode::Advisor => "Advisor Sign In",
        LoginMode::Admin => "Admin Access",
    };
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let field_style = |field: LoginField, state: &LoginState| {
        if state.current_field == field {
            if state.editing {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Cyan)
            }
        } else {
            Style::default()
        }
    };

    let email = Paragraph::new(state.email.value.as_str())
        .style(field_style(LoginField::Email, state))
        .block(Block::default().borders(Borders::ALL).title("Email"));
    frame.render_widget(email, chunks[1]);

    let masked = "*".repeat(state.password.value.chars().count());
    let password = Paragraph::new(masked)
        .style(field_style(LoginField::Password, state))
        .block(Block::default().borders(Borders::ALL).title("Password"));
    frame.render_widget(password, chunks[2]);

    if let Some(error) = &state.error {
        let error_line = Paragraph::new(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(error_line, chunks[3]);
    }

    let help = Paragraph::new(Spans::from(
        "<Tab> Next Field | <E> Edit | <Enter> Sign In | <Esc> Back",
    ))
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help, chunks[5]);
}

pub fn handle_input(state: &mut LoginState) -> Result<Option<LoginAction>> {
    if let Event::Key(key) = event::read()? {
        if state.editing {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => state.editing = false,
                KeyCode::Tab => {
                    state.editing = false;
                    state.next_field();
                }
                code => match state.current_field {
                    LoginField::Email => state.email.handle_key(code),
                    LoginField::Password => state.password.handle_key(code),
                },
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Esc => return Ok(Some(LoginAction::Back)),
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => state.next_field(),
            KeyCode::Char('e') => state.editing = true,
            KeyCode::Enter => {
                if state.is_valid() {
                    return Ok(Some(LoginAction::Submit {
                        email: state.email.value.trim().to_string(),
                        password: state.password.value.clone(),
                    }));
                }
                state.error = Some("Email and password are required.".to_string());
            }
            _ => {}
        }
    }
    Ok(None)
}
