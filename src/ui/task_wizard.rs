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
use crate::models::{Task, TaskPriority, TaskStatus};

const TITLE: usize = 0;
const DESCRIPTION: usize = 1;
const DUE: usize = 2;
const CLIENT_ID: usize = 3;

const PRIORITIES: [TaskPriority; 3] = [
    TaskPriority::Low,
    TaskPriority::Medium,
    TaskPriority::High,
];

pub struct TaskWizardState {
    advisor_id: i32,
    existing: Option<Task>,
    fields: Vec<TextField>,
    priority: TaskPriority,
    current_field: usize,
    editing: bool,
    pub error: Option<String>,
}

impl TaskWizardState {
    pub fn new(advisor_id: i32) -> Self {
        Self {
            advisor_id,
            existing: None,
            fields: vec![
                TextField::new("Title *"),
                TextField::new("Description"),
                TextField::new("Due (YYYY-MM-DD HH:MM) *"),
                TextField::new("Client Id"),
            ],
            priority: TaskPriority::Medium,
            current_field: 0,
            editing: false,
            error: None,
        }
    }

    pub fn from_existing(task: Task) -> Self {
        let fields = vec![
            TextField::with_value("Title *", task.title.clone()),
            TextField::with_value("Description", task.description.clone()),
            TextField::with_value(
                "Due (YYYY-MM-DD HH:MM) *",
                task.due_date.format("%Y-%m-%d %H:%M").to_string(),
            ),
            TextField::with_value(
                "Client Id",
                task.client_id.map(|id| id.to_string()).unwrap_or_default(),
            ),
        ];

        Self {
            advisor_id: task.advisor_id,
            priority: task.priority,
            existing: Some(task),
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

    fn cycle_priority(&mut self) {
        let i = PRIORITIES
            .iter()
            .position(|p| *p == self.priority)
            .unwrap_or(0);
        self.priority = PRIORITIES[(i + 1) % PRIORITIES.len()];
    }

    fn build(&self) -> Result<Task, String> {
        if self.fields[TITLE].is_empty() {
            return Err("Title is required.".to_string());
        }
        let due_date = parse_datetime(&self.fields[DUE].value)
            .ok_or_else(|| "Due must look like 2025-03-01 10:00.".to_string())?;

        let now = Utc::now();
        Ok(Task {
            id: self.existing.as_ref().map_or(0, |t| t.id),
            advisor_id: self.advisor_id,
            client_id: parse_optional_id(&self.fields[CLIENT_ID].value),
            title: self.fields[TITLE].value.trim().to_string(),
            description: self.fields[DESCRIPTION].value.trim().to_string(),
            due_date,
            priority: self.priority,
            status: self.existing.as_ref().map_or(TaskStatus::Pending, |t| t.status),
            completed_at: self.existing.as_ref().and_then(|t| t.completed_at),
            created_at: self.existing.as_ref().map_or(now, |t| t.created_at),
        })
    }
}

pub enum TaskWizardAction {
    Cancel,
    Save(Task),
}

pub fn render_task_wizard<B: Backend>(frame: &mut Frame<B>, state: &mut TaskWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(2),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(frame.size());

    let title_text = if state.existing.is_none() {
        "New Task"
    } else {
        "Edit Task"
    };
    let title = Paragraph::new(title_text)
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
        "Priority: {}  (press <P> to change)",
        state.priority
    )));

    let form = Paragraph::new(lines)
        .block(Block::default().title("Task Details").borders(Borders::ALL));
    frame.render_widget(form, chunks[1]);

    if let Some(error) = &state.error {
        let error_line = Paragraph::new(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(error_line, chunks[2]);
    }

    let help = Paragraph::new("<Up/Down> Field | <E> Edit | <P> Priority | <Enter> Save | <Esc> Cancel")
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help, chunks[3]);
}

pub fn handle_input(state: &mut TaskWizardState) -> Result<Option<TaskWizardAction>> {
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
            KeyCode::Esc => return Ok(Some(TaskWizardAction::Cancel)),
            KeyCode::Down | KeyCode::Tab => state.next_field(),
            KeyCode::Up => state.previous_field(),
            KeyCode::Char('e') => state.editing = true,
            KeyCode::Char('p') => state.cycle_priority(),
            KeyCode::Enter => match state.build() {
                Ok(task) => return Ok(Some(TaskWizardAction::Save(task))),
                Err(message) => state.error = Some(message),
            },
            _ => {}
        }
    }
    Ok(None)
}
