use anyhow::Result;
use chrono::Utc;
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
use crate::models::{Task, TaskStatus};

pub struct TasksState {
    advisor_id: i32,
    tasks: Vec<Task>,
    list_state: ListState,
    show_delete_confirmation: bool,
}

impl TasksState {
    pub fn new(advisor_id: i32, tasks: Vec<Task>) -> Self {
        let mut list_state = ListState::default();
        if !tasks.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            advisor_id,
            tasks,
            list_state,
            show_delete_confirmation: false,
        }
    }

    pub fn next(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i >= self.tasks.len() - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => self.tasks.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.list_state.selected().and_then(|i| self.tasks.get(i))
    }

    pub fn selected_task_id(&self) -> Option<i32> {
        self.selected_task().map(|t| t.id)
    }

    pub fn advisor_id(&self) -> i32 {
        self.advisor_id
    }
}

pub enum TaskAction {
    Back,
    NewTask,
    EditTask(i32),
    DeleteTask(i32),
    SetStatus(i32, TaskStatus),
}

pub fn render_tasks<B: Backend>(frame: &mut Frame<B>, state: &mut TasksState) {
    let size = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(size);

    let now = Utc::now();
    let items: Vec<ListItem> = state
        .tasks
        .iter()
        .map(|task| {
            let line = format!(
                "{:<35} due {}  [{}] {}",
                task.title,
                task.due_date.format("%Y-%m-%d"),
                task.priority,
                task.status
            );
            let style = if task.is_overdue(now) {
                Style::default().fg(Color::Red)
            } else {
                match task.status {
                    TaskStatus::Completed | TaskStatus::Cancelled => {
                        Style::default().fg(Color::DarkGray)
                    }
                    _ => Style::default(),
                }
            };
            ListItem::new(Spans::from(line)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title("Tasks").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(list, chunks[0], &mut state.list_state);

    let buttons = Paragraph::new(
        "<N> New | <E> Edit | <C> Complete | <P> In Progress | <D> Delete | <Esc> Back",
    )
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(buttons, chunks[1]);

    if state.show_delete_confirmation {
        let popup = Paragraph::new(vec![
            Spans::from(""),
            Spans::from("Are you sure you want to delete this task?"),
            Spans::from(""),
            Spans::from("<Y> Yes  <N> No"),
        ])
        .block(Block::default().title("Confirm Delete").borders(Borders::ALL))
        .style(Style::default().fg(Color::White).bg(Color::Black));
        frame.render_widget(popup, centered_rect(50, 20, size));
    }
}

pub fn handle_input(state: &mut TasksState) -> Result<Option<TaskAction>> {
    if let Event::Key(key) = event::read()? {
        if state.show_delete_confirmation {
            match key.code {
                KeyCode::Char('y') => {
                    if let Some(id) = state.selected_task_id() {
                        state.toggle_delete_confirmation();
                        return Ok(Some(TaskAction::DeleteTask(id)));
                    }
                }
                KeyCode::Char('n') | KeyCode::Esc => state.toggle_delete_confirmation(),
                _ => {}
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Some(TaskAction::Back)),
            KeyCode::Char('n') => return Ok(Some(TaskAction::NewTask)),
            KeyCode::Char('e') => {
                if let Some(id) = state.selected_task_id() {
                    return Ok(Some(TaskAction::EditTask(id)));
                }
            }
            KeyCode::Char('c') => {
                if let Some(id) = state.selected_task_id() {
                    return Ok(Some(TaskAction::SetStatus(id, TaskStatus::Completed)));
                }
            }
            KeyCode::Char('p') => {
                if let Some(id) = state.selected_task_id() {
                    return Ok(Some(TaskAction::SetStatus(id, TaskStatus::InProgress)));
                }
            }
            KeyCode::Char('d') => {
                if state.selected_task().is_some() {
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
