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

use crate::search::SearchResult;

pub struct SearchState {
    pub query: String,
    results: Vec<SearchResult>,
    list_state: ListState,
}

impl SearchState {
    pub fn new(query: String, results: Vec<SearchResult>) -> Self {
        let mut list_state = ListState::default();
        if !results.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            query,
            results,
            list_state,
        }
    }

    fn next(&mut self) {
        if self.results.is_empty() {
            return;
        }
        let i = self
            .list_state
            .selected()
            .map_or(0, |i| (i + 1) % self.results.len());
        self.list_state.select(Some(i));
    }

    fn previous(&mut self) {
        if self.results.is_empty() {
            return;
        }
        let i = self.list_state.selected().map_or(0, |i| {
            if i == 0 { self.results.len() - 1 } else { i - 1 }
        });
        self.list_state.select(Some(i));
    }
}

pub enum SearchAction {
    Back,
}

pub fn render_search<B: Backend>(frame: &mut Frame<B>, state: &mut SearchState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(frame.size());

    let items: Vec<ListItem> = state
        .results
        .iter()
        .map(|result| {
            let date = result
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string());
            let status = result.status.as_deref().unwrap_or("-");
            ListItem::new(Spans::from(format!(
                "[{:<12}] {}  {:<28} {:<10} {}",
                result.kind.label(),
                date,
                result.title,
                status,
                result.description
            )))
        })
        .collect();

    let title = format!(
        "Search results for \"{}\" ({})",
        state.query,
        state.results.len()
    );
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(list, chunks[0], &mut state.list_state);

    let help = Paragraph::new("<Up/Down> Move | <Esc> Back")
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help, chunks[1]);
}

pub fn handle_input(state: &mut SearchState) -> Result<Option<SearchAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => {
                return Ok(Some(SearchAction::Back));
            }
            KeyCode::Down => state.next(),
            KeyCode::Up => state.previous(),
            _ => {}
        }
    }
    Ok(None)
}
