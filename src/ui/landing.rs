use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

const ENTRIES: [&str; 4] = [
    "Advisor Sign In",
    "Admin Sign In",
    "Request a Consultation",
    "Quit",
];

pub struct LandingState {
    list_state: ListState,
}

impl LandingState {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self { list_state }
    }

    fn next(&mut self) {
        let i = self.list_state.selected().map_or(0, |i| (i + 1) % ENTRIES.len());
        self.list_state.select(Some(i));
    }

    fn previous(&mut self) {
        let i = self
            .list_state
            .selected()
            .map_or(0, |i| if i == 0 { ENTRIES.len() - 1 } else { i - 1 });
        self.list_state.select(Some(i));
    }
}

pub enum LandingAction {
    ShowLogin,
    ShowAdminLogin,
    ShowIntake,
    Exit,
}

pub fn render_landing<B: Backend>(frame: &mut Frame<B>, state: &mut LandingState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(4),
                Constraint::Min(6),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(frame.size());

    let title = Paragraph::new(vec![
        Spans::from(Span::styled(
            "Advisor CRM",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Spans::from("Financial planning, client records and scheduling"),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let items: Vec<ListItem> = ENTRIES
        .iter()
        .map(|entry| ListItem::new(Spans::from(*entry)))
        .collect();
    let menu = List::new(items)
        .block(Block::default().title("Welcome").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(menu, chunks[1], &mut state.list_state);

    let help = Paragraph::new("<Up/Down> Move | <Enter> Select | <Q> Quit")
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help, chunks[2]);
}

pub fn handle_input(state: &mut LandingState) -> Result<Option<LandingAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Some(LandingAction::Exit)),
            KeyCode::Down => state.next(),
            KeyCode::Up => state.previous(),
            KeyCode::Enter => {
                return Ok(match state.list_state.selected() {
                    Some(0) => Some(LandingAction::ShowLogin),
                    Some(1) => Some(LandingAction::ShowAdminLogin),
                    Some(2) => Some(LandingAction::ShowIntake),
                    Some(3) => Some(LandingAction::Exit),
                    _ => None,
                });
            }
            _ => {}
        }
    }
    Ok(None)
}
