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

use chrono::{DateTime, Utc};

use crate::auth::Role;
use crate::notifications::{Notification, format_relative};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeTab {
    Clients,
    Calendar,
    Tasks,
    Reports,
    Consultations,
    Advisors,
}

impl HomeTab {
    fn label(self) -> &'static str {
        match self {
            HomeTab::Clients => "Clients",
            HomeTab::Calendar => "Calendar",
            HomeTab::Tasks => "Tasks",
            HomeTab::Reports => "Reports",
            HomeTab::Consultations => "Consultation Requests",
            HomeTab::Advisors => "User Management",
        }
    }
}

pub struct HomeState {
    pub advisor_name: String,
    pub role: Role,
    tabs: Vec<HomeTab>,
    list_state: ListState,
    search_query: String,
    searching: bool,
    notifications: Vec<Notification>,
    loaded_at: DateTime<Utc>,
}

impl HomeState {
    pub fn new(advisor_name: String, role: Role, notifications: Vec<Notification>) -> Self {
        let mut tabs = vec![
            HomeTab::Clients,
            HomeTab::Calendar,
            HomeTab::Tasks,
            HomeTab::Reports,
        ];
        // Review queues and user management are admin surfaces.
        if role == Role::Admin {
            tabs.push(HomeTab::Consultations);
            tabs.push(HomeTab::Advisors);
        }

        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            advisor_name,
            role,
            tabs,
            list_state,
            search_query: String::new(),
            searching: false,
            notifications,
            loaded_at: Utc::now(),
        }
    }

    fn next(&mut self) {
        let i = self
            .list_state
            .selected()
            .map_or(0, |i| (i + 1) % self.tabs.len());
        self.list_state.select(Some(i));
    }

    fn previous(&mut self) {
        let i = self
            .list_state
            .selected()
            .map_or(0, |i| if i == 0 { self.tabs.len() - 1 } else { i - 1 });
        self.list_state.select(Some(i));
    }

    fn selected_tab(&self) -> Option<HomeTab> {
        self.list_state.selected().and_then(|i| self.tabs.get(i)).copied()
    }
}

pub enum HomeAction {
    Open(HomeTab),
    Search(String),
    SignOut,
    Exit,
}

pub fn render_home<B: Backend>(frame: &mut Frame<B>, state: &mut HomeState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(frame.size());

    let role_text = match state.role {
        Role::Admin => "admin",
        Role::Advisor => "advisor",
        Role::None => "unassigned",
    };
    let header = Paragraph::new(Spans::from(vec![
        Span::styled(
            "Dashboard",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  -  {} ({})", state.advisor_name, role_text)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let search_style = if state.searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(state.search_query.as_str())
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Search clients, appointments, tasks, requests (/)"),
        );
    frame.render_widget(search, chunks[1]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(chunks[2]);

    let items: Vec<ListItem> = state
        .tabs
        .iter()
        .map(|tab| ListItem::new(Spans::from(tab.label())))
        .collect();
    let menu = List::new(items)
        .block(Block::default().title("Workspace").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(menu, columns[0], &mut state.list_state);

    let feed: Vec<ListItem> = state
        .notifications
        .iter()
        .map(|n| {
            let style = if n.is_read {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            ListItem::new(Spans::from(vec![
                Span::styled(
                    format!("[{}] ", n.kind.label()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(format!("{}  ", n.title), style.add_modifier(Modifier::BOLD)),
                Span::styled(n.message.clone(), style),
                Span::styled(
                    format!("  ({})", format_relative(state.loaded_at, n.timestamp)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();
    let feed_list =
        List::new(feed).block(Block::default().title("Notifications").borders(Borders::ALL));
    frame.render_widget(feed_list, columns[1]);

    let help = Paragraph::new("<Enter> Open | </> Search | <O> Sign Out | <Q> Quit")
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help, chunks[3]);
}

pub fn handle_input(state: &mut HomeState) -> Result<Option<HomeAction>> {
    if let Event::Key(key) = event::read()? {
        if state.searching {
            match key.code {
                KeyCode::Esc => {
                    state.searching = false;
                    state.search_query.clear();
                }
                KeyCode::Enter => {
                    state.searching = false;
                    let query = state.search_query.trim().to_string();
                    if !query.is_empty() {
                        return Ok(Some(HomeAction::Search(query)));
                    }
                }
                KeyCode::Char(c) => state.search_query.push(c),
                KeyCode::Backspace => {
                    state.search_query.pop();
                }
                _ => {}
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('q') => return Ok(Some(HomeAction::Exit)),
            KeyCode::Char('o') => return Ok(Some(HomeAction::SignOut)),
            KeyCode::Char('/') => state.searching = true,
            KeyCode::Down => state.next(),
            KeyCode::Up => state.previous(),
            KeyCode::Enter => {
                if let Some(tab) = state.selected_tab() {
                    return Ok(Some(HomeAction::Open(tab)));
                }
            }
            _ => {}
        }
    }
    Ok(None)
}
