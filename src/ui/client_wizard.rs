use anyhow::Result;
use chrono::Utc;
use crossterm::event::{self, Event, KeyCode};
use sqlx::types::Json;
use tui::{
    backend::Backend,
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
};

use super::components::fields::{TextField, parse_amount, parse_tags};
use crate::models::{Address, Client, ClientStatus, FinancialDetails, PersonalDetails};

const FIRST_NAME: usize = 0;
const LAST_NAME: usize = 1;
const EMAIL: usize = 2;
const PHONE: usize = 3;
const STREET: usize = 4;
const CITY: usize = 5;
const STATE: usize = 6;
const ZIP: usize = 7;
const COUNTRY: usize = 8;
const DATE_OF_BIRTH: usize = 9;
const OCCUPATION: usize = 10;
const INCOME: usize = 11;
const EXPENSES: usize = 12;
const ASSETS: usize = 13;
const LIABILITIES: usize = 14;
const TAGS: usize = 15;
const NOTES: usize = 16;

const STATUSES: [ClientStatus; 3] = [
    ClientStatus::Prospect,
    ClientStatus::Active,
    ClientStatus::Inactive,
];

pub struct ClientWizardState {
    advisor_id: i32,
    /// Existing row when editing; carries the nested policy/investment
    /// records the form does not touch.
    existing: Option<Client>,
    fields: Vec<TextField>,
    status: ClientStatus,
    current_field: usize,
    editing: bool,
}

impl ClientWizardState {
    pub fn new(advisor_id: i32) -> Self {
        Self {
            advisor_id,
            existing: None,
            fields: blank_fields(),
            status: ClientStatus::Prospect,
            current_field: 0,
            editing: false,
        }
    }

    pub fn from_existing(client: Client) -> Self {
        let p = &client.personal_details;
        let f = &client.financial_details;
        let fields = vec![
            TextField::with_value("First Name *", p.first_name.clone()),
            TextField::with_value("Last Name *", p.last_name.clone()),
            TextField::with_value("Email *", p.email.clone()),
            TextField::with_value("Phone", p.phone.clone()),
            TextField::with_value("Street", p.address.street.clone()),
            TextField::with_value("City", p.address.city.clone()),
            TextField::with_value("State", p.address.state.clone()),
            TextField::with_value("Zip", p.address.zip.clone()),
            TextField::with_value("Country", p.address.country.clone()),
            TextField::with_value("Date of Birth", p.date_of_birth.clone()),
            TextField::with_value("Occupation", p.occupation.clone()),
            TextField::with_value("Annual Income", format!("{}", f.income)),
            TextField::with_value("Annual Expenses", format!("{}", f.expenses)),
            TextField::with_value("Total Assets", format!("{}", f.assets)),
            TextField::with_value("Total Liabilities", format!("{}", f.liabilities)),
            TextField::with_value("Tags (comma separated)", client.tags.join(", ")),
            TextField::with_value("Notes", client.notes.clone()),
        ];

        Self {
            advisor_id: client.advisor_id,
            status: client.status,
            existing: Some(client),
            fields,
            current_field: 0,
            editing: false,
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

    fn cycle_status(&mut self) {
        let i = STATUSES.iter().position(|s| *s == self.status).unwrap_or(0);
        self.status = STATUSES[(i + 1) % STATUSES.len()];
    }

    fn is_valid(&self) -> bool {
        !self.fields[FIRST_NAME].is_empty()
            && !self.fields[LAST_NAME].is_empty()
            && !self.fields[EMAIL].is_empty()
    }

    fn build(&self) -> Client {
        let value = |i: usize| self.fields[i].value.trim().to_string();
        let now = Utc::now();

        let personal_details = PersonalDetails {
            first_name: value(FIRST_NAME),
            last_name: value(LAST_NAME),
            email: value(EMAIL),
            phone: value(PHONE),
            address: Address {
                street: value(STREET),
                city: value(CITY),
                state: value(STATE),
                zip: value(ZIP),
                country: value(COUNTRY),
            },
            date_of_birth: value(DATE_OF_BIRTH),
            occupation: value(OCCUPATION),
        };

        let (insurance_policies, investments) = match &self.existing {
            Some(client) => (
                client.financial_details.insurance_policies.clone(),
                client.financial_details.investments.clone(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        let financial_details = FinancialDetails {
            income: parse_amount(&self.fields[INCOME].value),
            expenses: parse_amount(&self.fields[EXPENSES].value),
            assets: parse_amount(&self.fields[ASSETS].value),
            liabilities: parse_amount(&self.fields[LIABILITIES].value),
            insurance_policies,
            investments,
        };

        Client {
            id: self.existing.as_ref().map_or(0, |c| c.id),
            advisor_id: self.advisor_id,
            personal_details: Json(personal_details),
            financial_details: Json(financial_details),
            tags: parse_tags(&self.fields[TAGS].value),
            status: self.status,
            notes: value(NOTES),
            created_at: self.existing.as_ref().map_or(now, |c| c.created_at),
            updated_at: now,
        }
    }
}

fn blank_fields() -> Vec<TextField> {
    vec![
        TextField::new("First Name *"),
        TextField::new("Last Name *"),
        TextField::new("Email *"),
        TextField::new("Phone"),
        TextField::new("Street"),
        TextField::new("City"),
        TextField::new("State"),
        TextField::new("Zip"),
        TextField::new("Country"),
        TextField::new("Date of Birth"),
        TextField::new("Occupation"),
        TextField::new("Annual Income"),
        TextField::new("Annual Expenses"),
        TextField::new("Total Assets"),
        TextField::new("Total Liabilities"),
        TextField::new("Tags (comma separated)"),
        TextField::new("Notes"),
    ]
}

pub enum ClientWizardAction {
    Cancel,
    Save(Client),
}

pub fn render_client_wizard<B: Backend>(frame: &mut Frame<B>, state: &mut ClientWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(frame.size());

    let title_text = if state.existing.is_none() {
        "New Client"
    } else {
        "Edit Client"
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
        "Status: {}  (press <S> to change)",
        state.status
    )));

    let form = Paragraph::new(lines).block(
        Block::default()
            .title("Client Details")
            .borders(Borders::ALL),
    );
    frame.render_widget(form, chunks[1]);

    let help = Paragraph::new("<Up/Down> Field | <E> Edit | <S> Status | <Enter> Save | <Esc> Cancel")
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help, chunks[2]);
}

pub fn handle_input(state: &mut ClientWizardState) -> Result<Option<ClientWizardAction>> {
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
            KeyCode::Esc => return Ok(Some(ClientWizardAction::Cancel)),
            KeyCode::Down | KeyCode::Tab => state.next_field(),
            KeyCode::Up => state.previous_field(),
            KeyCode::Char('e') => state.editing = true,
            KeyCode::Char('s') => state.cycle_status(),
            KeyCode::Enter => {
                if state.is_valid() {
                    return Ok(Some(ClientWizardAction::Save(state.build())));
                }
            }
            _ => {}
        }
    }
    Ok(None)
}
