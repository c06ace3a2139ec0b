//! Global search: the same free-text term against four tables, merged into
//! one date-sorted projection for the header UI.

use std::cmp::Ordering;

use anyhow::Result;
use chrono::{DateTime, NaiveTime, TimeZone, Utc};

use crate::db::Database;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Client,
    Appointment,
    Task,
    Consultation,
}

impl SearchKind {
    pub fn label(self) -> &'static str {
        match self {
            SearchKind::Client => "Client",
            SearchKind::Appointment => "Appointment",
            SearchKind::Task => "Task",
            SearchKind::Consultation => "Consultation",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub kind: SearchKind,
    pub id: i32,
    pub title: String,
    pub description: String,
    pub date: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

/// Run the term against clients, appointments, tasks and consultation
/// requests, then merge. A blank term returns nothing.
pub async fn search_all(db: &Database, advisor_id: i32, term: &str) -> Result<Vec<SearchResult>> {
    let term = term.trim();
    if term.is_empty() {
        return Ok(Vec::new());
    }

    let mut results = Vec::new();

    for client in db.search_clients(advisor_id, term).await? {
        let email = client.personal_details.email.clone();
        results.push(SearchResult {
            kind: SearchKind::Client,
            id: client.id,
            title: client.full_name(),
            description: if email.is_empty() {
                "No email provided".to_string()
            } else {
                email
            },
            date: Some(client.created_at),
            status: Some(client.status.to_string()),
        });
    }

    for appointment in db.search_appointments(advisor_id, term).await? {
        results.push(SearchResult {
            kind: SearchKind::Appointment,
            id: appointment.id,
            title: if appointment.title.is_empty() {
                "Untitled Appointment".to_string()
            } else {
                appointment.title.clone()
            },
            description: if appointment.description.is_empty() {
                "No description".to_string()
            } else {
                appointment.description.clone()
            },
            date: Some(appointment.start_time),
            status: Some(appointment.status.to_string()),
        });
    }

    for task in db.search_tasks(advisor_id, term).await? {
        results.push(SearchResult {
            kind: SearchKind::Task,
            id: task.id,
            title: task.title.clone(),
            description: if task.description.is_empty() {
                "No description".to_string()
            } else {
                task.description.clone()
            },
            date: Some(task.due_date),
            status: Some(task.status.to_string()),
        });
    }

    for request in db.search_consultation_requests(term).await? {
        let date = Utc.from_utc_datetime(&request.preferred_date.and_time(NaiveTime::MIN));
        results.push(SearchResult {
            kind: SearchKind::Consultation,
            id: request.id,
            title: request.requester_name(),
            description: format!(
                "{} - {}",
                request.email,
                request.message.as_deref().unwrap_or("No message")
            ),
            date: Some(date),
            status: Some(request.status.to_string()),
        });
    }

    sort_by_date_desc(&mut results);
    Ok(results)
}

/// Most recent first; entries without a date sort last. No further ranking.
pub fn sort_by_date_desc(results: &mut [SearchResult]) {
    results.sort_by(|a, b| match (a.date, b.date) {
        (Some(a_date), Some(b_date)) => b_date.cmp(&a_date),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(kind: SearchKind, id: i32, date: Option<DateTime<Utc>>) -> SearchResult {
        SearchResult {
            kind,
            id,
            title: "Smith".to_string(),
            description: String::new(),
            date,
            status: None,
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn merged_union_sorts_date_descending_with_dateless_last() {
        let mut results = vec![
            result(SearchKind::Task, 1, Some(day(2))),
            result(SearchKind::Client, 2, None),
            result(SearchKind::Consultation, 3, Some(day(9))),
            result(SearchKind::Appointment, 4, Some(day(5))),
        ];

        sort_by_date_desc(&mut results);

        let order: Vec<i32> = results.iter().map(|r| r.id).collect();
        assert_eq!(order, vec![3, 4, 1, 2]);
        assert!(results.last().unwrap().date.is_none());
    }

    #[test]
    fn equal_dates_keep_both_entries() {
        let mut results = vec![
            result(SearchKind::Client, 1, Some(day(4))),
            result(SearchKind::Task, 2, Some(day(4))),
        ];

        sort_by_date_desc(&mut results);
        assert_eq!(results.len(), 2);
    }
}
