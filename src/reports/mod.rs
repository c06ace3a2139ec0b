//! Report aggregation. Pure functions over collections the caller already
//! loaded; everything is recomputed from the full set on each render.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate};

use crate::models::{Appointment, Client, ClientStatus, Task, TaskStatus};

/// Date range plus optional client subset applied before aggregation.
#[derive(Debug, Clone)]
pub struct ReportFilter {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub client_ids: Option<HashSet<i32>>,
}

impl ReportFilter {
    /// January 1st of the current year through today.
    pub fn year_to_date(today: NaiveDate) -> Self {
        let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
        Self {
            start,
            end: today,
            client_ids: None,
        }
    }

    fn includes_client(&self, id: i32) -> bool {
        match &self.client_ids {
            Some(ids) => ids.contains(&id),
            None => true,
        }
    }

    fn includes_date(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Borrowed views of the collections after the filter is applied.
pub struct ReportData<'a> {
    pub clients: Vec<&'a Client>,
    pub tasks: Vec<&'a Task>,
    pub appointments: Vec<&'a Appointment>,
}

pub fn filter_data<'a>(
    filter: &ReportFilter,
    clients: &'a [Client],
    tasks: &'a [Task],
    appointments: &'a [Appointment],
) -> ReportData<'a> {
    let clients: Vec<&Client> = clients
        .iter()
        .filter(|c| filter.includes_client(c.id))
        .collect();

    // Tasks and appointments without a client pass an unset subset but not
    // an explicit one.
    let tasks: Vec<&Task> = tasks
        .iter()
        .filter(|t| match (&filter.client_ids, t.client_id) {
            (None, _) => true,
            (Some(ids), Some(client_id)) => ids.contains(&client_id),
            (Some(_), None) => false,
        })
        .filter(|t| filter.includes_date(t.due_date.date_naive()))
        .collect();

    let appointments: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| match (&filter.client_ids, a.client_id) {
            (None, _) => true,
            (Some(ids), Some(client_id)) => ids.contains(&client_id),
            (Some(_), None) => false,
        })
        .filter(|a| filter.includes_date(a.start_time.date_naive()))
        .collect();

    ReportData {
        clients,
        tasks,
        appointments,
    }
}

/// Assets under management: summed assets across the client set.
pub fn total_aum(clients: &[&Client]) -> f64 {
    clients
        .iter()
        .map(|c| c.financial_details.assets)
        .sum()
}

/// Summed assets minus liabilities.
pub fn total_net_worth(clients: &[&Client]) -> f64 {
    clients.iter().map(|c| c.net_worth()).sum()
}

pub fn client_status_counts(clients: &[&Client]) -> Vec<(ClientStatus, usize)> {
    let order = [
        ClientStatus::Active,
        ClientStatus::Inactive,
        ClientStatus::Prospect,
    ];
    order
        .into_iter()
        .map(|status| (status, clients.iter().filter(|c| c.status == status).count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

pub fn task_status_counts(tasks: &[&Task]) -> Vec<(TaskStatus, usize)> {
    let order = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];
    order
        .into_iter()
        .map(|status| (status, tasks.iter().filter(|t| t.status == status).count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

/// Appointment counts bucketed by calendar month, chronological, labeled
/// like "Mar 2025".
pub fn monthly_appointments(appointments: &[&Appointment]) -> Vec<(String, usize)> {
    let mut buckets: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for appointment in appointments {
        let start = appointment.start_time;
        *buckets.entry((start.year(), start.month())).or_default() += 1;
    }

    buckets
        .into_iter()
        .map(|((year, month), count)| {
            let label = NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%b %Y").to_string())
                .unwrap_or_else(|| format!("{year}-{month:02}"));
            (label, count)
        })
        .collect()
}

/// The five largest clients by assets, descending, zero-asset clients
/// excluded.
pub fn top_clients_by_aum(clients: &[&Client]) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = clients
        .iter()
        .filter(|c| c.financial_details.assets > 0.0)
        .map(|c| (c.full_name(), c.financial_details.assets))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(5);
    ranked
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use sqlx::types::Json;

    use super::*;
    use crate::models::{
        AppointmentStatus, FinancialDetails, PersonalDetails, TaskPriority,
    };

    fn client(id: i32, first: &str, status: ClientStatus, assets: f64, liabilities: f64) -> Client {
        let now = Utc::now();
        Client {
            id,
            advisor_id: 1,
            personal_details: Json(PersonalDetails {
                first_name: first.to_string(),
                last_name: "Smith".to_string(),
                ..PersonalDetails::default()
            }),
            financial_details: Json(FinancialDetails {
                assets,
                liabilities,
                ..FinancialDetails::default()
            }),
            tags: Vec::new(),
            status,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn appointment(id: i32, client_id: Option<i32>, y: i32, m: u32, d: u32) -> Appointment {
        let start = Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap();
        Appointment {
            id,
            advisor_id: 1,
            client_id,
            title: format!("Review {id}"),
            description: String::new(),
            start_time: start,
            end_time: start + chrono::Duration::hours(1),
            location: String::new(),
            meeting_link: None,
            status: AppointmentStatus::Scheduled,
            created_at: start,
        }
    }

    fn task(id: i32, client_id: Option<i32>, status: TaskStatus, y: i32, m: u32, d: u32) -> Task {
        Task {
            id,
            advisor_id: 1,
            client_id,
            title: format!("Task {id}"),
            description: String::new(),
            due_date: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
            priority: TaskPriority::Medium,
            status,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    fn full_year() -> ReportFilter {
        ReportFilter {
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            client_ids: None,
        }
    }

    #[test]
    fn sums_aum_and_net_worth() {
        let clients = vec![
            client(1, "Ann", ClientStatus::Active, 250_000.0, 50_000.0),
            client(2, "Ben", ClientStatus::Prospect, 100_000.0, 0.0),
        ];
        let data = filter_data(&full_year(), &clients, &[], &[]);

        assert_eq!(total_aum(&data.clients), 350_000.0);
        assert_eq!(total_net_worth(&data.clients), 300_000.0);
    }

    #[test]
    fn client_subset_filters_all_collections() {
        let clients = vec![
            client(1, "Ann", ClientStatus::Active, 1.0, 0.0),
            client(2, "Ben", ClientStatus::Active, 2.0, 0.0),
        ];
        let tasks = vec![
            task(1, Some(1), TaskStatus::Pending, 2025, 5, 1),
            task(2, Some(2), TaskStatus::Pending, 2025, 5, 2),
            task(3, None, TaskStatus::Pending, 2025, 5, 3),
        ];
        let appointments = vec![
            appointment(1, Some(1), 2025, 5, 1),
            appointment(2, Some(2), 2025, 5, 2),
        ];

        let mut filter = full_year();
        filter.client_ids = Some(HashSet::from([1]));
        let data = filter_data(&filter, &clients, &tasks, &appointments);

        assert_eq!(data.clients.len(), 1);
        assert_eq!(data.tasks.len(), 1);
        assert_eq!(data.appointments.len(), 1);
    }

    #[test]
    fn date_range_bounds_tasks_and_appointments() {
        let tasks = vec![
            task(1, None, TaskStatus::Pending, 2024, 12, 31),
            task(2, None, TaskStatus::Pending, 2025, 6, 1),
        ];
        let appointments = vec![
            appointment(1, None, 2025, 6, 1),
            appointment(2, None, 2026, 1, 1),
        ];

        let data = filter_data(&full_year(), &[], &tasks, &appointments);

        assert_eq!(data.tasks.len(), 1);
        assert_eq!(data.appointments.len(), 1);
    }

    #[test]
    fn status_histograms_skip_empty_buckets() {
        let clients = vec![
            client(1, "Ann", ClientStatus::Active, 0.0, 0.0),
            client(2, "Ben", ClientStatus::Active, 0.0, 0.0),
            client(3, "Cy", ClientStatus::Prospect, 0.0, 0.0),
        ];
        let data = filter_data(&full_year(), &clients, &[], &[]);

        assert_eq!(
            client_status_counts(&data.clients),
            vec![(ClientStatus::Active, 2), (ClientStatus::Prospect, 1)]
        );
    }

    #[test]
    fn buckets_appointments_by_month_chronologically() {
        let appointments = vec![
            appointment(1, None, 2025, 3, 10),
            appointment(2, None, 2025, 1, 5),
            appointment(3, None, 2025, 3, 20),
        ];
        let data = filter_data(&full_year(), &[], &[], &appointments);

        assert_eq!(
            monthly_appointments(&data.appointments),
            vec![("Jan 2025".to_string(), 1), ("Mar 2025".to_string(), 2)]
        );
    }

    #[test]
    fn ranks_top_clients_and_drops_zero_assets() {
        let clients = vec![
            client(1, "Ann", ClientStatus::Active, 100.0, 0.0),
            client(2, "Ben", ClientStatus::Active, 300.0, 0.0),
            client(3, "Cy", ClientStatus::Active, 0.0, 0.0),
        ];
        let data = filter_data(&full_year(), &clients, &[], &[]);

        let top = top_clients_by_aum(&data.clients);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, "Ben Smith");
    }
}
