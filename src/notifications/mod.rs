//! Header notification feed: recent consultation requests, upcoming
//! appointments and due tasks, assembled from bulk queries on demand.

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};

use crate::db::Database;
use crate::models::{Appointment, ConsultationRequest, RequestStatus, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Consultation,
    Appointment,
    Task,
}

impl NotificationKind {
    pub fn label(self) -> &'static str {
        match self {
            NotificationKind::Consultation => "consultation",
            NotificationKind::Appointment => "appointment",
            NotificationKind::Task => "task",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
    pub priority: Priority,
}

/// Query the feed sources and assemble the list.
pub async fn load_notifications(
    db: &Database,
    advisor_id: i32,
    now: DateTime<Utc>,
) -> Result<Vec<Notification>> {
    let requests = db.recent_requests_since(now - Duration::days(7), 5).await?;
    let appointments = db
        .appointments_between(advisor_id, now, now + Duration::days(7), 5)
        .await?;
    let overdue = db.overdue_tasks(advisor_id, now, 3).await?;

    let end_of_day = Utc.from_utc_datetime(
        &now.date_naive()
            .and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)),
    );
    let due_today = db.tasks_due_between(advisor_id, now, end_of_day, 3).await?;

    Ok(assemble(&requests, &appointments, &overdue, &due_today, now))
}

/// Pure assembly: priority and read rules, then priority-major,
/// newest-first ordering.
pub fn assemble(
    requests: &[ConsultationRequest],
    upcoming: &[Appointment],
    overdue: &[Task],
    due_today: &[Task],
    now: DateTime<Utc>,
) -> Vec<Notification> {
    let mut notifications = Vec::new();

    for request in requests {
        let is_new = request.status == RequestStatus::Pending;
        let is_recent = request.created_at > now - Duration::hours(24);

        notifications.push(Notification {
            kind: NotificationKind::Consultation,
            title: if is_new {
                "New Consultation Request".to_string()
            } else {
                "Consultation Request Updated".to_string()
            },
            message: format!(
                "{} ({}) - Status: {}",
                request.requester_name(),
                request.email,
                request.status
            ),
            timestamp: request.created_at,
            is_read: !is_new || !is_recent,
            priority: if is_new && is_recent {
                Priority::High
            } else {
                Priority::Medium
            },
        });
    }

    for appointment in upcoming {
        let start_day = appointment.start_time.date_naive();
        let is_today = start_day == now.date_naive();
        let is_tomorrow = start_day == now.date_naive() + Duration::days(1);

        notifications.push(Notification {
            kind: NotificationKind::Appointment,
            title: if is_today {
                "Appointment Today".to_string()
            } else if is_tomorrow {
                "Appointment Tomorrow".to_string()
            } else {
                "Upcoming Appointment".to_string()
            },
            message: format!(
                "{} at {}",
                if appointment.title.is_empty() {
                    "Untitled"
                } else {
                    &appointment.title
                },
                appointment.start_time.format("%H:%M")
            ),
            timestamp: appointment.start_time,
            is_read: !is_today,
            priority: if is_today {
                Priority::High
            } else if is_tomorrow {
                Priority::Medium
            } else {
                Priority::Low
            },
        });
    }

    for task in overdue {
        let overdue_secs = (now - task.due_date).num_seconds().max(0);
        let days_overdue = (overdue_secs + 86_399) / 86_400;

        notifications.push(Notification {
            kind: NotificationKind::Task,
            title: "Overdue Task".to_string(),
            message: format!(
                "{} - {} day{} overdue",
                task.title,
                days_overdue,
                if days_overdue == 1 { "" } else { "s" }
            ),
            timestamp: task.due_date,
            is_read: false,
            priority: if days_overdue > 3 {
                Priority::High
            } else {
                Priority::Medium
            },
        });
    }

    for task in due_today {
        notifications.push(Notification {
            kind: NotificationKind::Task,
            title: "Task Due Today".to_string(),
            message: task.title.clone(),
            timestamp: task.due_date,
            is_read: false,
            priority: Priority::Medium,
        });
    }

    notifications.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then(b.timestamp.cmp(&a.timestamp))
    });

    notifications
}

/// Compact age for the header list.
pub fn format_relative(now: DateTime<Utc>, timestamp: DateTime<Utc>) -> String {
    let minutes = (now - timestamp).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }

    let days = hours / 24;
    if days < 7 {
        return format!("{days}d ago");
    }

    timestamp.format("%b %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentStatus, RequestType, TaskPriority, TaskStatus};
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn request(status: RequestStatus, created_at: DateTime<Utc>) -> ConsultationRequest {
        ConsultationRequest {
            id: 1,
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone: None,
            preferred_date: NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
            preferred_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            message: None,
            request_type: RequestType::Initial,
            status,
            advisor_id: None,
            appointment_id: None,
            admin_notes: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn appointment(start: DateTime<Utc>) -> Appointment {
        Appointment {
            id: 1,
            advisor_id: 1,
            client_id: None,
            title: "Portfolio review".to_string(),
            description: String::new(),
            start_time: start,
            end_time: start + Duration::hours(1),
            location: String::new(),
            meeting_link: None,
            status: AppointmentStatus::Scheduled,
            created_at: start,
        }
    }

    fn task(title: &str, due: DateTime<Utc>) -> Task {
        Task {
            id: 1,
            advisor_id: 1,
            client_id: None,
            title: title.to_string(),
            description: String::new(),
            due_date: due,
            priority: TaskPriority::Medium,
            status: TaskStatus::Pending,
            completed_at: None,
            created_at: due,
        }
    }

    #[test]
    fn fresh_pending_request_is_unread_and_high_priority() {
        let feed = assemble(
            &[request(RequestStatus::Pending, now() - Duration::hours(2))],
            &[],
            &[],
            &[],
            now(),
        );

        assert_eq!(feed.len(), 1);
        assert!(!feed[0].is_read);
        assert_eq!(feed[0].priority, Priority::High);
        assert_eq!(feed[0].title, "New Consultation Request");
    }

    #[test]
    fn reviewed_request_reads_as_update() {
        let feed = assemble(
            &[request(RequestStatus::Approved, now() - Duration::days(2))],
            &[],
            &[],
            &[],
            now(),
        );

        assert!(feed[0].is_read);
        assert_eq!(feed[0].priority, Priority::Medium);
        assert_eq!(feed[0].title, "Consultation Request Updated");
    }

    #[test]
    fn appointment_priority_tracks_proximity() {
        let feed = assemble(
            &[],
            &[
                appointment(now() + Duration::hours(3)),
                appointment(now() + Duration::days(1)),
                appointment(now() + Duration::days(4)),
            ],
            &[],
            &[],
            now(),
        );

        assert_eq!(feed[0].title, "Appointment Today");
        assert_eq!(feed[0].priority, Priority::High);
        assert_eq!(feed[1].title, "Appointment Tomorrow");
        assert_eq!(feed[1].priority, Priority::Medium);
        assert_eq!(feed[2].title, "Upcoming Appointment");
        assert_eq!(feed[2].priority, Priority::Low);
    }

    #[test]
    fn long_overdue_tasks_escalate() {
        let feed = assemble(
            &[],
            &[],
            &[
                task("old", now() - Duration::days(5)),
                task("recent", now() - Duration::hours(30)),
            ],
            &[],
            now(),
        );

        let old = feed.iter().find(|n| n.message.starts_with("old")).unwrap();
        let recent = feed.iter().find(|n| n.message.starts_with("recent")).unwrap();
        assert_eq!(old.priority, Priority::High);
        assert!(old.message.contains("5 days overdue"));
        assert_eq!(recent.priority, Priority::Medium);
        assert!(recent.message.contains("2 days overdue"));
    }

    #[test]
    fn feed_sorts_priority_then_recency() {
        let feed = assemble(
            &[request(RequestStatus::Pending, now() - Duration::hours(1))],
            &[appointment(now() + Duration::days(4))],
            &[],
            &[task("due", now() + Duration::hours(2))],
            now(),
        );

        assert_eq!(feed[0].priority, Priority::High);
        assert_eq!(feed[1].priority, Priority::Medium);
        assert_eq!(feed[2].priority, Priority::Low);
    }

    #[test]
    fn relative_times_bucket_by_age() {
        let now = now();
        assert_eq!(format_relative(now, now - Duration::seconds(20)), "Just now");
        assert_eq!(format_relative(now, now - Duration::minutes(5)), "5m ago");
        assert_eq!(format_relative(now, now - Duration::hours(3)), "3h ago");
        assert_eq!(format_relative(now, now - Duration::days(2)), "2d ago");
        assert_eq!(
            format_relative(now, now - Duration::days(30)),
            "Feb 08, 2025"
        );
    }
}
