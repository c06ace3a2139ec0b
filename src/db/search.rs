use anyhow::Result;

use super::Database;
use crate::models::{Appointment, Client, ConsultationRequest, Task};

fn like_pattern(term: &str) -> String {
    format!("%{}%", term)
}

impl Database {
    // Pattern-match queries backing global search. Each query is scoped by
    // the signed-in advisor except consultation requests, which have no
    // owner until assignment.

    pub async fn search_clients(&self, advisor_id: i32, term: &str) -> Result<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT * FROM clients
            WHERE advisor_id = $1
              AND (personal_details->>'first_name' ILIKE $2
                OR personal_details->>'last_name' ILIKE $2
                OR personal_details->>'email' ILIKE $2)
            "#,
        )
        .bind(advisor_id)
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    pub async fn search_appointments(&self, advisor_id: i32, term: &str) -> Result<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT * FROM appointments
            WHERE advisor_id = $1 AND (title ILIKE $2 OR description ILIKE $2)
            "#,
        )
        .bind(advisor_id)
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    pub async fn search_tasks(&self, advisor_id: i32, term: &str) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT * FROM tasks
            WHERE advisor_id = $1 AND (title ILIKE $2 OR description ILIKE $2)
            "#,
        )
        .bind(advisor_id)
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    pub async fn search_consultation_requests(&self, term: &str) -> Result<Vec<ConsultationRequest>> {
        let requests = sqlx::query_as::<_, ConsultationRequest>(
            r#"
            SELECT * FROM consultation_requests
            WHERE first_name ILIKE $1 OR last_name ILIKE $1 OR email ILIKE $1
            "#,
        )
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }
}
