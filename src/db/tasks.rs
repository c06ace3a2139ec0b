use anyhow::Result;
use chrono::{DateTime, Utc};

use super::Database;
use crate::models::{Task, TaskStatus};

impl Database {
    // Task operations
    pub async fn get_tasks_by_advisor(&self, advisor_id: i32) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE advisor_id = $1 ORDER BY due_date ASC",
        )
        .bind(advisor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    pub async fn get_task(&self, id: i32) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(task)
    }

    pub async fn create_task(&self, task: &Task) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO tasks (advisor_id, client_id, title, description, due_date, priority, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(task.advisor_id)
        .bind(task.client_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(task.priority.as_str())
        .bind(task.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn update_task(&self, task: &Task) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE tasks
            SET client_id = $1, title = $2, description = $3, due_date = $4, priority = $5
            WHERE id = $6
            "#,
        )
        .bind(task.client_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(task.priority.as_str())
        .bind(task.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Status-only update. Completing stamps `completed_at`; any other
    /// status clears it.
    pub async fn update_task_status(&self, id: i32, status: TaskStatus) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE tasks
            SET status = $1,
                completed_at = CASE WHEN $1 = 'completed' THEN now() ELSE NULL END
            WHERE id = $2
            "#,
        )
        .bind(status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_task(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Pending tasks past their due date, oldest first.
    pub async fn overdue_tasks(
        &self,
        advisor_id: i32,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT * FROM tasks
            WHERE advisor_id = $1 AND status = 'pending' AND due_date < $2
            ORDER BY due_date ASC
            LIMIT $3
            "#,
        )
        .bind(advisor_id)
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// Pending tasks due inside the window (used for the due-today feed).
    pub async fn tasks_due_between(
        &self,
        advisor_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT * FROM tasks
            WHERE advisor_id = $1 AND status = 'pending'
              AND due_date >= $2 AND due_date <= $3
            ORDER BY due_date ASC
            LIMIT $4
            "#,
        )
        .bind(advisor_id)
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }
}
