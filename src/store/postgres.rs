use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::Store;
use crate::error::AppError;
use crate::models::{NewUser, Task, TaskQuery, User};

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, created_at";

const TASK_COLUMNS: &str = "id, title, description, due_date, priority, status, creator_id, \
                            assignee_id, created_at, updated_at";

/// `Store` over a PostgreSQL pool. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let user = User::new(user);
        let sql = format!(
            "INSERT INTO users (id, first_name, last_name, email, password_hash, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            USER_COLUMNS
        );
        let inserted = sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(inserted)
    }

    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn list_tasks(&self, requester: Uuid, filter: &TaskQuery) -> Result<Vec<Task>, AppError> {
        // Visibility is creator OR assignee; optional filters are appended with AND.
        let mut sql = format!(
            "SELECT {} FROM tasks WHERE (creator_id = $1 OR assignee_id = $1)",
            TASK_COLUMNS
        );
        let mut param_count = 2;

        if filter.status.is_some() {
            sql.push_str(&format!(" AND status = ${}", param_count));
            param_count += 1;
        }
        if filter.priority.is_some() {
            sql.push_str(&format!(" AND priority = ${}", param_count));
        }
        sql.push_str(" ORDER BY due_date ASC, created_at ASC");

        let mut query = sqlx::query_as::<_, Task>(&sql).bind(requester);
        if let Some(status) = filter.status {
            query = query.bind(status);
        }
        if let Some(priority) = filter.priority {
            query = query.bind(priority);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn insert_task(&self, task: &Task) -> Result<Task, AppError> {
        let sql = format!(
            "INSERT INTO tasks (id, title, description, due_date, priority, status, creator_id, \
             assignee_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {}",
            TASK_COLUMNS
        );
        let inserted = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.due_date)
            .bind(task.priority)
            .bind(task.status)
            .bind(task.creator_id)
            .bind(task.assignee_id)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(inserted)
    }

    async fn save_task(&self, task: &Task) -> Result<Task, AppError> {
        // A concurrent delete surfaces as RowNotFound, i.e. NotFound.
        let sql = format!(
            "UPDATE tasks \
             SET description = $1, due_date = $2, priority = $3, status = $4, assignee_id = $5, \
                 updated_at = $6 \
             WHERE id = $7 RETURNING {}",
            TASK_COLUMNS
        );
        let saved = sqlx::query_as::<_, Task>(&sql)
            .bind(&task.description)
            .bind(task.due_date)
            .bind(task.priority)
            .bind(task.status)
            .bind(task.assignee_id)
            .bind(task.updated_at)
            .bind(task.id)
            .fetch_one(&self.pool)
            .await?;
        Ok(saved)
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("task not found".into()));
        }
        Ok(())
    }
}
