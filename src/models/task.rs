use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the priority of a task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet.
    #[default]
    Pending,
    /// Currently being worked on.
    InProgress,
    /// Finished.
    Complete,
}

/// Input for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Must be between 1 and 1000 characters.
    #[validate(length(min = 1, max = 1000))]
    pub description: String,

    pub due_date: DateTime<Utc>,

    /// Defaults to `medium`.
    pub priority: Option<TaskPriority>,

    /// Defaults to `pending`.
    pub status: Option<TaskStatus>,

    /// Defaults to the creator.
    pub assignee_id: Option<Uuid>,
}

/// Partial update of a task. Absent fields are left unchanged.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTaskInput {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, max = 1000))]
    pub description: Option<String>,
    pub assignee_id: Option<Uuid>,
}

/// Represents a task entity as stored in the database and returned by the API.
///
/// `id`, `creator_id` and `created_at` never change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    /// The identity that created the task; the only one allowed to change or delete it.
    pub creator_id: Uuid,
    /// The identity the task is addressed to; may equal `creator_id`.
    pub assignee_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters for filtering the task list. Both filters are exact-match and combine with AND.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl Task {
    /// Builds a new task owned by `creator_id`, filling in the defaults.
    pub fn new(input: CreateTaskInput, creator_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            priority: input.priority.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            creator_id,
            assignee_id: input.assignee_id.unwrap_or(creator_id),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the supplied fields and bumps `updated_at`.
    pub fn apply(&mut self, update: UpdateTaskInput) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(assignee_id) = update.assignee_id {
            self.assignee_id = assignee_id;
        }
        self.updated_at = Utc::now();
    }

    /// Whether the task passes every filter set in `query`.
    pub fn matches(&self, query: &TaskQuery) -> bool {
        query.status.map_or(true, |status| self.status == status)
            && query.priority.map_or(true, |priority| self.priority == priority)
    }
}
