//! Task operations on behalf of an explicit requester.
//!
//! Every method takes the acting identity as a plain argument; nothing is read from
//! ambient request state. Mutations go through the ownership policy in
//! [`crate::auth::policy`].

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::auth::policy::{authorize_mutation, can_read};
use crate::error::AppError;
use crate::models::{CreateTaskInput, Task, TaskQuery, UpdateTaskInput};
use crate::store::Store;

pub struct TaskService {
    store: Arc<dyn Store>,
}

fn task_not_found() -> AppError {
    AppError::NotFound("task not found".into())
}

impl TaskService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates a task owned by `requester`. The assignee defaults to the requester and must exist.
    pub async fn create(&self, requester: Uuid, input: CreateTaskInput) -> Result<Task, AppError> {
        input.validate()?;
        if let Some(assignee) = input.assignee_id {
            self.ensure_user_exists(assignee).await?;
        }

        let task = Task::new(input, requester);
        let created = self.store.insert_task(&task).await?;
        log::info!("user {} created task {}", requester, created.id);
        Ok(created)
    }

    /// Tasks the requester created or is assigned to. Never denied.
    pub async fn list(&self, requester: Uuid, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        self.store.list_tasks(requester, query).await
    }

    /// A task the requester may read. Invisible tasks are reported as missing.
    pub async fn get(&self, requester: Uuid, id: Uuid) -> Result<Task, AppError> {
        match self.store.find_task_by_id(id).await? {
            Some(task) if can_read(&task, requester) => Ok(task),
            _ => Err(task_not_found()),
        }
    }

    /// Partially updates a task. Only its creator may do this.
    pub async fn update(
        &self,
        requester: Uuid,
        id: Uuid,
        input: UpdateTaskInput,
    ) -> Result<Task, AppError> {
        let mut task = self
            .store
            .find_task_by_id(id)
            .await?
            .ok_or_else(task_not_found)?;
        authorize_mutation(&task, requester, "update")?;
        input.validate()?;

        if let Some(assignee) = input.assignee_id {
            if assignee != task.assignee_id {
                self.ensure_user_exists(assignee).await?;
            }
        }

        task.apply(input);
        self.store.save_task(&task).await
    }

    /// Deletes a task. Only its creator may do this.
    pub async fn delete(&self, requester: Uuid, id: Uuid) -> Result<(), AppError> {
        let task = self
            .store
            .find_task_by_id(id)
            .await?
            .ok_or_else(task_not_found)?;
        authorize_mutation(&task, requester, "delete")?;

        self.store.delete_task(task.id).await?;
        log::info!("user {} deleted task {}", requester, task.id);
        Ok(())
    }

    // Assignees are checked when written, never re-checked on read.
    async fn ensure_user_exists(&self, id: Uuid) -> Result<(), AppError> {
        match self.store.find_user_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::Validation("assignee does not exist".into())),
        }
    }
}
