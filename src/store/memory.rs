use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Store;
use crate::error::AppError;
use crate::models::{NewUser, Task, TaskQuery, User};

/// `Store` kept entirely in process memory.
///
/// Mirrors the PostgreSQL schema's constraints: emails are unique and every mutation
/// happens under one write lock.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("email already registered".into()));
        }
        let user = User::new(user);
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn list_tasks(&self, requester: Uuid, filter: &TaskQuery) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().await;
        let mut visible: Vec<Task> = tasks
            .values()
            .filter(|t| t.creator_id == requester || t.assignee_id == requester)
            .filter(|t| t.matches(filter))
            .cloned()
            .collect();
        visible.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(visible)
    }

    async fn insert_task(&self, task: &Task) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&task.id) {
            return Err(AppError::Internal(format!("duplicate task id {}", task.id)));
        }
        tasks.insert(task.id, task.clone());
        Ok(task.clone())
    }

    async fn save_task(&self, task: &Task) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(&task.id) {
            Some(stored) => {
                stored.description = task.description.clone();
                stored.due_date = task.due_date;
                stored.priority = task.priority;
                stored.status = task.status;
                stored.assignee_id = task.assignee_id;
                stored.updated_at = task.updated_at;
                Ok(stored.clone())
            }
            None => Err(AppError::NotFound("task not found".into())),
        }
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), AppError> {
        match self.tasks.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("task not found".into())),
        }
    }
}
