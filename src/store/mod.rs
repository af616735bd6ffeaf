//! Persistence capability consumed by the services.
//!
//! The services only ever talk to `dyn Store`; `PgStore` backs the running server and
//! `MemoryStore` backs tests and local experiments. Each call is a single atomic
//! operation on the backing store and nothing is retried here.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewUser, Task, TaskQuery, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Looks up an identity by its already-normalized email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Persists a new identity with its credential. A taken email is `Conflict`.
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError>;

    /// Tasks the requester created or is assigned to, filtered by `filter`, earliest due first.
    async fn list_tasks(&self, requester: Uuid, filter: &TaskQuery) -> Result<Vec<Task>, AppError>;

    async fn insert_task(&self, task: &Task) -> Result<Task, AppError>;

    /// Writes back the mutable fields of an existing task.
    async fn save_task(&self, task: &Task) -> Result<Task, AppError>;

    async fn delete_task(&self, id: Uuid) -> Result<(), AppError>;
}
