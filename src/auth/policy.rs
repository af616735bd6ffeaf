//! Ownership-based access decisions for tasks.
//!
//! Reading is open to the creator and the assignee; changing or deleting is reserved
//! for the creator. Creating and listing never consult this module: the creator of a
//! new task is always the requester, and listing only ever returns visible tasks.

use uuid::Uuid;

use crate::error::AppError;
use crate::models::Task;

pub fn can_read(task: &Task, requester: Uuid) -> bool {
    requester == task.creator_id || requester == task.assignee_id
}

pub fn can_mutate(task: &Task, requester: Uuid) -> bool {
    requester == task.creator_id
}

/// `Forbidden` unless `requester` created `task`. `action` only shapes the message.
pub fn authorize_mutation(task: &Task, requester: Uuid, action: &str) -> Result<(), AppError> {
    if can_mutate(task, requester) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "only the creator of this task can {} it",
            action
        )))
    }
}
