pub mod task;
pub mod user;

pub use task::{CreateTaskInput, Task, TaskPriority, TaskQuery, TaskStatus, UpdateTaskInput};
pub use user::{NewUser, User};
