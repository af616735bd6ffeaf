use crate::{
    auth::Requester,
    error::AppError,
    models::{CreateTaskInput, TaskQuery, UpdateTaskInput},
    tasks::TaskService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;

/// Lists the tasks the requester created or is assigned to.
///
/// ## Query Parameters:
/// - `status` (optional): `pending`, `in_progress` or `complete`.
/// - `priority` (optional): `low`, `medium` or `high`.
///
/// Tasks are ordered by due date, earliest first.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects.
/// - `400 Bad Request`: unknown filter value.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn get_tasks(
    tasks: web::Data<TaskService>,
    query_params: web::Query<TaskQuery>,
    requester: Requester,
) -> Result<impl Responder, AppError> {
    let list = tasks.list(requester.0, &query_params).await?;
    Ok(HttpResponse::Ok().json(list))
}

/// Creates a new task owned by the requester.
///
/// ## Request Body:
/// - `title`, `description`, `due_date` (RFC 3339): required.
/// - `priority` (optional): defaults to `medium`.
/// - `status` (optional): defaults to `pending`.
/// - `assignee_id` (optional): defaults to the requester; must be a registered user.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `400 Bad Request`: missing or invalid fields, unknown assignee.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    task_data: web::Json<CreateTaskInput>,
    requester: Requester,
) -> Result<impl Responder, AppError> {
    let task = tasks.create(requester.0, task_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves a task the requester created or is assigned to.
///
/// ## Responses:
/// - `200 OK`: the `Task`.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: no such task, or the requester may not see it.
#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
    requester: Requester,
) -> Result<impl Responder, AppError> {
    let task = tasks.get(requester.0, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task. Only the creator may do this.
///
/// ## Request Body:
/// Any of `status`, `priority`, `due_date`, `description`, `assignee_id`.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `400 Bad Request`: invalid fields or unknown assignee.
/// - `401 Unauthorized`: missing or invalid token.
/// - `403 Forbidden`: the requester is not the creator.
/// - `404 Not Found`: no such task.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<UpdateTaskInput>,
    requester: Requester,
) -> Result<impl Responder, AppError> {
    let task = tasks
        .update(requester.0, task_id.into_inner(), task_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task. Only the creator may do this.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `401 Unauthorized`: missing or invalid token.
/// - `403 Forbidden`: the requester is not the creator.
/// - `404 Not Found`: no such task.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
    requester: Requester,
) -> Result<impl Responder, AppError> {
    tasks.delete(requester.0, task_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
