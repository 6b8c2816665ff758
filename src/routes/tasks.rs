use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{policy, CurrentUser};
use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskJoinRow, TaskResponse, TaskUpdate};

/// Task selection with both user references joined in.
pub(crate) const TASK_WITH_USERS: &str =
    "SELECT t.id, t.title, t.description, t.priority, t.due_date, t.completed,
            t.assigned_to, au.name AS assignee_name, au.email AS assignee_email,
            t.created_by, cu.name AS creator_name, cu.email AS creator_email,
            t.created_at, t.updated_at
     FROM tasks t
     JOIN users au ON au.id = t.assigned_to
     JOIN users cu ON cu.id = t.created_by";

async fn fetch_task(pool: &PgPool, id: Uuid) -> Result<Task, AppError> {
    sqlx::query_as::<_, Task>(
        "SELECT id, title, description, priority, due_date, completed,
                assigned_to, created_by, created_at, updated_at
         FROM tasks WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Task not found".into()))
}

async fn fetch_task_with_users(pool: &PgPool, id: Uuid) -> Result<TaskResponse, AppError> {
    let sql = format!("{} WHERE t.id = $1", TASK_WITH_USERS);
    let row = sqlx::query_as::<_, TaskJoinRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    Ok(TaskResponse::from(row))
}

/// Retrieves the tasks assigned to the authenticated user.
///
/// Every caller, admin or not, sees only their own assignments here; the
/// full table is available to admins through `/api/admin/tasks`. Tasks are
/// ordered by creation date in descending order and carry both the assignee
/// and the creator as embedded user summaries.
///
/// ## Responses:
/// - `200 OK`: Returns a JSON array of task objects.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `500 Internal Server Error`: For database errors or other unexpected issues.
#[get("")]
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    current: CurrentUser,
) -> Result<impl Responder, AppError> {
    let sql = format!(
        "{} WHERE t.assigned_to = $1 ORDER BY t.created_at DESC",
        TASK_WITH_USERS
    );
    let rows = sqlx::query_as::<_, TaskJoinRow>(&sql)
        .bind(current.0.id)
        .fetch_all(pool.get_ref())
        .await?;

    let tasks: Vec<TaskResponse> = rows.into_iter().map(TaskResponse::from).collect();
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task.
///
/// Expects a JSON payload conforming to `TaskInput`. The creator is always
/// the authenticated user; when `assigned_to` is omitted the task is
/// assigned to the creator as well.
///
/// ## Request Body:
/// A JSON object matching the `TaskInput` struct, including:
/// - `title`: The title of the task (required, at most 200 characters).
/// - `description`: A description of the task (required, at most 1000 characters).
/// - `priority` (optional): One of "low", "medium", "high". Defaults to "medium".
/// - `due_date`: The due date for the task (required).
/// - `assigned_to` (optional): The ID of the user to assign the task to.
///
/// ## Responses:
/// - `201 Created`: Returns the newly created task as JSON.
/// - `400 Bad Request`: If validation fails or `assigned_to` references no existing user.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `500 Internal Server Error`: For database errors or other unexpected issues.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), current.0.id);

    // An unknown assignee trips the foreign key, which maps to a 400.
    sqlx::query(
        "INSERT INTO tasks (id, title, description, priority, due_date, completed,
                            assigned_to, created_by, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(task.id)
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.priority)
    .bind(task.due_date)
    .bind(task.completed)
    .bind(task.assigned_to)
    .bind(task.created_by)
    .bind(task.created_at)
    .bind(task.updated_at)
    .execute(pool.get_ref())
    .await?;

    let created = fetch_task_with_users(pool.get_ref(), task.id).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Applies a partial update to a task.
///
/// Only the assignee of the task or an admin may update it; creating a task
/// does not by itself grant update rights. Fields left out of the payload
/// keep their stored values.
///
/// ## Path Parameters:
/// - `id`: The UUID of the task to update.
///
/// ## Request Body:
/// A JSON object matching the `TaskUpdate` struct. Every field is optional;
/// see `create_task` for the field constraints.
///
/// ## Responses:
/// - `200 OK`: Returns the updated task as JSON.
/// - `400 Bad Request`: If input validation on `TaskUpdate` fails.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `403 Forbidden`: If the caller is neither the assignee nor an admin.
/// - `404 Not Found`: If no task with the given ID exists.
/// - `500 Internal Server Error`: For database errors or other unexpected issues.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let id = path.into_inner();
    let task = fetch_task(pool.get_ref(), id).await?;
    policy::can_update_task(&current.0, &task)?;

    sqlx::query(
        "UPDATE tasks SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            priority = COALESCE($3, priority),
            due_date = COALESCE($4, due_date),
            completed = COALESCE($5, completed),
            assigned_to = COALESCE($6, assigned_to),
            updated_at = NOW()
         WHERE id = $7",
    )
    .bind(&task_data.title)
    .bind(&task_data.description)
    .bind(task_data.priority)
    .bind(task_data.due_date)
    .bind(task_data.completed)
    .bind(task_data.assigned_to)
    .bind(id)
    .execute(pool.get_ref())
    .await?;

    let updated = fetch_task_with_users(pool.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a task.
///
/// Only the creator of the task or an admin may delete it; being assigned a
/// task grants no right to remove it.
///
/// ## Path Parameters:
/// - `id`: The UUID of the task to delete.
///
/// ## Responses:
/// - `204 No Content`: The task was deleted.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `403 Forbidden`: If the caller is neither the creator nor an admin.
/// - `404 Not Found`: If no task with the given ID exists.
/// - `500 Internal Server Error`: For database errors or other unexpected issues.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    let task = fetch_task(pool.get_ref(), id).await?;
    policy::can_delete_task(&current.0, &task)?;

    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Flips a task between completed and pending.
///
/// Carries the same permission as updating: the assignee of the task or an
/// admin.
///
/// ## Path Parameters:
/// - `id`: The UUID of the task to toggle.
///
/// ## Responses:
/// - `200 OK`: Returns the updated task as JSON.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `403 Forbidden`: If the caller is neither the assignee nor an admin.
/// - `404 Not Found`: If no task with the given ID exists.
/// - `500 Internal Server Error`: For database errors or other unexpected issues.
#[patch("/{id}/toggle-complete")]
pub async fn toggle_complete(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    let task = fetch_task(pool.get_ref(), id).await?;
    policy::can_update_task(&current.0, &task)?;

    // Read-modify-write; no version column, so concurrent toggles race and
    // the last write wins.
    sqlx::query("UPDATE tasks SET completed = $1, updated_at = NOW() WHERE id = $2")
        .bind(!task.completed)
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    let updated = fetch_task_with_users(pool.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(updated))
}
