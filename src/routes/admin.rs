use actix_web::{delete, get, patch, web, HttpResponse, Responder};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Page, PageQuery, Role, TaskJoinRow, TaskResponse, UserStats, UserView};
use crate::routes::tasks::TASK_WITH_USERS;

// Every route in this module is mounted behind RoleGuard::admin; handlers
// assume the caller has already been resolved as an administrator.

const USER_COLUMNS: &str = "id, name, email, role, is_active, created_at";

/// Payload for `PATCH /api/admin/users/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub is_active: bool,
}

/// Lists all users, newest first, paginated.
#[get("/users")]
pub async fn list_users(
    pool: web::Data<PgPool>,
    query: web::Query<PageQuery>,
) -> Result<impl Responder, AppError> {
    let (page, limit) = query.resolve();

    let sql = format!(
        "SELECT {} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        USER_COLUMNS
    );
    let users = sqlx::query_as::<_, UserView>(&sql)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(pool.get_ref())
        .await?;

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(Page::new(users, total, page, limit)))
}

/// Per-user task tallies across the whole system.
#[get("/users/stats")]
pub async fn user_stats(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let stats = sqlx::query_as::<_, UserStats>(
        "SELECT u.id, u.name, u.email, u.role, u.is_active,
                COUNT(t.id) AS total_tasks,
                COUNT(t.id) FILTER (WHERE t.completed) AS completed_tasks,
                COUNT(t.id) FILTER (WHERE NOT t.completed) AS pending_tasks
         FROM users u
         LEFT JOIN tasks t ON t.assigned_to = u.id
         GROUP BY u.id
         ORDER BY u.created_at DESC",
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(stats))
}

/// Promotes a user to administrator.
#[patch("/users/{id}/set-admin")]
pub async fn set_admin(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let sql = format!(
        "UPDATE users SET role = $2 WHERE id = $1 RETURNING {}",
        USER_COLUMNS
    );
    let user = sqlx::query_as::<_, UserView>(&sql)
        .bind(path.into_inner())
        .bind(Role::Admin)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(user))
}

/// Activates or deactivates an account.
///
/// Deactivation bites on the user's next request: their token stays
/// cryptographically valid but the authentication gate refuses it.
#[patch("/users/{id}/status")]
pub async fn set_status(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    status: web::Json<StatusUpdate>,
) -> Result<impl Responder, AppError> {
    let sql = format!(
        "UPDATE users SET is_active = $2 WHERE id = $1 RETURNING {}",
        USER_COLUMNS
    );
    let user = sqlx::query_as::<_, UserView>(&sql)
        .bind(path.into_inner())
        .bind(status.is_active)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(user))
}

/// Deletes a user together with every task they created or were assigned.
#[delete("/users/{id}")]
pub async fn delete_user(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound("User not found".into()));
    }

    // Tasks first; they hold the foreign keys.
    sqlx::query("DELETE FROM tasks WHERE assigned_to = $1 OR created_by = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Lists every task in the system, newest first, paginated.
#[get("/tasks")]
pub async fn list_all_tasks(
    pool: web::Data<PgPool>,
    query: web::Query<PageQuery>,
) -> Result<impl Responder, AppError> {
    let (page, limit) = query.resolve();

    let sql = format!(
        "{} ORDER BY t.created_at DESC LIMIT $1 OFFSET $2",
        TASK_WITH_USERS
    );
    let rows = sqlx::query_as::<_, TaskJoinRow>(&sql)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(pool.get_ref())
        .await?;

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks")
        .fetch_one(pool.get_ref())
        .await?;

    let tasks: Vec<TaskResponse> = rows.into_iter().map(TaskResponse::from).collect();
    Ok(HttpResponse::Ok().json(Page::new(tasks, total, page, limit)))
}
