use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the priority of a task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority, the default for new tasks.
    Medium,
    /// High priority.
    High,
}

impl Default for TaskPriority {
    fn default() -> TaskPriority {
        TaskPriority::Medium
    }
}

/// Represents a task as stored in the database.
///
/// Every task belongs to two users at once: the assignee (`assigned_to`)
/// who works the task and the creator (`created_by`) who opened it. Task
/// permissions are decided on that split.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    /// The title of the task.
    pub title: String,
    /// A description of what needs doing.
    pub description: String,
    /// The priority of the task.
    pub priority: TaskPriority,
    /// When the task is due.
    pub due_date: DateTime<Utc>,
    /// Whether the task has been completed.
    pub completed: bool,
    /// The user currently responsible for the task.
    pub assigned_to: Uuid,
    /// The user who opened the task.
    pub created_by: Uuid,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update to the task.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Builds a new task from creation input.
    ///
    /// Priority defaults to medium and the assignee defaults to the creator
    /// when not given. New tasks always start incomplete.
    pub fn new(input: TaskInput, created_by: Uuid) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            priority: input.priority.unwrap_or_default(),
            due_date: input.due_date,
            completed: false,
            assigned_to: input.assigned_to.unwrap_or(created_by),
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input structure for creating a task.
/// Contains validation rules for its fields.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    /// A description of the task.
    /// Must be between 1 and 1000 characters.
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Description must be between 1 and 1000 characters"
    ))]
    pub description: String,
    /// The priority of the task. Defaults to medium when not provided.
    pub priority: Option<TaskPriority>,
    /// When the task is due.
    pub due_date: DateTime<Utc>,
    /// The user to assign the task to. Defaults to the creator when absent.
    pub assigned_to: Option<Uuid>,
}

/// Payload for updating a task. Absent fields keep their stored values.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Description must be between 1 and 1000 characters"
    ))]
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
    pub assigned_to: Option<Uuid>,
}

/// Compact user identity embedded in task responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// A task with both user references expanded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
    pub assigned_to: UserRef,
    pub created_by: UserRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flat row produced by joining `tasks` against `users` twice.
#[derive(Debug, Clone, FromRow)]
pub struct TaskJoinRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
    pub assigned_to: Uuid,
    pub assignee_name: String,
    pub assignee_email: String,
    pub created_by: Uuid,
    pub creator_name: String,
    pub creator_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TaskJoinRow> for TaskResponse {
    fn from(row: TaskJoinRow) -> TaskResponse {
        TaskResponse {
            id: row.id,
            title: row.title,
            description: row.description,
            priority: row.priority,
            due_date: row.due_date,
            completed: row.completed,
            assigned_to: UserRef {
                id: row.assigned_to,
                name: row.assignee_name,
                email: row.assignee_email,
            },
            created_by: UserRef {
                id: row.created_by,
                name: row.creator_name,
                email: row.creator_email,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
