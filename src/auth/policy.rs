use crate::error::AppError;
use crate::models::{Role, Task, UserView};

/// Requires the user to hold one of the `allowed` roles.
pub fn require_role(user: &UserView, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Not authorized to access this route".into(),
        ))
    }
}

/// Update and toggle-completion permission.
///
/// The assignee owns the work, so this follows `assigned_to`. A creator who
/// assigned a task away cannot edit it anymore. Admins always pass.
pub fn can_update_task(user: &UserView, task: &Task) -> Result<(), AppError> {
    if task.assigned_to == user.id || user.role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Not authorized to update this task".into(),
        ))
    }
}

/// Delete permission.
///
/// Deleting follows `created_by`, not `assigned_to`: an assignee cannot
/// remove a task someone else opened. Admins always pass.
pub fn can_delete_task(user: &UserView, task: &Task) -> Result<(), AppError> {
    if task.created_by == user.id || user.role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Not authorized to delete this task".into(),
        ))
    }
}
