pub mod task;
pub mod user;

pub use task::{Task, TaskInput, TaskJoinRow, TaskPriority, TaskResponse, TaskUpdate, UserRef};
pub use user::{Role, User, UserProfile, UserStats, UserView};

use serde::{Deserialize, Serialize};

/// Pagination parameters accepted by listing endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Resolves the raw query into a `(page, limit)` pair.
    ///
    /// Page numbering starts at 1; zero and negative values are clamped.
    pub fn resolve(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(10).max(1);
        (page, limit)
    }
}

/// One page of results plus the totals a client needs to paginate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: i64, page: i64, limit: i64) -> Page<T> {
        let pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        Page {
            data,
            total,
            page,
            pages,
        }
    }
}
