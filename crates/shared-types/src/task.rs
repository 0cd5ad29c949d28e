use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "validation")]
use validator::Validate;

use crate::Searchable;

pub const TASK_PRIORITIES: &[&str] = &["low", "medium", "high"];
pub const TASK_STATUSES: &[&str] = &["pending", "in_progress", "completed"];

pub fn is_valid_task_priority(s: &str) -> bool {
    TASK_PRIORITIES.contains(&s)
}

pub fn is_valid_task_status(s: &str) -> bool {
    TASK_STATUSES.contains(&s)
}

/// A unit of work assigned to one person.
///
/// `assigned_by` is `None` once the assigner's account is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: i64,
    pub assignee_name: String,
    pub assigned_by: Option<i64>,
    pub assigned_by_name: Option<String>,
    pub priority: String,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed() && self.due_date.is_some_and(|due| due < today)
    }

    /// Created by the assignee for themselves.
    pub fn is_personal(&self) -> bool {
        self.assigned_by == Some(self.assignee_id)
    }
}

impl Searchable for Task {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.title.as_str(),
            self.assignee_name.as_str(),
            self.priority.as_str(),
            self.status.as_str(),
        ];
        if let Some(d) = &self.description {
            fields.push(d);
        }
        if let Some(n) = &self.assigned_by_name {
            fields.push(n);
        }
        fields
    }
}

/// Request to create a task. Without `assignee_id` the task is personal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct CreateTaskRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))
    )]
    pub title: String,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(length(max = 2000, message = "Description is too long"))
    )]
    pub description: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<i64>,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

fn default_priority() -> String {
    "medium".to_string()
}

/// Partial task update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
#[serde(default)]
pub struct UpdateTaskRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))
    )]
    pub title: Option<String>,
    #[cfg_attr(
        feature = "validation",
        validate(length(max = 2000, message = "Description is too long"))
    )]
    pub description: Option<String>,
    pub assignee_id: Option<i64>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl UpdateTaskRequest {
    /// True when the update touches anything besides `status`.
    pub fn changes_details(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.assignee_id.is_some()
            || self.priority.is_some()
            || self.due_date.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SetTaskStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct TaskListParams {
    pub q: Option<String>,
    pub status: Option<String>,
    pub assignee_id: Option<i64>,
}
