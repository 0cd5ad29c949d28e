use shared_types::{
    filter_by_query, is_valid_task_priority, is_valid_task_status, AppError, CreateTaskRequest,
    Section, StaffMember, Task, TaskListParams, UpdateTaskRequest, TASK_STATUSES,
};

use super::notification::notify;
use super::{check_filter, require_section, Visibility};
use crate::db::AppState;
use crate::error_convert::ValidateRequest;
use crate::repo;

/// What the actor may do with one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// Assigner, or outranks the assignee.
    Edit,
    /// The assignee of someone else's task: status only.
    Status,
}

fn access(vis: &Visibility, actor: &StaffMember, task: &Task) -> Option<Access> {
    if task.assigned_by == Some(actor.id) || vis.manages(task.assignee_id) {
        Some(Access::Edit)
    } else if task.assignee_id == actor.id {
        Some(Access::Status)
    } else {
        None
    }
}

/// Load a task the actor can see. Tasks outside their view read as not found.
async fn load(
    state: &AppState,
    actor: &StaffMember,
    id: i64,
) -> Result<(Task, Visibility, Access), AppError> {
    require_section(actor, Section::Tasks)?;
    let vis = Visibility::load(&state.pool, actor).await?;
    let not_found = || AppError::not_found(format!("Task {id} not found"));
    let task = repo::task::find_by_id(&state.pool, id).await?.ok_or_else(not_found)?;
    let access = access(&vis, actor, &task).ok_or_else(not_found)?;
    Ok((task, vis, access))
}

fn check_priority(priority: &str) -> Result<(), AppError> {
    if is_valid_task_priority(priority) {
        Ok(())
    } else {
        Err(AppError::field("priority", "Priority must be low, medium or high"))
    }
}

fn check_status(status: &str) -> Result<(), AppError> {
    if is_valid_task_status(status) {
        Ok(())
    } else {
        Err(AppError::field(
            "status",
            "Status must be pending, in_progress or completed",
        ))
    }
}

/// An assignee must be the actor or an active person they outrank.
async fn check_assignee(
    state: &AppState,
    actor: &StaffMember,
    vis: &Visibility,
    assignee_id: i64,
) -> Result<StaffMember, AppError> {
    let assignee = repo::staff::find_by_id(&state.pool, assignee_id)
        .await?
        .ok_or_else(|| AppError::field("assignee_id", "Assignee does not exist"))?;
    if assignee.id != actor.id && !vis.manages(assignee.id) {
        return Err(AppError::forbidden(format!(
            "You cannot assign tasks to {} accounts",
            assignee.role.label()
        )));
    }
    if !assignee.is_active() {
        return Err(AppError::field("assignee_id", "Assignee is inactive"));
    }
    Ok(assignee)
}

pub async fn list(
    state: &AppState,
    actor: &StaffMember,
    params: &TaskListParams,
) -> Result<Vec<Task>, AppError> {
    require_section(actor, Section::Tasks)?;
    check_filter("status", params.status.as_deref(), TASK_STATUSES)?;

    let vis = Visibility::load(&state.pool, actor).await?;
    let tasks: Vec<Task> = repo::task::list(&state.pool, params.status.as_deref(), params.assignee_id)
        .await?
        .into_iter()
        .filter(|t| access(&vis, actor, t).is_some())
        .collect();
    Ok(filter_by_query(tasks, params.q.as_deref().unwrap_or("")))
}

pub async fn get(state: &AppState, actor: &StaffMember, id: i64) -> Result<Task, AppError> {
    load(state, actor, id).await.map(|(task, _, _)| task)
}

pub async fn create(
    state: &AppState,
    actor: &StaffMember,
    req: CreateTaskRequest,
) -> Result<Task, AppError> {
    require_section(actor, Section::Tasks)?;
    req.validate_request()?;
    check_priority(&req.priority)?;

    let vis = Visibility::load(&state.pool, actor).await?;
    let assignee_id = req.assignee_id.unwrap_or(actor.id);
    check_assignee(state, actor, &vis, assignee_id).await?;

    let task = repo::task::create(
        &state.pool,
        &req.title,
        req.description.as_deref(),
        assignee_id,
        actor.id,
        &req.priority,
        req.due_date,
    )
    .await?;

    if assignee_id != actor.id {
        notify(
            &state.pool,
            assignee_id,
            "New task assigned",
            &format!("{} assigned you \"{}\"", actor.name, task.title),
            "info",
        )
        .await;
    }

    tracing::info!(actor_id = actor.id, task_id = task.id, assignee_id, "Task created");
    Ok(task)
}

/// Tell the assigner when someone else finishes their task.
async fn notify_completed(state: &AppState, actor: &StaffMember, before: &Task, after: &Task) {
    if before.is_completed() || !after.is_completed() {
        return;
    }
    if let Some(assigner) = after.assigned_by.filter(|id| *id != actor.id) {
        notify(
            &state.pool,
            assigner,
            "Task completed",
            &format!("{} completed \"{}\"", actor.name, after.title),
            "success",
        )
        .await;
    }
}

pub async fn update(
    state: &AppState,
    actor: &StaffMember,
    id: i64,
    req: UpdateTaskRequest,
) -> Result<Task, AppError> {
    req.validate_request()?;
    let (before, vis, access) = load(state, actor, id).await?;

    if access == Access::Status && req.changes_details() {
        return Err(AppError::forbidden(
            "You can only change the status of tasks assigned to you",
        ));
    }
    if let Some(priority) = &req.priority {
        check_priority(priority)?;
    }
    if let Some(status) = &req.status {
        check_status(status)?;
    }
    let reassigned_to = req.assignee_id.filter(|a| *a != before.assignee_id);
    if let Some(assignee_id) = reassigned_to {
        check_assignee(state, actor, &vis, assignee_id).await?;
    }

    let after = repo::task::update(&state.pool, id, &req)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Task {id} not found")))?;

    if let Some(assignee_id) = reassigned_to.filter(|a| *a != actor.id) {
        notify(
            &state.pool,
            assignee_id,
            "Task reassigned to you",
            &format!("{} assigned you \"{}\"", actor.name, after.title),
            "info",
        )
        .await;
    }
    notify_completed(state, actor, &before, &after).await;

    tracing::info!(actor_id = actor.id, task_id = id, "Task updated");
    Ok(after)
}

pub async fn set_status(
    state: &AppState,
    actor: &StaffMember,
    id: i64,
    status: &str,
) -> Result<Task, AppError> {
    check_status(status)?;
    let (before, _, _) = load(state, actor, id).await?;

    let after = repo::task::set_status(&state.pool, id, status)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Task {id} not found")))?;
    notify_completed(state, actor, &before, &after).await;

    tracing::info!(actor_id = actor.id, task_id = id, status, "Task status changed");
    Ok(after)
}

pub async fn delete(state: &AppState, actor: &StaffMember, id: i64) -> Result<(), AppError> {
    let (_, _, access) = load(state, actor, id).await?;
    if access != Access::Edit {
        return Err(AppError::forbidden(
            "Only the assigner or a superior can delete this task",
        ));
    }
    if !repo::task::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Task {id} not found")));
    }
    tracing::info!(actor_id = actor.id, task_id = id, "Task deleted");
    Ok(())
}
