use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared_types::{
    AppError, CreateTaskRequest, SetTaskStatusRequest, Task, TaskListParams, UpdateTaskRequest,
};

use crate::auth::extractors::CurrentUser;
use crate::db::AppState;
use crate::service;

// ---------------------------------------------------------------------------
// GET /api/v1/tasks
// ---------------------------------------------------------------------------

/// Tasks the caller assigned, was assigned, or supervises.
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    params(TaskListParams),
    responses(
        (status = 200, description = "Visible tasks", body = Vec<Task>),
        (status = 400, description = "Unknown status filter", body = AppError),
        (status = 403, description = "Tasks not available to caller", body = AppError)
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn list_tasks(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(params): Query<TaskListParams>,
) -> Result<Json<Vec<Task>>, AppError> {
    service::task::list(&state, &actor, &params).await.map(Json)
}

// ---------------------------------------------------------------------------
// POST /api/v1/tasks
// ---------------------------------------------------------------------------

/// Create a personal task, or assign one to someone below the caller.
#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 403, description = "Assignee not below caller", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id))]
pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let task = service::task::create(&state, &actor, body).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

// ---------------------------------------------------------------------------
// GET /api/v1/tasks/{id}
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/v1/tasks/{id}",
    params(("id" = i64, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task", body = Task),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn get_task(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Task>, AppError> {
    service::task::get(&state, &actor, id).await.map(Json)
}

// ---------------------------------------------------------------------------
// PUT /api/v1/tasks/{id}
// ---------------------------------------------------------------------------

/// Edit a task. Assignees of someone else's task may only change its status.
#[utoipa::path(
    put,
    path = "/api/v1/tasks/{id}",
    params(("id" = i64, Path, description = "Task ID")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 403, description = "Only the status may be changed", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id, id))]
pub async fn update_task(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, AppError> {
    service::task::update(&state, &actor, id, body).await.map(Json)
}

// ---------------------------------------------------------------------------
// PATCH /api/v1/tasks/{id}/status
// ---------------------------------------------------------------------------

#[utoipa::path(
    patch,
    path = "/api/v1/tasks/{id}/status",
    params(("id" = i64, Path, description = "Task ID")),
    request_body = SetTaskStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = Task),
        (status = 404, description = "Not found", body = AppError),
        (status = 422, description = "Unknown status", body = AppError)
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id, id, status = %body.status))]
pub async fn set_task_status(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<SetTaskStatusRequest>,
) -> Result<Json<Task>, AppError> {
    service::task::set_status(&state, &actor, id, &body.status).await.map(Json)
}

// ---------------------------------------------------------------------------
// DELETE /api/v1/tasks/{id}
// ---------------------------------------------------------------------------

#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{id}",
    params(("id" = i64, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 403, description = "Assignees cannot delete", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = actor.id, id))]
pub async fn delete_task(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    service::task::delete(&state, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
