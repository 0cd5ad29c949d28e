use dioxus::prelude::*;
use shared_types::{CreateTaskRequest, Task, TaskListParams, UpdateTaskRequest};

#[cfg(feature = "server")]
use super::auth::*;

#[cfg(feature = "server")]
use crate::service;

#[server]
pub async fn list_tasks(params: TaskListParams) -> Result<Vec<Task>, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::task::list(state, &actor, &params).await)
}

#[cfg_attr(feature = "server", tracing::instrument(skip(req)))]
#[server]
pub async fn create_task(req: CreateTaskRequest) -> Result<Task, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::task::create(state, &actor, req).await)
}

#[cfg_attr(feature = "server", tracing::instrument(skip(req)))]
#[server]
pub async fn update_task(id: i64, req: UpdateTaskRequest) -> Result<Task, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::task::update(state, &actor, id, req).await)
}

#[server]
pub async fn set_task_status(id: i64, status: String) -> Result<Task, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::task::set_status(state, &actor, id, &status).await)
}

#[server]
pub async fn delete_task(id: i64) -> Result<(), ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::task::delete(state, &actor, id).await)
}
