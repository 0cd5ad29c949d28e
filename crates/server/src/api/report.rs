use dioxus::prelude::*;
use shared_types::{CreateReportRequest, Report, ReportListParams};

#[cfg(feature = "server")]
use super::auth::*;

#[cfg(feature = "server")]
use crate::service;

#[server]
pub async fn list_reports(params: ReportListParams) -> Result<Vec<Report>, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::report::list(state, &actor, &params).await)
}

#[server]
pub async fn get_report(id: i64) -> Result<Report, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::report::get(state, &actor, id).await)
}

/// Queue a report. The returned record is `queued`; poll until it finishes.
#[cfg_attr(feature = "server", tracing::instrument(skip(req)))]
#[server]
pub async fn request_report(req: CreateReportRequest) -> Result<Report, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::report::request(state, &actor, req).await)
}

#[server]
pub async fn retry_report(id: i64) -> Result<Report, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::report::retry(state, &actor, id).await)
}

#[server]
pub async fn delete_report(id: i64) -> Result<(), ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::report::delete(state, &actor, id).await)
}
