use chrono::NaiveDate;
use dioxus::prelude::*;
use shared_types::{
    AttendanceListParams, AttendanceRecord, AttendanceSummary, MarkAttendanceRequest,
};

#[cfg(feature = "server")]
use super::auth::*;

#[cfg(feature = "server")]
use crate::service;

#[server]
pub async fn list_attendance(
    params: AttendanceListParams,
) -> Result<Vec<AttendanceRecord>, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::attendance::list(state, &actor, &params).await)
}

#[cfg_attr(feature = "server", tracing::instrument(skip(req)))]
#[server]
pub async fn mark_attendance(req: MarkAttendanceRequest) -> Result<AttendanceRecord, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::attendance::mark(state, &actor, req).await)
}

#[server]
pub async fn check_in() -> Result<AttendanceRecord, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::attendance::check_in(state, &actor).await)
}

#[server]
pub async fn check_out() -> Result<AttendanceRecord, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::attendance::check_out(state, &actor).await)
}

#[server]
pub async fn get_attendance_summary(
    date: Option<NaiveDate>,
) -> Result<AttendanceSummary, ServerFnError> {
    let (state, actor) = require_user().await?;
    sfn(service::attendance::summary(state, &actor, date).await)
}
