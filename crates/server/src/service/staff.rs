use shared_types::{
    filter_by_query, is_valid_staff_status, AppError, CreateStaffRequest, Role, Section,
    StaffListParams, StaffMember, UpdateStaffRequest, STAFF_STATUSES,
};

use super::{check_filter, require_outranks, require_section, today};
use crate::auth::{password, session};
use crate::db::AppState;
use crate::error_convert::ValidateRequest;
use crate::repo;

/// One directory page: everyone with `role`, filtered by status and text.
pub async fn list(
    state: &AppState,
    actor: &StaffMember,
    role: Role,
    params: &StaffListParams,
) -> Result<Vec<StaffMember>, AppError> {
    require_section(actor, Section::Directory(role))?;
    check_filter("status", params.status.as_deref(), STAFF_STATUSES)?;

    let members = repo::staff::list_by_role(&state.pool, role, params.status.as_deref()).await?;
    Ok(filter_by_query(members, params.q.as_deref().unwrap_or("")))
}

pub async fn get(state: &AppState, actor: &StaffMember, id: i64) -> Result<StaffMember, AppError> {
    find_visible(state, actor, id).await
}

/// The actor themself or someone they outrank. Anyone else is reported as
/// missing.
async fn find_visible(
    state: &AppState,
    actor: &StaffMember,
    id: i64,
) -> Result<StaffMember, AppError> {
    let missing = || AppError::not_found(format!("Staff member {id} not found"));
    let member = repo::staff::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(missing)?;
    if member.id != actor.id && !actor.role.outranks(&member.role) {
        return Err(missing());
    }
    Ok(member)
}

/// A manager must exist, be someone else, and outrank the person they manage.
async fn check_manager(
    state: &AppState,
    manager_id: i64,
    subject_id: Option<i64>,
    subject_role: Role,
) -> Result<(), AppError> {
    if subject_id == Some(manager_id) {
        return Err(AppError::field("manager_id", "A person cannot manage themselves"));
    }
    let manager = repo::staff::find_by_id(&state.pool, manager_id)
        .await?
        .ok_or_else(|| AppError::field("manager_id", "Manager does not exist"))?;
    if !manager.role.outranks(&subject_role) {
        return Err(AppError::field(
            "manager_id",
            format!(
                "A {} cannot manage a {}",
                manager.role.label(),
                subject_role.label()
            ),
        ));
    }
    Ok(())
}

pub async fn create(
    state: &AppState,
    actor: &StaffMember,
    req: CreateStaffRequest,
) -> Result<StaffMember, AppError> {
    req.validate_request()?;
    require_outranks(actor, req.role, "create")?;

    if let Some(manager_id) = req.manager_id {
        check_manager(state, manager_id, None, req.role).await?;
    }

    let hash = password::hash_password(&req.password)?;
    let joined_on = req.joined_on.unwrap_or_else(today);
    let member = repo::staff::create(&state.pool, &req, &hash, joined_on).await?;

    tracing::info!(
        actor_id = actor.id,
        user_id = member.id,
        role = %member.role,
        "Staff member created"
    );
    Ok(member)
}

pub async fn update(
    state: &AppState,
    actor: &StaffMember,
    id: i64,
    req: UpdateStaffRequest,
) -> Result<StaffMember, AppError> {
    req.validate_request()?;
    let current = find_visible(state, actor, id).await?;
    require_outranks(actor, current.role, "edit")?;

    let new_role = req.role.unwrap_or(current.role);
    if new_role != current.role {
        require_outranks(actor, new_role, "assign the role of")?;
    }

    match req.manager_id {
        Some(manager_id) => check_manager(state, manager_id, Some(id), new_role).await?,
        // A promotion can leave the existing manager below the new role.
        None => {
            if let Some(manager_id) = current.manager_id {
                if new_role != current.role {
                    check_manager(state, manager_id, Some(id), new_role).await?;
                }
            }
        }
    }

    let updated = repo::staff::update(&state.pool, id, &req)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Staff member {id} not found")))?;

    tracing::info!(actor_id = actor.id, user_id = id, "Staff member updated");
    Ok(updated)
}

/// Flip between `active` and `inactive`.
///
/// Deactivation also revokes the person's sessions.
pub async fn toggle_status(
    state: &AppState,
    actor: &StaffMember,
    id: i64,
) -> Result<StaffMember, AppError> {
    if id == actor.id {
        return Err(AppError::bad_request("You cannot change your own status"));
    }
    let current = find_visible(state, actor, id).await?;

    let next = if current.is_active() { "inactive" } else { "active" };
    debug_assert!(is_valid_staff_status(next));

    let updated = repo::staff::set_status(&state.pool, id, next)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Staff member {id} not found")))?;

    if !updated.is_active() {
        session::revoke_all(&state.pool, id).await?;
    }

    tracing::info!(actor_id = actor.id, user_id = id, status = next, "Staff status changed");
    Ok(updated)
}

pub async fn delete(state: &AppState, actor: &StaffMember, id: i64) -> Result<(), AppError> {
    if id == actor.id {
        return Err(AppError::bad_request("You cannot delete your own account"));
    }
    let current = find_visible(state, actor, id).await?;

    if !repo::staff::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Staff member {id} not found")));
    }

    tracing::info!(actor_id = actor.id, user_id = id, role = %current.role, "Staff member deleted");
    Ok(())
}
