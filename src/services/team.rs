//! Services behind the team table and capacity overview.

use std::collections::HashMap;

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::member::{NewTeamMember, UpdateTeamMember};
use crate::domain::types::MemberId;
use crate::dto::filter_query;
use crate::dto::team::{MemberRow, TeamPageData, TeamQuery, department_options, role_options};
use crate::forms::team::{AddMemberForm, SaveMemberForm};
use crate::listing::ListState;
use crate::listing::page::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::{
    ItemListQuery, ItemReader, MemberListQuery, MemberReader, MemberWriter, SprintReader,
};
use crate::services::ServiceResult;
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Loads one page of team members with their load against the active
/// sprint. Without an active sprint everyone shows zero booked hours.
pub fn load_team_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: &TeamQuery,
) -> ServiceResult<TeamPageData>
where
    R: MemberReader + ItemReader + SprintReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let mut state = ListState::new(DEFAULT_ITEMS_PER_PAGE);
    state.set_criteria(params.criteria());
    if let Some(page) = params.page {
        state.set_page(page);
    }

    let members = repo
        .list_members(
            MemberListQuery::new()
                .criteria(state.criteria().clone())
                .paginate(state.page(), state.per_page()),
        )
        .map_err(|err| {
            log::error!("Failed to list team members: {err}");
            err
        })?;

    let active_sprint = repo.get_active_sprint().map_err(|err| {
        log::error!("Failed to load the active sprint: {err}");
        err
    })?;

    let mut booked: HashMap<i32, u32> = HashMap::new();
    if let Some(sprint) = &active_sprint {
        let items = repo
            .list_items(ItemListQuery::new().sprint(sprint.id))
            .map_err(|err| {
                log::error!("Failed to list sprint items: {err}");
                err
            })?
            .items;
        for item in items {
            let Some(assignee_id) = item.assignee_id else {
                continue;
            };
            *booked.entry(assignee_id.get()).or_default() +=
                item.estimate_hours.unwrap_or_default();
        }
    }

    let rows = members.map(|member| {
        let hours = booked.get(&member.id.get()).copied().unwrap_or_default();
        MemberRow::new(member, hours)
    });

    Ok(TeamPageData {
        members: rows,
        filter_query: filter_query(params),
        params: params.clone(),
        roles: role_options(),
        departments: department_options(),
        active_sprint: active_sprint.map(|sprint| sprint.name.to_string()),
    })
}

/// Adds a team member from the add dialog.
pub fn add_member<R>(repo: &R, user: &AuthenticatedUser, form: &AddMemberForm) -> ServiceResult<()>
where
    R: MemberWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = NewTeamMember::try_from(form)?;

    repo.create_member(&payload).map_err(|err| {
        log::error!("Failed to create a team member: {err}");
        err
    })?;

    Ok(())
}

/// Applies an edit dialog submission to an existing member.
pub fn save_member<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &SaveMemberForm,
) -> ServiceResult<()>
where
    R: MemberWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let (member_id, updates) = <(MemberId, UpdateTeamMember)>::try_from(form)?;

    repo.update_member(member_id, &updates).map_err(|err| {
        log::error!("Failed to update team member {member_id}: {err}");
        err
    })?;

    Ok(())
}

/// Removes a member, unassigning their backlog items. Members with logged
/// time entries are kept and the user gets a message instead.
pub fn delete_member<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: MemberWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let member_id = MemberId::new(id)?;

    repo.delete_member(member_id).map_err(|err| {
        log::error!("Failed to delete team member {member_id}: {err}");
        err
    })?;

    Ok(())
}
