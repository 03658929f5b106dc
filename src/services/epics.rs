//! Services behind the epics table and its forms.

use std::collections::HashMap;

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::backlog::ItemStatus;
use crate::domain::epic::{NewEpic, UpdateEpic};
use crate::domain::types::EpicId;
use crate::dto::epics::{EpicRow, EpicsPageData, EpicsQuery, status_options};
use crate::dto::filter_query;
use crate::forms::epics::{AddEpicForm, SaveEpicForm};
use crate::listing::ListState;
use crate::listing::page::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::{EpicListQuery, EpicReader, EpicWriter, ItemListQuery, ItemReader};
use crate::services::ServiceResult;
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Loads one page of epics with per-epic completion derived from the
/// backlog items attached to them.
pub fn load_epics_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: &EpicsQuery,
) -> ServiceResult<EpicsPageData>
where
    R: EpicReader + ItemReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let mut state = ListState::new(DEFAULT_ITEMS_PER_PAGE);
    state.set_criteria(params.criteria());
    if let Some(page) = params.page {
        state.set_page(page);
    }

    let epics = repo
        .list_epics(
            EpicListQuery::new()
                .criteria(state.criteria().clone())
                .paginate(state.page(), state.per_page()),
        )
        .map_err(|err| {
            log::error!("Failed to list epics: {err}");
            err
        })?;

    let items = repo
        .list_items(ItemListQuery::new())
        .map_err(|err| {
            log::error!("Failed to list backlog items: {err}");
            err
        })?
        .items;

    // Item and done counts per epic id, over the whole backlog.
    let mut counts: HashMap<i32, (usize, usize)> = HashMap::new();
    for item in &items {
        let Some(epic_id) = item.epic_id else {
            continue;
        };
        let entry = counts.entry(epic_id.get()).or_default();
        entry.0 += 1;
        if item.status == ItemStatus::Done {
            entry.1 += 1;
        }
    }

    let rows = epics.map(|epic| {
        let (item_count, done_count) = counts.get(&epic.id.get()).copied().unwrap_or((0, 0));
        EpicRow::new(epic, item_count, done_count)
    });

    Ok(EpicsPageData {
        epics: rows,
        filter_query: filter_query(params),
        params: params.clone(),
        statuses: status_options(),
    })
}

/// Creates an epic from the add dialog.
pub fn add_epic<R>(repo: &R, user: &AuthenticatedUser, form: &AddEpicForm) -> ServiceResult<()>
where
    R: EpicWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = NewEpic::try_from(form)?;

    repo.create_epic(&payload).map_err(|err| {
        log::error!("Failed to create an epic: {err}");
        err
    })?;

    Ok(())
}

/// Applies an edit dialog submission to an existing epic.
pub fn save_epic<R>(repo: &R, user: &AuthenticatedUser, form: &SaveEpicForm) -> ServiceResult<()>
where
    R: EpicWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let (epic_id, updates) = <(EpicId, UpdateEpic)>::try_from(form)?;

    repo.update_epic(epic_id, &updates).map_err(|err| {
        log::error!("Failed to update epic {epic_id}: {err}");
        err
    })?;

    Ok(())
}

/// Removes an epic and detaches its backlog items.
pub fn delete_epic<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: EpicWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let epic_id = EpicId::new(id)?;

    repo.delete_epic(epic_id).map_err(|err| {
        log::error!("Failed to delete epic {epic_id}: {err}");
        err
    })?;

    Ok(())
}
