//! Services behind the sprint list and the planning modal.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::backlog::{BacklogItem, ItemStatus};
use crate::domain::sprint::{NewSprint, UpdateSprint};
use crate::domain::types::{ItemId, SprintId};
use crate::dto::backlog::ItemRow;
use crate::dto::filter_query;
use crate::dto::sprints::{
    SprintPlanningData, SprintRow, SprintsPageData, SprintsQuery, status_options, trend_options,
};
use crate::forms::sprints::{AddSprintForm, AssignItemsForm, SaveSprintForm};
use crate::listing::ListState;
use crate::listing::page::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::{
    ItemListQuery, ItemReader, ItemWriter, SprintListQuery, SprintReader, SprintWriter,
};
use crate::services::{ServiceError, ServiceResult};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Story point totals per sprint id, split into committed and completed.
fn points_by_sprint(items: &[BacklogItem]) -> HashMap<i32, (usize, u32, u32)> {
    let mut totals: HashMap<i32, (usize, u32, u32)> = HashMap::new();
    for item in items {
        let Some(sprint_id) = item.sprint_id else {
            continue;
        };
        let entry = totals.entry(sprint_id.get()).or_default();
        let points = item.story_points.unwrap_or_default();
        entry.0 += 1;
        entry.1 += points;
        if item.status == ItemStatus::Done {
            entry.2 += points;
        }
    }
    totals
}

/// Loads one page of sprints with commitment and completion totals.
pub fn load_sprints_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: &SprintsQuery,
) -> ServiceResult<SprintsPageData>
where
    R: SprintReader + ItemReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let mut state = ListState::new(DEFAULT_ITEMS_PER_PAGE);
    state.set_criteria(params.criteria());
    if let Some(page) = params.page {
        state.set_page(page);
    }

    let sprints = repo
        .list_sprints(
            SprintListQuery::new()
                .criteria(state.criteria().clone())
                .paginate(state.page(), state.per_page()),
        )
        .map_err(|err| {
            log::error!("Failed to list sprints: {err}");
            err
        })?;

    let items = repo
        .list_items(ItemListQuery::new())
        .map_err(|err| {
            log::error!("Failed to list backlog items: {err}");
            err
        })?
        .items;
    let totals = points_by_sprint(&items);

    let rows = sprints.map(|sprint| {
        let (count, committed, completed) =
            totals.get(&sprint.id.get()).copied().unwrap_or_default();
        SprintRow::new(sprint, count, committed, completed)
    });

    Ok(SprintsPageData {
        sprints: rows,
        filter_query: filter_query(params),
        params: params.clone(),
        statuses: status_options(),
        trends: trend_options(),
    })
}

/// Creates a sprint from the add dialog.
pub fn add_sprint<R>(repo: &R, user: &AuthenticatedUser, form: &AddSprintForm) -> ServiceResult<()>
where
    R: SprintWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = NewSprint::try_from(form)?;

    repo.create_sprint(&payload).map_err(|err| {
        log::error!("Failed to create a sprint: {err}");
        err
    })?;

    Ok(())
}

/// Applies an edit dialog submission to an existing sprint.
pub fn save_sprint<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &SaveSprintForm,
) -> ServiceResult<()>
where
    R: SprintWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let (sprint_id, updates) = <(SprintId, UpdateSprint)>::try_from(form)?;

    repo.update_sprint(sprint_id, &updates).map_err(|err| {
        log::error!("Failed to update sprint {sprint_id}: {err}");
        err
    })?;

    Ok(())
}

/// Removes a sprint, sending its items back to the unscheduled backlog.
pub fn delete_sprint<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: SprintWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let sprint_id = SprintId::new(id)?;

    repo.delete_sprint(sprint_id).map_err(|err| {
        log::error!("Failed to delete sprint {sprint_id}: {err}");
        err
    })?;

    Ok(())
}

/// Loads the planning modal body: the sprint plus every unscheduled item.
pub fn load_planning_modal<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    today: NaiveDate,
) -> ServiceResult<SprintPlanningData>
where
    R: SprintReader + ItemReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let sprint_id = SprintId::new(id)?;

    let sprint = repo
        .get_sprint_by_id(sprint_id)
        .map_err(|err| {
            log::error!("Failed to load sprint {sprint_id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    let items = repo
        .list_items(ItemListQuery::new())
        .map_err(|err| {
            log::error!("Failed to list backlog items: {err}");
            err
        })?
        .items;
    let (count, committed, completed) = points_by_sprint(&items)
        .get(&sprint.id.get())
        .copied()
        .unwrap_or_default();

    let unscheduled = items
        .into_iter()
        .filter(|item| item.sprint_id.is_none())
        .map(|item| ItemRow::new(item, None, None, None, today))
        .collect();

    Ok(SprintPlanningData {
        sprint: SprintRow::new(sprint, count, committed, completed),
        unscheduled,
    })
}

/// Pulls the checked backlog items into the sprint. Takes the raw body
/// because the checkboxes post repeated `items` keys.
pub fn assign_items<R>(repo: &R, user: &AuthenticatedUser, form: &[u8]) -> ServiceResult<usize>
where
    R: ItemWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let form: AssignItemsForm = serde_html_form::from_bytes(form).map_err(|err| {
        log::error!("Failed to parse the assign items form: {err}");
        ServiceError::Form("Malformed item selection".to_string())
    })?;

    if form.items.is_empty() {
        return Err(ServiceError::Form("No items were selected".to_string()));
    }

    let sprint_id = SprintId::new(form.sprint_id)?;
    let item_ids = form
        .items
        .iter()
        .map(|id| ItemId::new(*id))
        .collect::<Result<Vec<_>, _>>()?;

    let assigned = repo
        .assign_items_to_sprint(sprint_id, &item_ids)
        .map_err(|err| {
            log::error!("Failed to assign items to sprint {sprint_id}: {err}");
            err
        })?;

    Ok(assigned)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::backlog::{ItemKind, Priority};
    use crate::domain::sprint::{BurndownTrend, Sprint, SprintStatus};
    use crate::domain::types::{ItemTitle, SprintName};
    use crate::listing::page::{PageState, Paginated, paginate};
    use crate::repository::mock::MockRepository;

    fn admin_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "admin@example.com".to_string(),
            name: "Admin".to_string(),
            roles: vec![
                SERVICE_ACCESS_ROLE.to_string(),
                SERVICE_ADMIN_ROLE.to_string(),
            ],
            exp: 0,
        }
    }

    fn viewer_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "2".to_string(),
            email: "viewer@example.com".to_string(),
            name: "Viewer".to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
            exp: 0,
        }
    }

    fn window<T: Clone>(records: Vec<T>) -> Paginated<T> {
        paginate(&records, &PageState::first(records.len().max(1))).expect("valid window")
    }

    fn sprint(id: i32) -> Sprint {
        let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let stamp = start.and_hms_opt(9, 0, 0).unwrap();
        Sprint {
            id: SprintId::new(id).unwrap(),
            name: SprintName::new(format!("Sprint {id}")).unwrap(),
            goal: None,
            status: SprintStatus::Active,
            start_date: start,
            end_date: NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(),
            burndown: BurndownTrend::AtRisk,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn item(id: i32, sprint_id: Option<i32>, status: ItemStatus, points: u32) -> BacklogItem {
        let stamp = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        BacklogItem {
            id: ItemId::new(id).unwrap(),
            title: ItemTitle::new(format!("Item {id}")).unwrap(),
            description: None,
            kind: ItemKind::Story,
            status,
            priority: Priority::Medium,
            story_points: Some(points),
            estimate_hours: None,
            labels: vec![],
            assignee_id: None,
            epic_id: None,
            sprint_id: sprint_id.map(|id| SprintId::new(id).unwrap()),
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn load_totals_points_per_sprint() {
        let mut repo = MockRepository::new();
        repo.expect_list_sprints()
            .times(1)
            .returning(|_| Ok(window(vec![sprint(3)])));
        repo.expect_list_items().times(1).returning(|_| {
            Ok(window(vec![
                item(1, Some(3), ItemStatus::Done, 5),
                item(2, Some(3), ItemStatus::InProgress, 3),
                item(3, None, ItemStatus::Todo, 8),
            ]))
        });

        let data = load_sprints_page(&repo, &viewer_user(), &SprintsQuery::default())
            .expect("should load sprints");

        let row = &data.sprints.items[0];
        assert_eq!(row.item_count, 2);
        assert_eq!(row.committed_points, 8);
        assert_eq!(row.completed_points, 5);
        assert_eq!(row.progress_percent, 63);
    }

    #[test]
    fn planning_modal_requires_the_admin_role() {
        let mut repo = MockRepository::new();
        repo.expect_get_sprint_by_id().times(0);

        let result = load_planning_modal(
            &repo,
            &viewer_user(),
            3,
            NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
        );

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn planning_modal_lists_only_unscheduled_items() {
        let mut repo = MockRepository::new();
        repo.expect_get_sprint_by_id()
            .withf(|sprint_id| sprint_id.get() == 3)
            .times(1)
            .returning(|_| Ok(Some(sprint(3))));
        repo.expect_list_items().times(1).returning(|_| {
            Ok(window(vec![
                item(1, Some(3), ItemStatus::InProgress, 5),
                item(2, None, ItemStatus::Todo, 3),
                item(3, None, ItemStatus::Todo, 2),
            ]))
        });

        let data = load_planning_modal(
            &repo,
            &admin_user(),
            3,
            NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
        )
        .expect("should load the modal");

        assert_eq!(data.sprint.item_count, 1);
        assert_eq!(data.unscheduled.len(), 2);
    }

    #[test]
    fn planning_modal_for_a_missing_sprint_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_sprint_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let result = load_planning_modal(
            &repo,
            &admin_user(),
            99,
            NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
        );

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn assign_rejects_an_empty_selection() {
        let mut repo = MockRepository::new();
        repo.expect_assign_items_to_sprint().times(0);

        let result = assign_items(&repo, &admin_user(), b"sprint_id=3");

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn assign_rejects_a_malformed_body() {
        let mut repo = MockRepository::new();
        repo.expect_assign_items_to_sprint().times(0);

        let result = assign_items(&repo, &admin_user(), b"items=4&items=9");

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn assign_moves_the_selected_items() {
        let mut repo = MockRepository::new();
        repo.expect_assign_items_to_sprint()
            .withf(|sprint_id, item_ids| sprint_id.get() == 3 && item_ids.len() == 2)
            .times(1)
            .returning(|_, item_ids| Ok(item_ids.len()));

        let assigned = assign_items(&repo, &admin_user(), b"sprint_id=3&items=4&items=9")
            .expect("should assign items");

        assert_eq!(assigned, 2);
    }
}
