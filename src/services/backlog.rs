//! Services behind the backlog table and its forms.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::backlog::{NewBacklogItem, UpdateBacklogItem};
use crate::domain::types::ItemId;
use crate::dto::SelectOption;
use crate::dto::backlog::{
    BacklogPageData, BacklogQuery, ItemRow, kind_options, priority_options, status_options,
};
use crate::dto::filter_query;
use crate::forms::backlog::{AddItemForm, SaveItemForm, UploadItemsForm};
use crate::listing::ListState;
use crate::listing::page::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::{
    EpicListQuery, EpicReader, ItemListQuery, ItemReader, ItemWriter, MemberListQuery,
    MemberReader, SprintListQuery, SprintReader,
};
use crate::services::{ServiceError, ServiceResult};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Loads one page of the backlog with filters applied, plus the select
/// options used by the add and edit dialogs.
pub fn load_backlog_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: &BacklogQuery,
    today: NaiveDate,
) -> ServiceResult<BacklogPageData>
where
    R: ItemReader + EpicReader + SprintReader + MemberReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let mut state = ListState::new(DEFAULT_ITEMS_PER_PAGE);
    state.set_criteria(params.criteria());
    if let Some(page) = params.page {
        state.set_page(page);
    }

    let items = repo
        .list_items(
            ItemListQuery::new()
                .criteria(state.criteria().clone())
                .paginate(state.page(), state.per_page()),
        )
        .map_err(|err| {
            log::error!("Failed to list backlog items: {err}");
            err
        })?;

    let epics = repo
        .list_epics(EpicListQuery::new())
        .map_err(|err| {
            log::error!("Failed to list epics: {err}");
            err
        })?
        .items;
    let sprints = repo
        .list_sprints(SprintListQuery::new())
        .map_err(|err| {
            log::error!("Failed to list sprints: {err}");
            err
        })?
        .items;
    let members = repo
        .list_members(MemberListQuery::new())
        .map_err(|err| {
            log::error!("Failed to list team members: {err}");
            err
        })?
        .items;

    let epic_names: HashMap<i32, String> = epics
        .iter()
        .map(|epic| (epic.id.get(), epic.name.to_string()))
        .collect();
    let sprint_names: HashMap<i32, String> = sprints
        .iter()
        .map(|sprint| (sprint.id.get(), sprint.name.to_string()))
        .collect();
    let member_names: HashMap<i32, String> = members
        .iter()
        .map(|member| (member.id.get(), member.name.to_string()))
        .collect();

    let rows = items.map(|item| {
        let assignee = item
            .assignee_id
            .and_then(|id| member_names.get(&id.get()).cloned());
        let epic = item.epic_id.and_then(|id| epic_names.get(&id.get()).cloned());
        let sprint = item
            .sprint_id
            .and_then(|id| sprint_names.get(&id.get()).cloned());
        ItemRow::new(item, assignee, epic, sprint, today)
    });

    Ok(BacklogPageData {
        items: rows,
        filter_query: filter_query(params),
        params: params.clone(),
        statuses: status_options(),
        kinds: kind_options(),
        priorities: priority_options(),
        epics: epics
            .into_iter()
            .map(|epic| SelectOption::new(epic.id.get(), epic.name.to_string()))
            .collect(),
        sprints: sprints
            .into_iter()
            .map(|sprint| SelectOption::new(sprint.id.get(), sprint.name.to_string()))
            .collect(),
        members: members
            .into_iter()
            .map(|member| SelectOption::new(member.id.get(), member.name.to_string()))
            .collect(),
    })
}

/// Creates a backlog item from the add dialog.
pub fn add_item<R>(repo: &R, user: &AuthenticatedUser, form: &AddItemForm) -> ServiceResult<()>
where
    R: ItemWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = NewBacklogItem::try_from(form)?;

    repo.create_items(&[payload]).map_err(|err| {
        log::error!("Failed to create a backlog item: {err}");
        err
    })?;

    Ok(())
}

/// Applies an edit dialog submission to an existing item.
pub fn save_item<R>(repo: &R, user: &AuthenticatedUser, form: &SaveItemForm) -> ServiceResult<()>
where
    R: ItemWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let (item_id, updates) = <(ItemId, UpdateBacklogItem)>::try_from(form)?;

    repo.update_item(item_id, &updates).map_err(|err| {
        log::error!("Failed to update backlog item {item_id}: {err}");
        err
    })?;

    Ok(())
}

/// Removes an item and detaches its logged time.
pub fn delete_item<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: ItemWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let item_id = ItemId::new(id)?;

    repo.delete_item(item_id).map_err(|err| {
        log::error!("Failed to delete backlog item {item_id}: {err}");
        err
    })?;

    Ok(())
}

/// Parses the uploaded CSV file and creates backlog items in bulk.
pub fn upload_items<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &mut UploadItemsForm,
) -> ServiceResult<usize>
where
    R: ItemWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let items = form.parse().map_err(|err| {
        log::error!("Failed to parse the uploaded items csv: {err}");
        ServiceError::Form("The uploaded CSV could not be parsed".to_string())
    })?;

    if items.is_empty() {
        return Err(ServiceError::Form(
            "The uploaded CSV contains no items".to_string(),
        ));
    }

    let created = repo.create_items(&items).map_err(|err| {
        log::error!("Failed to import backlog items: {err}");
        err
    })?;

    Ok(created)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::listing::page::{PageState, Paginated, paginate};
    use crate::repository::mock::MockRepository;
    use crate::{SERVICE_ACCESS_ROLE, SERVICE_MEMBER_ROLE};

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

    fn member_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "2".to_string(),
            email: "member@example.com".to_string(),
            name: "Member".to_string(),
            roles: vec![
                SERVICE_ACCESS_ROLE.to_string(),
                SERVICE_MEMBER_ROLE.to_string(),
            ],
            exp: 0,
        }
    }

    fn empty_window<T: Clone>() -> Paginated<T> {
        paginate(&Vec::<T>::new(), &PageState::first(1)).expect("valid window")
    }

    fn add_form() -> AddItemForm {
        AddItemForm {
            title: "Fix login redirect".to_string(),
            description: String::new(),
            kind: "bug".to_string(),
            status: "todo".to_string(),
            priority: "high".to_string(),
            story_points: Some(3),
            estimate_hours: None,
            labels: String::new(),
            assignee_id: None,
            epic_id: None,
            sprint_id: None,
        }
    }

    #[test]
    fn load_requires_the_access_role() {
        let mut repo = MockRepository::new();
        repo.expect_list_items().times(0);
        let user = AuthenticatedUser {
            roles: vec![],
            ..admin_user()
        };

        let result = load_backlog_page(
            &repo,
            &user,
            &BacklogQuery::default(),
            NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
        );

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn load_passes_filters_and_page_to_the_repository() {
        let mut repo = MockRepository::new();
        repo.expect_list_items()
            .withf(|query| {
                query.pagination == Some(PageState::new(2, DEFAULT_ITEMS_PER_PAGE))
                    && query.criteria.query() == "login"
            })
            .times(1)
            .returning(|_| Ok(empty_window()));
        repo.expect_list_epics()
            .times(1)
            .returning(|_| Ok(empty_window()));
        repo.expect_list_sprints()
            .times(1)
            .returning(|_| Ok(empty_window()));
        repo.expect_list_members()
            .times(1)
            .returning(|_| Ok(empty_window()));

        let params = BacklogQuery {
            q: Some("login".to_string()),
            page: Some(2),
            ..Default::default()
        };
        let data = load_backlog_page(
            &repo,
            &member_user(),
            &params,
            NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
        )
        .expect("should load backlog");

        assert_eq!(data.filter_query, "q=login");
        assert_eq!(data.statuses.len(), 4);
    }

    #[test]
    fn add_requires_the_admin_role() {
        let mut repo = MockRepository::new();
        repo.expect_create_items().times(0);

        let result = add_item(&repo, &member_user(), &add_form());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn add_creates_the_item() {
        let mut repo = MockRepository::new();
        repo.expect_create_items()
            .withf(|items| items.len() == 1 && items[0].title.as_str() == "Fix login redirect")
            .times(1)
            .returning(|items| Ok(items.len()));

        add_item(&repo, &admin_user(), &add_form()).expect("should create the item");
    }

    #[test]
    fn add_rejects_an_unknown_status() {
        let mut repo = MockRepository::new();
        repo.expect_create_items().times(0);
        let mut form = add_form();
        form.status = "paused".to_string();

        let result = add_item(&repo, &admin_user(), &form);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn delete_rejects_a_non_positive_id() {
        let mut repo = MockRepository::new();
        repo.expect_delete_item().times(0);

        let result = delete_item(&repo, &admin_user(), 0);

        assert!(matches!(result, Err(ServiceError::TypeConstraint(_))));
    }

    #[test]
    fn delete_removes_the_item() {
        let mut repo = MockRepository::new();
        repo.expect_delete_item()
            .withf(|item_id| item_id.get() == 7)
            .times(1)
            .returning(|_| Ok(()));

        delete_item(&repo, &admin_user(), 7).expect("should delete the item");
    }
}
