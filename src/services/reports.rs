//! Services behind the time report page.

use std::collections::HashMap;

use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::time_entry::NewTimeEntry;
use crate::domain::types::{EntryId, MemberId};
use crate::dto::SelectOption;
use crate::dto::filter_query;
use crate::dto::reports::{EntryRow, MemberHours, ReportsPageData, ReportsQuery};
use crate::forms::reports::LogTimeForm;
use crate::listing::ListState;
use crate::listing::page::{DEFAULT_ITEMS_PER_PAGE, paginate};
use crate::repository::errors::RepositoryError;
use crate::repository::{
    ItemListQuery, ItemReader, MemberListQuery, MemberReader, TimeEntryListQuery, TimeEntryReader,
    TimeEntryWriter,
};
use crate::services::ServiceResult;
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Loads one page of time entries plus totals over the whole filtered set.
///
/// The sum and the per-member rollup cover every matching entry, not just
/// the visible page, so the window is cut here after totalling.
pub fn load_reports_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: &ReportsQuery,
) -> ServiceResult<ReportsPageData>
where
    R: TimeEntryReader + MemberReader + ItemReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let mut state = ListState::new(DEFAULT_ITEMS_PER_PAGE);
    state.set_criteria(params.criteria());
    if let Some(page) = params.page {
        state.set_page(page);
    }

    let mut query = TimeEntryListQuery::new().criteria(state.criteria().clone());
    if let Some(member) = params.member {
        query = query.member(MemberId::new(member)?);
    }

    let entries = repo
        .list_time_entries(query)
        .map_err(|err| {
            log::error!("Failed to list time entries: {err}");
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
    let items = repo
        .list_items(ItemListQuery::new())
        .map_err(|err| {
            log::error!("Failed to list backlog items: {err}");
            err
        })?
        .items;

    let member_names: HashMap<i32, String> = members
        .iter()
        .map(|member| (member.id.get(), member.name.to_string()))
        .collect();
    let item_titles: HashMap<i32, String> = items
        .iter()
        .map(|item| (item.id.get(), item.title.to_string()))
        .collect();

    let total_hours: f64 = entries.iter().map(|entry| entry.hours).sum();

    let mut per_member: HashMap<i32, f64> = HashMap::new();
    for entry in &entries {
        *per_member.entry(entry.member_id.get()).or_default() += entry.hours;
    }
    let mut by_member: Vec<MemberHours> = per_member
        .into_iter()
        .map(|(id, hours)| MemberHours {
            member: member_names.get(&id).cloned().unwrap_or_default(),
            hours,
        })
        .collect();
    by_member.sort_by(|a, b| b.hours.total_cmp(&a.hours).then_with(|| a.member.cmp(&b.member)));

    let window = paginate(&entries, &state.page_state()).map_err(RepositoryError::from)?;
    let rows = window.map(|entry| {
        let member = member_names
            .get(&entry.member_id.get())
            .cloned()
            .unwrap_or_default();
        let item = entry
            .item_id
            .and_then(|id| item_titles.get(&id.get()).cloned());
        EntryRow::new(entry, member, item)
    });

    Ok(ReportsPageData {
        entries: rows,
        total_hours,
        by_member,
        filter_query: filter_query(params),
        params: params.clone(),
        members: members
            .into_iter()
            .map(|member| SelectOption::new(member.id.get(), member.name.to_string()))
            .collect(),
    })
}

/// Records hours against a day for a team member.
pub fn log_time<R>(repo: &R, user: &AuthenticatedUser, form: &LogTimeForm) -> ServiceResult<()>
where
    R: TimeEntryWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let payload = NewTimeEntry::try_from(form)?;

    repo.create_time_entry(&payload).map_err(|err| {
        log::error!("Failed to log time: {err}");
        err
    })?;

    Ok(())
}

/// Removes a logged entry.
pub fn delete_entry<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: TimeEntryWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let entry_id = EntryId::new(id)?;

    repo.delete_time_entry(entry_id).map_err(|err| {
        log::error!("Failed to delete time entry {entry_id}: {err}");
        err
    })?;

    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::member::{Department, MemberRole, TeamMember};
    use crate::domain::time_entry::TimeEntry;
    use crate::domain::types::{MemberEmail, MemberName};
    use crate::listing::page::{PageState, Paginated};
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;
    use chrono::NaiveDate;

    fn tracker_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
            exp: 0,
        }
    }

    fn admin_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "2".to_string(),
            email: "admin@example.com".to_string(),
            name: "Admin".to_string(),
            roles: vec![
                SERVICE_ACCESS_ROLE.to_string(),
                SERVICE_ADMIN_ROLE.to_string(),
            ],
            exp: 0,
        }
    }

    fn window<T: Clone>(records: Vec<T>) -> Paginated<T> {
        paginate(&records, &PageState::first(records.len().max(1))).expect("valid window")
    }

    fn member(id: i32, name: &str) -> TeamMember {
        TeamMember {
            id: MemberId::new(id).unwrap(),
            name: MemberName::new(name).unwrap(),
            email: MemberEmail::new(format!("member{id}@example.com")).unwrap(),
            role: MemberRole::Developer,
            department: Department::Engineering,
            capacity_hours: 40,
        }
    }

    fn entry(id: i32, member_id: i32, hours: f64) -> TimeEntry {
        let spent_on = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        TimeEntry {
            id: EntryId::new(id).unwrap(),
            member_id: MemberId::new(member_id).unwrap(),
            item_id: None,
            spent_on,
            hours,
            note: None,
            created_at: spent_on.and_hms_opt(17, 0, 0).unwrap(),
        }
    }

    #[test]
    fn load_totals_cover_the_whole_filtered_set() {
        let mut repo = MockRepository::new();
        repo.expect_list_time_entries().times(1).returning(|_| {
            Ok(window(vec![
                entry(1, 1, 6.0),
                entry(2, 1, 2.0),
                entry(3, 2, 8.0),
            ]))
        });
        repo.expect_list_members()
            .times(1)
            .returning(|_| Ok(window(vec![member(1, "Ada Byron"), member(2, "Tom Keller")])));
        repo.expect_list_items()
            .times(1)
            .returning(|_| Ok(window(Vec::new())));

        let data = load_reports_page(&repo, &tracker_user(), &ReportsQuery::default())
            .expect("should load the report");

        assert_eq!(data.total_hours, 16.0);
        assert_eq!(
            data.by_member,
            vec![
                MemberHours {
                    member: "Ada Byron".to_string(),
                    hours: 8.0,
                },
                MemberHours {
                    member: "Tom Keller".to_string(),
                    hours: 8.0,
                },
            ]
        );
        assert_eq!(data.entries.items.len(), 3);
    }

    #[test]
    fn load_narrows_to_the_selected_member() {
        let mut repo = MockRepository::new();
        repo.expect_list_time_entries()
            .withf(|query| query.member_id.map(|id| id.get()) == Some(2))
            .times(1)
            .returning(|_| Ok(window(vec![entry(3, 2, 8.0)])));
        repo.expect_list_members()
            .times(1)
            .returning(|_| Ok(window(vec![member(2, "Tom Keller")])));
        repo.expect_list_items()
            .times(1)
            .returning(|_| Ok(window(Vec::new())));

        let params = ReportsQuery {
            member: Some(2),
            ..Default::default()
        };
        let data = load_reports_page(&repo, &tracker_user(), &params)
            .expect("should load the report");

        assert_eq!(data.total_hours, 8.0);
        assert_eq!(data.filter_query, "member=2");
    }

    #[test]
    fn log_time_requires_the_access_role() {
        let mut repo = MockRepository::new();
        repo.expect_create_time_entry().times(0);
        let user = AuthenticatedUser {
            roles: vec![],
            ..tracker_user()
        };
        let form = LogTimeForm {
            member_id: 1,
            item_id: None,
            spent_on: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
            hours: 4.0,
            note: String::new(),
        };

        let result = log_time(&repo, &user, &form);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn log_time_records_the_entry() {
        let mut repo = MockRepository::new();
        repo.expect_create_time_entry()
            .withf(|payload| payload.member_id.get() == 1 && payload.hours == 4.0)
            .times(1)
            .returning(|payload| {
                let mut created = entry(9, payload.member_id.get(), payload.hours);
                created.spent_on = payload.spent_on;
                Ok(created)
            });
        let form = LogTimeForm {
            member_id: 1,
            item_id: None,
            spent_on: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
            hours: 4.0,
            note: String::new(),
        };

        log_time(&repo, &tracker_user(), &form).expect("should log time");
    }

    #[test]
    fn delete_requires_the_admin_role() {
        let mut repo = MockRepository::new();
        repo.expect_delete_time_entry().times(0);

        let result = delete_entry(&repo, &tracker_user(), 3);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
