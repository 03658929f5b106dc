//! Services composing the landing dashboard.

use chrono::NaiveDate;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::{AuthenticatedUser, ensure_role};
use crate::domain::backlog::ItemStatus;
use crate::dto::dashboard::{DashboardData, RecentItem, SprintCard, StatusTotals};
use crate::listing::metrics;
use crate::repository::{ItemListQuery, ItemReader, SprintReader};
use crate::services::ServiceResult;

/// Number of recently touched items shown on the landing page.
const RECENT_ITEMS: usize = 5;

/// Loads the status totals, the active sprint card and the most recently
/// touched backlog items.
pub fn load_dashboard<R>(
    repo: &R,
    user: &AuthenticatedUser,
    today: NaiveDate,
) -> ServiceResult<DashboardData>
where
    R: ItemReader + SprintReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let items = repo
        .list_items(ItemListQuery::new())
        .map_err(|err| {
            log::error!("Failed to load backlog items: {err}");
            err
        })?
        .items;

    let mut totals = StatusTotals::default();
    for item in &items {
        match item.status {
            ItemStatus::Todo => totals.todo += 1,
            ItemStatus::InProgress => totals.in_progress += 1,
            ItemStatus::InReview => totals.in_review += 1,
            ItemStatus::Done => totals.done += 1,
        }
    }
    let overall_progress = metrics::progress_percent(totals.done as f64, totals.total() as f64);

    let active_sprint = repo
        .get_active_sprint()
        .map_err(|err| {
            log::error!("Failed to load the active sprint: {err}");
            err
        })?
        .map(|sprint| {
            let in_sprint = items
                .iter()
                .filter(|item| item.sprint_id == Some(sprint.id));
            let mut committed = 0u32;
            let mut completed = 0u32;
            for item in in_sprint {
                let points = item.story_points.unwrap_or_default();
                committed += points;
                if item.status == ItemStatus::Done {
                    completed += points;
                }
            }
            SprintCard::new(sprint, committed, completed, today)
        });

    let mut recent = items;
    recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    let recent_items = recent
        .into_iter()
        .take(RECENT_ITEMS)
        .map(|item| RecentItem {
            id: item.id.get(),
            title: item.title.to_string(),
            status: item.status.to_string(),
            priority: item.priority.to_string(),
        })
        .collect();

    Ok(DashboardData {
        totals,
        overall_progress,
        active_sprint,
        recent_items,
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::backlog::{BacklogItem, ItemKind, Priority};
    use crate::domain::sprint::{BurndownTrend, Sprint, SprintStatus};
    use crate::domain::types::{ItemId, ItemTitle, SprintId, SprintName};
    use crate::listing::page::{PageState, Paginated, paginate};
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;

    fn tracker_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
            exp: 0,
        }
    }

    fn guest_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "2".to_string(),
            email: "guest@example.com".to_string(),
            name: "Guest".to_string(),
            roles: vec![],
            exp: 0,
        }
    }

    fn window<T: Clone>(records: Vec<T>) -> Paginated<T> {
        paginate(&records, &PageState::first(records.len().max(1))).expect("valid window")
    }

    fn item(id: i32, status: ItemStatus, points: u32, in_sprint: bool) -> BacklogItem {
        let stamp = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, id as u32 % 60)
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
            sprint_id: in_sprint.then(|| SprintId::new(3).unwrap()),
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn active_sprint() -> Sprint {
        let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let stamp = start.and_hms_opt(9, 0, 0).unwrap();
        Sprint {
            id: SprintId::new(3).unwrap(),
            name: SprintName::new("Sprint 23").unwrap(),
            goal: None,
            status: SprintStatus::Active,
            start_date: start,
            end_date: NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(),
            burndown: BurndownTrend::OnTrack,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn load_requires_the_access_role() {
        let mut repo = MockRepository::new();
        repo.expect_list_items().times(0);
        repo.expect_get_active_sprint().times(0);

        let result = load_dashboard(
            &repo,
            &guest_user(),
            NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
        );

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn load_counts_statuses_and_sprint_points() {
        let mut repo = MockRepository::new();
        let items = vec![
            item(1, ItemStatus::Todo, 3, true),
            item(2, ItemStatus::InProgress, 5, true),
            item(3, ItemStatus::Done, 2, true),
            item(4, ItemStatus::Done, 8, false),
        ];
        repo.expect_list_items()
            .times(1)
            .returning(move |_| Ok(window(items.clone())));
        repo.expect_get_active_sprint()
            .times(1)
            .returning(|| Ok(Some(active_sprint())));

        let data = load_dashboard(
            &repo,
            &tracker_user(),
            NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
        )
        .expect("should load dashboard");

        assert_eq!(
            data.totals,
            StatusTotals {
                todo: 1,
                in_progress: 1,
                in_review: 0,
                done: 2,
            }
        );
        assert_eq!(data.overall_progress, 50);
        let card = data.active_sprint.expect("active sprint card");
        assert_eq!(card.committed_points, 10);
        assert_eq!(card.completed_points, 2);
        assert_eq!(card.progress_percent, 20);
        assert_eq!(data.recent_items.len(), 4);
    }

    #[test]
    fn load_without_an_active_sprint_yields_no_card() {
        let mut repo = MockRepository::new();
        repo.expect_list_items()
            .times(1)
            .returning(|_| Ok(window(Vec::new())));
        repo.expect_get_active_sprint()
            .times(1)
            .returning(|| Ok(None));

        let data = load_dashboard(
            &repo,
            &tracker_user(),
            NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
        )
        .expect("should load dashboard");

        assert!(data.active_sprint.is_none());
        assert_eq!(data.overall_progress, 0);
    }
}
