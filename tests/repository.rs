use chrono::NaiveDate;

use sprintboard::domain::backlog::{
    ItemKind, ItemStatus, NewBacklogItem, Priority, UpdateBacklogItem,
};
use sprintboard::domain::epic::{EpicStatus, NewEpic};
use sprintboard::domain::member::{Department, MemberRole, NewTeamMember, UpdateTeamMember};
use sprintboard::domain::sprint::{BurndownTrend, NewSprint, SprintStatus};
use sprintboard::domain::time_entry::NewTimeEntry;
use sprintboard::domain::types::{
    EpicName, ItemId, ItemTitle, MemberEmail, MemberId, MemberName, RichText, SprintId, SprintName,
};
use sprintboard::listing::filter::FilterCriteria;
use sprintboard::repository::errors::RepositoryError;
use sprintboard::repository::memory::InMemoryRepository;
use sprintboard::repository::{
    EpicListQuery, EpicReader, EpicWriter, ItemListQuery, ItemReader, ItemWriter, MemberListQuery,
    MemberReader, MemberWriter, SprintListQuery, SprintReader, SprintWriter, TimeEntryListQuery,
    TimeEntryReader, TimeEntryWriter, seed,
};

fn new_item(title: &str) -> NewBacklogItem {
    NewBacklogItem {
        title: ItemTitle::new(title).unwrap(),
        description: None,
        kind: ItemKind::Story,
        status: ItemStatus::Todo,
        priority: Priority::Medium,
        story_points: Some(3),
        estimate_hours: Some(8),
        labels: vec![],
        assignee_id: None,
        epic_id: None,
        sprint_id: None,
    }
}

fn new_member(name: &str, email: &str) -> NewTeamMember {
    NewTeamMember {
        name: MemberName::new(name).unwrap(),
        email: MemberEmail::new(email).unwrap(),
        role: MemberRole::Developer,
        department: Department::Engineering,
        capacity_hours: 40,
    }
}

fn new_sprint(name: &str, status: SprintStatus, start: NaiveDate) -> NewSprint {
    NewSprint {
        name: SprintName::new(name).unwrap(),
        goal: None,
        status,
        start_date: start,
        end_date: start + chrono::Days::new(14),
        burndown: BurndownTrend::OnTrack,
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn test_item_repository_crud() {
    let repo = InMemoryRepository::new();

    let mut leak = new_item("Fix memory leak in sync worker");
    leak.kind = ItemKind::Bug;
    leak.labels = vec!["Performance".to_string()];
    let login = new_item("Polish login screen");
    assert_eq!(repo.create_items(&[leak, login]).unwrap(), 2);

    let listed = repo.list_items(ItemListQuery::new()).unwrap();
    assert_eq!(listed.total, 2);
    let leak_id = listed.items[0].id;
    assert_eq!(listed.items[0].title.as_str(), "Fix memory leak in sync worker");

    let fetched = repo.get_item_by_id(leak_id).unwrap().unwrap();
    assert_eq!(fetched.kind, ItemKind::Bug);

    let searched = repo
        .list_items(ItemListQuery::new().criteria(FilterCriteria::new().search("login")))
        .unwrap();
    assert_eq!(searched.total, 1);
    assert_eq!(searched.items[0].title.as_str(), "Polish login screen");

    let updates = UpdateBacklogItem {
        title: ItemTitle::new("Fix memory leak in sync worker").unwrap(),
        description: RichText::new_opt("Resident set keeps growing."),
        kind: ItemKind::Bug,
        status: ItemStatus::Done,
        priority: Priority::Critical,
        story_points: Some(5),
        estimate_hours: Some(16),
        labels: vec!["Performance".to_string()],
        assignee_id: None,
        epic_id: None,
        sprint_id: None,
    };
    let updated = repo.update_item(leak_id, &updates).unwrap();
    assert_eq!(updated.status, ItemStatus::Done);
    assert_eq!(updated.priority, Priority::Critical);

    repo.delete_item(leak_id).unwrap();
    assert!(repo.get_item_by_id(leak_id).unwrap().is_none());
    assert!(matches!(
        repo.delete_item(leak_id),
        Err(RepositoryError::NotFound)
    ));

    let remaining = repo.list_items(ItemListQuery::new()).unwrap();
    assert_eq!(remaining.total, 1);
}

#[test]
fn test_item_listing_scopes_and_pagination() {
    let repo = InMemoryRepository::new();
    let epic = repo
        .create_epic(&NewEpic {
            name: EpicName::new("Onboarding").unwrap(),
            description: None,
            status: EpicStatus::InProgress,
        })
        .unwrap();
    let sprint = repo
        .create_sprint(&new_sprint("Sprint 1", SprintStatus::Active, date(2026, 3, 2)))
        .unwrap();
    let member = repo
        .create_member(&new_member("Ada Byron", "ada@example.com"))
        .unwrap();

    let mut items = Vec::new();
    for n in 1..=12 {
        let mut item = new_item(&format!("Item {n:02}"));
        if n <= 4 {
            item.epic_id = Some(epic.id);
        }
        if n <= 6 {
            item.sprint_id = Some(sprint.id);
        }
        if n == 1 {
            item.assignee_id = Some(member.id);
        }
        items.push(item);
    }
    repo.create_items(&items).unwrap();

    let in_epic = repo.list_items(ItemListQuery::new().epic(epic.id)).unwrap();
    assert_eq!(in_epic.total, 4);

    let in_sprint = repo
        .list_items(ItemListQuery::new().sprint(sprint.id))
        .unwrap();
    assert_eq!(in_sprint.total, 6);

    let assigned = repo
        .list_items(ItemListQuery::new().assignee(member.id))
        .unwrap();
    assert_eq!(assigned.total, 1);

    let unscheduled = repo.list_items(ItemListQuery::new().unscheduled()).unwrap();
    assert_eq!(unscheduled.total, 6);
    assert!(unscheduled.items.iter().all(|item| item.sprint_id.is_none()));

    let second_page = repo
        .list_items(ItemListQuery::new().paginate(2, 5))
        .unwrap();
    assert_eq!(second_page.total, 12);
    assert_eq!(second_page.total_pages, 3);
    assert_eq!(second_page.items.len(), 5);
    assert_eq!(second_page.items[0].title.as_str(), "Item 06");
}

#[test]
fn test_epic_delete_detaches_items() {
    let repo = InMemoryRepository::new();
    let epic = repo
        .create_epic(&NewEpic {
            name: EpicName::new("Billing Revamp").unwrap(),
            description: None,
            status: EpicStatus::Planned,
        })
        .unwrap();

    let mut item = new_item("Migrate invoices");
    item.epic_id = Some(epic.id);
    repo.create_items(&[item]).unwrap();

    repo.delete_epic(epic.id).unwrap();
    assert!(repo.get_epic_by_id(epic.id).unwrap().is_none());

    let listed = repo.list_items(ItemListQuery::new()).unwrap();
    assert_eq!(listed.items[0].epic_id, None);

    let epics = repo.list_epics(EpicListQuery::new()).unwrap();
    assert_eq!(epics.total, 0);
}

#[test]
fn test_sprint_assignment_and_delete() {
    let repo = InMemoryRepository::new();
    let sprint = repo
        .create_sprint(&new_sprint("Sprint 7", SprintStatus::Planned, date(2026, 5, 4)))
        .unwrap();

    repo.create_items(&[new_item("First"), new_item("Second"), new_item("Third")])
        .unwrap();
    let listed = repo.list_items(ItemListQuery::new()).unwrap();
    let ids: Vec<ItemId> = listed.items.iter().map(|item| item.id).collect();

    let assigned = repo
        .assign_items_to_sprint(sprint.id, &ids[..2])
        .unwrap();
    assert_eq!(assigned, 2);

    // Re-assigning the same items is a no-op, not an error.
    assert_eq!(repo.assign_items_to_sprint(sprint.id, &ids[..2]).unwrap(), 0);

    let missing = SprintId::new(99).unwrap();
    assert!(matches!(
        repo.assign_items_to_sprint(missing, &ids),
        Err(RepositoryError::NotFound)
    ));

    repo.delete_sprint(sprint.id).unwrap();
    let after = repo.list_items(ItemListQuery::new()).unwrap();
    assert!(after.items.iter().all(|item| item.sprint_id.is_none()));

    let sprints = repo.list_sprints(SprintListQuery::new()).unwrap();
    assert_eq!(sprints.total, 0);
}

#[test]
fn test_active_sprint_prefers_the_latest_start() {
    let repo = InMemoryRepository::new();
    assert!(repo.get_active_sprint().unwrap().is_none());

    repo.create_sprint(&new_sprint("Sprint 1", SprintStatus::Completed, date(2026, 1, 5)))
        .unwrap();
    repo.create_sprint(&new_sprint("Sprint 2", SprintStatus::Active, date(2026, 2, 2)))
        .unwrap();
    repo.create_sprint(&new_sprint("Sprint 3", SprintStatus::Active, date(2026, 3, 2)))
        .unwrap();

    let active = repo.get_active_sprint().unwrap().unwrap();
    assert_eq!(active.name.as_str(), "Sprint 3");
}

#[test]
fn test_member_emails_are_unique() {
    let repo = InMemoryRepository::new();
    let ada = repo
        .create_member(&new_member("Ada Byron", "ada@example.com"))
        .unwrap();
    let tom = repo
        .create_member(&new_member("Tom Keller", "tom@example.com"))
        .unwrap();

    let duplicate = repo.create_member(&new_member("Imposter", "ada@example.com"));
    assert!(matches!(
        duplicate,
        Err(RepositoryError::ConstraintViolation(_))
    ));

    let collide = repo.update_member(
        tom.id,
        &UpdateTeamMember {
            name: MemberName::new("Tom Keller").unwrap(),
            email: MemberEmail::new("ada@example.com").unwrap(),
            role: MemberRole::Developer,
            department: Department::Engineering,
            capacity_hours: 24,
        },
    );
    assert!(matches!(
        collide,
        Err(RepositoryError::ConstraintViolation(_))
    ));

    // Keeping your own email is not a collision.
    let kept = repo
        .update_member(
            ada.id,
            &UpdateTeamMember {
                name: MemberName::new("Ada B.").unwrap(),
                email: MemberEmail::new("ada@example.com").unwrap(),
                role: MemberRole::Developer,
                department: Department::Engineering,
                capacity_hours: 32,
            },
        )
        .unwrap();
    assert_eq!(kept.name.as_str(), "Ada B.");
    assert_eq!(kept.capacity_hours, 32);

    let members = repo.list_members(MemberListQuery::new()).unwrap();
    assert_eq!(members.total, 2);
}

#[test]
fn test_member_with_logged_time_cannot_be_deleted() {
    let repo = InMemoryRepository::new();
    let ada = repo
        .create_member(&new_member("Ada Byron", "ada@example.com"))
        .unwrap();
    let tom = repo
        .create_member(&new_member("Tom Keller", "tom@example.com"))
        .unwrap();

    let mut item = new_item("Fix memory leak");
    item.assignee_id = Some(tom.id);
    repo.create_items(&[item]).unwrap();

    repo.create_time_entry(&NewTimeEntry {
        member_id: ada.id,
        item_id: None,
        spent_on: date(2026, 3, 9),
        hours: 4.0,
        note: None,
    })
    .unwrap();

    assert!(matches!(
        repo.delete_member(ada.id),
        Err(RepositoryError::ConstraintViolation(_))
    ));
    assert!(repo.get_member_by_id(ada.id).unwrap().is_some());

    // A member without entries goes away and their items become unassigned.
    repo.delete_member(tom.id).unwrap();
    let listed = repo.list_items(ItemListQuery::new()).unwrap();
    assert_eq!(listed.items[0].assignee_id, None);
}

#[test]
fn test_time_entries_validate_links_and_sort_newest_first() {
    let repo = InMemoryRepository::new();
    let ada = repo
        .create_member(&new_member("Ada Byron", "ada@example.com"))
        .unwrap();
    repo.create_items(&[new_item("Fix memory leak")]).unwrap();
    let item_id = repo.list_items(ItemListQuery::new()).unwrap().items[0].id;

    let unknown_member = MemberId::new(99).unwrap();
    assert!(matches!(
        repo.create_time_entry(&NewTimeEntry {
            member_id: unknown_member,
            item_id: None,
            spent_on: date(2026, 3, 9),
            hours: 2.0,
            note: None,
        }),
        Err(RepositoryError::NotFound)
    ));

    let unknown_item = ItemId::new(99).unwrap();
    assert!(matches!(
        repo.create_time_entry(&NewTimeEntry {
            member_id: ada.id,
            item_id: Some(unknown_item),
            spent_on: date(2026, 3, 9),
            hours: 2.0,
            note: None,
        }),
        Err(RepositoryError::NotFound)
    ));

    let older = repo
        .create_time_entry(&NewTimeEntry {
            member_id: ada.id,
            item_id: Some(item_id),
            spent_on: date(2026, 3, 8),
            hours: 3.5,
            note: RichText::new_opt("Heap profiling"),
        })
        .unwrap();
    let newer = repo
        .create_time_entry(&NewTimeEntry {
            member_id: ada.id,
            item_id: None,
            spent_on: date(2026, 3, 10),
            hours: 1.0,
            note: None,
        })
        .unwrap();

    let listed = repo.list_time_entries(TimeEntryListQuery::new()).unwrap();
    assert_eq!(listed.total, 2);
    assert_eq!(listed.items[0].id, newer.id);
    assert_eq!(listed.items[1].id, older.id);

    let for_member = repo
        .list_time_entries(TimeEntryListQuery::new().member(ada.id))
        .unwrap();
    assert_eq!(for_member.total, 2);

    // Deleting the item keeps the logged hours but drops the link.
    repo.delete_item(item_id).unwrap();
    let after = repo.list_time_entries(TimeEntryListQuery::new()).unwrap();
    assert!(after.items.iter().all(|entry| entry.item_id.is_none()));

    repo.delete_time_entry(newer.id).unwrap();
    assert!(matches!(
        repo.delete_time_entry(newer.id),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_seeded_store_supports_the_main_screens() {
    let repo = InMemoryRepository::new();
    seed::populate(&repo).unwrap();

    let active = repo.get_active_sprint().unwrap().unwrap();
    let committed = repo
        .list_items(ItemListQuery::new().sprint(active.id))
        .unwrap();
    assert!(committed.total > 0);

    let bugs = repo
        .list_items(ItemListQuery::new().criteria(FilterCriteria::new().select("kind", "Bug")))
        .unwrap();
    assert!(bugs.items.iter().all(|item| item.kind == ItemKind::Bug));

    let entries = repo.list_time_entries(TimeEntryListQuery::new()).unwrap();
    assert!(entries.total > 0);
}
