//! Process-local repository backing the demo deployment.
//!
//! All collections live behind one `RwLock`; cloning the repository shares the
//! same store, so every worker thread observes the same data.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::domain::backlog::{BacklogItem, NewBacklogItem, UpdateBacklogItem};
use crate::domain::epic::{Epic, NewEpic, UpdateEpic};
use crate::domain::member::{NewTeamMember, TeamMember, UpdateTeamMember};
use crate::domain::sprint::{NewSprint, Sprint, SprintStatus, UpdateSprint};
use crate::domain::time_entry::{NewTimeEntry, TimeEntry};
use crate::domain::types::{EntryId, EpicId, ItemId, MemberId, SprintId};
use crate::listing::filter;
use crate::listing::page::{self, PageState, Paginated};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    EpicListQuery, EpicReader, EpicWriter, ItemListQuery, ItemReader, ItemWriter, MemberListQuery,
    MemberReader, MemberWriter, SprintListQuery, SprintReader, SprintWriter, TimeEntryListQuery,
    TimeEntryReader, TimeEntryWriter,
};

#[derive(Default)]
struct Store {
    items: Vec<BacklogItem>,
    epics: Vec<Epic>,
    sprints: Vec<Sprint>,
    members: Vec<TeamMember>,
    entries: Vec<TimeEntry>,
    next_item_id: i32,
    next_epic_id: i32,
    next_sprint_id: i32,
    next_member_id: i32,
    next_entry_id: i32,
}

impl Store {
    fn new() -> Self {
        Self {
            next_item_id: 1,
            next_epic_id: 1,
            next_sprint_id: 1,
            next_member_id: 1,
            next_entry_id: 1,
            ..Self::default()
        }
    }
}

/// Shared in-memory implementation of every repository trait.
#[derive(Clone)]
pub struct InMemoryRepository {
    store: Arc<RwLock<Store>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::new())),
        }
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, Store>> {
        self.store
            .read()
            .map_err(|_| RepositoryError::Unexpected("store lock poisoned".to_string()))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, Store>> {
        self.store
            .write()
            .map_err(|_| RepositoryError::Unexpected("store lock poisoned".to_string()))
    }
}

/// Pages an already filtered and sorted snapshot. Queries without pagination
/// get everything back as a single window.
fn paginate_slice<T: Clone>(
    records: Vec<T>,
    pagination: Option<PageState>,
) -> RepositoryResult<Paginated<T>> {
    let state = pagination.unwrap_or_else(|| PageState::first(records.len().max(1)));
    Ok(page::paginate(&records, &state)?)
}

impl ItemReader for InMemoryRepository {
    fn get_item_by_id(&self, id: ItemId) -> RepositoryResult<Option<BacklogItem>> {
        let store = self.read()?;
        Ok(store.items.iter().find(|item| item.id == id).cloned())
    }

    fn list_items(&self, query: ItemListQuery) -> RepositoryResult<Paginated<BacklogItem>> {
        let store = self.read()?;
        let mut matched: Vec<BacklogItem> = store
            .items
            .iter()
            .filter(|item| query.epic_id.is_none_or(|id| item.epic_id == Some(id)))
            .filter(|item| query.sprint_id.is_none_or(|id| item.sprint_id == Some(id)))
            .filter(|item| query.assignee_id.is_none_or(|id| item.assignee_id == Some(id)))
            .filter(|item| !query.unscheduled_only || item.sprint_id.is_none())
            .filter(|item| filter::matches(*item, &query.criteria))
            .cloned()
            .collect();
        matched.sort_by_key(|item| item.id.get());

        paginate_slice(matched, query.pagination)
    }
}

impl ItemWriter for InMemoryRepository {
    fn create_items(&self, new_items: &[NewBacklogItem]) -> RepositoryResult<usize> {
        let mut store = self.write()?;
        let now = Utc::now().naive_utc();

        for new_item in new_items {
            let id = ItemId::new(store.next_item_id)?;
            store.next_item_id += 1;
            store.items.push(BacklogItem {
                id,
                title: new_item.title.clone(),
                description: new_item.description.clone(),
                kind: new_item.kind,
                status: new_item.status,
                priority: new_item.priority,
                story_points: new_item.story_points,
                estimate_hours: new_item.estimate_hours,
                labels: new_item.labels.clone(),
                assignee_id: new_item.assignee_id,
                epic_id: new_item.epic_id,
                sprint_id: new_item.sprint_id,
                created_at: now,
                updated_at: now,
            });
        }

        Ok(new_items.len())
    }

    fn update_item(
        &self,
        item_id: ItemId,
        updates: &UpdateBacklogItem,
    ) -> RepositoryResult<BacklogItem> {
        let mut store = self.write()?;
        let item = store
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or(RepositoryError::NotFound)?;

        item.title = updates.title.clone();
        item.description = updates.description.clone();
        item.kind = updates.kind;
        item.status = updates.status;
        item.priority = updates.priority;
        item.story_points = updates.story_points;
        item.estimate_hours = updates.estimate_hours;
        item.labels = updates.labels.clone();
        item.assignee_id = updates.assignee_id;
        item.epic_id = updates.epic_id;
        item.sprint_id = updates.sprint_id;
        item.updated_at = Utc::now().naive_utc();

        Ok(item.clone())
    }

    fn delete_item(&self, item_id: ItemId) -> RepositoryResult<()> {
        let mut store = self.write()?;
        let before = store.items.len();
        store.items.retain(|item| item.id != item_id);
        if store.items.len() == before {
            return Err(RepositoryError::NotFound);
        }

        // Logged time survives the item, it just loses the link.
        for entry in &mut store.entries {
            if entry.item_id == Some(item_id) {
                entry.item_id = None;
            }
        }
        Ok(())
    }

    fn assign_items_to_sprint(
        &self,
        sprint_id: SprintId,
        item_ids: &[ItemId],
    ) -> RepositoryResult<usize> {
        let mut store = self.write()?;
        if !store.sprints.iter().any(|sprint| sprint.id == sprint_id) {
            return Err(RepositoryError::NotFound);
        }

        let now = Utc::now().naive_utc();
        let mut assigned = 0;
        for item in &mut store.items {
            if item_ids.contains(&item.id) && item.sprint_id != Some(sprint_id) {
                item.sprint_id = Some(sprint_id);
                item.updated_at = now;
                assigned += 1;
            }
        }
        Ok(assigned)
    }
}

impl EpicReader for InMemoryRepository {
    fn get_epic_by_id(&self, id: EpicId) -> RepositoryResult<Option<Epic>> {
        let store = self.read()?;
        Ok(store.epics.iter().find(|epic| epic.id == id).cloned())
    }

    fn list_epics(&self, query: EpicListQuery) -> RepositoryResult<Paginated<Epic>> {
        let store = self.read()?;
        let mut matched = filter::apply(&store.epics, &query.criteria);
        matched.sort_by_key(|epic| epic.id.get());

        paginate_slice(matched, query.pagination)
    }
}

impl EpicWriter for InMemoryRepository {
    fn create_epic(&self, new_epic: &NewEpic) -> RepositoryResult<Epic> {
        let mut store = self.write()?;
        let now = Utc::now().naive_utc();
        let id = EpicId::new(store.next_epic_id)?;
        store.next_epic_id += 1;

        let epic = Epic {
            id,
            name: new_epic.name.clone(),
            description: new_epic.description.clone(),
            status: new_epic.status,
            created_at: now,
            updated_at: now,
        };
        store.epics.push(epic.clone());
        Ok(epic)
    }

    fn update_epic(&self, epic_id: EpicId, updates: &UpdateEpic) -> RepositoryResult<Epic> {
        let mut store = self.write()?;
        let epic = store
            .epics
            .iter_mut()
            .find(|epic| epic.id == epic_id)
            .ok_or(RepositoryError::NotFound)?;

        epic.name = updates.name.clone();
        epic.description = updates.description.clone();
        epic.status = updates.status;
        epic.updated_at = Utc::now().naive_utc();

        Ok(epic.clone())
    }

    fn delete_epic(&self, epic_id: EpicId) -> RepositoryResult<()> {
        let mut store = self.write()?;
        let before = store.epics.len();
        store.epics.retain(|epic| epic.id != epic_id);
        if store.epics.len() == before {
            return Err(RepositoryError::NotFound);
        }

        for item in &mut store.items {
            if item.epic_id == Some(epic_id) {
                item.epic_id = None;
            }
        }
        Ok(())
    }
}

impl SprintReader for InMemoryRepository {
    fn get_sprint_by_id(&self, id: SprintId) -> RepositoryResult<Option<Sprint>> {
        let store = self.read()?;
        Ok(store.sprints.iter().find(|sprint| sprint.id == id).cloned())
    }

    fn get_active_sprint(&self) -> RepositoryResult<Option<Sprint>> {
        let store = self.read()?;
        Ok(store
            .sprints
            .iter()
            .filter(|sprint| sprint.status == SprintStatus::Active)
            .max_by_key(|sprint| sprint.start_date)
            .cloned())
    }

    fn list_sprints(&self, query: SprintListQuery) -> RepositoryResult<Paginated<Sprint>> {
        let store = self.read()?;
        let mut matched = filter::apply(&store.sprints, &query.criteria);
        matched.sort_by_key(|sprint| sprint.id.get());

        paginate_slice(matched, query.pagination)
    }
}

impl SprintWriter for InMemoryRepository {
    fn create_sprint(&self, new_sprint: &NewSprint) -> RepositoryResult<Sprint> {
        let mut store = self.write()?;
        let now = Utc::now().naive_utc();
        let id = SprintId::new(store.next_sprint_id)?;
        store.next_sprint_id += 1;

        let sprint = Sprint {
            id,
            name: new_sprint.name.clone(),
            goal: new_sprint.goal.clone(),
            status: new_sprint.status,
            start_date: new_sprint.start_date,
            end_date: new_sprint.end_date,
            burndown: new_sprint.burndown,
            created_at: now,
            updated_at: now,
        };
        store.sprints.push(sprint.clone());
        Ok(sprint)
    }

    fn update_sprint(
        &self,
        sprint_id: SprintId,
        updates: &UpdateSprint,
    ) -> RepositoryResult<Sprint> {
        let mut store = self.write()?;
        let sprint = store
            .sprints
            .iter_mut()
            .find(|sprint| sprint.id == sprint_id)
            .ok_or(RepositoryError::NotFound)?;

        sprint.name = updates.name.clone();
        sprint.goal = updates.goal.clone();
        sprint.status = updates.status;
        sprint.start_date = updates.start_date;
        sprint.end_date = updates.end_date;
        sprint.burndown = updates.burndown;
        sprint.updated_at = Utc::now().naive_utc();

        Ok(sprint.clone())
    }

    fn delete_sprint(&self, sprint_id: SprintId) -> RepositoryResult<()> {
        let mut store = self.write()?;
        let before = store.sprints.len();
        store.sprints.retain(|sprint| sprint.id != sprint_id);
        if store.sprints.len() == before {
            return Err(RepositoryError::NotFound);
        }

        for item in &mut store.items {
            if item.sprint_id == Some(sprint_id) {
                item.sprint_id = None;
            }
        }
        Ok(())
    }
}

impl MemberReader for InMemoryRepository {
    fn get_member_by_id(&self, id: MemberId) -> RepositoryResult<Option<TeamMember>> {
        let store = self.read()?;
        Ok(store.members.iter().find(|member| member.id == id).cloned())
    }

    fn list_members(&self, query: MemberListQuery) -> RepositoryResult<Paginated<TeamMember>> {
        let store = self.read()?;
        let mut matched = filter::apply(&store.members, &query.criteria);
        matched.sort_by_key(|member| member.id.get());

        paginate_slice(matched, query.pagination)
    }
}

impl MemberWriter for InMemoryRepository {
    fn create_member(&self, new_member: &NewTeamMember) -> RepositoryResult<TeamMember> {
        let mut store = self.write()?;
        if store
            .members
            .iter()
            .any(|member| member.email == new_member.email)
        {
            return Err(RepositoryError::ConstraintViolation(format!(
                "member with email {} already exists",
                new_member.email
            )));
        }

        let id = MemberId::new(store.next_member_id)?;
        store.next_member_id += 1;

        let member = TeamMember {
            id,
            name: new_member.name.clone(),
            email: new_member.email.clone(),
            role: new_member.role,
            department: new_member.department,
            capacity_hours: new_member.capacity_hours,
        };
        store.members.push(member.clone());
        Ok(member)
    }

    fn update_member(
        &self,
        member_id: MemberId,
        updates: &UpdateTeamMember,
    ) -> RepositoryResult<TeamMember> {
        let mut store = self.write()?;
        if store
            .members
            .iter()
            .any(|member| member.id != member_id && member.email == updates.email)
        {
            return Err(RepositoryError::ConstraintViolation(format!(
                "member with email {} already exists",
                updates.email
            )));
        }

        let member = store
            .members
            .iter_mut()
            .find(|member| member.id == member_id)
            .ok_or(RepositoryError::NotFound)?;

        member.name = updates.name.clone();
        member.email = updates.email.clone();
        member.role = updates.role;
        member.department = updates.department;
        member.capacity_hours = updates.capacity_hours;

        Ok(member.clone())
    }

    fn delete_member(&self, member_id: MemberId) -> RepositoryResult<()> {
        let mut store = self.write()?;
        if !store.members.iter().any(|member| member.id == member_id) {
            return Err(RepositoryError::NotFound);
        }
        if store
            .entries
            .iter()
            .any(|entry| entry.member_id == member_id)
        {
            return Err(RepositoryError::ConstraintViolation(
                "member has logged time entries".to_string(),
            ));
        }

        store.members.retain(|member| member.id != member_id);
        for item in &mut store.items {
            if item.assignee_id == Some(member_id) {
                item.assignee_id = None;
            }
        }
        Ok(())
    }
}

impl TimeEntryReader for InMemoryRepository {
    fn list_time_entries(
        &self,
        query: TimeEntryListQuery,
    ) -> RepositoryResult<Paginated<TimeEntry>> {
        let store = self.read()?;
        let mut matched: Vec<TimeEntry> = store
            .entries
            .iter()
            .filter(|entry| query.member_id.is_none_or(|id| entry.member_id == id))
            .filter(|entry| query.item_id.is_none_or(|id| entry.item_id == Some(id)))
            .filter(|entry| filter::matches(*entry, &query.criteria))
            .cloned()
            .collect();
        // Newest first so reports lead with recent work.
        matched.sort_by(|a, b| {
            b.spent_on
                .cmp(&a.spent_on)
                .then_with(|| b.id.get().cmp(&a.id.get()))
        });

        paginate_slice(matched, query.pagination)
    }
}

impl TimeEntryWriter for InMemoryRepository {
    fn create_time_entry(&self, new_entry: &NewTimeEntry) -> RepositoryResult<TimeEntry> {
        let mut store = self.write()?;
        if !store
            .members
            .iter()
            .any(|member| member.id == new_entry.member_id)
        {
            return Err(RepositoryError::NotFound);
        }
        if let Some(item_id) = new_entry.item_id {
            if !store.items.iter().any(|item| item.id == item_id) {
                return Err(RepositoryError::NotFound);
            }
        }

        let id = EntryId::new(store.next_entry_id)?;
        store.next_entry_id += 1;

        let entry = TimeEntry {
            id,
            member_id: new_entry.member_id,
            item_id: new_entry.item_id,
            spent_on: new_entry.spent_on,
            hours: new_entry.hours,
            note: new_entry.note.clone(),
            created_at: Utc::now().naive_utc(),
        };
        store.entries.push(entry.clone());
        Ok(entry)
    }

    fn delete_time_entry(&self, entry_id: EntryId) -> RepositoryResult<()> {
        let mut store = self.write()?;
        let before = store.entries.len();
        store.entries.retain(|entry| entry.id != entry_id);
        if store.entries.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
