use crate::{
    domain::{
        backlog::{BacklogItem, NewBacklogItem, UpdateBacklogItem},
        epic::{Epic, NewEpic, UpdateEpic},
        member::{NewTeamMember, TeamMember, UpdateTeamMember},
        sprint::{NewSprint, Sprint, UpdateSprint},
        time_entry::{NewTimeEntry, TimeEntry},
        types::{EntryId, EpicId, ItemId, MemberId, SprintId},
    },
    listing::{
        filter::FilterCriteria,
        page::{PageState, Paginated},
    },
    repository::errors::RepositoryResult,
};

pub mod errors;
pub mod memory;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod seed;

#[derive(Debug, Clone, Default)]
pub struct ItemListQuery {
    pub criteria: FilterCriteria,
    pub epic_id: Option<EpicId>,
    pub sprint_id: Option<SprintId>,
    pub assignee_id: Option<MemberId>,
    /// Restrict to items not committed to any sprint.
    pub unscheduled_only: bool,
    pub pagination: Option<PageState>,
}

impl ItemListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(mut self, criteria: FilterCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn epic(mut self, epic_id: EpicId) -> Self {
        self.epic_id = Some(epic_id);
        self
    }

    pub fn sprint(mut self, sprint_id: SprintId) -> Self {
        self.sprint_id = Some(sprint_id);
        self
    }

    pub fn assignee(mut self, member_id: MemberId) -> Self {
        self.assignee_id = Some(member_id);
        self
    }

    pub fn unscheduled(mut self) -> Self {
        self.unscheduled_only = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(PageState::new(page, per_page));
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct EpicListQuery {
    pub criteria: FilterCriteria,
    pub pagination: Option<PageState>,
}

impl EpicListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(mut self, criteria: FilterCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(PageState::new(page, per_page));
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct SprintListQuery {
    pub criteria: FilterCriteria,
    pub pagination: Option<PageState>,
}

impl SprintListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(mut self, criteria: FilterCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(PageState::new(page, per_page));
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemberListQuery {
    pub criteria: FilterCriteria,
    pub pagination: Option<PageState>,
}

impl MemberListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(mut self, criteria: FilterCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(PageState::new(page, per_page));
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct TimeEntryListQuery {
    pub criteria: FilterCriteria,
    pub member_id: Option<MemberId>,
    pub item_id: Option<ItemId>,
    pub pagination: Option<PageState>,
}

impl TimeEntryListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(mut self, criteria: FilterCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn member(mut self, member_id: MemberId) -> Self {
        self.member_id = Some(member_id);
        self
    }

    pub fn item(mut self, item_id: ItemId) -> Self {
        self.item_id = Some(item_id);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(PageState::new(page, per_page));
        self
    }
}

pub trait ItemReader {
    fn get_item_by_id(&self, id: ItemId) -> RepositoryResult<Option<BacklogItem>>;
    fn list_items(&self, query: ItemListQuery) -> RepositoryResult<Paginated<BacklogItem>>;
}

pub trait ItemWriter {
    fn create_items(&self, new_items: &[NewBacklogItem]) -> RepositoryResult<usize>;
    fn update_item(&self, item_id: ItemId, updates: &UpdateBacklogItem)
    -> RepositoryResult<BacklogItem>;
    fn delete_item(&self, item_id: ItemId) -> RepositoryResult<()>;
    fn assign_items_to_sprint(
        &self,
        sprint_id: SprintId,
        item_ids: &[ItemId],
    ) -> RepositoryResult<usize>;
}

pub trait EpicReader {
    fn get_epic_by_id(&self, id: EpicId) -> RepositoryResult<Option<Epic>>;
    fn list_epics(&self, query: EpicListQuery) -> RepositoryResult<Paginated<Epic>>;
}

pub trait EpicWriter {
    fn create_epic(&self, new_epic: &NewEpic) -> RepositoryResult<Epic>;
    fn update_epic(&self, epic_id: EpicId, updates: &UpdateEpic) -> RepositoryResult<Epic>;
    fn delete_epic(&self, epic_id: EpicId) -> RepositoryResult<()>;
}

pub trait SprintReader {
    fn get_sprint_by_id(&self, id: SprintId) -> RepositoryResult<Option<Sprint>>;
    fn get_active_sprint(&self) -> RepositoryResult<Option<Sprint>>;
    fn list_sprints(&self, query: SprintListQuery) -> RepositoryResult<Paginated<Sprint>>;
}

pub trait SprintWriter {
    fn create_sprint(&self, new_sprint: &NewSprint) -> RepositoryResult<Sprint>;
    fn update_sprint(&self, sprint_id: SprintId, updates: &UpdateSprint)
    -> RepositoryResult<Sprint>;
    fn delete_sprint(&self, sprint_id: SprintId) -> RepositoryResult<()>;
}

pub trait MemberReader {
    fn get_member_by_id(&self, id: MemberId) -> RepositoryResult<Option<TeamMember>>;
    fn list_members(&self, query: MemberListQuery) -> RepositoryResult<Paginated<TeamMember>>;
}

pub trait MemberWriter {
    fn create_member(&self, new_member: &NewTeamMember) -> RepositoryResult<TeamMember>;
    fn update_member(
        &self,
        member_id: MemberId,
        updates: &UpdateTeamMember,
    ) -> RepositoryResult<TeamMember>;
    fn delete_member(&self, member_id: MemberId) -> RepositoryResult<()>;
}

pub trait TimeEntryReader {
    fn list_time_entries(&self, query: TimeEntryListQuery)
    -> RepositoryResult<Paginated<TimeEntry>>;
}

pub trait TimeEntryWriter {
    fn create_time_entry(&self, new_entry: &NewTimeEntry) -> RepositoryResult<TimeEntry>;
    fn delete_time_entry(&self, entry_id: EntryId) -> RepositoryResult<()>;
}
