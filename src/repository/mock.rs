//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::backlog::{BacklogItem, NewBacklogItem, UpdateBacklogItem};
use crate::domain::epic::{Epic, NewEpic, UpdateEpic};
use crate::domain::member::{NewTeamMember, TeamMember, UpdateTeamMember};
use crate::domain::sprint::{NewSprint, Sprint, UpdateSprint};
use crate::domain::time_entry::{NewTimeEntry, TimeEntry};
use crate::domain::types::{EntryId, EpicId, ItemId, MemberId, SprintId};
use crate::listing::page::Paginated;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    EpicListQuery, EpicReader, EpicWriter, ItemListQuery, ItemReader, ItemWriter, MemberListQuery,
    MemberReader, MemberWriter, SprintListQuery, SprintReader, SprintWriter, TimeEntryListQuery,
    TimeEntryReader, TimeEntryWriter,
};

mock! {
    pub Repository {}

    impl ItemReader for Repository {
        fn get_item_by_id(&self, id: ItemId) -> RepositoryResult<Option<BacklogItem>>;
        fn list_items(&self, query: ItemListQuery) -> RepositoryResult<Paginated<BacklogItem>>;
    }

    impl ItemWriter for Repository {
        fn create_items(&self, new_items: &[NewBacklogItem]) -> RepositoryResult<usize>;
        fn update_item(
            &self,
            item_id: ItemId,
            updates: &UpdateBacklogItem,
        ) -> RepositoryResult<BacklogItem>;
        fn delete_item(&self, item_id: ItemId) -> RepositoryResult<()>;
        fn assign_items_to_sprint(
            &self,
            sprint_id: SprintId,
            item_ids: &[ItemId],
        ) -> RepositoryResult<usize>;
    }

    impl EpicReader for Repository {
        fn get_epic_by_id(&self, id: EpicId) -> RepositoryResult<Option<Epic>>;
        fn list_epics(&self, query: EpicListQuery) -> RepositoryResult<Paginated<Epic>>;
    }

    impl EpicWriter for Repository {
        fn create_epic(&self, new_epic: &NewEpic) -> RepositoryResult<Epic>;
        fn update_epic(&self, epic_id: EpicId, updates: &UpdateEpic) -> RepositoryResult<Epic>;
        fn delete_epic(&self, epic_id: EpicId) -> RepositoryResult<()>;
    }

    impl SprintReader for Repository {
        fn get_sprint_by_id(&self, id: SprintId) -> RepositoryResult<Option<Sprint>>;
        fn get_active_sprint(&self) -> RepositoryResult<Option<Sprint>>;
        fn list_sprints(&self, query: SprintListQuery) -> RepositoryResult<Paginated<Sprint>>;
    }

    impl SprintWriter for Repository {
        fn create_sprint(&self, new_sprint: &NewSprint) -> RepositoryResult<Sprint>;
        fn update_sprint(
            &self,
            sprint_id: SprintId,
            updates: &UpdateSprint,
        ) -> RepositoryResult<Sprint>;
        fn delete_sprint(&self, sprint_id: SprintId) -> RepositoryResult<()>;
    }

    impl MemberReader for Repository {
        fn get_member_by_id(&self, id: MemberId) -> RepositoryResult<Option<TeamMember>>;
        fn list_members(&self, query: MemberListQuery) -> RepositoryResult<Paginated<TeamMember>>;
    }

    impl MemberWriter for Repository {
        fn create_member(&self, new_member: &NewTeamMember) -> RepositoryResult<TeamMember>;
        fn update_member(
            &self,
            member_id: MemberId,
            updates: &UpdateTeamMember,
        ) -> RepositoryResult<TeamMember>;
        fn delete_member(&self, member_id: MemberId) -> RepositoryResult<()>;
    }

    impl TimeEntryReader for Repository {
        fn list_time_entries(
            &self,
            query: TimeEntryListQuery,
        ) -> RepositoryResult<Paginated<TimeEntry>>;
    }

    impl TimeEntryWriter for Repository {
        fn create_time_entry(&self, new_entry: &NewTimeEntry) -> RepositoryResult<TimeEntry>;
        fn delete_time_entry(&self, entry_id: EntryId) -> RepositoryResult<()>;
    }
}
