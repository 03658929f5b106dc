//! Demo dataset loaded at startup so the board is populated on first visit.

use chrono::{Days, NaiveDate, Utc};

use crate::domain::backlog::{ItemKind, ItemStatus, NewBacklogItem, Priority};
use crate::domain::epic::{EpicStatus, NewEpic};
use crate::domain::member::{Department, MemberRole, NewTeamMember, TeamMember};
use crate::domain::sprint::{BurndownTrend, NewSprint, SprintStatus};
use crate::domain::time_entry::NewTimeEntry;
use crate::domain::types::{
    EpicName, ItemId, ItemTitle, MemberEmail, MemberName, RichText, SprintName,
    TypeConstraintError,
};
use crate::listing::filter::FilterCriteria;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::memory::InMemoryRepository;
use crate::repository::{
    EpicWriter, ItemListQuery, ItemReader, ItemWriter, MemberWriter, SprintWriter, TimeEntryWriter,
};

fn item(
    title: &str,
    kind: ItemKind,
    status: ItemStatus,
    priority: Priority,
) -> Result<NewBacklogItem, TypeConstraintError> {
    Ok(NewBacklogItem {
        title: ItemTitle::new(title)?,
        description: None,
        kind,
        status,
        priority,
        story_points: None,
        estimate_hours: None,
        labels: vec![],
        assignee_id: None,
        epic_id: None,
        sprint_id: None,
    })
}

fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn member(
    name: &str,
    email: &str,
    role: MemberRole,
    department: Department,
    capacity_hours: u32,
) -> Result<NewTeamMember, TypeConstraintError> {
    Ok(NewTeamMember {
        name: MemberName::new(name)?,
        email: MemberEmail::new(email)?,
        role,
        department,
        capacity_hours,
    })
}

fn entry(
    member: &TeamMember,
    item_id: Option<ItemId>,
    today: NaiveDate,
    days_ago: u64,
    hours: f64,
    note: Option<&str>,
) -> NewTimeEntry {
    NewTimeEntry {
        member_id: member.id,
        item_id,
        spent_on: today.checked_sub_days(Days::new(days_ago)).unwrap_or(today),
        hours,
        note: note.and_then(RichText::new_opt),
    }
}

/// Fills an empty repository with a believable mid-sprint snapshot.
pub fn populate(repo: &InMemoryRepository) -> RepositoryResult<()> {
    let today = Utc::now().date_naive();
    let date = |offset: i64| {
        if offset >= 0 {
            today
                .checked_add_days(Days::new(offset as u64))
                .unwrap_or(today)
        } else {
            today
                .checked_sub_days(Days::new(offset.unsigned_abs()))
                .unwrap_or(today)
        }
    };

    let onboarding = repo.create_epic(&NewEpic {
        name: EpicName::new("User Onboarding")?,
        description: RichText::new_opt("Streamline the first-run experience up to the aha moment."),
        status: EpicStatus::InProgress,
    })?;
    let performance = repo.create_epic(&NewEpic {
        name: EpicName::new("Performance Hardening")?,
        description: RichText::new_opt("Keep p95 latency flat while the tenant count doubles."),
        status: EpicStatus::InProgress,
    })?;
    let mobile = repo.create_epic(&NewEpic {
        name: EpicName::new("Mobile Companion App")?,
        description: None,
        status: EpicStatus::Planned,
    })?;
    let billing = repo.create_epic(&NewEpic {
        name: EpicName::new("Billing Revamp")?,
        description: RichText::new_opt("Move invoicing to the new tax engine."),
        status: EpicStatus::Planned,
    })?;
    let search = repo.create_epic(&NewEpic {
        name: EpicName::new("Search Improvements")?,
        description: None,
        status: EpicStatus::Done,
    })?;
    let notifications = repo.create_epic(&NewEpic {
        name: EpicName::new("Notification Center")?,
        description: None,
        status: EpicStatus::InProgress,
    })?;

    let sprint21 = repo.create_sprint(&NewSprint {
        name: SprintName::new("Sprint 21")?,
        goal: RichText::new_opt("Notification groundwork."),
        status: SprintStatus::Completed,
        start_date: date(-42),
        end_date: date(-29),
        burndown: BurndownTrend::OnTrack,
    })?;
    let sprint22 = repo.create_sprint(&NewSprint {
        name: SprintName::new("Sprint 22")?,
        goal: RichText::new_opt("Ship ticket search end to end."),
        status: SprintStatus::Completed,
        start_date: date(-28),
        end_date: date(-15),
        burndown: BurndownTrend::AtRisk,
    })?;
    let sprint23 = repo.create_sprint(&NewSprint {
        name: SprintName::new("Sprint 23")?,
        goal: RichText::new_opt("Stability first: close out the sync leak and CI flakes."),
        status: SprintStatus::Active,
        start_date: date(-9),
        end_date: date(5),
        burndown: BurndownTrend::AtRisk,
    })?;
    repo.create_sprint(&NewSprint {
        name: SprintName::new("Sprint 24")?,
        goal: None,
        status: SprintStatus::Planned,
        start_date: date(6),
        end_date: date(20),
        burndown: BurndownTrend::OnTrack,
    })?;

    let ada = repo.create_member(&member(
        "Ada Byron",
        "ada.byron@example.com",
        MemberRole::Developer,
        Department::Engineering,
        40,
    )?)?;
    let miguel = repo.create_member(&member(
        "Miguel Santos",
        "miguel.santos@example.com",
        MemberRole::Developer,
        Department::Engineering,
        40,
    )?)?;
    let grace = repo.create_member(&member(
        "Grace Okafor",
        "grace.okafor@example.com",
        MemberRole::Designer,
        Department::Design,
        32,
    )?)?;
    let priya = repo.create_member(&member(
        "Priya Sharma",
        "priya.sharma@example.com",
        MemberRole::Qa,
        Department::Quality,
        40,
    )?)?;
    let tom = repo.create_member(&member(
        "Tom Keller",
        "tom.keller@example.com",
        MemberRole::Developer,
        Department::Engineering,
        24,
    )?)?;
    let elena = repo.create_member(&member(
        "Elena Petrova",
        "elena.petrova@example.com",
        MemberRole::ProductOwner,
        Department::Product,
        40,
    )?)?;
    let jonas = repo.create_member(&member(
        "Jonas Weber",
        "jonas.weber@example.com",
        MemberRole::ScrumMaster,
        Department::Product,
        20,
    )?)?;
    let sara = repo.create_member(&member(
        "Sara Lindqvist",
        "sara.lindqvist@example.com",
        MemberRole::Developer,
        Department::Engineering,
        40,
    )?)?;

    let mut items = Vec::new();

    let mut leak = item(
        "Fix memory leak in sync worker",
        ItemKind::Bug,
        ItemStatus::InProgress,
        Priority::Critical,
    )?;
    leak.description =
        RichText::new_opt("Resident set grows roughly 40 MB per hour under sustained sync load.");
    leak.labels = labels(&["Bug", "Performance"]);
    leak.story_points = Some(5);
    leak.estimate_hours = Some(16);
    leak.assignee_id = Some(ada.id);
    leak.epic_id = Some(performance.id);
    leak.sprint_id = Some(sprint23.id);
    items.push(leak);

    let mut oauth = item(
        "Add OAuth sign-in with Google",
        ItemKind::Story,
        ItemStatus::InProgress,
        Priority::High,
    )?;
    oauth.labels = labels(&["Auth"]);
    oauth.story_points = Some(8);
    oauth.estimate_hours = Some(26);
    oauth.assignee_id = Some(miguel.id);
    oauth.epic_id = Some(onboarding.id);
    oauth.sprint_id = Some(sprint23.id);
    items.push(oauth);

    let mut progressbars = item(
        "Progress indicators for long imports",
        ItemKind::Story,
        ItemStatus::Todo,
        Priority::Medium,
    )?;
    progressbars.labels = labels(&["UX"]);
    progressbars.story_points = Some(3);
    progressbars.estimate_hours = Some(8);
    progressbars.assignee_id = Some(grace.id);
    progressbars.epic_id = Some(onboarding.id);
    progressbars.sprint_id = Some(sprint23.id);
    items.push(progressbars);

    let mut flaky = item(
        "Flaky checkout test on CI",
        ItemKind::Bug,
        ItemStatus::InReview,
        Priority::Medium,
    )?;
    flaky.labels = labels(&["Tech Debt"]);
    flaky.story_points = Some(2);
    flaky.estimate_hours = Some(4);
    flaky.assignee_id = Some(priya.id);
    flaky.sprint_id = Some(sprint23.id);
    items.push(flaky);

    let mut uploads = item(
        "Compress image uploads client-side",
        ItemKind::Task,
        ItemStatus::Done,
        Priority::Medium,
    )?;
    uploads.labels = labels(&["Performance"]);
    uploads.story_points = Some(3);
    uploads.estimate_hours = Some(6);
    uploads.assignee_id = Some(sara.id);
    uploads.epic_id = Some(performance.id);
    uploads.sprint_id = Some(sprint23.id);
    items.push(uploads);

    let mut welcome = item(
        "Welcome email copy refresh",
        ItemKind::Task,
        ItemStatus::Done,
        Priority::Low,
    )?;
    welcome.story_points = Some(1);
    welcome.estimate_hours = Some(2);
    welcome.assignee_id = Some(elena.id);
    welcome.epic_id = Some(onboarding.id);
    welcome.sprint_id = Some(sprint23.id);
    items.push(welcome);

    let mut auditlog = item(
        "Paginate audit log endpoint",
        ItemKind::Story,
        ItemStatus::InProgress,
        Priority::High,
    )?;
    auditlog.labels = labels(&["Performance"]);
    auditlog.story_points = Some(5);
    auditlog.estimate_hours = Some(22);
    auditlog.assignee_id = Some(tom.id);
    auditlog.epic_id = Some(performance.id);
    auditlog.sprint_id = Some(sprint23.id);
    items.push(auditlog);

    let mut ratelimit = item(
        "Rate-limit password reset requests",
        ItemKind::Task,
        ItemStatus::Todo,
        Priority::High,
    )?;
    ratelimit.labels = labels(&["Security"]);
    ratelimit.story_points = Some(2);
    ratelimit.estimate_hours = Some(4);
    ratelimit.assignee_id = Some(miguel.id);
    ratelimit.sprint_id = Some(sprint23.id);
    items.push(ratelimit);

    let mut ticketsearch = item(
        "Full-text search over tickets",
        ItemKind::Story,
        ItemStatus::Done,
        Priority::High,
    )?;
    ticketsearch.labels = labels(&["Search"]);
    ticketsearch.story_points = Some(8);
    ticketsearch.assignee_id = Some(sara.id);
    ticketsearch.epic_id = Some(search.id);
    ticketsearch.sprint_id = Some(sprint22.id);
    items.push(ticketsearch);

    let mut highlighting = item(
        "Search result highlighting",
        ItemKind::Task,
        ItemStatus::Done,
        Priority::Medium,
    )?;
    highlighting.labels = labels(&["Search", "UX"]);
    highlighting.story_points = Some(3);
    highlighting.assignee_id = Some(grace.id);
    highlighting.epic_id = Some(search.id);
    highlighting.sprint_id = Some(sprint22.id);
    items.push(highlighting);

    let mut dupnotify = item(
        "Fix duplicate notification on mention",
        ItemKind::Bug,
        ItemStatus::Done,
        Priority::Medium,
    )?;
    dupnotify.labels = labels(&["Bug"]);
    dupnotify.story_points = Some(2);
    dupnotify.assignee_id = Some(miguel.id);
    dupnotify.epic_id = Some(notifications.id);
    dupnotify.sprint_id = Some(sprint22.id);
    items.push(dupnotify);

    let mut prefs = item(
        "Notification preferences page",
        ItemKind::Story,
        ItemStatus::Done,
        Priority::Medium,
    )?;
    prefs.labels = labels(&["UX"]);
    prefs.story_points = Some(5);
    prefs.assignee_id = Some(ada.id);
    prefs.epic_id = Some(notifications.id);
    prefs.sprint_id = Some(sprint21.id);
    items.push(prefs);

    let mut push = item(
        "Mobile push notification support",
        ItemKind::Story,
        ItemStatus::Todo,
        Priority::High,
    )?;
    push.labels = labels(&["Mobile"]);
    push.story_points = Some(8);
    push.epic_id = Some(mobile.id);
    items.push(push);

    let mut offline = item(
        "Offline mode for mobile drafts",
        ItemKind::Story,
        ItemStatus::Todo,
        Priority::Medium,
    )?;
    offline.labels = labels(&["Mobile"]);
    offline.story_points = Some(13);
    offline.epic_id = Some(mobile.id);
    items.push(offline);

    let mut taxengine = item(
        "Migrate invoices to new tax engine",
        ItemKind::Story,
        ItemStatus::Todo,
        Priority::Critical,
    )?;
    taxengine.labels = labels(&["Billing"]);
    taxengine.story_points = Some(8);
    taxengine.epic_id = Some(billing.id);
    items.push(taxengine);

    let mut proration = item(
        "Proration for mid-cycle plan changes",
        ItemKind::Story,
        ItemStatus::Todo,
        Priority::High,
    )?;
    proration.labels = labels(&["Billing"]);
    proration.story_points = Some(5);
    proration.epic_id = Some(billing.id);
    items.push(proration);

    let mut webhooks = item(
        "Document webhook retry semantics",
        ItemKind::Task,
        ItemStatus::Todo,
        Priority::Low,
    )?;
    webhooks.labels = labels(&["Docs"]);
    webhooks.story_points = Some(1);
    items.push(webhooks);

    let mut tracing = item(
        "Upgrade tracing pipeline to OTLP",
        ItemKind::Task,
        ItemStatus::Todo,
        Priority::Medium,
    )?;
    tracing.labels = labels(&["Tech Debt", "Performance"]);
    tracing.story_points = Some(3);
    tracing.epic_id = Some(performance.id);
    items.push(tracing);

    repo.create_items(&items)?;

    let find_item = |title: &str| -> RepositoryResult<ItemId> {
        let listed = repo.list_items(
            ItemListQuery::new().criteria(FilterCriteria::new().search(title)),
        )?;
        listed
            .items
            .first()
            .map(|item| item.id)
            .ok_or(RepositoryError::NotFound)
    };

    let leak_id = find_item("Fix memory leak in sync worker")?;
    let oauth_id = find_item("Add OAuth sign-in with Google")?;
    let progress_id = find_item("Progress indicators for long imports")?;
    let flaky_id = find_item("Flaky checkout test on CI")?;
    let uploads_id = find_item("Compress image uploads client-side")?;
    let auditlog_id = find_item("Paginate audit log endpoint")?;
    let ticketsearch_id = find_item("Full-text search over tickets")?;

    let entries = [
        entry(
            &ada,
            Some(leak_id),
            today,
            1,
            6.0,
            Some("Heap profiling and leak bisection"),
        ),
        entry(&ada, Some(leak_id), today, 2, 4.0, None),
        entry(
            &miguel,
            Some(oauth_id),
            today,
            1,
            7.5,
            Some("Token refresh flow"),
        ),
        entry(&miguel, Some(oauth_id), today, 4, 3.0, None),
        entry(
            &grace,
            Some(progress_id),
            today,
            2,
            5.0,
            Some("Import progress spike"),
        ),
        entry(
            &priya,
            Some(flaky_id),
            today,
            1,
            2.5,
            Some("Repro on CI runner"),
        ),
        entry(
            &priya,
            None,
            today,
            3,
            1.5,
            Some("Release regression sweep"),
        ),
        entry(&sara, Some(uploads_id), today, 2, 6.0, None),
        entry(
            &tom,
            Some(auditlog_id),
            today,
            1,
            4.0,
            Some("Cursor pagination for audit log"),
        ),
        entry(&elena, None, today, 3, 2.0, Some("Customer interviews")),
        entry(&jonas, None, today, 1, 1.0, Some("Sprint mid-point review")),
        entry(
            &sara,
            Some(ticketsearch_id),
            today,
            6,
            8.0,
            Some("Index build and relevance tuning"),
        ),
    ];
    for new_entry in &entries {
        repo.create_time_entry(new_entry)?;
    }

    Ok(())
}
