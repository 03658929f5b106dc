use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::sprint::{BurndownTrend, Sprint, SprintStatus};
use crate::dto::backlog::ItemRow;
use crate::dto::de_opt_page;
use crate::listing::filter::FilterCriteria;
use crate::listing::metrics;
use crate::listing::page::Paginated;

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct SprintsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "de_opt_page", skip_serializing)]
    pub page: Option<usize>,
}

impl SprintsQuery {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new()
            .search(self.q.as_deref().unwrap_or_default())
            .select("status", self.status.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SprintRow {
    pub id: i32,
    pub name: String,
    pub goal: Option<String>,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: i64,
    pub item_count: usize,
    pub committed_points: u32,
    pub completed_points: u32,
    pub progress_percent: u8,
    pub burndown: String,
    pub burndown_class: String,
}

impl SprintRow {
    pub fn new(sprint: Sprint, item_count: usize, committed: u32, completed: u32) -> Self {
        let burndown_class = match sprint.burndown {
            BurndownTrend::OnTrack => "success",
            BurndownTrend::AtRisk => "warning",
            BurndownTrend::Behind => "danger",
        };
        Self {
            id: sprint.id.get(),
            name: sprint.name.to_string(),
            goal: sprint.goal.map(|text| text.to_string()),
            status: sprint.status.to_string(),
            start_date: sprint.start_date,
            end_date: sprint.end_date,
            duration_days: metrics::days_between(sprint.start_date, sprint.end_date).max(0),
            item_count,
            committed_points: committed,
            completed_points: completed,
            progress_percent: metrics::progress_percent(completed.into(), committed.into()),
            burndown: sprint.burndown.to_string(),
            burndown_class: burndown_class.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SprintsPageData {
    pub sprints: Paginated<SprintRow>,
    pub filter_query: String,
    pub params: SprintsQuery,
    pub statuses: Vec<String>,
    pub trends: Vec<String>,
}

/// Body of the planning modal: the sprint plus every unscheduled item
/// that could still be pulled in.
#[derive(Debug, Serialize)]
pub struct SprintPlanningData {
    pub sprint: SprintRow,
    pub unscheduled: Vec<ItemRow>,
}

pub fn status_options() -> Vec<String> {
    [
        SprintStatus::Planned,
        SprintStatus::Active,
        SprintStatus::Completed,
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

pub fn trend_options() -> Vec<String> {
    [
        BurndownTrend::OnTrack,
        BurndownTrend::AtRisk,
        BurndownTrend::Behind,
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{SprintId, SprintName};

    #[test]
    fn row_derives_duration_and_progress() {
        let start = NaiveDate::from_ymd_opt(2026, 4, 6).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 4, 20).unwrap();
        let stamp = start.and_hms_opt(9, 0, 0).unwrap();
        let sprint = Sprint {
            id: SprintId::new(4).unwrap(),
            name: SprintName::new("Sprint 24").unwrap(),
            goal: None,
            status: SprintStatus::Planned,
            start_date: start,
            end_date: end,
            burndown: BurndownTrend::AtRisk,
            created_at: stamp,
            updated_at: stamp,
        };
        let row = SprintRow::new(sprint, 6, 40, 10);
        assert_eq!(row.duration_days, 14);
        assert_eq!(row.progress_percent, 25);
        assert_eq!(row.burndown_class, "warning");
    }
}
