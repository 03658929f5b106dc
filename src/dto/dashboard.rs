use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::sprint::Sprint;
use crate::listing::metrics;

/// Backlog counts broken down by workflow column.
#[derive(Debug, Default, Clone, Serialize, PartialEq)]
pub struct StatusTotals {
    pub todo: usize,
    pub in_progress: usize,
    pub in_review: usize,
    pub done: usize,
}

impl StatusTotals {
    pub fn total(&self) -> usize {
        self.todo + self.in_progress + self.in_review + self.done
    }
}

/// Summary card for the sprint currently in flight.
#[derive(Debug, Clone, Serialize)]
pub struct SprintCard {
    pub id: i32,
    pub name: String,
    pub goal: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days_total: i64,
    pub days_remaining: i64,
    pub committed_points: u32,
    pub completed_points: u32,
    pub progress_percent: u8,
    pub burndown: String,
}

impl SprintCard {
    pub fn new(sprint: Sprint, committed: u32, completed: u32, today: NaiveDate) -> Self {
        // An overrun sprint shows zero days left, not a negative countdown.
        let days_remaining = metrics::days_between(today, sprint.end_date).max(0);
        Self {
            id: sprint.id.get(),
            name: sprint.name.to_string(),
            goal: sprint.goal.map(|text| text.to_string()),
            start_date: sprint.start_date,
            end_date: sprint.end_date,
            days_total: metrics::days_between(sprint.start_date, sprint.end_date).max(0),
            days_remaining,
            committed_points: committed,
            completed_points: completed,
            progress_percent: metrics::progress_percent(completed.into(), committed.into()),
            burndown: sprint.burndown.to_string(),
        }
    }
}

/// A few recently touched backlog items for the landing page.
#[derive(Debug, Clone, Serialize)]
pub struct RecentItem {
    pub id: i32,
    pub title: String,
    pub status: String,
    pub priority: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub totals: StatusTotals,
    pub overall_progress: u8,
    pub active_sprint: Option<SprintCard>,
    pub recent_items: Vec<RecentItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sprint::{BurndownTrend, SprintStatus};
    use crate::domain::types::{SprintId, SprintName};

    fn sprint(start: NaiveDate, end: NaiveDate) -> Sprint {
        let stamp = start.and_hms_opt(9, 0, 0).unwrap();
        Sprint {
            id: SprintId::new(7).unwrap(),
            name: SprintName::new("Sprint 23").unwrap(),
            goal: None,
            status: SprintStatus::Active,
            start_date: start,
            end_date: end,
            burndown: BurndownTrend::OnTrack,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn overrun_sprint_clamps_days_remaining_to_zero() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
        let card = SprintCard::new(sprint(start, end), 30, 12, today);
        assert_eq!(card.days_remaining, 0);
        assert_eq!(card.days_total, 14);
        assert_eq!(card.progress_percent, 40);
    }

    #[test]
    fn running_sprint_counts_down() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let card = SprintCard::new(sprint(start, end), 0, 0, today);
        assert_eq!(card.days_remaining, 6);
        assert_eq!(card.progress_percent, 0);
    }

    #[test]
    fn totals_add_up() {
        let totals = StatusTotals {
            todo: 4,
            in_progress: 3,
            in_review: 1,
            done: 10,
        };
        assert_eq!(totals.total(), 18);
    }
}
