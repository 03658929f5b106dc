use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::backlog::{BacklogItem, ItemKind, ItemStatus, Priority};
use crate::dto::{SelectOption, de_opt_page};
use crate::listing::filter::FilterCriteria;
use crate::listing::metrics;
use crate::listing::page::Paginated;

/// Query string accepted by the backlog list page.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct BacklogQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "de_opt_page", skip_serializing)]
    pub page: Option<usize>,
}

impl BacklogQuery {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new()
            .search(self.q.as_deref().unwrap_or_default())
            .select("status", self.status.as_deref().unwrap_or_default())
            .select("kind", self.kind.as_deref().unwrap_or_default())
            .select("priority", self.priority.as_deref().unwrap_or_default())
    }
}

/// One backlog row with every related name already resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ItemRow {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub kind: String,
    pub status: String,
    pub priority: String,
    pub story_points: Option<u32>,
    pub estimate_hours: Option<u32>,
    pub labels: Vec<String>,
    pub assignee: Option<String>,
    pub epic: Option<String>,
    pub sprint: Option<String>,
    pub age_days: i64,
}

impl ItemRow {
    pub fn new(
        item: BacklogItem,
        assignee: Option<String>,
        epic: Option<String>,
        sprint: Option<String>,
        today: NaiveDate,
    ) -> Self {
        // Created timestamps ahead of today render as zero days old.
        let age_days = metrics::days_between(item.created_at.date(), today).max(0);
        Self {
            id: item.id.get(),
            title: item.title.to_string(),
            description: item.description.map(|text| text.to_string()),
            kind: item.kind.to_string(),
            status: item.status.to_string(),
            priority: item.priority.to_string(),
            story_points: item.story_points,
            estimate_hours: item.estimate_hours,
            labels: item.labels,
            assignee,
            epic,
            sprint,
            age_days,
        }
    }
}

/// Everything the backlog template needs.
#[derive(Debug, Serialize)]
pub struct BacklogPageData {
    pub items: Paginated<ItemRow>,
    pub filter_query: String,
    pub params: BacklogQuery,
    pub statuses: Vec<String>,
    pub kinds: Vec<String>,
    pub priorities: Vec<String>,
    pub epics: Vec<SelectOption>,
    pub sprints: Vec<SelectOption>,
    pub members: Vec<SelectOption>,
}

pub fn status_options() -> Vec<String> {
    [
        ItemStatus::Todo,
        ItemStatus::InProgress,
        ItemStatus::InReview,
        ItemStatus::Done,
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

pub fn kind_options() -> Vec<String> {
    [ItemKind::Story, ItemKind::Task, ItemKind::Bug]
        .iter()
        .map(ToString::to_string)
        .collect()
}

pub fn priority_options() -> Vec<String> {
    [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::filter_query;

    #[test]
    fn filter_query_skips_the_page() {
        let params = BacklogQuery {
            q: Some("login".to_string()),
            status: Some("In Progress".to_string()),
            kind: None,
            priority: None,
            page: Some(3),
        };
        let encoded = filter_query(&params);
        assert_eq!(encoded, "q=login&status=In+Progress");
    }

    #[test]
    fn empty_params_encode_to_nothing() {
        assert_eq!(filter_query(&BacklogQuery::default()), "");
    }

    #[test]
    fn criteria_ignores_the_all_sentinel() {
        let params = BacklogQuery {
            status: Some("all".to_string()),
            ..Default::default()
        };
        assert!(params.criteria().is_empty());
    }
}
