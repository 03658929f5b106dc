use serde::{Deserialize, Serialize};

use crate::domain::epic::{Epic, EpicStatus};
use crate::dto::de_opt_page;
use crate::listing::filter::FilterCriteria;
use crate::listing::metrics;
use crate::listing::page::Paginated;

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct EpicsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "de_opt_page", skip_serializing)]
    pub page: Option<usize>,
}

impl EpicsQuery {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new()
            .search(self.q.as_deref().unwrap_or_default())
            .select("status", self.status.as_deref().unwrap_or_default())
    }
}

/// Epic row with progress derived from its backlog items.
#[derive(Debug, Clone, Serialize)]
pub struct EpicRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub item_count: usize,
    pub done_count: usize,
    pub progress_percent: u8,
}

impl EpicRow {
    pub fn new(epic: Epic, item_count: usize, done_count: usize) -> Self {
        Self {
            id: epic.id.get(),
            name: epic.name.to_string(),
            description: epic.description.map(|text| text.to_string()),
            status: epic.status.to_string(),
            item_count,
            done_count,
            progress_percent: metrics::progress_percent(done_count as f64, item_count as f64),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EpicsPageData {
    pub epics: Paginated<EpicRow>,
    pub filter_query: String,
    pub params: EpicsQuery,
    pub statuses: Vec<String>,
}

pub fn status_options() -> Vec<String> {
    [EpicStatus::Planned, EpicStatus::InProgress, EpicStatus::Done]
        .iter()
        .map(ToString::to_string)
        .collect()
}
