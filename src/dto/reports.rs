use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::time_entry::TimeEntry;
use crate::dto::{SelectOption, de_opt_page};
use crate::listing::filter::FilterCriteria;
use crate::listing::page::Paginated;

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ReportsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, deserialize_with = "de_opt_member", skip_serializing_if = "Option::is_none")]
    pub member: Option<i32>,
    #[serde(default, deserialize_with = "de_opt_page", skip_serializing)]
    pub page: Option<usize>,
}

impl ReportsQuery {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new().search(self.q.as_deref().unwrap_or_default())
    }
}

fn de_opt_member<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .and_then(|value| value.trim().parse::<i32>().ok())
        .filter(|id| *id > 0))
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryRow {
    pub id: i32,
    pub member: String,
    pub item: Option<String>,
    pub spent_on: NaiveDate,
    pub hours: f64,
    pub note: Option<String>,
}

impl EntryRow {
    pub fn new(entry: TimeEntry, member: String, item: Option<String>) -> Self {
        Self {
            id: entry.id.get(),
            member,
            item,
            spent_on: entry.spent_on,
            hours: entry.hours,
            note: entry.note.map(|text| text.to_string()),
        }
    }
}

/// Hours rolled up per member across the filtered entries.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MemberHours {
    pub member: String,
    pub hours: f64,
}

#[derive(Debug, Serialize)]
pub struct ReportsPageData {
    pub entries: Paginated<EntryRow>,
    pub total_hours: f64,
    pub by_member: Vec<MemberHours>,
    pub filter_query: String,
    pub params: ReportsQuery,
    pub members: Vec<SelectOption>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::filter_query;

    #[test]
    fn member_filter_survives_in_links() {
        let params = ReportsQuery {
            q: None,
            member: Some(4),
            page: Some(2),
        };
        assert_eq!(filter_query(&params), "member=4");
    }

    #[test]
    fn malformed_member_id_is_dropped() {
        let params: ReportsQuery = serde_html_form::from_str("member=abc&page=2").unwrap();
        assert_eq!(params.member, None);
        assert_eq!(params.page, Some(2));
    }
}
