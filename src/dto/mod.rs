//! View models handed to the templates and query-string payloads parsed
//! from list pages. Keeping these separate from the domain types lets the
//! templates rely on pre-rendered strings instead of reaching into enums.

use serde::{Deserialize, Deserializer, Serialize};

pub mod backlog;
pub mod dashboard;
pub mod epics;
pub mod reports;
pub mod sprints;
pub mod team;

/// One `<option>` entry for a select box.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SelectOption {
    pub id: i32,
    pub label: String,
}

impl SelectOption {
    pub fn new(id: i32, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// Deserializes a page number from a query string, treating anything that
/// is not a positive integer as "no page requested".
pub fn de_opt_page<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|page| *page > 0))
}

/// Re-encodes list parameters so pagination links can keep the active
/// filters. Serialization of a plain struct into a query string does not
/// fail in practice, so an empty string is a safe fallback.
pub fn filter_query<T: Serialize>(params: &T) -> String {
    serde_html_form::to_string(params).unwrap_or_default()
}
