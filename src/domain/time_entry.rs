use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{EntryId, ItemId, MemberId, RichText};
use crate::listing::filter::Filterable;

/// Hours a member logged against a day, optionally tied to a backlog item.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TimeEntry {
    pub id: EntryId,
    pub member_id: MemberId,
    pub item_id: Option<ItemId>,
    pub spent_on: NaiveDate,
    pub hours: f64,
    pub note: Option<RichText>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewTimeEntry {
    pub member_id: MemberId,
    pub item_id: Option<ItemId>,
    pub spent_on: NaiveDate,
    pub hours: f64,
    pub note: Option<RichText>,
}

impl Filterable for TimeEntry {
    fn search_fields(&self) -> Vec<String> {
        match &self.note {
            Some(note) => vec![note.to_string()],
            None => vec![],
        }
    }

    fn category(&self, _field: &str) -> Option<String> {
        None
    }
}
