use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    EpicId, ItemId, ItemTitle, MemberId, RichText, SprintId, TypeConstraintError,
};
use crate::listing::filter::Filterable;

/// A unit of work on the product backlog.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BacklogItem {
    pub id: ItemId,
    pub title: ItemTitle,
    pub description: Option<RichText>,
    pub kind: ItemKind,
    pub status: ItemStatus,
    pub priority: Priority,
    pub story_points: Option<u32>,
    pub estimate_hours: Option<u32>,
    pub labels: Vec<String>,
    pub assignee_id: Option<MemberId>,
    pub epic_id: Option<EpicId>,
    pub sprint_id: Option<SprintId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ItemKind {
    Story,
    Task,
    Bug,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ItemStatus {
    #[serde(rename = "To Do")]
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "In Review")]
    InReview,
    Done,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewBacklogItem {
    pub title: ItemTitle,
    pub description: Option<RichText>,
    pub kind: ItemKind,
    pub status: ItemStatus,
    pub priority: Priority,
    pub story_points: Option<u32>,
    pub estimate_hours: Option<u32>,
    pub labels: Vec<String>,
    pub assignee_id: Option<MemberId>,
    pub epic_id: Option<EpicId>,
    pub sprint_id: Option<SprintId>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateBacklogItem {
    pub title: ItemTitle,
    pub description: Option<RichText>,
    pub kind: ItemKind,
    pub status: ItemStatus,
    pub priority: Priority,
    pub story_points: Option<u32>,
    pub estimate_hours: Option<u32>,
    pub labels: Vec<String>,
    pub assignee_id: Option<MemberId>,
    pub epic_id: Option<EpicId>,
    pub sprint_id: Option<SprintId>,
}

/// Strips separators so "In Progress", "in-progress" and "inprogress" parse
/// the same way. Used by every choice enum in the domain.
pub(crate) fn squeeze(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .replace([' ', '-', '_'], "")
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Story => write!(f, "Story"),
            ItemKind::Task => write!(f, "Task"),
            ItemKind::Bug => write!(f, "Bug"),
        }
    }
}

impl FromStr for ItemKind {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squeeze(s).as_str() {
            "story" => Ok(ItemKind::Story),
            "task" => Ok(ItemKind::Task),
            "bug" => Ok(ItemKind::Bug),
            _ => Err(TypeConstraintError::InvalidValue(s.to_string())),
        }
    }
}

impl Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemStatus::Todo => write!(f, "To Do"),
            ItemStatus::InProgress => write!(f, "In Progress"),
            ItemStatus::InReview => write!(f, "In Review"),
            ItemStatus::Done => write!(f, "Done"),
        }
    }
}

impl FromStr for ItemStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squeeze(s).as_str() {
            "todo" => Ok(ItemStatus::Todo),
            "inprogress" => Ok(ItemStatus::InProgress),
            "inreview" => Ok(ItemStatus::InReview),
            "done" => Ok(ItemStatus::Done),
            _ => Err(TypeConstraintError::InvalidValue(s.to_string())),
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "Low"),
            Priority::Medium => write!(f, "Medium"),
            Priority::High => write!(f, "High"),
            Priority::Critical => write!(f, "Critical"),
        }
    }
}

impl FromStr for Priority {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squeeze(s).as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(TypeConstraintError::InvalidValue(s.to_string())),
        }
    }
}

impl Filterable for BacklogItem {
    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![self.title.to_string()];
        if let Some(description) = &self.description {
            fields.push(description.to_string());
        }
        fields.extend(self.labels.iter().cloned());
        fields
    }

    fn category(&self, field: &str) -> Option<String> {
        match field {
            "status" => Some(self.status.to_string()),
            "kind" => Some(self.kind.to_string()),
            "priority" => Some(self.priority.to_string()),
            _ => None,
        }
    }
}
