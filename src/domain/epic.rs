use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{EpicId, EpicName, RichText, TypeConstraintError};
use crate::listing::filter::Filterable;

use super::backlog::squeeze;

/// A long-running theme grouping backlog items.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Epic {
    pub id: EpicId,
    pub name: EpicName,
    pub description: Option<RichText>,
    pub status: EpicStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum EpicStatus {
    Planned,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewEpic {
    pub name: EpicName,
    pub description: Option<RichText>,
    pub status: EpicStatus,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateEpic {
    pub name: EpicName,
    pub description: Option<RichText>,
    pub status: EpicStatus,
}

impl Display for EpicStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EpicStatus::Planned => write!(f, "Planned"),
            EpicStatus::InProgress => write!(f, "In Progress"),
            EpicStatus::Done => write!(f, "Done"),
        }
    }
}

impl FromStr for EpicStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squeeze(s).as_str() {
            "planned" => Ok(EpicStatus::Planned),
            "inprogress" => Ok(EpicStatus::InProgress),
            "done" => Ok(EpicStatus::Done),
            _ => Err(TypeConstraintError::InvalidValue(s.to_string())),
        }
    }
}

impl Filterable for Epic {
    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![self.name.to_string()];
        if let Some(description) = &self.description {
            fields.push(description.to_string());
        }
        fields
    }

    fn category(&self, field: &str) -> Option<String> {
        match field {
            "status" => Some(self.status.to_string()),
            _ => None,
        }
    }
}
