use std::fmt::Display;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{RichText, SprintId, SprintName, TypeConstraintError};
use crate::listing::filter::Filterable;

use super::backlog::squeeze;

/// A fixed-length iteration items are committed to.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Sprint {
    pub id: SprintId,
    pub name: SprintName,
    pub goal: Option<RichText>,
    pub status: SprintStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub burndown: BurndownTrend,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SprintStatus {
    Planned,
    Active,
    Completed,
}

/// Hand-maintained burndown assessment shown on the sprint card.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BurndownTrend {
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "At Risk")]
    AtRisk,
    Behind,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewSprint {
    pub name: SprintName,
    pub goal: Option<RichText>,
    pub status: SprintStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub burndown: BurndownTrend,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateSprint {
    pub name: SprintName,
    pub goal: Option<RichText>,
    pub status: SprintStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub burndown: BurndownTrend,
}

impl Display for SprintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SprintStatus::Planned => write!(f, "Planned"),
            SprintStatus::Active => write!(f, "Active"),
            SprintStatus::Completed => write!(f, "Completed"),
        }
    }
}

impl FromStr for SprintStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squeeze(s).as_str() {
            "planned" => Ok(SprintStatus::Planned),
            "active" => Ok(SprintStatus::Active),
            "completed" => Ok(SprintStatus::Completed),
            _ => Err(TypeConstraintError::InvalidValue(s.to_string())),
        }
    }
}

impl Display for BurndownTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BurndownTrend::OnTrack => write!(f, "On Track"),
            BurndownTrend::AtRisk => write!(f, "At Risk"),
            BurndownTrend::Behind => write!(f, "Behind"),
        }
    }
}

impl FromStr for BurndownTrend {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squeeze(s).as_str() {
            "ontrack" => Ok(BurndownTrend::OnTrack),
            "atrisk" => Ok(BurndownTrend::AtRisk),
            "behind" => Ok(BurndownTrend::Behind),
            _ => Err(TypeConstraintError::InvalidValue(s.to_string())),
        }
    }
}

impl Filterable for Sprint {
    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![self.name.to_string()];
        if let Some(goal) = &self.goal {
            fields.push(goal.to_string());
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
