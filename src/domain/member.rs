use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::{MemberEmail, MemberId, MemberName, TypeConstraintError};
use crate::listing::filter::Filterable;

use super::backlog::squeeze;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TeamMember {
    pub id: MemberId,
    pub name: MemberName,
    pub email: MemberEmail,
    pub role: MemberRole,
    pub department: Department,
    /// Hours available per sprint, before anything is assigned.
    pub capacity_hours: u32,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum MemberRole {
    Developer,
    Designer,
    #[serde(rename = "QA")]
    Qa,
    #[serde(rename = "Product Owner")]
    ProductOwner,
    #[serde(rename = "Scrum Master")]
    ScrumMaster,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Department {
    Engineering,
    Design,
    Product,
    Quality,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewTeamMember {
    pub name: MemberName,
    pub email: MemberEmail,
    pub role: MemberRole,
    pub department: Department,
    pub capacity_hours: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateTeamMember {
    pub name: MemberName,
    pub email: MemberEmail,
    pub role: MemberRole,
    pub department: Department,
    pub capacity_hours: u32,
}

impl Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberRole::Developer => write!(f, "Developer"),
            MemberRole::Designer => write!(f, "Designer"),
            MemberRole::Qa => write!(f, "QA"),
            MemberRole::ProductOwner => write!(f, "Product Owner"),
            MemberRole::ScrumMaster => write!(f, "Scrum Master"),
        }
    }
}

impl FromStr for MemberRole {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squeeze(s).as_str() {
            "developer" => Ok(MemberRole::Developer),
            "designer" => Ok(MemberRole::Designer),
            "qa" => Ok(MemberRole::Qa),
            "productowner" => Ok(MemberRole::ProductOwner),
            "scrummaster" => Ok(MemberRole::ScrumMaster),
            _ => Err(TypeConstraintError::InvalidValue(s.to_string())),
        }
    }
}

impl Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Department::Engineering => write!(f, "Engineering"),
            Department::Design => write!(f, "Design"),
            Department::Product => write!(f, "Product"),
            Department::Quality => write!(f, "Quality"),
        }
    }
}

impl FromStr for Department {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squeeze(s).as_str() {
            "engineering" => Ok(Department::Engineering),
            "design" => Ok(Department::Design),
            "product" => Ok(Department::Product),
            "quality" => Ok(Department::Quality),
            _ => Err(TypeConstraintError::InvalidValue(s.to_string())),
        }
    }
}

impl Filterable for TeamMember {
    fn search_fields(&self) -> Vec<String> {
        vec![self.name.to_string(), self.email.to_string()]
    }

    fn category(&self, field: &str) -> Option<String> {
        match field {
            "role" => Some(self.role.to_string()),
            "department" => Some(self.department.to_string()),
            _ => None,
        }
    }
}
