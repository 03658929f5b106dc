use serde::{Deserialize, Serialize};

use crate::domain::member::{Department, MemberRole, TeamMember};
use crate::dto::de_opt_page;
use crate::listing::filter::FilterCriteria;
use crate::listing::metrics;
use crate::listing::page::Paginated;

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct TeamQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "de_opt_page", skip_serializing)]
    pub page: Option<usize>,
}

impl TeamQuery {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new()
            .search(self.q.as_deref().unwrap_or_default())
            .select("role", self.role.as_deref().unwrap_or_default())
            .select("department", self.department.as_deref().unwrap_or_default())
    }
}

/// Member row with the hours booked against the active sprint.
#[derive(Debug, Clone, Serialize)]
pub struct MemberRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: String,
    pub capacity_hours: u32,
    pub booked_hours: u32,
    pub utilization_percent: u8,
    pub band_class: String,
}

impl MemberRow {
    pub fn new(member: TeamMember, booked_hours: u32) -> Self {
        let band = metrics::capacity_band(booked_hours.into(), member.capacity_hours.into());
        Self {
            id: member.id.get(),
            name: member.name.to_string(),
            email: member.email.to_string(),
            role: member.role.to_string(),
            department: member.department.to_string(),
            capacity_hours: member.capacity_hours,
            booked_hours,
            utilization_percent: metrics::progress_percent(
                booked_hours.into(),
                member.capacity_hours.into(),
            ),
            band_class: band.css_class().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TeamPageData {
    pub members: Paginated<MemberRow>,
    pub filter_query: String,
    pub params: TeamQuery,
    pub roles: Vec<String>,
    pub departments: Vec<String>,
    pub active_sprint: Option<String>,
}

pub fn role_options() -> Vec<String> {
    [
        MemberRole::Developer,
        MemberRole::Designer,
        MemberRole::Qa,
        MemberRole::ProductOwner,
        MemberRole::ScrumMaster,
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

pub fn department_options() -> Vec<String> {
    [
        Department::Engineering,
        Department::Design,
        Department::Product,
        Department::Quality,
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{MemberEmail, MemberId, MemberName};

    fn member(capacity: u32) -> TeamMember {
        TeamMember {
            id: MemberId::new(2).unwrap(),
            name: MemberName::new("Tom Keller").unwrap(),
            email: MemberEmail::new("tom@example.com").unwrap(),
            role: MemberRole::Developer,
            department: Department::Engineering,
            capacity_hours: capacity,
        }
    }

    #[test]
    fn booked_at_ninety_percent_is_flagged_critical() {
        let row = MemberRow::new(member(40), 36);
        assert_eq!(row.utilization_percent, 90);
        assert_eq!(row.band_class, "danger");
    }

    #[test]
    fn lightly_booked_member_stays_green() {
        let row = MemberRow::new(member(40), 10);
        assert_eq!(row.band_class, "success");
    }
}
