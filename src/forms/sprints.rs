use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::sprint::{NewSprint, UpdateSprint};
use crate::domain::types::{RichText, SprintId, SprintName};

use super::FormError;

#[derive(Deserialize, Validate)]
/// Form data for creating a sprint.
pub struct AddSprintForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub goal: String,
    pub status: String,
    pub burndown: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Deserialize, Validate)]
/// Form data for updating an existing sprint.
pub struct SaveSprintForm {
    pub id: i32,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub goal: String,
    pub status: String,
    pub burndown: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Deserialize)]
pub struct DeleteSprintForm {
    pub id: i32,
}

/// Checkbox selection posted from the planning modal. Repeated `items`
/// keys carry the picked backlog ids.
#[derive(Debug, Deserialize, PartialEq)]
pub struct AssignItemsForm {
    pub sprint_id: i32,
    #[serde(default)]
    pub items: Vec<i32>,
}

impl TryFrom<&AddSprintForm> for NewSprint {
    type Error = FormError;

    fn try_from(form: &AddSprintForm) -> Result<Self, Self::Error> {
        form.validate()?;
        if form.end_date < form.start_date {
            return Err(FormError::InvalidDateRange);
        }
        Ok(Self {
            name: SprintName::new(&form.name).map_err(|_| FormError::InvalidName)?,
            goal: RichText::new_opt(&form.goal),
            status: form
                .status
                .parse()
                .map_err(|_| FormError::InvalidChoice("status"))?,
            start_date: form.start_date,
            end_date: form.end_date,
            burndown: form
                .burndown
                .parse()
                .map_err(|_| FormError::InvalidChoice("burndown"))?,
        })
    }
}

impl TryFrom<&SaveSprintForm> for (SprintId, UpdateSprint) {
    type Error = FormError;

    fn try_from(form: &SaveSprintForm) -> Result<Self, Self::Error> {
        form.validate()?;
        if form.end_date < form.start_date {
            return Err(FormError::InvalidDateRange);
        }
        let id = SprintId::new(form.id).map_err(|_| FormError::InvalidSprintId)?;
        let update = UpdateSprint {
            name: SprintName::new(&form.name).map_err(|_| FormError::InvalidName)?,
            goal: RichText::new_opt(&form.goal),
            status: form
                .status
                .parse()
                .map_err(|_| FormError::InvalidChoice("status"))?,
            start_date: form.start_date,
            end_date: form.end_date,
            burndown: form
                .burndown
                .parse()
                .map_err(|_| FormError::InvalidChoice("burndown"))?,
        };
        Ok((id, update))
    }
}
