use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::time_entry::NewTimeEntry;
use crate::domain::types::{ItemId, MemberId, RichText};

use super::{FormError, de_opt_i32};

#[derive(Deserialize, Validate)]
/// Form data for logging hours against a day.
pub struct LogTimeForm {
    pub member_id: i32,
    #[serde(default, deserialize_with = "de_opt_i32")]
    pub item_id: Option<i32>,
    pub spent_on: NaiveDate,
    #[validate(range(min = 0.25, max = 24.0))]
    pub hours: f64,
    #[serde(default)]
    pub note: String,
}

#[derive(Deserialize)]
pub struct DeleteEntryForm {
    pub id: i32,
}

impl TryFrom<&LogTimeForm> for NewTimeEntry {
    type Error = FormError;

    fn try_from(form: &LogTimeForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            member_id: MemberId::new(form.member_id).map_err(|_| FormError::InvalidMemberId)?,
            item_id: form
                .item_id
                .map(ItemId::new)
                .transpose()
                .map_err(|_| FormError::InvalidItemId)?,
            spent_on: form.spent_on,
            hours: form.hours,
            note: RichText::new_opt(&form.note),
        })
    }
}
