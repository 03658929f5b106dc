use serde::Deserialize;
use validator::Validate;

use crate::domain::epic::{NewEpic, UpdateEpic};
use crate::domain::types::{EpicId, EpicName, RichText};

use super::FormError;

#[derive(Deserialize, Validate)]
/// Form data for creating an epic.
pub struct AddEpicForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
}

#[derive(Deserialize, Validate)]
/// Form data for updating an existing epic.
pub struct SaveEpicForm {
    pub id: i32,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
}

#[derive(Deserialize)]
pub struct DeleteEpicForm {
    pub id: i32,
}

impl TryFrom<&AddEpicForm> for NewEpic {
    type Error = FormError;

    fn try_from(form: &AddEpicForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            name: EpicName::new(&form.name).map_err(|_| FormError::InvalidName)?,
            description: RichText::new_opt(&form.description),
            status: form
                .status
                .parse()
                .map_err(|_| FormError::InvalidChoice("status"))?,
        })
    }
}

impl TryFrom<&SaveEpicForm> for (EpicId, UpdateEpic) {
    type Error = FormError;

    fn try_from(form: &SaveEpicForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let id = EpicId::new(form.id).map_err(|_| FormError::InvalidEpicId)?;
        let update = UpdateEpic {
            name: EpicName::new(&form.name).map_err(|_| FormError::InvalidName)?,
            description: RichText::new_opt(&form.description),
            status: form
                .status
                .parse()
                .map_err(|_| FormError::InvalidChoice("status"))?,
        };
        Ok((id, update))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::epic::EpicStatus;

    #[test]
    fn add_form_parses_a_loose_status() {
        let form = AddEpicForm {
            name: "Billing Revamp".to_string(),
            description: String::new(),
            status: "in progress".to_string(),
        };
        let payload = NewEpic::try_from(&form).unwrap();
        assert_eq!(payload.status, EpicStatus::InProgress);
        assert!(payload.description.is_none());
    }

    #[test]
    fn non_positive_id_is_rejected() {
        let form = SaveEpicForm {
            id: 0,
            name: "Billing Revamp".to_string(),
            description: String::new(),
            status: "done".to_string(),
        };
        assert!(matches!(
            <(EpicId, UpdateEpic)>::try_from(&form),
            Err(FormError::InvalidEpicId)
        ));
    }
}
