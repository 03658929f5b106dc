use serde::Deserialize;
use validator::Validate;

use crate::domain::member::{NewTeamMember, UpdateTeamMember};
use crate::domain::types::{MemberEmail, MemberId, MemberName};

use super::FormError;

#[derive(Deserialize, Validate)]
/// Form data for adding a team member.
pub struct AddMemberForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub role: String,
    pub department: String,
    #[validate(range(max = 400))]
    pub capacity_hours: u32,
}

#[derive(Deserialize, Validate)]
/// Form data for updating a team member.
pub struct SaveMemberForm {
    pub id: i32,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub role: String,
    pub department: String,
    #[validate(range(max = 400))]
    pub capacity_hours: u32,
}

#[derive(Deserialize)]
pub struct DeleteMemberForm {
    pub id: i32,
}

impl TryFrom<&AddMemberForm> for NewTeamMember {
    type Error = FormError;

    fn try_from(form: &AddMemberForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            name: MemberName::new(&form.name).map_err(|_| FormError::InvalidName)?,
            email: MemberEmail::new(&form.email).map_err(|_| FormError::InvalidEmail)?,
            role: form
                .role
                .parse()
                .map_err(|_| FormError::InvalidChoice("role"))?,
            department: form
                .department
                .parse()
                .map_err(|_| FormError::InvalidChoice("department"))?,
            capacity_hours: form.capacity_hours,
        })
    }
}

impl TryFrom<&SaveMemberForm> for (MemberId, UpdateTeamMember) {
    type Error = FormError;

    fn try_from(form: &SaveMemberForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let id = MemberId::new(form.id).map_err(|_| FormError::InvalidMemberId)?;
        let update = UpdateTeamMember {
            name: MemberName::new(&form.name).map_err(|_| FormError::InvalidName)?,
            email: MemberEmail::new(&form.email).map_err(|_| FormError::InvalidEmail)?,
            role: form
                .role
                .parse()
                .map_err(|_| FormError::InvalidChoice("role"))?,
            department: form
                .department
                .parse()
                .map_err(|_| FormError::InvalidChoice("department"))?,
            capacity_hours: form.capacity_hours,
        };
        Ok((id, update))
    }
}
