use serde::Deserialize;
use validator::Validate;

use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE, SERVICE_MEMBER_ROLE};

use super::FormError;

#[derive(Deserialize, Validate)]
/// Form data for the demo sign-in page.
pub struct SignInForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub role: String,
}

impl SignInForm {
    /// Maps the selected access level to the roles baked into the token.
    pub fn roles(&self) -> Result<Vec<String>, FormError> {
        match self.role.trim().to_lowercase().as_str() {
            "admin" => Ok(vec![
                SERVICE_ACCESS_ROLE.to_string(),
                SERVICE_ADMIN_ROLE.to_string(),
            ]),
            "member" => Ok(vec![
                SERVICE_ACCESS_ROLE.to_string(),
                SERVICE_MEMBER_ROLE.to_string(),
            ]),
            "guest" => Ok(Vec::new()),
            _ => Err(FormError::InvalidChoice("role")),
        }
    }
}
