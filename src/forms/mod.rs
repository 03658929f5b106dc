//! Form definitions backing the tracker routes.

use serde::{Deserialize, Deserializer};
use thiserror::Error;
use validator::ValidationErrors;

pub mod auth;
pub mod backlog;
pub mod epics;
pub mod reports;
pub mod sprints;
pub mod team;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid item id")]
    InvalidItemId,

    #[error("invalid epic id")]
    InvalidEpicId,

    #[error("invalid sprint id")]
    InvalidSprintId,

    #[error("invalid member id")]
    InvalidMemberId,

    #[error("invalid {0}")]
    InvalidChoice(&'static str),

    #[error("end date must not precede start date")]
    InvalidDateRange,

    #[error("invalid text")]
    InvalidText,

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Deserializes an optional id field, treating an empty string as absent.
pub fn de_opt_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .and_then(|value| value.trim().parse::<i32>().ok())
        .filter(|id| *id > 0))
}

/// Deserializes an optional count field, treating an empty string as absent.
pub fn de_opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse::<u32>().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Optionals {
        #[serde(default, deserialize_with = "de_opt_i32")]
        owner: Option<i32>,
        #[serde(default, deserialize_with = "de_opt_u32")]
        points: Option<u32>,
    }

    #[test]
    fn empty_strings_become_none() {
        let form: Optionals = serde_html_form::from_str("owner=&points=").unwrap();
        assert_eq!(form.owner, None);
        assert_eq!(form.points, None);
    }

    #[test]
    fn values_pass_through() {
        let form: Optionals = serde_html_form::from_str("owner=5&points=8").unwrap();
        assert_eq!(form.owner, Some(5));
        assert_eq!(form.points, Some(8));
    }

    #[test]
    fn non_positive_owner_is_dropped() {
        let form: Optionals = serde_html_form::from_str("owner=0").unwrap();
        assert_eq!(form.owner, None);
    }
}
