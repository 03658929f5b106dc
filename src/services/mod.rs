//! Business logic invoked by the route handlers. Services check roles,
//! talk to the repository and assemble the view models, leaving rendering
//! and redirects to the routes.

use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

pub mod backlog;
pub mod dashboard;
pub mod epics;
pub mod reports;
pub mod sprints;
pub mod team;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// A user facing message shown as a flash alert.
    #[error("{0}")]
    Form(String),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error(transparent)]
    Repository(RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            // Uniqueness and referential conflicts carry a message the user
            // can act on.
            RepositoryError::ConstraintViolation(message) => ServiceError::Form(message),
            err => ServiceError::Repository(err),
        }
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(err.to_string())
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}
