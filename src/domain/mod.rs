//! Domain aggregates exposed by the tracker service layer.

pub mod backlog;
pub mod epic;
pub mod member;
pub mod sprint;
pub mod time_entry;
pub mod types;
