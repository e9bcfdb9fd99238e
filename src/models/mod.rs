pub mod admin;
pub mod attendances;
pub mod auth;
pub mod classes;
pub mod common;
pub mod schedule;
pub mod students;
pub mod teachers;
pub mod users;

pub use common::{DataResponse, ErrorBody, ErrorCode, ErrorResponse, MessageResponse};

