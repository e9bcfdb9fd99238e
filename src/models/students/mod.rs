pub mod entities;
pub mod responses;

pub use entities::Student;
pub use responses::{ProfilePictureResponse, ProfilePictureUpdatedResponse};
