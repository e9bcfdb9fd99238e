pub mod de;
pub mod error_code;
pub mod response;

pub use error_code::ErrorCode;
pub use response::{DataResponse, ErrorBody, ErrorResponse, MessageResponse};
