pub mod clock;
pub mod extractor;
pub mod file_magic;
pub mod jwt;
pub mod otp_hash;
pub mod parameter_error_handler;
pub mod random_code;
pub mod validate;

pub use clock::SchoolClock;
pub use extractor::SafeSignedToken;
pub use file_magic::validate_magic_bytes;
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
