pub mod requests;
pub mod responses;

pub use requests::{LinkStudentRequest, RefreshTokenRequest, SignInRequest, VerifyOtpRequest};
pub use responses::{
    LinkStudentResponse, RefreshTokenResponse, SessionResponse, UserInfoResponse,
    VerifyOtpResponse,
};
