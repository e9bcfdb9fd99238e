pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::Teacher;
pub use requests::{AttendanceHistoryQuery, GenerateQrRequest, MarkAlfaRequest, TodayAttendanceQuery};
pub use responses::{
    MarkAlfaResponse, QrTokenResponse, RosterEntry, RosterStudent, TodayAttendanceResponse,
};
