pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::{
    Attendance, AttendanceHistoryFilter, AttendanceStatus, MarkAlfaPlan, NewAttendance,
};
pub use requests::{AbsenQuery, AbsenRequest, QrCheckInRequest};
pub use responses::{
    AttendanceHistoryEntry, AttendanceRecordedResponse, HistoryClass, HistoryStudent,
    LeaveRecordedResponse,
};
