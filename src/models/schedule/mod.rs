pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::{DutySlot, GroupedByDay, SubjectSlot};
pub use requests::{DayQuery, OngoingQuery};
pub use responses::{
    DutyEntry, OngoingResponse, SubjectEntry, TodayDutyResponse, TodayScheduleEntry,
    TodayScheduleResponse,
};
