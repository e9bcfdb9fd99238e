//! 学校时钟
//!
//! 考勤日期与课程表的“今天”“现在”都按学校所在时区计算，
//! 时区为固定偏移 `attendance.utc_offset_minutes`（默认 UTC+7，无夏令时）。

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Offset, Timelike, Utc, Weekday,
};

use crate::config::AppConfig;

#[derive(Debug, Clone, Copy)]
pub struct SchoolClock {
    offset: FixedOffset,
}

impl SchoolClock {
    pub fn new(utc_offset_minutes: i32) -> Self {
        let offset =
            FixedOffset::east_opt(utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    pub fn from_config() -> Self {
        Self::new(AppConfig::get().attendance.utc_offset_minutes)
    }

    pub fn at(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset)
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.at(Utc::now())
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    pub fn weekday(&self) -> Weekday {
        self.now().weekday()
    }

    /// 当前时间，精确到分钟
    pub fn time_of_day(&self) -> NaiveTime {
        let now = self.now();
        NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(NaiveTime::MIN)
    }
}
