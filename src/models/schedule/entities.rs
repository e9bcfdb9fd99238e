use chrono::{NaiveTime, Timelike, Weekday};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use ts_rs::TS;

// 英文星期名到印尼语的映射
const DAY_NAMES: [(&str, &str); 7] = [
    ("sunday", "Minggu"),
    ("monday", "Senin"),
    ("tuesday", "Selasa"),
    ("wednesday", "Rabu"),
    ("thursday", "Kamis"),
    ("friday", "Jumat"),
    ("saturday", "Sabtu"),
];

/// 将英文星期名（不区分大小写）映射为印尼语，未知名称返回 None
pub fn indonesian_day_name(english: &str) -> Option<&'static str> {
    let key = english.to_lowercase();
    DAY_NAMES
        .iter()
        .find(|(en, _)| *en == key)
        .map(|(_, id)| *id)
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    DAY_NAMES[weekday.num_days_from_sunday() as usize].1
}

/// 解析请求中的 `d` 参数
///
/// 空值或缺省时使用学校时钟的当天；已知的英文星期名被翻译，其它值原样使用。
pub fn resolve_day(overridden: Option<&str>, today: Weekday) -> String {
    match overridden.filter(|d| !d.is_empty()) {
        Some(day) => indonesian_day_name(day)
            .map(str::to_string)
            .unwrap_or_else(|| day.to_string()),
        None => weekday_name(today).to_string(),
    }
}

/// 解析 `t` 参数：`H[:M]`，各部分补零到两位，缺失部分视为 `00`
pub fn parse_time_override(raw: &str) -> Option<NaiveTime> {
    let mut parts = raw.split(':');
    let hour = parse_part(parts.next())?;
    let minute = parse_part(parts.next())?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn parse_part(part: Option<&str>) -> Option<u32> {
    match part {
        None | Some("") => Some(0),
        Some(p) if p.len() <= 2 && p.bytes().all(|b| b.is_ascii_digit()) => p.parse().ok(),
        Some(_) => None,
    }
}

pub fn format_hh_mm(time: &NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

fn serialize_hh_mm<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_hh_mm(time))
}

// 课程表中的一节课
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/schedule.ts")]
pub struct SubjectSlot {
    pub id: i64,
    pub day: String,
    pub subject: String,
    #[serde(serialize_with = "serialize_hh_mm")]
    #[ts(type = "string")]
    pub start_time: NaiveTime,
    #[serde(serialize_with = "serialize_hh_mm")]
    #[ts(type = "string")]
    pub end_time: NaiveTime,
    pub teacher: Option<String>,
}

impl SubjectSlot {
    /// `start_time <= time < end_time`
    pub fn is_ongoing_at(&self, time: NaiveTime) -> bool {
        self.start_time <= time && time < self.end_time
    }
}

// 值日安排
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/schedule.ts")]
pub struct DutySlot {
    pub id: i64,
    pub day: String,
    pub student_name: String,
}

/// 按星期分组的结果，序列化为 JSON 对象，键的顺序为首次出现的顺序
#[derive(Debug, Clone)]
pub struct GroupedByDay<T>(pub Vec<(String, Vec<T>)>);

impl<T> GroupedByDay<T> {
    pub fn from_rows<R, F>(rows: Vec<R>, mut split: F) -> Self
    where
        F: FnMut(R) -> (String, T),
    {
        let mut groups: Vec<(String, Vec<T>)> = Vec::new();
        for row in rows {
            let (day, item) = split(row);
            match groups.iter_mut().find(|(d, _)| *d == day) {
                Some((_, items)) => items.push(item),
                None => groups.push((day, vec![item])),
            }
        }
        Self(groups)
    }
}

impl<T: Serialize> Serialize for GroupedByDay<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (day, items) in &self.0 {
            map.serialize_entry(day, items)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indonesian_day_names() {
        assert_eq!(indonesian_day_name("monday"), Some("Senin"));
        assert_eq!(indonesian_day_name("FRIDAY"), Some("Jumat"));
        assert_eq!(indonesian_day_name("Sunday"), Some("Minggu"));
        assert_eq!(indonesian_day_name("senin"), None);
    }

    #[test]
    fn test_weekday_name() {
        assert_eq!(weekday_name(Weekday::Sun), "Minggu");
        assert_eq!(weekday_name(Weekday::Wed), "Rabu");
        assert_eq!(weekday_name(Weekday::Sat), "Sabtu");
    }

    #[test]
    fn test_resolve_day() {
        assert_eq!(resolve_day(Some("Tuesday"), Weekday::Mon), "Selasa");
        // 未知名称原样返回
        assert_eq!(resolve_day(Some("Kamis"), Weekday::Mon), "Kamis");
        assert_eq!(resolve_day(Some(""), Weekday::Thu), "Kamis");
        assert_eq!(resolve_day(None, Weekday::Fri), "Jumat");
    }

    #[test]
    fn test_parse_time_override() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0);
        assert_eq!(parse_time_override("7"), t(7, 0));
        assert_eq!(parse_time_override("7:5"), t(7, 5));
        assert_eq!(parse_time_override("07:30"), t(7, 30));
        assert_eq!(parse_time_override("13:"), t(13, 0));
        assert_eq!(parse_time_override("09:15:59"), t(9, 15));
        assert_eq!(parse_time_override("24:00"), None);
        assert_eq!(parse_time_override("12:60"), None);
        assert_eq!(parse_time_override("ab:10"), None);
        assert_eq!(parse_time_override("-1"), None);
        assert_eq!(parse_time_override("123"), None);
    }

    #[test]
    fn test_is_ongoing_at_is_half_open() {
        let slot = SubjectSlot {
            id: 1,
            day: "Senin".to_string(),
            subject: "Matematika".to_string(),
            start_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            teacher: None,
        };
        assert!(slot.is_ongoing_at(NaiveTime::from_hms_opt(7, 0, 0).unwrap()));
        assert!(slot.is_ongoing_at(NaiveTime::from_hms_opt(8, 29, 0).unwrap()));
        assert!(!slot.is_ongoing_at(NaiveTime::from_hms_opt(8, 30, 0).unwrap()));
        assert!(!slot.is_ongoing_at(NaiveTime::from_hms_opt(6, 59, 0).unwrap()));

        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["start_time"], "07:00");
        assert_eq!(json["end_time"], "08:30");
    }

    #[test]
    fn test_grouped_by_day_preserves_first_seen_order() {
        let rows = vec![
            ("Selasa", 1),
            ("Senin", 2),
            ("Selasa", 3),
            ("Rabu", 4),
            ("Senin", 5),
        ];
        let grouped = GroupedByDay::from_rows(rows, |(d, id)| (d.to_string(), id));
        assert_eq!(grouped.0.len(), 3);

        let json = serde_json::to_string(&grouped).unwrap();
        assert_eq!(json, r#"{"Selasa":[1,3],"Senin":[2,5],"Rabu":[4]}"#);
    }
}
