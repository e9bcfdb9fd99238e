use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学生档案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../clients/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    pub nisn: Option<String>,
    pub nama: String,
    /// 所属班级 ID
    pub kelas: Option<i64>,
    pub user_id: Option<i64>,
    pub avatar_path: Option<String>,
    /// 最近一次考勤状态（冗余缓存字段）
    pub last_status: Option<String>,
    pub last_date: Option<NaiveDate>,
}

impl Student {
    /// 头像对象路径：`<student_id>/avatar-<时间戳>.<ext>`
    ///
    /// 时间戳为毫秒精度的 ISO 8601 字符串，其中的 `:` 与 `.` 替换为 `-`，
    /// 保证每次上传生成新对象，旧头像随后单独删除。
    pub fn avatar_object_path(&self, now: DateTime<Utc>, extension: &str) -> String {
        let stamp = now
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace([':', '.'], "-");
        format!("{}/avatar-{}.{}", self.id, stamp, extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn student() -> Student {
        Student {
            id: 42,
            nisn: Some("0012345678".to_string()),
            nama: "Budi Santoso".to_string(),
            kelas: Some(1),
            user_id: None,
            avatar_path: None,
            last_status: None,
            last_date: None,
        }
    }

    #[test]
    fn test_avatar_object_path_format() {
        let now = Utc
            .with_ymd_and_hms(2025, 3, 1, 7, 15, 30)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(123))
            .unwrap();
        assert_eq!(
            student().avatar_object_path(now, "png"),
            "42/avatar-2025-03-01T07-15-30-123Z.png"
        );
    }

    #[test]
    fn test_avatar_object_path_has_no_colons_or_dots_in_stamp() {
        let path = student().avatar_object_path(Utc::now(), "webp");
        let stem = path.trim_end_matches(".webp");
        assert!(!stem.contains(':'));
        assert!(!stem.contains('.'));
        assert!(path.starts_with("42/avatar-"));
    }
}
