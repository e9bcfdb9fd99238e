//! 管理后台可直接增删改查的数据表

use serde::Serialize;
use ts_rs::TS;

/// 允许通过 `/admin/{table}` 访问的表，其它表名一律拒绝
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../clients/types/generated/admin.ts")]
pub enum AdminTable {
    DutySchedule,
    Students,
    Attendances,
    Class,
    Admin,
}

impl AdminTable {
    pub const ALL: [AdminTable; 5] = [
        AdminTable::DutySchedule,
        AdminTable::Students,
        AdminTable::Attendances,
        AdminTable::Class,
        AdminTable::Admin,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|table| table.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdminTable::DutySchedule => "duty_schedule",
            AdminTable::Students => "students",
            AdminTable::Attendances => "attendances",
            AdminTable::Class => "class",
            AdminTable::Admin => "admin",
        }
    }
}

impl std::fmt::Display for AdminTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
