use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 教师档案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../clients/types/generated/teacher.ts")]
pub struct Teacher {
    pub id: i64,
    pub user_id: i64,
    pub nama: String,
}
