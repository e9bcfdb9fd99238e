use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 班级
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../clients/types/generated/class.ts")]
pub struct Class {
    pub id: i64,
    pub class_name: String,
}
