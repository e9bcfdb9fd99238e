//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 管理后台可直接读写的表（见 `AdminTable`）额外派生 serde，以 JSON 形式透传。

pub mod prelude;

pub mod admin;
pub mod attendances;
pub mod class;
pub mod duty_schedule;
pub mod students;
pub mod subjects_schedule;
pub mod teachers;
pub mod users;
