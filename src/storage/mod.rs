use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;

use crate::models::{
    admin::AdminTable,
    attendances::{
        Attendance, AttendanceHistoryEntry, AttendanceHistoryFilter, AttendanceStatus,
        MarkAlfaPlan, NewAttendance,
    },
    classes::Class,
    schedule::{DutySlot, SubjectSlot},
    students::Student,
    teachers::Teacher,
    users::User,
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 首次登录时自动创建账号
    async fn get_or_create_user_by_email(&self, email: &str) -> Result<User>;
    // 更新最后登录时间，返回更新后的用户
    async fn touch_last_sign_in(&self, id: i64) -> Result<Option<User>>;
    // 确保邮箱对应的账号存在且拥有管理员身份
    async fn ensure_admin(&self, email: &str) -> Result<User>;

    /// 身份查询方法
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>>;
    async fn is_admin(&self, user_id: i64) -> Result<bool>;

    /// 学生管理方法
    // 列出全部学生
    async fn list_students(&self) -> Result<Vec<Student>>;
    // 按姓名精确查找学生
    async fn find_student_by_name(&self, nama: &str) -> Result<Option<Student>>;
    // 绑定学生档案到账号
    async fn link_student_to_user(&self, student_id: i64, user_id: i64)
    -> Result<Option<Student>>;
    // 列出班级学生（按姓名排序）
    async fn list_students_by_class(&self, class_id: i64) -> Result<Vec<Student>>;
    // 更新头像路径
    async fn update_student_avatar(
        &self,
        student_id: i64,
        avatar_path: &str,
    ) -> Result<Option<Student>>;
    // 更新学生最近考勤状态
    async fn update_student_last_status(
        &self,
        student_id: i64,
        status: AttendanceStatus,
        date: NaiveDate,
    ) -> Result<()>;

    /// 班级管理方法
    // 列出班级（按名称排序）
    async fn list_classes(&self) -> Result<Vec<Class>>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;

    /// 考勤方法
    // 获取学生某天的考勤
    async fn find_attendance(&self, student_id: i64, date: NaiveDate)
    -> Result<Option<Attendance>>;
    // 新增考勤，同一学生同一天重复时返回 Conflict
    async fn create_attendance(&self, attendance: NewAttendance) -> Result<Attendance>;
    // 获取多名学生某天的考勤
    async fn list_attendances_on(
        &self,
        student_ids: &[i64],
        date: NaiveDate,
    ) -> Result<Vec<Attendance>>;
    // 在一个事务中将学生标记为 ALFA，返回实际执行的计划
    async fn apply_mark_alfa(&self, student_ids: &[i64], date: NaiveDate)
    -> Result<MarkAlfaPlan>;
    // 考勤历史（按日期倒序，附学生与班级信息）
    async fn list_attendance_history(
        &self,
        filter: AttendanceHistoryFilter,
    ) -> Result<Vec<AttendanceHistoryEntry>>;

    /// 课程表与值日表方法
    async fn list_subjects(&self) -> Result<Vec<SubjectSlot>>;
    async fn list_subjects_by_day(&self, day: &str) -> Result<Vec<SubjectSlot>>;
    // start_time <= time < end_time
    async fn list_ongoing_subjects(&self, day: &str, time: NaiveTime) -> Result<Vec<SubjectSlot>>;
    async fn list_duties(&self) -> Result<Vec<DutySlot>>;
    async fn list_duties_by_day(&self, day: &str) -> Result<Vec<DutySlot>>;

    /// 管理后台方法，行以 JSON 对象表示
    async fn admin_list_rows(&self, table: AdminTable) -> Result<Vec<serde_json::Value>>;
    async fn admin_get_row(&self, table: AdminTable, id: i64)
    -> Result<Option<serde_json::Value>>;
    async fn admin_insert_row(
        &self,
        table: AdminTable,
        row: serde_json::Value,
    ) -> Result<serde_json::Value>;
    async fn admin_update_row(
        &self,
        table: AdminTable,
        id: i64,
        patch: serde_json::Value,
    ) -> Result<Option<serde_json::Value>>;
    async fn admin_delete_row(
        &self,
        table: AdminTable,
        id: i64,
    ) -> Result<Option<serde_json::Value>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
