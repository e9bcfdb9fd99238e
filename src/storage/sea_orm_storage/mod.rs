//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod admin;
mod attendances;
mod classes;
mod roles;
mod schedule;
mod students;
mod users;

use crate::config::AppConfig;
use crate::errors::{KlasError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| KlasError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| KlasError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true)
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        // 内存数据库每个连接都是独立的库，只能使用单连接且不能被回收
        let in_memory = url.contains(":memory:");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(pool_size)
                .min_connections(1)
                .idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .connect_with(opt)
            .await
            .map_err(|e| KlasError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(pool_size.min(5))
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| KlasError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(KlasError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 唯一约束冲突转换为 Conflict，其它错误附带上下文
pub(crate) fn map_write_error(err: DbErr, context: &str) -> KlasError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            KlasError::conflict(format!("{context}: {detail}"))
        }
        _ => KlasError::database_operation(format!("{context}: {err}")),
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_or_create_user_by_email(&self, email: &str) -> Result<User> {
        self.get_or_create_user_by_email_impl(email).await
    }

    async fn touch_last_sign_in(&self, id: i64) -> Result<Option<User>> {
        self.touch_last_sign_in_impl(id).await
    }

    async fn ensure_admin(&self, email: &str) -> Result<User> {
        self.ensure_admin_impl(email).await
    }

    // 身份模块
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_user_id_impl(user_id).await
    }

    async fn is_admin(&self, user_id: i64) -> Result<bool> {
        self.is_admin_impl(user_id).await
    }

    // 学生模块
    async fn list_students(&self) -> Result<Vec<Student>> {
        self.list_students_impl().await
    }

    async fn find_student_by_name(&self, nama: &str) -> Result<Option<Student>> {
        self.find_student_by_name_impl(nama).await
    }

    async fn link_student_to_user(
        &self,
        student_id: i64,
        user_id: i64,
    ) -> Result<Option<Student>> {
        self.link_student_to_user_impl(student_id, user_id).await
    }

    async fn list_students_by_class(&self, class_id: i64) -> Result<Vec<Student>> {
        self.list_students_by_class_impl(class_id).await
    }

    async fn update_student_avatar(
        &self,
        student_id: i64,
        avatar_path: &str,
    ) -> Result<Option<Student>> {
        self.update_student_avatar_impl(student_id, avatar_path)
            .await
    }

    async fn update_student_last_status(
        &self,
        student_id: i64,
        status: AttendanceStatus,
        date: NaiveDate,
    ) -> Result<()> {
        self.update_student_last_status_impl(student_id, status, date)
            .await
    }

    // 班级模块
    async fn list_classes(&self) -> Result<Vec<Class>> {
        self.list_classes_impl().await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    // 考勤模块
    async fn find_attendance(
        &self,
        student_id: i64,
        date: NaiveDate,
    ) -> Result<Option<Attendance>> {
        self.find_attendance_impl(student_id, date).await
    }

    async fn create_attendance(&self, attendance: NewAttendance) -> Result<Attendance> {
        self.create_attendance_impl(attendance).await
    }

    async fn list_attendances_on(
        &self,
        student_ids: &[i64],
        date: NaiveDate,
    ) -> Result<Vec<Attendance>> {
        self.list_attendances_on_impl(student_ids, date).await
    }

    async fn apply_mark_alfa(
        &self,
        student_ids: &[i64],
        date: NaiveDate,
    ) -> Result<MarkAlfaPlan> {
        self.apply_mark_alfa_impl(student_ids, date).await
    }

    async fn list_attendance_history(
        &self,
        filter: AttendanceHistoryFilter,
    ) -> Result<Vec<AttendanceHistoryEntry>> {
        self.list_attendance_history_impl(filter).await
    }

    // 课程表模块
    async fn list_subjects(&self) -> Result<Vec<SubjectSlot>> {
        self.list_subjects_impl().await
    }

    async fn list_subjects_by_day(&self, day: &str) -> Result<Vec<SubjectSlot>> {
        self.list_subjects_by_day_impl(day).await
    }

    async fn list_ongoing_subjects(&self, day: &str, time: NaiveTime) -> Result<Vec<SubjectSlot>> {
        self.list_ongoing_subjects_impl(day, time).await
    }

    async fn list_duties(&self) -> Result<Vec<DutySlot>> {
        self.list_duties_impl().await
    }

    async fn list_duties_by_day(&self, day: &str) -> Result<Vec<DutySlot>> {
        self.list_duties_by_day_impl(day).await
    }

    // 管理后台模块
    async fn admin_list_rows(&self, table: AdminTable) -> Result<Vec<serde_json::Value>> {
        self.admin_list_rows_impl(table).await
    }

    async fn admin_get_row(
        &self,
        table: AdminTable,
        id: i64,
    ) -> Result<Option<serde_json::Value>> {
        self.admin_get_row_impl(table, id).await
    }

    async fn admin_insert_row(
        &self,
        table: AdminTable,
        row: serde_json::Value,
    ) -> Result<serde_json::Value> {
        self.admin_insert_row_impl(table, row).await
    }

    async fn admin_update_row(
        &self,
        table: AdminTable,
        id: i64,
        patch: serde_json::Value,
    ) -> Result<Option<serde_json::Value>> {
        self.admin_update_row_impl(table, id, patch).await
    }

    async fn admin_delete_row(
        &self,
        table: AdminTable,
        id: i64,
    ) -> Result<Option<serde_json::Value>> {
        self.admin_delete_row_impl(table, id).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::entity::{class, students, teachers};
    use sea_orm::{ActiveModelTrait, Set};

    /// 已完成迁移的内存 SQLite 存储
    pub async fn memory_storage() -> SeaOrmStorage {
        SeaOrmStorage::connect("sqlite::memory:", 1, 5)
            .await
            .expect("in-memory sqlite should start")
    }

    pub async fn seed_class(storage: &SeaOrmStorage, name: &str) -> i64 {
        class::ActiveModel {
            class_name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(&storage.db)
        .await
        .expect("insert class")
        .id
    }

    pub async fn seed_student(storage: &SeaOrmStorage, nama: &str, kelas: Option<i64>) -> i64 {
        students::ActiveModel {
            nisn: Set(Some(format!("00{}", nama.len()))),
            nama: Set(nama.to_string()),
            kelas: Set(kelas),
            user_id: Set(None),
            avatar_path: Set(None),
            last_status: Set(None),
            last_date: Set(None),
            ..Default::default()
        }
        .insert(&storage.db)
        .await
        .expect("insert student")
        .id
    }

    pub async fn seed_teacher(storage: &SeaOrmStorage, user_id: i64, nama: &str) -> i64 {
        teachers::ActiveModel {
            user_id: Set(user_id),
            nama: Set(nama.to_string()),
            ..Default::default()
        }
        .insert(&storage.db)
        .await
        .expect("insert teacher")
        .id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("klas.db").unwrap(),
            "sqlite://klas.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/klas").unwrap(),
            "postgres://u:p@localhost/klas"
        );
        assert!(SeaOrmStorage::build_database_url("klas").is_err());
    }
}
