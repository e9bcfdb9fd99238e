pub mod admin;
pub mod attendance;
pub mod auth;
pub mod files;
pub mod schedule;
pub mod students;
pub mod teacher;
pub(crate) mod upload;

pub use admin::AdminService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use files::FileService;
pub use schedule::ScheduleService;
pub use students::StudentService;
pub use teacher::TeacherService;

use actix_web::{HttpRequest, HttpResponse, http::StatusCode, web};
use std::sync::Arc;
use tracing::{error, warn};

use crate::cache::ObjectCache;
use crate::errors::KlasError;
use crate::middlewares::RequireJWT;
use crate::models::{ErrorCode, ErrorResponse, students::entities::Student};
use crate::object_store::ObjectStore;
use crate::storage::Storage;

// 统一的错误响应
pub(crate) fn error_response(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse::new(code, message))
}

// 存储层错误统一记录并返回 500
pub(crate) fn storage_failure(context: &str, err: KlasError) -> HttpResponse {
    error!("{}: {}", context, err);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::DatabaseError,
        format!("{context}: {}", err.message()),
    )
}

/// 当前账号绑定的学生档案，需在 RequireJWT 之后使用
pub(crate) async fn linked_student(
    storage: &dyn Storage,
    request: &HttpRequest,
) -> Result<Student, HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Err(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Unauthorized",
        ));
    };

    match storage.get_student_by_user_id(user_id).await {
        Ok(Some(student)) => Ok(student),
        Ok(None) => Err(error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::StudentNotLinked,
            "No student profile is linked to this account",
        )),
        Err(e) => Err(storage_failure("Failed to load student profile", e)),
    }
}

// 签名失败只记录日志
pub(crate) fn signed_url_or_none(
    store: &dyn ObjectStore,
    bucket: &str,
    path: Option<&str>,
    ttl_seconds: i64,
) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    match store.create_signed_url(bucket, path, ttl_seconds) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!("Failed to sign {}/{}: {}", bucket, path, e);
            None
        }
    }
}

pub(crate) fn app_storage(request: &HttpRequest) -> Arc<dyn Storage> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone()
}

pub(crate) fn app_cache(request: &HttpRequest) -> Arc<dyn ObjectCache> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .expect("Cache not found in app data")
        .get_ref()
        .clone()
}

pub(crate) fn app_object_store(request: &HttpRequest) -> Arc<dyn ObjectStore> {
    request
        .app_data::<web::Data<Arc<dyn ObjectStore>>>()
        .expect("ObjectStore not found in app data")
        .get_ref()
        .clone()
}

#[cfg(test)]
pub(crate) mod test_support {
    //! 服务层测试共用的应用数据

    use sea_orm::{ActiveModelTrait, Set};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI64, Ordering};

    use chrono::{NaiveDate, NaiveTime};

    use crate::cache::ObjectCache;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::entity::users;
    use crate::errors::{KlasError, Result};
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
    use crate::object_store::{LocalObjectStore, ObjectStore};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::test_support::memory_storage;
    use crate::utils::jwt::JwtUtils;

    pub struct TestContext {
        pub db: SeaOrmStorage,
        pub storage: Arc<dyn Storage>,
        pub cache: Arc<dyn ObjectCache>,
        pub object_store: Arc<dyn ObjectStore>,
        pub _dir: tempfile::TempDir,
    }

    static CONTEXTS: AtomicI64 = AtomicI64::new(0);

    impl TestContext {
        pub async fn new() -> Self {
            let db = memory_storage().await;

            // 各测试的账号 ID 互不重叠，限流计数是进程级共享的
            let base = (CONTEXTS.fetch_add(1, Ordering::Relaxed) + 1) * 1000;
            let now = chrono::Utc::now().timestamp();
            users::ActiveModel {
                id: Set(base),
                email: Set(format!("placeholder-{base}@klas.test")),
                last_sign_in_at: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&db.db)
            .await
            .expect("placeholder user");

            let dir = tempfile::tempdir().expect("tempdir");
            let config = crate::config::AppConfig::get();
            let object_store = LocalObjectStore::new(
                dir.path().to_str().expect("utf-8 path"),
                &config.storage.public_base_url,
                &config.jwt.secret,
            )
            .await
            .expect("object store");

            Self {
                storage: Arc::new(db.clone()),
                db,
                cache: Arc::new(MokaCacheWrapper::with_settings(1000, 60)),
                object_store: Arc::new(object_store),
                _dir: dir,
            }
        }

        /// 换成按 `fail` 注入错误的存储，种子数据仍写入 `db`
        pub fn with_failures(mut self, fail: FailOn) -> Self {
            self.storage = Arc::new(FaultyStorage {
                inner: self.db.clone(),
                fail,
            });
            self
        }

        /// 创建账号并返回 (user_id, access token)
        pub async fn sign_in(&self, email: &str) -> (i64, String) {
            let user = self
                .storage
                .get_or_create_user_by_email(email)
                .await
                .expect("create user");
            let token = JwtUtils::generate_access_token(user.id).expect("access token");
            (user.id, token)
        }
    }

    /// 指定哪些写操作返回存储错误
    #[derive(Debug, Default, Clone, Copy)]
    pub struct FailOn {
        pub create_attendance: bool,
        pub last_status: bool,
        pub avatar: bool,
    }

    /// 包装内存 SQLite 存储，按 `FailOn` 让部分写操作失败
    pub struct FaultyStorage {
        inner: SeaOrmStorage,
        fail: FailOn,
    }

    fn injected(operation: &str) -> KlasError {
        KlasError::database_operation(format!("injected failure: {operation}"))
    }

    #[async_trait::async_trait]
    impl Storage for FaultyStorage {
        async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
            self.inner.get_user_by_id(id).await
        }
        async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
            self.inner.get_user_by_email(email).await
        }
        async fn get_or_create_user_by_email(&self, email: &str) -> Result<User> {
            self.inner.get_or_create_user_by_email(email).await
        }
        async fn touch_last_sign_in(&self, id: i64) -> Result<Option<User>> {
            self.inner.touch_last_sign_in(id).await
        }
        async fn ensure_admin(&self, email: &str) -> Result<User> {
            self.inner.ensure_admin(email).await
        }
        async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>> {
            self.inner.get_student_by_user_id(user_id).await
        }
        async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>> {
            self.inner.get_teacher_by_user_id(user_id).await
        }
        async fn is_admin(&self, user_id: i64) -> Result<bool> {
            self.inner.is_admin(user_id).await
        }
        async fn list_students(&self) -> Result<Vec<Student>> {
            self.inner.list_students().await
        }
        async fn find_student_by_name(&self, nama: &str) -> Result<Option<Student>> {
            self.inner.find_student_by_name(nama).await
        }
        async fn link_student_to_user(
            &self,
            student_id: i64,
            user_id: i64,
        ) -> Result<Option<Student>> {
            self.inner.link_student_to_user(student_id, user_id).await
        }
        async fn list_students_by_class(&self, class_id: i64) -> Result<Vec<Student>> {
            self.inner.list_students_by_class(class_id).await
        }
        async fn update_student_avatar(
            &self,
            student_id: i64,
            avatar_path: &str,
        ) -> Result<Option<Student>> {
            if self.fail.avatar {
                return Err(injected("update_student_avatar"));
            }
            self.inner.update_student_avatar(student_id, avatar_path).await
        }
        async fn update_student_last_status(
            &self,
            student_id: i64,
            status: AttendanceStatus,
            date: NaiveDate,
        ) -> Result<()> {
            if self.fail.last_status {
                return Err(injected("update_student_last_status"));
            }
            self.inner
                .update_student_last_status(student_id, status, date)
                .await
        }
        async fn list_classes(&self) -> Result<Vec<Class>> {
            self.inner.list_classes().await
        }
        async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
            self.inner.get_class_by_id(class_id).await
        }
        async fn find_attendance(
            &self,
            student_id: i64,
            date: NaiveDate,
        ) -> Result<Option<Attendance>> {
            self.inner.find_attendance(student_id, date).await
        }
        async fn create_attendance(&self, attendance: NewAttendance) -> Result<Attendance> {
            if self.fail.create_attendance {
                return Err(injected("create_attendance"));
            }
            self.inner.create_attendance(attendance).await
        }
        async fn list_attendances_on(
            &self,
            student_ids: &[i64],
            date: NaiveDate,
        ) -> Result<Vec<Attendance>> {
            self.inner.list_attendances_on(student_ids, date).await
        }
        async fn apply_mark_alfa(
            &self,
            student_ids: &[i64],
            date: NaiveDate,
        ) -> Result<MarkAlfaPlan> {
            self.inner.apply_mark_alfa(student_ids, date).await
        }
        async fn list_attendance_history(
            &self,
            filter: AttendanceHistoryFilter,
        ) -> Result<Vec<AttendanceHistoryEntry>> {
            self.inner.list_attendance_history(filter).await
        }
        async fn list_subjects(&self) -> Result<Vec<SubjectSlot>> {
            self.inner.list_subjects().await
        }
        async fn list_subjects_by_day(&self, day: &str) -> Result<Vec<SubjectSlot>> {
            self.inner.list_subjects_by_day(day).await
        }
        async fn list_ongoing_subjects(
            &self,
            day: &str,
            time: NaiveTime,
        ) -> Result<Vec<SubjectSlot>> {
            self.inner.list_ongoing_subjects(day, time).await
        }
        async fn list_duties(&self) -> Result<Vec<DutySlot>> {
            self.inner.list_duties().await
        }
        async fn list_duties_by_day(&self, day: &str) -> Result<Vec<DutySlot>> {
            self.inner.list_duties_by_day(day).await
        }
        async fn admin_list_rows(&self, table: AdminTable) -> Result<Vec<serde_json::Value>> {
            self.inner.admin_list_rows(table).await
        }
        async fn admin_get_row(
            &self,
            table: AdminTable,
            id: i64,
        ) -> Result<Option<serde_json::Value>> {
            self.inner.admin_get_row(table, id).await
        }
        async fn admin_insert_row(
            &self,
            table: AdminTable,
            row: serde_json::Value,
        ) -> Result<serde_json::Value> {
            self.inner.admin_insert_row(table, row).await
        }
        async fn admin_update_row(
            &self,
            table: AdminTable,
            id: i64,
            patch: serde_json::Value,
        ) -> Result<Option<serde_json::Value>> {
            self.inner.admin_update_row(table, id, patch).await
        }
        async fn admin_delete_row(
            &self,
            table: AdminTable,
            id: i64,
        ) -> Result<Option<serde_json::Value>> {
            self.inner.admin_delete_row(table, id).await
        }
    }

    /// 对象存储某个 bucket 下现存的文件数
    pub fn stored_file_count(ctx: &TestContext, bucket: &str) -> usize {
        fn walk(dir: &std::path::Path) -> usize {
            let Ok(entries) = std::fs::read_dir(dir) else {
                return 0;
            };
            entries
                .flatten()
                .map(|entry| {
                    let path = entry.path();
                    if path.is_dir() { walk(&path) } else { 1 }
                })
                .sum()
        }
        walk(&ctx._dir.path().join(bucket))
    }

    /// 按应用启动时的方式注入共享数据
    #[macro_export]
    macro_rules! test_app {
        ($ctx:expr, $configure:expr) => {
            actix_web::test::init_service(
                actix_web::App::new()
                    .app_data(actix_web::web::Data::new($ctx.storage.clone()))
                    .app_data(actix_web::web::Data::new($ctx.cache.clone()))
                    .app_data(actix_web::web::Data::new($ctx.object_store.clone()))
                    .app_data(
                        actix_web::web::JsonConfig::default()
                            .error_handler($crate::utils::json_error_handler),
                    )
                    .app_data(
                        actix_web::web::QueryConfig::default()
                            .error_handler($crate::utils::query_error_handler),
                    )
                    .configure($configure),
            )
            .await
        };
    }
}
