pub mod admin;

pub mod attendance;

pub mod auth;

pub mod files;

pub mod schedule;

pub mod students;

pub mod teacher;

pub use admin::configure_admin_routes;
pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use files::configure_file_routes;
pub use schedule::configure_schedule_routes;
pub use students::configure_student_routes;
pub use teacher::configure_teacher_routes;
