//! 预导入模块，方便使用

pub use super::admin::{ActiveModel as AdminActiveModel, Entity as Admin, Model as AdminModel};
pub use super::attendances::{
    ActiveModel as AttendanceActiveModel, Entity as Attendances, Model as AttendanceModel,
};
pub use super::class::{ActiveModel as ClassActiveModel, Entity as Class, Model as ClassModel};
pub use super::duty_schedule::{
    ActiveModel as DutyScheduleActiveModel, Entity as DutySchedule, Model as DutyScheduleModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::subjects_schedule::{
    ActiveModel as SubjectScheduleActiveModel, Entity as SubjectsSchedule,
    Model as SubjectScheduleModel,
};
pub use super::teachers::{
    ActiveModel as TeacherActiveModel, Entity as Teachers, Model as TeacherModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
