//! 课程表实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subjects_schedule")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub day: String,
    pub subject: String,
    pub start_time: Time,
    pub end_time: Time,
    pub teacher: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_subject(self) -> crate::models::schedule::entities::SubjectSlot {
        crate::models::schedule::entities::SubjectSlot {
            id: self.id,
            day: self.day,
            subject: self.subject,
            start_time: self.start_time,
            end_time: self.end_time,
            teacher: self.teacher,
        }
    }
}
