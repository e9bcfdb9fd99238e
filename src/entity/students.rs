//! 学生实体

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub nisn: Option<String>,
    pub nama: String,
    pub kelas: Option<i64>,
    #[sea_orm(unique)]
    pub user_id: Option<i64>,
    pub avatar_path: Option<String>,
    pub last_status: Option<String>,
    pub last_date: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class::Entity",
        from = "Column::Kelas",
        to = "super::class::Column::Id"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::attendances::Entity")]
    Attendances,
}

impl Related<super::class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::attendances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student(self) -> crate::models::students::entities::Student {
        crate::models::students::entities::Student {
            id: self.id,
            nisn: self.nisn,
            nama: self.nama,
            kelas: self.kelas,
            user_id: self.user_id,
            avatar_path: self.avatar_path,
            last_status: self.last_status,
            last_date: self.last_date,
        }
    }
}
