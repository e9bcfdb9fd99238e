use super::SeaOrmStorage;
use crate::entity::{admin, students, teachers};
use crate::errors::{KlasError, Result};
use crate::models::{students::entities::Student, teachers::entities::Teacher};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

impl SeaOrmStorage {
    /// 获取账号绑定的学生档案
    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = students::Entity::find()
            .filter(students::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询学生档案失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 获取账号对应的教师档案
    pub async fn get_teacher_by_user_id_impl(&self, user_id: i64) -> Result<Option<Teacher>> {
        let result = teachers::Entity::find()
            .filter(teachers::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询教师档案失败: {e}")))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    pub async fn is_admin_impl(&self, user_id: i64) -> Result<bool> {
        let count = admin::Entity::find()
            .filter(admin::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询管理员失败: {e}")))?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::entity::teachers;
    use crate::storage::sea_orm_storage::test_support::memory_storage;
    use sea_orm::{ActiveModelTrait, Set};

    #[tokio::test]
    async fn test_teacher_lookup() {
        let storage = memory_storage().await;
        let user = storage
            .get_or_create_user_by_email_impl("guru@sekolah.id")
            .await
            .unwrap();

        assert!(storage.get_teacher_by_user_id_impl(user.id).await.unwrap().is_none());

        teachers::ActiveModel {
            user_id: Set(user.id),
            nama: Set("Bu Rina".to_string()),
            ..Default::default()
        }
        .insert(&storage.db)
        .await
        .unwrap();

        let teacher = storage
            .get_teacher_by_user_id_impl(user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(teacher.nama, "Bu Rina");
        assert!(!storage.is_admin_impl(user.id).await.unwrap());
    }
}
