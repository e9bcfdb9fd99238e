use super::{SeaOrmStorage, map_write_error};
use crate::entity::admin;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{KlasError, Result};
use crate::models::users::entities::User;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 获取或创建用户
    pub async fn get_or_create_user_by_email_impl(&self, email: &str) -> Result<User> {
        if let Some(user) = self.get_user_by_email_impl(email).await? {
            return Ok(user);
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            email: Set(email.to_string()),
            last_sign_in_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(created) => Ok(created.into_user()),
            Err(e) => match map_write_error(e, "创建用户失败") {
                // 并发登录时另一个请求已创建
                KlasError::Conflict(_) => self
                    .get_user_by_email_impl(email)
                    .await?
                    .ok_or_else(|| KlasError::database_operation("创建用户后无法读取")),
                other => Err(other),
            },
        }
    }

    /// 更新最后登录时间
    pub async fn touch_last_sign_in_impl(&self, id: i64) -> Result<Option<User>> {
        let Some(existing) = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询用户失败: {e}")))?
        else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();
        let mut model: ActiveModel = existing.into();
        model.last_sign_in_at = Set(Some(now));
        model.updated_at = Set(now);

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("更新登录时间失败: {e}")))?;

        Ok(Some(updated.into_user()))
    }

    /// 确保管理员账号存在
    pub async fn ensure_admin_impl(&self, email: &str) -> Result<User> {
        let user = self.get_or_create_user_by_email_impl(email).await?;

        let existing = admin::Entity::find()
            .filter(admin::Column::UserId.eq(user.id))
            .one(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询管理员失败: {e}")))?;

        if existing.is_none() {
            admin::ActiveModel {
                user_id: Set(user.id),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "创建管理员失败"))?;
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::sea_orm_storage::test_support::memory_storage;

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let storage = memory_storage().await;

        let first = storage
            .get_or_create_user_by_email_impl("siswa@sekolah.id")
            .await
            .unwrap();
        let second = storage
            .get_or_create_user_by_email_impl("siswa@sekolah.id")
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert!(first.last_sign_in_at.is_none());
    }

    #[tokio::test]
    async fn test_touch_last_sign_in() {
        let storage = memory_storage().await;
        let user = storage
            .get_or_create_user_by_email_impl("guru@sekolah.id")
            .await
            .unwrap();

        let touched = storage.touch_last_sign_in_impl(user.id).await.unwrap();
        assert!(touched.unwrap().last_sign_in_at.is_some());

        assert!(storage.touch_last_sign_in_impl(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ensure_admin_twice() {
        let storage = memory_storage().await;

        let user = storage.ensure_admin_impl("admin@sekolah.id").await.unwrap();
        let again = storage.ensure_admin_impl("admin@sekolah.id").await.unwrap();

        assert_eq!(user.id, again.id);
        assert!(storage.is_admin_impl(user.id).await.unwrap());
    }
}
