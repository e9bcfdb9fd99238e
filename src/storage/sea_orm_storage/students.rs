//! 学生档案存储操作

use super::SeaOrmStorage;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{KlasError, Result};
use crate::models::{attendances::entities::AttendanceStatus, students::entities::Student};
use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn list_students_impl(&self) -> Result<Vec<Student>> {
        let rows = Students::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_student()).collect())
    }

    /// 按姓名精确查找，同名时取 ID 最小者
    pub async fn find_student_by_name_impl(&self, nama: &str) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::Nama.eq(nama))
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 绑定账号，学生不存在时返回 None
    pub async fn link_student_to_user_impl(
        &self,
        student_id: i64,
        user_id: i64,
    ) -> Result<Option<Student>> {
        let Some(existing) = self.find_student_model(student_id).await? else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.user_id = Set(Some(user_id));

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| super::map_write_error(e, "绑定学生账号失败"))?;

        Ok(Some(updated.into_student()))
    }

    /// 班级学生名单（按姓名排序）
    pub async fn list_students_by_class_impl(&self, class_id: i64) -> Result<Vec<Student>> {
        let rows = Students::find()
            .filter(Column::Kelas.eq(class_id))
            .order_by_asc(Column::Nama)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询班级学生失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_student()).collect())
    }

    pub async fn update_student_avatar_impl(
        &self,
        student_id: i64,
        avatar_path: &str,
    ) -> Result<Option<Student>> {
        let Some(existing) = self.find_student_model(student_id).await? else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.avatar_path = Set(Some(avatar_path.to_string()));

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("更新头像失败: {e}")))?;

        Ok(Some(updated.into_student()))
    }

    /// 写入最近一次考勤状态
    pub async fn update_student_last_status_impl(
        &self,
        student_id: i64,
        status: AttendanceStatus,
        date: NaiveDate,
    ) -> Result<()> {
        let result = Students::update_many()
            .col_expr(Column::LastStatus, Expr::value(status.as_str()))
            .col_expr(Column::LastDate, Expr::value(date))
            .filter(Column::Id.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("更新学生考勤状态失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(KlasError::not_found(format!("学生 {student_id} 不存在")));
        }
        Ok(())
    }

    async fn find_student_model(
        &self,
        student_id: i64,
    ) -> Result<Option<crate::entity::students::Model>> {
        Students::find_by_id(student_id)
            .one(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询学生失败: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use crate::models::attendances::entities::AttendanceStatus;
    use crate::storage::sea_orm_storage::test_support::{
        memory_storage, seed_class, seed_student,
    };
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_link_student_to_user() {
        let storage = memory_storage().await;
        let student_id = seed_student(&storage, "Budi Santoso", None).await;
        let user = storage
            .get_or_create_user_by_email_impl("budi@sekolah.id")
            .await
            .unwrap();

        let found = storage
            .find_student_by_name_impl("Budi Santoso")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, student_id);
        assert!(storage.find_student_by_name_impl("budi").await.unwrap().is_none());

        let linked = storage
            .link_student_to_user_impl(student_id, user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(linked.user_id, Some(user.id));

        let by_user = storage
            .get_student_by_user_id_impl(user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_user.id, student_id);
    }

    #[tokio::test]
    async fn test_class_roster_sorted_by_name() {
        let storage = memory_storage().await;
        let class_id = seed_class(&storage, "X IPA 1").await;
        let other = seed_class(&storage, "X IPA 2").await;
        seed_student(&storage, "Citra", Some(class_id)).await;
        seed_student(&storage, "Andi", Some(class_id)).await;
        seed_student(&storage, "Bayu", Some(other)).await;

        let roster: Vec<String> = storage
            .list_students_by_class_impl(class_id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.nama)
            .collect();
        assert_eq!(roster, vec!["Andi", "Citra"]);
        assert_eq!(storage.list_students_impl().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_avatar_and_last_status() {
        let storage = memory_storage().await;
        let student_id = seed_student(&storage, "Dewi", None).await;
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();

        let updated = storage
            .update_student_avatar_impl(student_id, "1/avatar-x.png")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.avatar_path.as_deref(), Some("1/avatar-x.png"));

        storage
            .update_student_last_status_impl(student_id, AttendanceStatus::Hadir, date)
            .await
            .unwrap();
        let students = storage.list_students_impl().await.unwrap();
        assert_eq!(students[0].last_status.as_deref(), Some("HADIR"));
        assert_eq!(students[0].last_date, Some(date));

        assert!(
            storage
                .update_student_last_status_impl(999, AttendanceStatus::Hadir, date)
                .await
                .is_err()
        );
    }
}
