//! 管理后台通用 CRUD
//!
//! 行数据以 JSON 对象透传，按 `AdminTable` 分发到对应实体。

use super::{SeaOrmStorage, map_write_error};
use crate::errors::{KlasError, Result};
use crate::models::admin::AdminTable;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, ModelTrait, QueryOrder};
use serde_json::Value;

/// 为每张允许的表展开同一段代码，`$m` 绑定为实体模块
macro_rules! dispatch_table {
    ($table:expr, $m:ident => $body:expr) => {
        match $table {
            AdminTable::DutySchedule => {
                use crate::entity::duty_schedule as $m;
                $body
            }
            AdminTable::Students => {
                use crate::entity::students as $m;
                $body
            }
            AdminTable::Attendances => {
                use crate::entity::attendances as $m;
                $body
            }
            AdminTable::Class => {
                use crate::entity::class as $m;
                $body
            }
            AdminTable::Admin => {
                use crate::entity::admin as $m;
                $body
            }
        }
    };
}

/// 写入前补全服务端维护的字段
fn prepare_insert(table: AdminTable, mut row: Value) -> Result<Value> {
    let Value::Object(ref mut fields) = row else {
        return Err(KlasError::validation("Row must be a JSON object"));
    };

    if table == AdminTable::Attendances && !fields.contains_key("created_at") {
        fields.insert(
            "created_at".to_string(),
            Value::from(chrono::Utc::now().timestamp()),
        );
    }
    Ok(row)
}

/// 返回补丁是否包含字段
fn patch_has_fields(patch: &Value) -> Result<bool> {
    match patch {
        Value::Object(fields) => Ok(!fields.is_empty()),
        _ => Err(KlasError::validation("Row must be a JSON object")),
    }
}

impl SeaOrmStorage {
    pub async fn admin_list_rows_impl(&self, table: AdminTable) -> Result<Vec<Value>> {
        dispatch_table!(table, m => {
            m::Entity::find()
                .order_by_asc(m::Column::Id)
                .into_json()
                .all(&self.db)
                .await
                .map_err(|e| KlasError::database_operation(format!("查询 {table} 失败: {e}")))
        })
    }

    pub async fn admin_get_row_impl(&self, table: AdminTable, id: i64) -> Result<Option<Value>> {
        dispatch_table!(table, m => {
            m::Entity::find_by_id(id)
                .into_json()
                .one(&self.db)
                .await
                .map_err(|e| KlasError::database_operation(format!("查询 {table} 失败: {e}")))
        })
    }

    pub async fn admin_insert_row_impl(&self, table: AdminTable, row: Value) -> Result<Value> {
        let row = prepare_insert(table, row)?;

        dispatch_table!(table, m => {
            let model = m::ActiveModel::from_json(row)
                .map_err(|e| KlasError::validation(format!("{table} 数据格式错误: {e}")))?;
            let inserted = model
                .insert(&self.db)
                .await
                .map_err(|e| map_write_error(e, &format!("插入 {table} 失败")))?;
            Ok(serde_json::to_value(inserted)?)
        })
    }

    /// 部分更新，行不存在时返回 None
    pub async fn admin_update_row_impl(
        &self,
        table: AdminTable,
        id: i64,
        patch: Value,
    ) -> Result<Option<Value>> {
        let has_fields = patch_has_fields(&patch)?;

        dispatch_table!(table, m => {
            let Some(existing) = m::Entity::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(|e| KlasError::database_operation(format!("查询 {table} 失败: {e}")))?
            else {
                return Ok(None);
            };

            if !has_fields {
                return Ok(Some(serde_json::to_value(existing)?));
            }

            let mut model = existing.into_active_model();
            // 主键不会被 JSON 覆盖
            model
                .set_from_json(patch)
                .map_err(|e| KlasError::validation(format!("{table} 数据格式错误: {e}")))?;

            let updated = model
                .update(&self.db)
                .await
                .map_err(|e| map_write_error(e, &format!("更新 {table} 失败")))?;
            Ok(Some(serde_json::to_value(updated)?))
        })
    }

    /// 删除并返回被删除的行
    pub async fn admin_delete_row_impl(&self, table: AdminTable, id: i64) -> Result<Option<Value>> {
        dispatch_table!(table, m => {
            let Some(existing) = m::Entity::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(|e| KlasError::database_operation(format!("查询 {table} 失败: {e}")))?
            else {
                return Ok(None);
            };

            let snapshot = serde_json::to_value(&existing)?;
            existing
                .delete(&self.db)
                .await
                .map_err(|e| KlasError::database_operation(format!("删除 {table} 失败: {e}")))?;
            Ok(Some(snapshot))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::KlasError;
    use crate::models::admin::AdminTable;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, seed_class};
    use serde_json::json;

    #[tokio::test]
    async fn test_class_crud() {
        let storage = memory_storage().await;

        let created = storage
            .admin_insert_row_impl(AdminTable::Class, json!({"class_name": "XI IPS 3"}))
            .await
            .unwrap();
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["class_name"], "XI IPS 3");

        let rows = storage.admin_list_rows_impl(AdminTable::Class).await.unwrap();
        assert_eq!(rows.len(), 1);

        let updated = storage
            .admin_update_row_impl(AdminTable::Class, id, json!({"class_name": "XI IPS 4"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["class_name"], "XI IPS 4");
        assert_eq!(updated["id"], id);

        let unchanged = storage
            .admin_update_row_impl(AdminTable::Class, id, json!({}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged["class_name"], "XI IPS 4");

        assert!(storage
            .admin_update_row_impl(AdminTable::Class, 999, json!({"class_name": "x"}))
            .await
            .unwrap()
            .is_none());

        let deleted = storage
            .admin_delete_row_impl(AdminTable::Class, id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(deleted["class_name"], "XI IPS 4");
        assert!(storage.admin_get_row_impl(AdminTable::Class, id).await.unwrap().is_none());
        assert!(storage.admin_delete_row_impl(AdminTable::Class, id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_attendance_insert_fills_created_at() {
        let storage = memory_storage().await;
        let class_id = seed_class(&storage, "X IPA 1").await;
        let student = storage
            .admin_insert_row_impl(
                AdminTable::Students,
                json!({"nama": "Eka", "nisn": "0099", "kelas": class_id}),
            )
            .await
            .unwrap();

        let row = storage
            .admin_insert_row_impl(
                AdminTable::Attendances,
                json!({"student_id": student["id"], "date": "2025-03-04", "status": "HADIR"}),
            )
            .await
            .unwrap();
        assert!(row["created_at"].as_i64().unwrap() > 0);
        assert_eq!(row["date"], "2025-03-04");

        let duplicate = storage
            .admin_insert_row_impl(
                AdminTable::Attendances,
                json!({"student_id": student["id"], "date": "2025-03-04", "status": "ALFA"}),
            )
            .await
            .unwrap_err();
        assert!(matches!(duplicate, KlasError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_rejects_non_object_rows() {
        let storage = memory_storage().await;
        assert!(storage
            .admin_insert_row_impl(AdminTable::Class, json!(["x"]))
            .await
            .is_err());
        assert!(storage
            .admin_update_row_impl(AdminTable::Class, 1, json!("x"))
            .await
            .is_err());
    }
}
