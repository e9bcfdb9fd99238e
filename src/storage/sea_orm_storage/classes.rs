//! 班级存储操作

use super::SeaOrmStorage;
use crate::entity::class::{Column, Entity as Classes};
use crate::errors::{KlasError, Result};
use crate::models::classes::entities::Class;
use sea_orm::{EntityTrait, QueryOrder};

impl SeaOrmStorage {
    /// 列出全部班级（按名称排序）
    pub async fn list_classes_impl(&self) -> Result<Vec<Class>> {
        let rows = Classes::find()
            .order_by_asc(Column::ClassName)
            .all(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_class()).collect())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }
}
