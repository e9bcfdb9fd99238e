//! 考勤存储操作

use super::{SeaOrmStorage, map_write_error};
use crate::entity::attendances::{ActiveModel, Column, Entity as Attendances};
use crate::entity::{class, students};
use crate::errors::{KlasError, Result};
use crate::models::attendances::{
    entities::{Attendance, AttendanceHistoryFilter, AttendanceStatus, MarkAlfaPlan, NewAttendance},
    responses::{AttendanceHistoryEntry, HistoryClass, HistoryStudent},
};
use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, TransactionTrait,
};
use std::collections::HashMap;

impl SeaOrmStorage {
    /// 获取学生某天的考勤
    pub async fn find_attendance_impl(
        &self,
        student_id: i64,
        date: NaiveDate,
    ) -> Result<Option<Attendance>> {
        let result = Attendances::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Date.eq(date))
            .one(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询考勤失败: {e}")))?;

        Ok(result.map(|m| m.into_attendance()))
    }

    /// 新增考勤，唯一索引冲突返回 Conflict
    pub async fn create_attendance_impl(&self, attendance: NewAttendance) -> Result<Attendance> {
        let model = ActiveModel {
            student_id: Set(attendance.student_id),
            date: Set(attendance.date),
            status: Set(attendance.status.to_string()),
            attachment_path: Set(attendance.attachment_path),
            note: Set(attendance.note),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "创建考勤失败"))?;

        Ok(result.into_attendance())
    }

    /// 获取多名学生某天的考勤
    pub async fn list_attendances_on_impl(
        &self,
        student_ids: &[i64],
        date: NaiveDate,
    ) -> Result<Vec<Attendance>> {
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Attendances::find()
            .filter(Column::StudentId.is_in(student_ids.to_vec()))
            .filter(Column::Date.eq(date))
            .all(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询当日考勤失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_attendance()).collect())
    }

    /// 在事务中批量标记 ALFA
    pub async fn apply_mark_alfa_impl(
        &self,
        student_ids: &[i64],
        date: NaiveDate,
    ) -> Result<MarkAlfaPlan> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| KlasError::database_operation(format!("开启事务失败: {e}")))?;

        let existing: HashMap<i64, String> = Attendances::find()
            .filter(Column::StudentId.is_in(student_ids.to_vec()))
            .filter(Column::Date.eq(date))
            .all(&txn)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询当日考勤失败: {e}")))?
            .into_iter()
            .map(|m| (m.student_id, m.status))
            .collect();

        let plan = MarkAlfaPlan::build(student_ids, &existing);
        if plan.is_noop() {
            // 无需写入，事务随 drop 回滚
            return Ok(plan);
        }

        if !plan.to_update.is_empty() {
            Attendances::update_many()
                .col_expr(Column::Status, Expr::value(AttendanceStatus::ALFA))
                .filter(Column::StudentId.is_in(plan.to_update.clone()))
                .filter(Column::Date.eq(date))
                .exec(&txn)
                .await
                .map_err(|e| KlasError::database_operation(format!("更新考勤状态失败: {e}")))?;
        }

        if !plan.to_insert.is_empty() {
            let now = chrono::Utc::now().timestamp();
            let models = plan.to_insert.iter().map(|&student_id| ActiveModel {
                student_id: Set(student_id),
                date: Set(date),
                status: Set(AttendanceStatus::ALFA.to_string()),
                attachment_path: Set(None),
                note: Set(None),
                created_at: Set(now),
                ..Default::default()
            });

            Attendances::insert_many(models)
                .exec(&txn)
                .await
                .map_err(|e| map_write_error(e, "插入缺勤记录失败"))?;
        }

        txn.commit()
            .await
            .map_err(|e| KlasError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(plan)
    }

    /// 考勤历史
    pub async fn list_attendance_history_impl(
        &self,
        filter: AttendanceHistoryFilter,
    ) -> Result<Vec<AttendanceHistoryEntry>> {
        let mut select = Attendances::find();

        // 班级通过学生档案关联
        if let Some(class_id) = filter.class_id {
            select = select
                .join(
                    JoinType::InnerJoin,
                    crate::entity::attendances::Relation::Student.def(),
                )
                .filter(students::Column::Kelas.eq(class_id));
        }

        if let Some(student_id) = filter.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(from) = filter.from {
            select = select.filter(Column::Date.gte(from));
        }
        if let Some(to) = filter.to {
            select = select.filter(Column::Date.lte(to));
        }

        select = select
            .order_by_desc(Column::Date)
            .order_by_desc(Column::Id);
        if let Some(limit) = filter.limit {
            select = select.limit(limit);
        }

        let rows = select
            .all(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询考勤历史失败: {e}")))?;

        // 批量加载学生与班级
        let mut student_ids: Vec<i64> = rows.iter().map(|r| r.student_id).collect();
        student_ids.sort_unstable();
        student_ids.dedup();

        let student_map: HashMap<i64, students::Model> = if student_ids.is_empty() {
            HashMap::new()
        } else {
            students::Entity::find()
                .filter(students::Column::Id.is_in(student_ids))
                .all(&self.db)
                .await
                .map_err(|e| KlasError::database_operation(format!("查询学生失败: {e}")))?
                .into_iter()
                .map(|s| (s.id, s))
                .collect()
        };

        let mut class_ids: Vec<i64> = student_map.values().filter_map(|s| s.kelas).collect();
        class_ids.sort_unstable();
        class_ids.dedup();

        let class_map: HashMap<i64, String> = if class_ids.is_empty() {
            HashMap::new()
        } else {
            class::Entity::find()
                .filter(class::Column::Id.is_in(class_ids))
                .all(&self.db)
                .await
                .map_err(|e| KlasError::database_operation(format!("查询班级失败: {e}")))?
                .into_iter()
                .map(|c| (c.id, c.class_name))
                .collect()
        };

        let entries = rows
            .into_iter()
            .map(|row| {
                let students = student_map.get(&row.student_id).map(|s| HistoryStudent {
                    nama: s.nama.clone(),
                    nisn: s.nisn.clone(),
                    kelas: s.kelas,
                    class: s
                        .kelas
                        .and_then(|id| class_map.get(&id))
                        .map(|name| HistoryClass {
                            class_name: name.clone(),
                        }),
                });
                AttendanceHistoryEntry {
                    attendance: row.into_attendance(),
                    students,
                    attachment_url: None,
                }
            })
            .collect();

        Ok(entries)
    }
}
