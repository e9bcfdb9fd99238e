//! 课程表与值日表查询

use super::SeaOrmStorage;
use crate::entity::duty_schedule::{Column as DutyColumn, Entity as DutySchedule};
use crate::entity::subjects_schedule::{Column as SubjectColumn, Entity as SubjectsSchedule};
use crate::errors::{KlasError, Result};
use crate::models::schedule::entities::{DutySlot, SubjectSlot};
use chrono::NaiveTime;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    pub async fn list_subjects_impl(&self) -> Result<Vec<SubjectSlot>> {
        let rows = SubjectsSchedule::find()
            .order_by_asc(SubjectColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询课程表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_subject()).collect())
    }

    pub async fn list_subjects_by_day_impl(&self, day: &str) -> Result<Vec<SubjectSlot>> {
        let rows = SubjectsSchedule::find()
            .filter(SubjectColumn::Day.eq(day))
            .order_by_asc(SubjectColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询课程表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_subject()).collect())
    }

    /// start_time <= time < end_time
    pub async fn list_ongoing_subjects_impl(
        &self,
        day: &str,
        time: NaiveTime,
    ) -> Result<Vec<SubjectSlot>> {
        let rows = SubjectsSchedule::find()
            .filter(SubjectColumn::Day.eq(day))
            .filter(SubjectColumn::StartTime.lte(time))
            .filter(SubjectColumn::EndTime.gt(time))
            .order_by_asc(SubjectColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询当前课程失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_subject()).collect())
    }

    pub async fn list_duties_impl(&self) -> Result<Vec<DutySlot>> {
        let rows = DutySchedule::find()
            .order_by_asc(DutyColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询值日表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_duty()).collect())
    }

    pub async fn list_duties_by_day_impl(&self, day: &str) -> Result<Vec<DutySlot>> {
        let rows = DutySchedule::find()
            .filter(DutyColumn::Day.eq(day))
            .order_by_asc(DutyColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| KlasError::database_operation(format!("查询值日表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_duty()).collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::entity::{duty_schedule, subjects_schedule};
    use crate::storage::sea_orm_storage::test_support::memory_storage;
    use chrono::NaiveTime;
    use sea_orm::{ActiveModelTrait, Set};

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[tokio::test]
    async fn test_ongoing_is_half_open() {
        let storage = memory_storage().await;
        for (day, subject, start, end) in [
            ("Senin", "Matematika", hm(7, 0), hm(8, 30)),
            ("Senin", "Biologi", hm(8, 30), hm(10, 0)),
            ("Selasa", "Sejarah", hm(7, 0), hm(8, 30)),
        ] {
            subjects_schedule::ActiveModel {
                day: Set(day.to_string()),
                subject: Set(subject.to_string()),
                start_time: Set(start),
                end_time: Set(end),
                teacher: Set(None),
                ..Default::default()
            }
            .insert(&storage.db)
            .await
            .unwrap();
        }

        let at_boundary = storage
            .list_ongoing_subjects_impl("Senin", hm(8, 30))
            .await
            .unwrap();
        assert_eq!(at_boundary.len(), 1);
        assert_eq!(at_boundary[0].subject, "Biologi");

        assert!(storage
            .list_ongoing_subjects_impl("Senin", hm(10, 0))
            .await
            .unwrap()
            .is_empty());
        assert_eq!(storage.list_subjects_by_day_impl("Senin").await.unwrap().len(), 2);
        assert_eq!(storage.list_subjects_impl().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_duties_by_day() {
        let storage = memory_storage().await;
        for (day, name) in [("Rabu", "Andi"), ("Kamis", "Bayu"), ("Rabu", "Citra")] {
            duty_schedule::ActiveModel {
                day: Set(day.to_string()),
                student_name: Set(name.to_string()),
                ..Default::default()
            }
            .insert(&storage.db)
            .await
            .unwrap();
        }

        let names: Vec<String> = storage
            .list_duties_by_day_impl("Rabu")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.student_name)
            .collect();
        assert_eq!(names, vec!["Andi", "Citra"]);
        assert_eq!(storage.list_duties_impl().await.unwrap().len(), 3);
    }
}
