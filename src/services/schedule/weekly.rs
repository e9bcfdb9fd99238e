use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ScheduleService;
use crate::models::schedule::{DutyEntry, GroupedByDay, SubjectEntry};
use crate::services::storage_failure;

pub async fn handle_weekly_schedule(
    service: &ScheduleService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_subjects().await {
        Ok(rows) => {
            let grouped =
                GroupedByDay::from_rows(rows, |slot| (slot.day.clone(), SubjectEntry::from(slot)));
            Ok(HttpResponse::Ok().json(grouped))
        }
        Err(e) => Ok(storage_failure("Failed to load schedule", e)),
    }
}

pub async fn handle_weekly_duty(
    service: &ScheduleService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_duties().await {
        Ok(rows) => {
            let grouped =
                GroupedByDay::from_rows(rows, |slot| (slot.day.clone(), DutyEntry::from(slot)));
            Ok(HttpResponse::Ok().json(grouped))
        }
        Err(e) => Ok(storage_failure("Failed to load duty schedule", e)),
    }
}
