use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};

use super::ScheduleService;
use crate::models::ErrorCode;
use crate::models::schedule::{
    DayQuery, DutyEntry, OngoingQuery, OngoingResponse, TodayDutyResponse, TodayScheduleEntry,
    TodayScheduleResponse,
    entities::{format_hh_mm, parse_time_override, resolve_day},
};
use crate::services::{error_response, storage_failure};

pub async fn handle_today_schedule(
    service: &ScheduleService,
    request: &HttpRequest,
    query: DayQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let today = resolve_day(query.d.as_deref(), service.clock().weekday());

    match storage.list_subjects_by_day(&today).await {
        Ok(rows) => Ok(HttpResponse::Ok().json(TodayScheduleResponse {
            today,
            schedule: rows.into_iter().map(TodayScheduleEntry::from).collect(),
        })),
        Err(e) => Ok(storage_failure("Failed to load schedule", e)),
    }
}

pub async fn handle_ongoing(
    service: &ScheduleService,
    request: &HttpRequest,
    query: OngoingQuery,
) -> ActixResult<HttpResponse> {
    let clock = service.clock();
    let today = resolve_day(query.d.as_deref(), clock.weekday());

    let time = match query.t.as_deref().filter(|t| !t.is_empty()) {
        Some(raw) => match parse_time_override(raw) {
            Some(time) => time,
            None => {
                return Ok(error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidTime,
                    "Invalid time. Expected H or H:M (00:00 - 23:59)",
                ));
            }
        },
        None => clock.time_of_day(),
    };

    let storage = service.get_storage(request);
    match storage.list_ongoing_subjects(&today, time).await {
        Ok(rows) => Ok(HttpResponse::Ok().json(OngoingResponse {
            today,
            time: format_hh_mm(&time),
            ongoing: rows.into_iter().map(TodayScheduleEntry::from).collect(),
        })),
        Err(e) => Ok(storage_failure("Failed to load ongoing subjects", e)),
    }
}

pub async fn handle_today_duty(
    service: &ScheduleService,
    request: &HttpRequest,
    query: DayQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let today = resolve_day(query.d.as_deref(), service.clock().weekday());

    match storage.list_duties_by_day(&today).await {
        Ok(rows) => Ok(HttpResponse::Ok().json(TodayDutyResponse {
            today,
            duty: rows.into_iter().map(DutyEntry::from).collect(),
        })),
        Err(e) => Ok(storage_failure("Failed to load duty schedule", e)),
    }
}
