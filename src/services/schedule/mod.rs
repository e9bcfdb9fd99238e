pub mod today;
pub mod weekly;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header::CONTENT_TYPE};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::schedule::{DayQuery, OngoingQuery};
use crate::storage::Storage;
use crate::utils::SchoolClock;

pub struct ScheduleService {
    storage: Option<Arc<dyn Storage>>,
}

impl ScheduleService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => crate::services::app_storage(request),
        }
    }

    pub(crate) fn clock(&self) -> SchoolClock {
        SchoolClock::from_config()
    }

    // 服务横幅
    pub async fn index(&self) -> ActixResult<HttpResponse> {
        let config = AppConfig::get();
        Ok(HttpResponse::Ok()
            .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
            .body(format!("{} backend is running", config.app.system_name)))
    }

    // 周课表
    pub async fn weekly_schedule(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        weekly::handle_weekly_schedule(self, request).await
    }

    // 周值日表
    pub async fn weekly_duty(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        weekly::handle_weekly_duty(self, request).await
    }

    pub async fn today_schedule(
        &self,
        request: &HttpRequest,
        query: DayQuery,
    ) -> ActixResult<HttpResponse> {
        today::handle_today_schedule(self, request, query).await
    }

    pub async fn ongoing(
        &self,
        request: &HttpRequest,
        query: OngoingQuery,
    ) -> ActixResult<HttpResponse> {
        today::handle_ongoing(self, request, query).await
    }

    pub async fn today_duty(
        &self,
        request: &HttpRequest,
        query: DayQuery,
    ) -> ActixResult<HttpResponse> {
        today::handle_today_duty(self, request, query).await
    }
}
