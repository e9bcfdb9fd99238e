use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode, web};
use serde_json::Value;
use tracing::{error, info};

use super::AdminService;
use crate::errors::KlasError;
use crate::models::{DataResponse, ErrorCode};
use crate::services::error_response;

// 存储层错误原样以 400 返回
fn store_error(err: KlasError) -> HttpResponse {
    error!("Admin store operation failed: {}", err);
    error_response(StatusCode::BAD_REQUEST, ErrorCode::DatabaseError, err.message())
}

fn parse_id(raw: &str) -> Result<i64, HttpResponse> {
    raw.trim().parse::<i64>().map_err(|_| {
        error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidJson,
            "Invalid id, expected a number",
        )
    })
}

fn parse_body(body: &web::Bytes) -> Result<Value, HttpResponse> {
    serde_json::from_slice(body).map_err(|e| {
        error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidJson,
            format!("Invalid JSON body: {e}"),
        )
    })
}

macro_rules! try_response {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(response) => return Ok(response),
        }
    };
}

pub async fn handle_list(
    service: &AdminService,
    request: &HttpRequest,
    table: &str,
) -> ActixResult<HttpResponse> {
    let table = try_response!(service.authorize(request, table).await);

    match service.get_storage(request).admin_list_rows(table).await {
        Ok(rows) => Ok(HttpResponse::Ok().json(DataResponse::new(rows))),
        Err(e) => Ok(store_error(e)),
    }
}

pub async fn handle_get(
    service: &AdminService,
    request: &HttpRequest,
    table: &str,
    id: &str,
) -> ActixResult<HttpResponse> {
    let table = try_response!(service.authorize(request, table).await);
    let id = try_response!(parse_id(id));

    match service.get_storage(request).admin_get_row(table, id).await {
        Ok(Some(row)) => Ok(HttpResponse::Ok().json(DataResponse::new(row))),
        Ok(None) => Ok(error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            "Row not found",
        )),
        Err(e) => Ok(store_error(e)),
    }
}

pub async fn handle_create(
    service: &AdminService,
    request: &HttpRequest,
    table: &str,
    body: web::Bytes,
) -> ActixResult<HttpResponse> {
    let table = try_response!(service.authorize(request, table).await);
    let row = try_response!(parse_body(&body));

    match service.get_storage(request).admin_insert_row(table, row).await {
        Ok(row) => {
            info!("Admin inserted row into {}", table);
            Ok(HttpResponse::Ok().json(DataResponse::new(vec![row])))
        }
        Err(e) => Ok(store_error(e)),
    }
}

pub async fn handle_update(
    service: &AdminService,
    request: &HttpRequest,
    table: &str,
    id: &str,
    body: web::Bytes,
) -> ActixResult<HttpResponse> {
    let table = try_response!(service.authorize(request, table).await);
    let id = try_response!(parse_id(id));
    let patch = try_response!(parse_body(&body));

    match service
        .get_storage(request)
        .admin_update_row(table, id, patch)
        .await
    {
        Ok(row) => {
            let rows: Vec<Value> = row.into_iter().collect();
            Ok(HttpResponse::Ok().json(DataResponse::new(rows)))
        }
        Err(e) => Ok(store_error(e)),
    }
}

pub async fn handle_delete(
    service: &AdminService,
    request: &HttpRequest,
    table: &str,
    id: &str,
) -> ActixResult<HttpResponse> {
    let table = try_response!(service.authorize(request, table).await);
    let id = try_response!(parse_id(id));

    match service.get_storage(request).admin_delete_row(table, id).await {
        Ok(row) => {
            if row.is_some() {
                info!("Admin deleted row {} from {}", id, table);
            }
            let rows: Vec<Value> = row.into_iter().collect();
            Ok(HttpResponse::Ok().json(DataResponse::new(rows)))
        }
        Err(e) => Ok(store_error(e)),
    }
}
