use actix_cors::Cors;
use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use std::time::Duration;
use tracing::{debug, warn};
use tracing_appender::non_blocking::WorkerGuard;

use klas_backend::config::AppConfig;
use klas_backend::routes;
use klas_backend::runtime::lifetime;
use klas_backend::utils::{json_error_handler, query_error_handler};

/// 初始化日志，开发环境输出文件和行号，其他环境输出 JSON
///
/// 返回的 guard 需要持有到进程结束，否则缓冲中的日志会丢失。
fn init_tracing(config: &AppConfig) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.app.log_level))
        .with_writer(writer)
        .event_format(
            tracing_subscriber::fmt::format()
                .with_level(true)
                .with_ansi(true),
        );

    if config.is_development() {
        builder.with_file(true).with_line_number(true).init();
    } else {
        builder.json().init();
    }

    guard
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    let started_at = chrono::Utc::now();

    setup_panic!();
    AppConfig::init().expect("Failed to initialize configuration");
    let config = AppConfig::get();
    let _log_guard = init_tracing(config);

    warn!(
        "Starting {} v{} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.app.environment
    );

    let startup = lifetime::startup::prepare_server_startup().await;
    let storage = startup.storage;
    let cache = startup.cache;
    let object_store = startup.object_store;

    debug!(
        "Pre-startup processing completed in {} ms",
        (chrono::Utc::now() - started_at).num_milliseconds()
    );
    warn!("Using {} worker(s) for the server", config.server.workers);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(config.cors.max_age),
            )
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Connection", "keep-alive"))
                    .add((
                        "Keep-Alive",
                        format!("timeout={}, max=1000", config.server.timeouts.keep_alive),
                    ))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PayloadConfig::new(config.server.limits.max_payload_size))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::Data::new(object_store.clone()))
            .configure(routes::configure_schedule_routes) // 课表与值日表
            .configure(routes::configure_auth_routes) // 邮箱验证码登录
            .configure(routes::configure_attendance_routes) // 学生签到
            .configure(routes::configure_student_routes) // 学生头像
            .configure(routes::configure_teacher_routes) // 教师端
            .configure(routes::configure_admin_routes) // 管理后台
            .configure(routes::configure_file_routes) // 签名文件访问
    })
    .keep_alive(Duration::from_secs(config.server.timeouts.keep_alive))
    .client_request_timeout(Duration::from_millis(config.server.timeouts.client_request))
    .client_disconnect_timeout(Duration::from_millis(
        config.server.timeouts.client_disconnect,
    ))
    .workers(config.server.workers);

    #[cfg(unix)]
    let server = match config.unix_socket_path() {
        Some(socket_path) => {
            warn!("Starting server on Unix socket: {}", socket_path);
            if std::path::Path::new(socket_path).exists() {
                std::fs::remove_file(socket_path)?;
            }
            server.bind_uds(socket_path)?
        }
        None => {
            let bind_address = config.server_bind_address();
            warn!("Starting server at http://{}", bind_address);
            server.bind(bind_address)?
        }
    };

    #[cfg(not(unix))]
    let server = {
        let bind_address = config.server_bind_address();
        warn!("Starting server at http://{}", bind_address);
        server.bind(bind_address)?
    };

    tokio::select! {
        res = server.run() => res?,
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
