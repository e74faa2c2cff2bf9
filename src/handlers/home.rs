use crate::database::{DbPool, ping};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Result, web};
use chrono::Utc;
use serde_json::json;

/// 服务信息
pub async fn index() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": {
            "name": "Blindbox Backend API",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": Utc::now().to_rfc3339()
        }
    })))
}

/// 健康检查，数据库不可达时返回 503
pub async fn health(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    match ping(&pool).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "status": "ok", "database": "ok" }
        }))),
        Err(e) => {
            log::error!("Health check failed: {e}");
            Ok(HttpResponse::build(StatusCode::SERVICE_UNAVAILABLE).json(json!({
                "success": false,
                "message": "Database unavailable",
                "data": { "status": "degraded", "database": "unreachable" }
            })))
        }
    }
}

pub fn home_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health));
}
