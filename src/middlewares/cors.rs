use crate::config::CorsConfig;
use actix_cors::Cors;

pub fn create_cors(config: &CorsConfig) -> Cors {
    let cors = match config.allowed_origin.as_deref() {
        Some(origin) if !origin.is_empty() && origin != "*" => Cors::default().allowed_origin(origin),
        // 未配置时放行任意来源 (本地开发)
        _ => Cors::default().allowed_origin_fn(|_, _req_head| true),
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}
