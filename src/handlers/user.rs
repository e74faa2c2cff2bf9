use crate::middlewares::current_user_id;
use crate::models::*;
use crate::services::UserService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/user/profile",
    tag = "user",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取用户资料成功", body = UserResponse),
        (status = 401, description = "未授权"),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn get_profile(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match user_service.get_user_profile(user_id).await {
        Ok((user, statistics)) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "user": user,
                "statistics": statistics
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/user/balance",
    tag = "user",
    request_body = BalanceRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "余额变更成功", body = BalanceResponse),
        (status = 400, description = "金额无效或余额不足"),
        (status = 401, description = "未授权")
    )
)]
pub async fn adjust_balance(
    user_service: web::Data<UserService>,
    req: HttpRequest,
    request: web::Json<BalanceRequest>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match user_service
        .adjust_balance(user_id, request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn user_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .route("/profile", web::get().to(get_profile))
            .route("/balance", web::post().to(adjust_balance)),
    );
}
