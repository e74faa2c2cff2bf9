use crate::middlewares::current_user_id;
use crate::models::*;
use crate::services::OrderService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/orders",
    tag = "order",
    params(
        ("blind_box_id" = Option<i64>, Query, description = "按盲盒过滤"),
        ("page" = Option<u64>, Query, description = "页码"),
        ("limit" = Option<u64>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取订单列表成功"),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_orders(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    query: web::Query<OrderQuery>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service.get_user_orders(user_id, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "order",
    params(
        ("id" = i64, Path, description = "订单ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取订单成功", body = OrderResponse),
        (status = 401, description = "未授权"),
        (status = 404, description = "订单不存在")
    )
)]
pub async fn get_order(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service.get_order(user_id, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::get().to(get_orders))
            .route("/{id}", web::get().to(get_order)),
    );
}
