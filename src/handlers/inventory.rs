use crate::middlewares::current_user_id;
use crate::models::*;
use crate::services::InventoryService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/inventory",
    tag = "inventory",
    params(
        ("rarity" = Option<String>, Query, description = "稀有度过滤: common / rare / epic / legendary"),
        ("sort" = Option<String>, Query, description = "newest / oldest / rarity"),
        ("page" = Option<u64>, Query, description = "页码"),
        ("limit" = Option<u64>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取库存成功"),
        (status = 400, description = "稀有度参数无效"),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_inventory(
    inventory_service: web::Data<InventoryService>,
    req: HttpRequest,
    query: web::Query<InventoryQuery>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match inventory_service.list_inventory(user_id, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn inventory_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/inventory").route("", web::get().to(get_inventory)));
}
