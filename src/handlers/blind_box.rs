use crate::middlewares::current_user_id;
use crate::models::*;
use crate::services::{BlindBoxService, PurchaseService};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/blind-boxes",
    tag = "blind_box",
    request_body = CreateBlindBoxRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "创建盲盒成功", body = BlindBoxResponse),
        (status = 400, description = "请求参数错误 / 概率超过 100%"),
        (status = 401, description = "未授权")
    )
)]
pub async fn create_blind_box(
    blind_box_service: web::Data<BlindBoxService>,
    req: HttpRequest,
    request: web::Json<CreateBlindBoxRequest>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match blind_box_service
        .create_blind_box(user_id, request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response,
            "message": "Blind box created"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/blind-boxes",
    tag = "blind_box",
    responses(
        (status = 200, description = "获取上架盲盒列表成功", body = [BlindBoxResponse])
    )
)]
pub async fn list_blind_boxes(
    blind_box_service: web::Data<BlindBoxService>,
) -> Result<HttpResponse> {
    match blind_box_service.list_active().await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/blind-boxes/search",
    tag = "blind_box",
    params(
        ("keyword" = Option<String>, Query, description = "名称或描述关键字"),
        ("min_price" = Option<i64>, Query, description = "最低价格 (分)"),
        ("max_price" = Option<i64>, Query, description = "最高价格 (分)"),
        ("rarity" = Option<String>, Query, description = "包含该稀有度物品"),
        ("sort" = Option<String>, Query, description = "newest / price_asc / price_desc"),
        ("page" = Option<u64>, Query, description = "页码"),
        ("limit" = Option<u64>, Query, description = "每页数量")
    ),
    responses(
        (status = 200, description = "搜索成功"),
        (status = 400, description = "请求参数错误")
    )
)]
pub async fn search_blind_boxes(
    blind_box_service: web::Data<BlindBoxService>,
    query: web::Query<BlindBoxSearchQuery>,
) -> Result<HttpResponse> {
    match blind_box_service.search(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/blind-boxes/{id}",
    tag = "blind_box",
    params(
        ("id" = i64, Path, description = "盲盒ID")
    ),
    responses(
        (status = 200, description = "获取盲盒详情成功", body = BlindBoxResponse),
        (status = 404, description = "盲盒不存在")
    )
)]
pub async fn get_blind_box(
    blind_box_service: web::Data<BlindBoxService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match blind_box_service.get_blind_box(path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/blind-boxes/{id}",
    tag = "blind_box",
    params(
        ("id" = i64, Path, description = "盲盒ID")
    ),
    request_body = UpdateBlindBoxRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新盲盒成功", body = BlindBoxResponse),
        (status = 400, description = "请求参数错误"),
        (status = 403, description = "非创建者"),
        (status = 404, description = "盲盒不存在")
    )
)]
pub async fn update_blind_box(
    blind_box_service: web::Data<BlindBoxService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateBlindBoxRequest>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match blind_box_service
        .update_blind_box(user_id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/blind-boxes/{id}",
    tag = "blind_box",
    params(
        ("id" = i64, Path, description = "盲盒ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "删除盲盒成功"),
        (status = 400, description = "已有订单的盲盒不可删除"),
        (status = 403, description = "非创建者"),
        (status = 404, description = "盲盒不存在")
    )
)]
pub async fn delete_blind_box(
    blind_box_service: web::Data<BlindBoxService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match blind_box_service
        .delete_blind_box(user_id, path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Blind box deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/blind-boxes/{id}/items",
    tag = "blind_box",
    params(
        ("id" = i64, Path, description = "盲盒ID")
    ),
    responses(
        (status = 200, description = "获取物品列表成功", body = [BoxItemResponse]),
        (status = 404, description = "盲盒不存在")
    )
)]
pub async fn list_items(
    blind_box_service: web::Data<BlindBoxService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match blind_box_service.list_items(path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/blind-boxes/{id}/items",
    tag = "blind_box",
    params(
        ("id" = i64, Path, description = "盲盒ID")
    ),
    request_body = CreateBoxItemRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "新增物品成功", body = BoxItemResponse),
        (status = 400, description = "请求参数错误 / 概率超过 100%"),
        (status = 403, description = "非创建者"),
        (status = 404, description = "盲盒不存在")
    )
)]
pub async fn add_item(
    blind_box_service: web::Data<BlindBoxService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<CreateBoxItemRequest>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match blind_box_service
        .add_item(user_id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/blind-boxes/{id}/items/{item_id}",
    tag = "blind_box",
    params(
        ("id" = i64, Path, description = "盲盒ID"),
        ("item_id" = i64, Path, description = "物品ID")
    ),
    request_body = UpdateBoxItemRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新物品成功", body = BoxItemResponse),
        (status = 400, description = "请求参数错误 / 概率超过 100%"),
        (status = 403, description = "非创建者"),
        (status = 404, description = "物品不存在")
    )
)]
pub async fn update_item(
    blind_box_service: web::Data<BlindBoxService>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    request: web::Json<UpdateBoxItemRequest>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };
    let (blind_box_id, item_id) = path.into_inner();

    match blind_box_service
        .update_item(user_id, blind_box_id, item_id, request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/blind-boxes/{id}/items/{item_id}",
    tag = "blind_box",
    params(
        ("id" = i64, Path, description = "盲盒ID"),
        ("item_id" = i64, Path, description = "物品ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "删除物品成功"),
        (status = 400, description = "物品已被用户持有"),
        (status = 403, description = "非创建者"),
        (status = 404, description = "物品不存在")
    )
)]
pub async fn delete_item(
    blind_box_service: web::Data<BlindBoxService>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };
    let (blind_box_id, item_id) = path.into_inner();

    match blind_box_service
        .delete_item(user_id, blind_box_id, item_id)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Item deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 购买盲盒
///
/// 前置条件不满足 (库存、余额、盲盒状态等) 一律返回 400，
/// 未登录返回 401。
#[utoipa::path(
    post,
    path = "/blind-boxes/{id}/purchase",
    tag = "blind_box",
    params(
        ("id" = i64, Path, description = "盲盒ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "购买成功", body = PurchaseResponse),
        (status = 400, description = "库存不足 / 余额不足 / 盲盒不可购买"),
        (status = 401, description = "未授权")
    )
)]
pub async fn purchase_blind_box(
    purchase_service: web::Data<PurchaseService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match purchase_service.purchase(user_id, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response,
            "message": "Purchase successful"
        }))),
        Err(e) if e.is_domain() => Ok(e.response_with_status(StatusCode::BAD_REQUEST)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/my/blind-boxes",
    tag = "blind_box",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取我创建的盲盒成功", body = [BlindBoxResponse]),
        (status = 401, description = "未授权")
    )
)]
pub async fn my_blind_boxes(
    blind_box_service: web::Data<BlindBoxService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match blind_box_service.list_by_creator(user_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn blind_box_config(cfg: &mut web::ServiceConfig) {
    // /search 需在 /{id} 之前注册
    cfg.service(
        web::scope("/blind-boxes")
            .route("", web::get().to(list_blind_boxes))
            .route("", web::post().to(create_blind_box))
            .route("/search", web::get().to(search_blind_boxes))
            .route("/{id}", web::get().to(get_blind_box))
            .route("/{id}", web::put().to(update_blind_box))
            .route("/{id}", web::delete().to(delete_blind_box))
            .route("/{id}/items", web::get().to(list_items))
            .route("/{id}/items", web::post().to(add_item))
            .route("/{id}/items/{item_id}", web::put().to(update_item))
            .route("/{id}/items/{item_id}", web::delete().to(delete_item))
            .route("/{id}/purchase", web::post().to(purchase_blind_box)),
    )
    .route("/my/blind-boxes", web::get().to(my_blind_boxes));
}
