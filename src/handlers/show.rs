use crate::middlewares::current_user_id;
use crate::models::*;
use crate::services::ShowService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/shows",
    tag = "show",
    request_body = CreateShowRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "发布晒单成功", body = ShowResponse),
        (status = 400, description = "请求参数错误 / 物品不在自己库存中"),
        (status = 401, description = "未授权")
    )
)]
pub async fn create_show(
    show_service: web::Data<ShowService>,
    req: HttpRequest,
    request: web::Json<CreateShowRequest>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match show_service.create_show(user_id, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/shows",
    tag = "show",
    params(
        ("page" = Option<u64>, Query, description = "页码"),
        ("limit" = Option<u64>, Query, description = "每页数量")
    ),
    responses(
        (status = 200, description = "获取晒单列表成功")
    )
)]
pub async fn list_shows(
    show_service: web::Data<ShowService>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match show_service.list_shows(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/shows/{id}",
    tag = "show",
    params(
        ("id" = i64, Path, description = "晒单ID")
    ),
    responses(
        (status = 200, description = "获取晒单详情成功", body = ShowDetailResponse),
        (status = 404, description = "晒单不存在")
    )
)]
pub async fn get_show(
    show_service: web::Data<ShowService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match show_service.get_show(path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/shows/{id}",
    tag = "show",
    params(
        ("id" = i64, Path, description = "晒单ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "删除晒单成功"),
        (status = 403, description = "非发布者"),
        (status = 404, description = "晒单不存在")
    )
)]
pub async fn delete_show(
    show_service: web::Data<ShowService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match show_service.delete_show(user_id, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Show deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/shows/{id}/comments",
    tag = "show",
    params(
        ("id" = i64, Path, description = "晒单ID")
    ),
    request_body = CreateCommentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "评论成功", body = CommentResponse),
        (status = 400, description = "评论内容无效"),
        (status = 404, description = "晒单不存在")
    )
)]
pub async fn create_comment(
    show_service: web::Data<ShowService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match show_service
        .create_comment(user_id, path.into_inner(), request.into_inner())
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
    get,
    path = "/shows/{id}/comments",
    tag = "show",
    params(
        ("id" = i64, Path, description = "晒单ID"),
        ("page" = Option<u64>, Query, description = "页码"),
        ("limit" = Option<u64>, Query, description = "每页数量")
    ),
    responses(
        (status = 200, description = "获取评论成功"),
        (status = 404, description = "晒单不存在")
    )
)]
pub async fn list_comments(
    show_service: web::Data<ShowService>,
    path: web::Path<i64>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match show_service
        .list_comments(path.into_inner(), &query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn show_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/shows")
            .route("", web::get().to(list_shows))
            .route("", web::post().to(create_show))
            .route("/{id}", web::get().to(get_show))
            .route("/{id}", web::delete().to(delete_show))
            .route("/{id}/comments", web::get().to(list_comments))
            .route("/{id}/comments", web::post().to(create_comment)),
    );
}
