use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{BoxCategory, OrderType, Rarity};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::logout,
        handlers::user::get_profile,
        handlers::user::adjust_balance,
        handlers::blind_box::create_blind_box,
        handlers::blind_box::list_blind_boxes,
        handlers::blind_box::search_blind_boxes,
        handlers::blind_box::get_blind_box,
        handlers::blind_box::update_blind_box,
        handlers::blind_box::delete_blind_box,
        handlers::blind_box::list_items,
        handlers::blind_box::add_item,
        handlers::blind_box::update_item,
        handlers::blind_box::delete_item,
        handlers::blind_box::purchase_blind_box,
        handlers::blind_box::my_blind_boxes,
        handlers::inventory::get_inventory,
        handlers::order::get_orders,
        handlers::order::get_order,
        handlers::show::create_show,
        handlers::show::list_shows,
        handlers::show::get_show,
        handlers::show::delete_show,
        handlers::show::create_comment,
        handlers::show::list_comments,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            UserResponse,
            UserStatistics,
            AuthResponse,
            TokenResponse,
            BalanceAction,
            BalanceRequest,
            BalanceResponse,
            UserSummary,
            BoxCategory,
            Rarity,
            OrderType,
            CreateBlindBoxRequest,
            UpdateBlindBoxRequest,
            CreateBoxItemRequest,
            UpdateBoxItemRequest,
            BlindBoxResponse,
            BoxItemResponse,
            BoxSort,
            PurchaseResponse,
            InventoryEntryResponse,
            InventoryItemResponse,
            InventorySort,
            OrderResponse,
            CreateShowRequest,
            CreateCommentRequest,
            ShowResponse,
            ShowDetailResponse,
            CommentResponse,
            PaginationInfo,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "user", description = "User profile and balance API"),
        (name = "blind_box", description = "Blind box catalog and purchase API"),
        (name = "inventory", description = "Inventory API"),
        (name = "order", description = "Order history API"),
        (name = "show", description = "Player show and comment API"),
    ),
    info(
        title = "Blindbox Backend API",
        version = "1.0.0",
        description = "Blind box shop REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_purchase_route() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/blind-boxes/{id}/purchase"));
        assert!(
            doc.components
                .as_ref()
                .is_some_and(|c| c.security_schemes.contains_key("bearer_auth"))
        );
    }
}
