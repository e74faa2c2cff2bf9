use crate::error::{AppError, AppResult};
use crate::utils::JwtService;
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

/// 请求扩展中保存的当前用户
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub i64);

// 公开路径配置
struct PublicPaths {
    exact_paths: Vec<&'static str>,
    prefix_paths: Vec<&'static str>,
    excluded_paths: Vec<&'static str>,
    // 仅 GET 请求公开
    read_only_prefixes: Vec<&'static str>,
}

impl PublicPaths {
    fn new() -> Self {
        Self {
            exact_paths: vec![
                "/",
                "/health",
                "/swagger-ui",
                "/swagger-ui/",
                "/api-docs/openapi.json",
            ],
            prefix_paths: vec!["/swagger-ui/", "/api-docs/", "/api/v1/auth/"],
            // 需要排除的路径（即使在公开前缀下也需要认证）
            excluded_paths: vec!["/api/v1/auth/logout"],
            read_only_prefixes: vec!["/api/v1/blind-boxes", "/api/v1/shows"],
        }
    }

    fn is_public(&self, method: &Method, path: &str) -> bool {
        if self
            .excluded_paths
            .iter()
            .any(|&excluded| path.starts_with(excluded))
        {
            return false;
        }

        if self.exact_paths.contains(&path) {
            return true;
        }

        if self
            .prefix_paths
            .iter()
            .any(|&prefix| path.starts_with(prefix))
        {
            return true;
        }

        *method == Method::GET
            && self
                .read_only_prefixes
                .iter()
                .any(|&prefix| path.starts_with(prefix))
    }
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            public_paths: PublicPaths::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    public_paths: PublicPaths,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // 放行所有 CORS 预检请求
        if req.method() == Method::OPTIONS {
            return Box::pin(self.service.call(req));
        }

        let token = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_owned);

        // 公开 GET 接口携带有效令牌时同样注入用户
        let user = token.as_deref().map(|t| {
            self.jwt_service
                .verify_access_token(t)
                .and_then(|claims| claims.user_id())
        });

        if self.public_paths.is_public(req.method(), req.path()) {
            if let Some(Ok(user_id)) = user {
                req.extensions_mut().insert(CurrentUser(user_id));
            }
            return Box::pin(self.service.call(req));
        }

        match user {
            Some(Ok(user_id)) => {
                req.extensions_mut().insert(CurrentUser(user_id));
                Box::pin(self.service.call(req))
            }
            Some(Err(_)) => {
                let error = AppError::AuthError("Invalid access token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
            None => {
                let error = AppError::AuthError("Missing access token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
        }
    }
}

/// 获取当前用户ID，未认证时返回 AuthError
pub fn current_user_id(req: &HttpRequest) -> AppResult<i64> {
    req.extensions()
        .get::<CurrentUser>()
        .map(|u| u.0)
        .ok_or_else(|| AppError::AuthError("Authentication required".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test as actix_test, web};

    #[test]
    fn public_path_rules() {
        let paths = PublicPaths::new();
        assert!(paths.is_public(&Method::GET, "/"));
        assert!(paths.is_public(&Method::GET, "/health"));
        assert!(paths.is_public(&Method::POST, "/api/v1/auth/login"));
        assert!(!paths.is_public(&Method::POST, "/api/v1/auth/logout"));
        assert!(paths.is_public(&Method::GET, "/api/v1/blind-boxes/3"));
        assert!(!paths.is_public(&Method::POST, "/api/v1/blind-boxes/3/purchase"));
        assert!(paths.is_public(&Method::GET, "/api/v1/shows"));
        assert!(!paths.is_public(&Method::POST, "/api/v1/shows"));
        assert!(!paths.is_public(&Method::GET, "/api/v1/inventory"));
    }

    async fn whoami(req: HttpRequest) -> HttpResponse {
        match current_user_id(&req) {
            Ok(id) => HttpResponse::Ok().body(id.to_string()),
            Err(_) => HttpResponse::Ok().body("anonymous"),
        }
    }

    #[actix_web::test]
    async fn protected_route_requires_valid_token() {
        let jwt = JwtService::new("test-secret", 3600, 7200);
        let app = actix_test::init_service(
            App::new()
                .wrap(AuthMiddleware::new(jwt.clone()))
                .route("/api/v1/inventory", web::get().to(whoami))
                .route("/api/v1/shows", web::get().to(whoami)),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/api/v1/inventory").to_request();
        let err = actix_test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), 401);

        let token = jwt.generate_access_token(7, "alice").unwrap();
        let req = actix_test::TestRequest::get()
            .uri("/api/v1/inventory")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let body = actix_test::call_and_read_body(&app, req).await;
        assert_eq!(body, "7");

        let req = actix_test::TestRequest::get().uri("/api/v1/shows").to_request();
        let body = actix_test::call_and_read_body(&app, req).await;
        assert_eq!(body, "anonymous");
    }
}
