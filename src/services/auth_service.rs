use crate::config::ShopConfig;
use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{
    JwtService, hash_password, validate_email, validate_password, validate_username,
    verify_password,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
    initial_balance: i64,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService, shop: &ShopConfig) -> Self {
        Self {
            pool,
            jwt_service,
            initial_balance: shop.initial_balance,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        let username = request.username.trim().to_string();
        let email = request.email.trim().to_lowercase();

        validate_username(&username)?;
        validate_email(&email)?;
        validate_password(&request.password)?;

        let username_taken = users::Entity::find()
            .filter(users::Column::Username.eq(username.as_str()))
            .count(&self.pool)
            .await?
            > 0;
        if username_taken {
            return Err(AppError::ValidationError(
                "Username already exists".to_string(),
            ));
        }

        let email_taken = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .count(&self.pool)
            .await?
            > 0;
        if email_taken {
            return Err(AppError::ValidationError(
                "Email already registered".to_string(),
            ));
        }

        let password_hash = hash_password(&request.password)?;
        let now = Utc::now();
        let user = users::ActiveModel {
            username: Set(username),
            email: Set(email),
            password_hash: Set(password_hash),
            balance: Set(self.initial_balance),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("User registered: id={} username={}", user.id, user.username);
        self.issue_tokens(user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let identifier = request.identifier.trim();
        let query = if identifier.contains('@') {
            users::Entity::find().filter(users::Column::Email.eq(identifier.to_lowercase()))
        } else {
            users::Entity::find().filter(users::Column::Username.eq(identifier))
        };

        let user = query
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid username or password".to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            log::warn!("Failed login attempt for user {}", user.id);
            return Err(AppError::AuthError(
                "Invalid username or password".to_string(),
            ));
        }

        log::info!("User logged in: id={}", user.id);
        self.issue_tokens(user)
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<TokenResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user_id = claims.user_id()?;

        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;

        Ok(TokenResponse {
            access_token: self
                .jwt_service
                .generate_access_token(user.id, &user.username)?,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }

    fn issue_tokens(&self, user: users::Model) -> AppResult<AuthResponse> {
        let access_token = self
            .jwt_service
            .generate_access_token(user.id, &user.username)?;
        let refresh_token = self
            .jwt_service
            .generate_refresh_token(user.id, &user.username)?;

        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    async fn service() -> AuthService {
        let db = setup_test_db().await.unwrap();
        AuthService::new(
            db,
            JwtService::new("test-secret", 3600, 7200),
            &ShopConfig::default(),
        )
    }

    fn register_request(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "secret123".to_string(),
        }
    }

    #[tokio::test]
    async fn register_grants_initial_balance_and_tokens() {
        let svc = service().await;
        let resp = svc
            .register(register_request("alice", "Alice@Example.com"))
            .await
            .unwrap();
        assert_eq!(resp.user.balance, 1_000_000);
        assert_eq!(resp.user.email, "alice@example.com");
        assert!(!resp.access_token.is_empty());
        assert!(!resp.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn duplicate_username_or_email_is_rejected() {
        let svc = service().await;
        svc.register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        let err = svc
            .register(register_request("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = svc
            .register(register_request("bob", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn login_by_username_or_email() {
        let svc = service().await;
        svc.register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        for identifier in ["alice", "alice@example.com"] {
            let resp = svc
                .login(LoginRequest {
                    identifier: identifier.to_string(),
                    password: "secret123".to_string(),
                })
                .await
                .unwrap();
            assert_eq!(resp.user.username, "alice");
        }

        let err = svc
            .login(LoginRequest {
                identifier: "alice".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthError(_)));
    }

    #[tokio::test]
    async fn refresh_issues_new_access_token() {
        let svc = service().await;
        let auth = svc
            .register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        let refreshed = svc.refresh_token(&auth.refresh_token).await.unwrap();
        assert!(!refreshed.access_token.is_empty());
        assert!(svc.refresh_token(&auth.access_token).await.is_err());
    }
}
