use crate::models::ApiError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Insufficient stock")]
    InsufficientStock,

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Password hash error: {0}")]
    PasswordHashError(#[from] bcrypt::BcryptError),
}

impl AppError {
    /// 业务错误 (前置条件不满足)，区别于基础设施错误
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            AppError::ValidationError(_)
                | AppError::NotFound(_)
                | AppError::Forbidden(_)
                | AppError::InvalidState(_)
                | AppError::InsufficientStock
                | AppError::InsufficientFunds
        )
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::AuthError(_) | AppError::JwtError(_) => "AUTH_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::InsufficientStock => "INSUFFICIENT_STOCK",
            AppError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            AppError::ConfigError(_)
            | AppError::InternalError(_)
            | AppError::PasswordHashError(_) => "INTERNAL_ERROR",
        }
    }

    /// 对外暴露的错误信息, 基础设施错误不泄露细节
    pub fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg)
            | AppError::AuthError(msg)
            | AppError::NotFound(msg)
            | AppError::Forbidden(msg)
            | AppError::InvalidState(msg) => msg.clone(),
            AppError::InsufficientStock => "Blind box is out of stock".to_string(),
            AppError::InsufficientFunds => "Insufficient balance".to_string(),
            AppError::JwtError(_) => "Invalid or expired token".to_string(),
            AppError::DatabaseError(_) => "Database error".to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    /// 以指定状态码输出统一错误结构
    pub fn response_with_status(&self, status: StatusCode) -> HttpResponse {
        let message = self.public_message();
        HttpResponse::build(status).json(json!({
            "success": false,
            "message": message,
            "error": ApiError {
                code: self.code().to_string(),
                message,
            }
        }))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidState(_)
            | AppError::InsufficientStock
            | AppError::InsufficientFunds => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) | AppError::JwtError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::ValidationError(msg) => log::warn!("Validation error: {msg}"),
            AppError::AuthError(msg) => log::warn!("Authentication error: {msg}"),
            AppError::JwtError(err) => log::warn!("JWT error: {err}"),
            AppError::Forbidden(msg) => log::warn!("Forbidden access: {msg}"),
            AppError::InvalidState(msg) => log::warn!("Invalid state: {msg}"),
            AppError::InsufficientStock | AppError::InsufficientFunds | AppError::NotFound(_) => {}
            AppError::DatabaseError(err) => log::error!("Database error: {err}"),
            _ => log::error!("Internal error: {self}"),
        }
        self.response_with_status(self.status_code())
    }
}
