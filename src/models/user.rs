use crate::entities::user_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// identifier 含 `@` 时按邮箱登录，否则按用户名
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// 余额 (分)
    pub balance: i64,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<user_entity::Model> for UserResponse {
    fn from(m: user_entity::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            email: m.email,
            balance: m.balance,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UserStatistics {
    pub boxes_created: u64,
    pub distinct_items_owned: u64,
    pub total_items_owned: i64,
    pub total_spent: i64,
    pub total_earned: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BalanceAction {
    Add,
    Deduct,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BalanceRequest {
    /// 金额 (分)
    pub amount: i64,
    pub action: BalanceAction,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BalanceResponse {
    pub balance: i64,
}
