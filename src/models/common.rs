use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 错误响应中的 `error` 字段
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// 用户简要信息 (作者 / 创建者)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
}

impl From<crate::entities::user_entity::Model> for UserSummary {
    fn from(m: crate::entities::user_entity::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
        }
    }
}
