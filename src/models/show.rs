use crate::entities::{comment_entity, show_entity};
use crate::models::{BoxItemResponse, UserSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateShowRequest {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub inventory_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    pub id: i64,
    pub show_id: i64,
    pub content: String,
    pub author: Option<UserSummary>,
    pub created_at: Option<DateTime<Utc>>,
}

impl CommentResponse {
    pub fn new(m: comment_entity::Model, author: Option<UserSummary>) -> Self {
        Self {
            id: m.id,
            show_id: m.show_id,
            content: m.content,
            author,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShowResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub inventory_id: i64,
    pub author: Option<UserSummary>,
    pub item: Option<BoxItemResponse>,
    pub created_at: Option<DateTime<Utc>>,
}

impl ShowResponse {
    pub fn new(
        m: show_entity::Model,
        author: Option<UserSummary>,
        item: Option<BoxItemResponse>,
    ) -> Self {
        Self {
            id: m.id,
            title: m.title,
            content: m.content,
            image_url: m.image_url,
            inventory_id: m.inventory_id,
            author,
            item,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShowDetailResponse {
    #[serde(flatten)]
    pub show: ShowResponse,
    pub comments: Vec<CommentResponse>,
}
