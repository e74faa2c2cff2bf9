use crate::entities::{
    box_item_entity as items, comment_entity as comments, inventory_entity as inventory,
    show_entity as shows, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::validate_length;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;

#[derive(Clone)]
pub struct ShowService {
    pool: DatabaseConnection,
}

impl ShowService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 发布晒单，只能展示自己库存中的物品
    pub async fn create_show(
        &self,
        user_id: i64,
        request: CreateShowRequest,
    ) -> AppResult<ShowResponse> {
        validate_length("Title", &request.title, 2, 100)?;
        validate_length("Content", &request.content, 10, 2000)?;

        let owned = inventory::Entity::find_by_id(request.inventory_id)
            .filter(inventory::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?;
        if owned.is_none() {
            return Err(AppError::ValidationError(
                "You can only show items from your own inventory".to_string(),
            ));
        }

        let show = shows::ActiveModel {
            title: Set(request.title.trim().to_string()),
            content: Set(request.content.trim().to_string()),
            image_url: Set(request.image_url.filter(|u| !u.trim().is_empty())),
            user_id: Set(user_id),
            inventory_id: Set(request.inventory_id),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Show {} created by user {}", show.id, user_id);
        self.hydrate(vec![show])
            .await?
            .pop()
            .ok_or_else(|| AppError::InternalError("Show lookup failed".to_string()))
    }

    pub async fn list_shows(
        &self,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<ShowResponse>> {
        let total = shows::Entity::find().count(&self.pool).await?;
        let list = shows::Entity::find()
            .order_by_desc(shows::Column::CreatedAt)
            .order_by_desc(shows::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            self.hydrate(list).await?,
            params,
            total,
        ))
    }

    pub async fn get_show(&self, show_id: i64) -> AppResult<ShowDetailResponse> {
        let show = self.find_show(show_id).await?;
        let show = self
            .hydrate(vec![show])
            .await?
            .pop()
            .ok_or_else(|| AppError::InternalError("Show lookup failed".to_string()))?;

        let list = comments::Entity::find()
            .filter(comments::Column::ShowId.eq(show_id))
            .order_by_desc(comments::Column::CreatedAt)
            .order_by_desc(comments::Column::Id)
            .all(&self.pool)
            .await?;

        Ok(ShowDetailResponse {
            show,
            comments: self.comments_with_authors(list).await?,
        })
    }

    /// 删除晒单及其评论，仅限作者
    pub async fn delete_show(&self, user_id: i64, show_id: i64) -> AppResult<()> {
        let show = self.find_show(show_id).await?;
        if show.user_id != user_id {
            return Err(AppError::Forbidden(
                "Only the author can delete this show".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;
        comments::Entity::delete_many()
            .filter(comments::Column::ShowId.eq(show_id))
            .exec(&txn)
            .await?;
        shows::Entity::delete_by_id(show_id).exec(&txn).await?;
        txn.commit().await?;

        log::info!("Show {show_id} deleted by user {user_id}");
        Ok(())
    }

    pub async fn create_comment(
        &self,
        user_id: i64,
        show_id: i64,
        request: CreateCommentRequest,
    ) -> AppResult<CommentResponse> {
        validate_length("Comment", &request.content, 1, 500)?;
        self.find_show(show_id).await?;

        let comment = comments::ActiveModel {
            content: Set(request.content.trim().to_string()),
            user_id: Set(user_id),
            show_id: Set(show_id),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.comments_with_authors(vec![comment])
            .await?
            .pop()
            .ok_or_else(|| AppError::InternalError("Comment lookup failed".to_string()))
    }

    pub async fn list_comments(
        &self,
        show_id: i64,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<CommentResponse>> {
        self.find_show(show_id).await?;

        let base_query = comments::Entity::find().filter(comments::Column::ShowId.eq(show_id));
        let total = base_query.clone().count(&self.pool).await?;
        let list = base_query
            .order_by_desc(comments::Column::CreatedAt)
            .order_by_desc(comments::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            self.comments_with_authors(list).await?,
            params,
            total,
        ))
    }

    async fn find_show(&self, show_id: i64) -> AppResult<shows::Model> {
        shows::Entity::find_by_id(show_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Show not found".to_string()))
    }

    async fn authors(&self, ids: Vec<i64>) -> AppResult<HashMap<i64, UserSummary>> {
        Ok(users::Entity::find()
            .filter(users::Column::Id.is_in(ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect())
    }

    async fn hydrate(&self, list: Vec<shows::Model>) -> AppResult<Vec<ShowResponse>> {
        if list.is_empty() {
            return Ok(Vec::new());
        }
        let authors = self.authors(list.iter().map(|s| s.user_id).collect()).await?;

        let inventory_ids: Vec<i64> = list.iter().map(|s| s.inventory_id).collect();
        let shown: HashMap<i64, BoxItemResponse> = inventory::Entity::find()
            .filter(inventory::Column::Id.is_in(inventory_ids))
            .find_also_related(items::Entity)
            .all(&self.pool)
            .await?
            .into_iter()
            .filter_map(|(entry, item)| item.map(|item| (entry.id, item.into())))
            .collect();

        Ok(list
            .into_iter()
            .map(|s| {
                let author = authors.get(&s.user_id).cloned();
                let item = shown.get(&s.inventory_id).cloned();
                ShowResponse::new(s, author, item)
            })
            .collect())
    }

    async fn comments_with_authors(
        &self,
        list: Vec<comments::Model>,
    ) -> AppResult<Vec<CommentResponse>> {
        if list.is_empty() {
            return Ok(Vec::new());
        }
        let authors = self.authors(list.iter().map(|c| c.user_id).collect()).await?;
        Ok(list
            .into_iter()
            .map(|c| {
                let author = authors.get(&c.user_id).cloned();
                CommentResponse::new(c, author)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::PurchaseService;
    use crate::test_utils::{create_test_box, create_test_user, setup_test_db};

    struct Fixture {
        db: DatabaseConnection,
        author: users::Model,
        other: users::Model,
        inventory_id: i64,
    }

    async fn fixture() -> Fixture {
        let db = setup_test_db().await.unwrap();
        let author = create_test_user(&db, "author", 1_000).await.unwrap();
        let other = create_test_user(&db, "other", 0).await.unwrap();
        let (blind_box, _) = create_test_box(&db, other.id, 10, 5, &[10_000])
            .await
            .unwrap();
        let bought = PurchaseService::new(db.clone())
            .purchase(author.id, blind_box.id)
            .await
            .unwrap();
        Fixture {
            db,
            author,
            other,
            inventory_id: bought.inventory.id,
        }
    }

    fn show_request(inventory_id: i64) -> CreateShowRequest {
        CreateShowRequest {
            title: "Look what I got".to_string(),
            content: "Pulled this one on my first try!".to_string(),
            image_url: None,
            inventory_id,
        }
    }

    #[tokio::test]
    async fn show_lifecycle_with_comments() {
        let f = fixture().await;
        let svc = ShowService::new(f.db.clone());

        let show = svc
            .create_show(f.author.id, show_request(f.inventory_id))
            .await
            .unwrap();
        assert_eq!(show.author.as_ref().unwrap().username, "author");
        assert_eq!(show.item.as_ref().unwrap().name, "Item 0");

        svc.create_comment(
            f.other.id,
            show.id,
            CreateCommentRequest {
                content: "Nice!".to_string(),
            },
        )
        .await
        .unwrap();

        let detail = svc.get_show(show.id).await.unwrap();
        assert_eq!(detail.comments.len(), 1);
        assert_eq!(detail.comments[0].author.as_ref().unwrap().username, "other");

        let page = svc
            .list_comments(show.id, &PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 1);

        let err = svc.delete_show(f.other.id, show.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        svc.delete_show(f.author.id, show.id).await.unwrap();
        let err = svc.get_show(show.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(comments::Entity::find().count(&f.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn cannot_show_someone_elses_item() {
        let f = fixture().await;
        let svc = ShowService::new(f.db.clone());

        let err = svc
            .create_show(f.other.id, show_request(f.inventory_id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn text_lengths_are_validated() {
        let f = fixture().await;
        let svc = ShowService::new(f.db.clone());

        let mut short = show_request(f.inventory_id);
        short.content = "too short".to_string();
        let err = svc.create_show(f.author.id, short).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let show = svc
            .create_show(f.author.id, show_request(f.inventory_id))
            .await
            .unwrap();
        let err = svc
            .create_comment(
                f.author.id,
                show.id,
                CreateCommentRequest {
                    content: "x".repeat(501),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = svc
            .create_comment(
                f.author.id,
                9999,
                CreateCommentRequest {
                    content: "hello".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn shows_are_listed_newest_first() {
        let f = fixture().await;
        let svc = ShowService::new(f.db.clone());

        let first = svc
            .create_show(f.author.id, show_request(f.inventory_id))
            .await
            .unwrap();
        let second = svc
            .create_show(f.author.id, show_request(f.inventory_id))
            .await
            .unwrap();

        let page = svc.list_shows(&PaginationParams::default()).await.unwrap();
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.items[0].id, second.id);
        assert_eq!(page.items[1].id, first.id);
    }

    #[tokio::test]
    async fn page_far_beyond_the_end_is_empty() {
        let f = fixture().await;
        let svc = ShowService::new(f.db.clone());
        svc.create_show(f.author.id, show_request(f.inventory_id))
            .await
            .unwrap();

        let page = svc
            .list_shows(&PaginationParams::new(Some(1 << 60), Some(100)))
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total, 1);
    }
}
