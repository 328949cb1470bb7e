use crate::error::{ServiceError, ServiceResult};
use db::models::{
    ticket_comments::Model as Comment,
    tickets,
};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

pub struct CommentService;

impl CommentService {
    /// Adds a comment by `author_id`. Nothing is written if the ticket is gone.
    pub async fn add_comment(
        db: &DatabaseConnection,
        ticket_id: i64,
        body: &str,
        author_id: i64,
    ) -> ServiceResult<Comment> {
        if tickets::Entity::find_by_id(ticket_id).count(db).await? == 0 {
            return Err(ServiceError::NotFound("Ticket"));
        }

        let body = body.trim();
        if body.is_empty() {
            return Err(ServiceError::field("body", "required", "This field is required."));
        }

        let comment = Comment::create(db, ticket_id, author_id, body).await?;
        tracing::info!(ticket_id, comment_id = comment.id, user_id = author_id, "Comment added");
        Ok(comment)
    }

    /// Comments on a ticket, oldest first.
    pub async fn comments_for(db: &DatabaseConnection, ticket_id: i64) -> ServiceResult<Vec<Comment>> {
        Ok(Comment::find_all_for_ticket(db, ticket_id).await?)
    }
}
