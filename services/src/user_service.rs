use crate::error::{add_field_error, into_result, ServiceError, ServiceResult};
use db::models::{
    ticket_comments, tickets,
    user::{self, Model as User},
};
use sea_orm::{
    sea_query::Expr, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QuerySelect, TransactionTrait,
};
use std::collections::HashMap;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, Default, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 150, message = "Username must be between 1 and 150 characters"))]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub admin: bool,
}

pub struct UserService;

impl UserService {
    pub async fn create_user(db: &DatabaseConnection, input: CreateUser) -> ServiceResult<User> {
        let username = input.username.trim().to_owned();
        let email = input.email.trim().to_owned();
        let input = CreateUser {
            username,
            email,
            ..input
        };

        let mut errors = input.validate().err().unwrap_or_else(ValidationErrors::new);
        if !input.username.is_empty() && User::find_by_username(db, &input.username).await?.is_some() {
            add_field_error(
                &mut errors,
                "username",
                "unique",
                "A user with that username already exists.",
            );
        }
        into_result(errors)?;

        let user = User::create(db, &input.username, &input.email, &input.password, input.admin).await?;
        tracing::info!(user_id = user.id, username = %user.username, admin = user.admin, "User created");
        Ok(user)
    }

    /// Removes a user with everything that hangs off them: tickets they created
    /// (with those tickets' comments) and their own comments. Tickets merely
    /// assigned to them lose the assignee.
    pub async fn delete_user(db: &DatabaseConnection, id: i64) -> ServiceResult<()> {
        let txn = db.begin().await?;

        if user::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Err(ServiceError::NotFound("User"));
        }

        let owned: Vec<i64> = tickets::Entity::find()
            .select_only()
            .column(tickets::Column::Id)
            .filter(tickets::Column::CreatedById.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;

        let comments = ticket_comments::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(ticket_comments::Column::AuthorId.eq(id))
                    .add(ticket_comments::Column::TicketId.is_in(owned.iter().copied())),
            )
            .exec(&txn)
            .await?;
        let removed = tickets::Entity::delete_many()
            .filter(tickets::Column::CreatedById.eq(id))
            .exec(&txn)
            .await?;
        let unassigned = tickets::Entity::update_many()
            .col_expr(tickets::Column::AssignedToId, Expr::value(Option::<i64>::None))
            .filter(tickets::Column::AssignedToId.eq(id))
            .exec(&txn)
            .await?;
        user::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            user_id = id,
            tickets_removed = removed.rows_affected,
            tickets_unassigned = unassigned.rows_affected,
            comments_removed = comments.rows_affected,
            "User deleted"
        );
        Ok(())
    }

    /// The user for a username/password pair, if the password matches.
    pub async fn verify_credentials(
        db: &DatabaseConnection,
        username: &str,
        password: &str,
    ) -> ServiceResult<Option<User>> {
        let user = User::find_by_username(db, username.trim()).await?;
        Ok(user.filter(|u| u.verify_password(password)))
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> ServiceResult<Option<User>> {
        Ok(user::Entity::find_by_id(id).one(db).await?)
    }

    /// Every user, by username.
    pub async fn assignable_users(db: &DatabaseConnection) -> ServiceResult<Vec<User>> {
        Ok(User::all_by_username(db).await?)
    }

    /// Usernames for the given ids. Unknown ids are skipped.
    pub async fn usernames(
        db: &DatabaseConnection,
        ids: impl IntoIterator<Item = i64>,
    ) -> ServiceResult<HashMap<i64, String>> {
        let mut ids: Vec<i64> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, String)> = user::Entity::find()
            .select_only()
            .column(user::Column::Id)
            .column(user::Column::Username)
            .filter(user::Column::Id.is_in(ids))
            .into_tuple()
            .all(db)
            .await?;

        Ok(rows.into_iter().collect())
    }
}
