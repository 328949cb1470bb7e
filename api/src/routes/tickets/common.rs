use db::models::{
    ticket_comments::Model as CommentModel,
    tickets::{Model as TicketModel, TicketPriority, TicketStatus},
    user::Model as UserModel,
};
use sea_orm::{DatabaseConnection, Iterable};
use serde::{Deserialize, Serialize};
use services::{ServiceResult, user_service::UserService};
use std::collections::HashMap;

#[derive(Debug, Serialize, Clone)]
pub struct UserRef {
    pub id: i64,
    pub username: String,
}

impl UserRef {
    fn lookup(id: i64, names: &HashMap<i64, String>) -> Self {
        Self {
            id,
            username: names.get(&id).cloned().unwrap_or_default(),
        }
    }
}

impl From<UserModel> for UserRef {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TicketResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: TicketPriority,
    pub priority_label: &'static str,
    pub status: TicketStatus,
    pub status_label: &'static str,
    pub created_by: UserRef,
    pub assigned_to: Option<UserRef>,
    pub created_at: String,
    pub updated_at: String,
}

impl TicketResponse {
    pub fn new(ticket: TicketModel, names: &HashMap<i64, String>) -> Self {
        Self {
            id: ticket.id,
            priority_label: ticket.priority.label(),
            status_label: ticket.status.label(),
            priority: ticket.priority,
            status: ticket.status,
            created_by: UserRef::lookup(ticket.created_by_id, names),
            assigned_to: ticket.assigned_to_id.map(|id| UserRef::lookup(id, names)),
            created_at: ticket.created_at.to_rfc3339(),
            updated_at: ticket.updated_at.to_rfc3339(),
            title: ticket.title,
            description: ticket.description,
        }
    }
}

/// Builds responses for `tickets`, resolving every referenced username in one query.
pub async fn ticket_responses(
    db: &DatabaseConnection,
    tickets: Vec<TicketModel>,
) -> ServiceResult<Vec<TicketResponse>> {
    let names = UserService::usernames(db, tickets.iter().flat_map(|t| t.user_ids())).await?;
    Ok(tickets
        .into_iter()
        .map(|t| TicketResponse::new(t, &names))
        .collect())
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub author: UserRef,
    pub body: String,
    pub created_at: String,
}

impl CommentResponse {
    pub fn new(comment: CommentModel, names: &HashMap<i64, String>) -> Self {
        Self {
            id: comment.id,
            author: UserRef::lookup(comment.author_id, names),
            body: comment.body,
            created_at: comment.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: &'static str,
}

pub fn priority_choices() -> Vec<Choice> {
    TicketPriority::iter()
        .map(|p| Choice {
            value: p.to_string(),
            label: p.label(),
        })
        .collect()
}

pub fn status_choices() -> Vec<Choice> {
    TicketStatus::iter()
        .map(|s| Choice {
            value: s.to_string(),
            label: s.label(),
        })
        .collect()
}

/// Initial values of the ticket form.
#[derive(Debug, Default, Serialize)]
pub struct TicketFormInitial {
    pub title: String,
    pub description: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub assigned_to: Option<i64>,
}

impl From<&TicketModel> for TicketFormInitial {
    fn from(ticket: &TicketModel) -> Self {
        Self {
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            priority: ticket.priority,
            status: ticket.status,
            assigned_to: ticket.assigned_to_id,
        }
    }
}

/// What a client needs to render the create or edit form.
#[derive(Debug, Serialize)]
pub struct TicketFormResponse {
    pub initial: TicketFormInitial,
    pub priorities: Vec<Choice>,
    pub statuses: Vec<Choice>,
    pub assignees: Vec<UserRef>,
}

impl TicketFormResponse {
    pub async fn load(db: &DatabaseConnection, initial: TicketFormInitial) -> ServiceResult<Self> {
        let assignees = UserService::assignable_users(db)
            .await?
            .into_iter()
            .map(UserRef::from)
            .collect();

        Ok(Self {
            initial,
            priorities: priority_choices(),
            statuses: status_choices(),
            assignees,
        })
    }
}

/// Submitted ticket form. Any creator field a client sends is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct TicketForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub assigned_to: Option<String>,
}
