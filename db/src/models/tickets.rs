use chrono::{DateTime, Utc};
use sea_orm::DeriveActiveEnum;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub priority: TicketPriority,
    pub status: TicketStatus,

    pub created_by_id: i64,
    pub assigned_to_id: Option<i64>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ticket_priority")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketPriority {
    #[sea_orm(string_value = "LOW")]
    Low,

    #[default]
    #[sea_orm(string_value = "MEDIUM")]
    Medium,

    #[sea_orm(string_value = "HIGH")]
    High,

    #[sea_orm(string_value = "CRITICAL")]
    Critical,
}

impl TicketPriority {
    pub fn label(&self) -> &'static str {
        match self {
            TicketPriority::Low => "Low",
            TicketPriority::Medium => "Medium",
            TicketPriority::High => "High",
            TicketPriority::Critical => "Critical",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ticket_status")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    #[default]
    #[sea_orm(string_value = "OPEN")]
    Open,

    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,

    #[sea_orm(string_value = "RESOLVED")]
    Resolved,

    #[sea_orm(string_value = "CLOSED")]
    Closed,
}

impl TicketStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Closed => "Closed",
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedById",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    CreatedBy,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AssignedToId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    AssignedTo,

    #[sea_orm(has_many = "super::ticket_comments::Entity")]
    Comments,
}

impl Related<super::ticket_comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// True when `user_id` created the ticket or is its assignee.
    pub fn involves(&self, user_id: i64) -> bool {
        self.created_by_id == user_id || self.assigned_to_id == Some(user_id)
    }

    /// User ids this ticket points at, creator first.
    pub fn user_ids(&self) -> impl Iterator<Item = i64> + use<> {
        std::iter::once(self.created_by_id).chain(self.assigned_to_id)
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.title, self.status)
    }
}
