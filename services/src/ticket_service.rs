use crate::error::{add_field_error, into_result, ServiceError, ServiceResult};
use chrono::Utc;
use db::{
    filters::TicketFilter,
    models::{
        ticket_comments,
        tickets::{ActiveModel, Entity, Model as Ticket, TicketPriority, TicketStatus},
        user,
    },
    repositories::ticket_repository::TicketRepository,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use std::str::FromStr;
use validator::{Validate, ValidationErrors};

pub const TICKETS_PER_PAGE: u64 = 10;
pub const DASHBOARD_TICKET_LIMIT: u64 = 5;

#[derive(Debug, Clone, Default, Validate)]
pub struct CreateTicket {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub description: String,
    /// Priority token; absent or blank means MEDIUM.
    pub priority: Option<String>,
    /// Status token; absent or blank means OPEN.
    pub status: Option<String>,
    /// User id as submitted; absent or blank means nobody.
    pub assigned_to: Option<String>,
}

/// Partial update. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateTicket {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "This field is required."))]
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    /// User id as submitted; blank clears the assignee.
    pub assigned_to: Option<String>,
}

impl CreateTicket {
    fn trimmed(mut self) -> Self {
        self.title = self.title.trim().to_owned();
        self.description = self.description.trim().to_owned();
        self
    }
}

impl UpdateTicket {
    fn trimmed(mut self) -> Self {
        self.title = self.title.map(|t| t.trim().to_owned());
        self.description = self.description.map(|d| d.trim().to_owned());
        self
    }
}

#[derive(Debug, Clone)]
pub struct TicketPage {
    pub tickets: Vec<Ticket>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub num_pages: u64,
}

#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub open_count: u64,
    pub in_progress_count: u64,
    pub resolved_count: u64,
    pub my_tickets: Vec<Ticket>,
}

pub struct TicketService;

impl TicketService {
    fn list_filter(search: Option<&str>, status: Option<TicketStatus>) -> TicketFilter {
        TicketFilter {
            query: search.map(str::to_owned),
            status,
            ..Default::default()
        }
    }

    /// Matching tickets, newest first.
    pub async fn list_tickets(
        db: &DatabaseConnection,
        search: Option<&str>,
        status: Option<TicketStatus>,
    ) -> ServiceResult<Vec<Ticket>> {
        let filter = Self::list_filter(search, status);
        Ok(TicketRepository::find_all(db, &filter).await?)
    }

    /// One page of [`list_tickets`](Self::list_tickets). Pages start at 1; 0 is read as 1.
    pub async fn list_tickets_page(
        db: &DatabaseConnection,
        search: Option<&str>,
        status: Option<TicketStatus>,
        page: u64,
    ) -> ServiceResult<TicketPage> {
        let page = page.max(1);
        let filter = Self::list_filter(search, status);
        let (tickets, total) =
            TicketRepository::filter(db, &filter, page, TICKETS_PER_PAGE).await?;

        Ok(TicketPage {
            tickets,
            page,
            per_page: TICKETS_PER_PAGE,
            total,
            num_pages: total.div_ceil(TICKETS_PER_PAGE).max(1),
        })
    }

    pub async fn dashboard_summary(
        db: &DatabaseConnection,
        user_id: i64,
    ) -> ServiceResult<DashboardSummary> {
        let open_count = Self::count_with_status(db, TicketStatus::Open).await?;
        let in_progress_count = Self::count_with_status(db, TicketStatus::InProgress).await?;
        let resolved_count = Self::count_with_status(db, TicketStatus::Resolved).await?;
        let my_tickets = TicketRepository::find_recent(
            db,
            &TicketFilter::new().with_involving_user(user_id),
            DASHBOARD_TICKET_LIMIT,
        )
        .await?;

        Ok(DashboardSummary {
            open_count,
            in_progress_count,
            resolved_count,
            my_tickets,
        })
    }

    async fn count_with_status(db: &DatabaseConnection, status: TicketStatus) -> ServiceResult<u64> {
        let filter = TicketFilter::new().with_status(status);
        Ok(TicketRepository::count(db, &filter).await?)
    }

    pub async fn get_ticket(db: &DatabaseConnection, id: i64) -> ServiceResult<Ticket> {
        Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("Ticket"))
    }

    /// Creates a ticket owned by `created_by`.
    pub async fn create_ticket(
        db: &DatabaseConnection,
        input: CreateTicket,
        created_by: i64,
    ) -> ServiceResult<Ticket> {
        let input = input.trimmed();

        let mut errors = input.validate().err().unwrap_or_else(ValidationErrors::new);
        let priority = parse_choice::<TicketPriority>(&mut errors, "priority", input.priority.as_deref());
        let status = parse_choice::<TicketStatus>(&mut errors, "status", input.status.as_deref());
        let assigned_to = parse_assignee(db, &mut errors, input.assigned_to.as_deref())
            .await?
            .flatten();
        into_result(errors)?;

        let now = Utc::now();
        let ticket = ActiveModel {
            title: Set(input.title),
            description: Set(input.description),
            priority: Set(priority.unwrap_or_default()),
            status: Set(status.unwrap_or_default()),
            created_by_id: Set(created_by),
            assigned_to_id: Set(assigned_to),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        tracing::info!(ticket_id = ticket.id, user_id = created_by, "Ticket created");
        Ok(ticket)
    }

    /// Applies the supplied fields. Concurrent edits are last-write-wins.
    pub async fn update_ticket(
        db: &DatabaseConnection,
        id: i64,
        input: UpdateTicket,
        acting_user: i64,
    ) -> ServiceResult<Ticket> {
        let ticket = Self::get_ticket(db, id).await?;
        let input = input.trimmed();

        let mut errors = input.validate().err().unwrap_or_else(ValidationErrors::new);
        let priority = parse_choice::<TicketPriority>(&mut errors, "priority", input.priority.as_deref());
        let status = parse_choice::<TicketStatus>(&mut errors, "status", input.status.as_deref());
        let assigned_to = parse_assignee(db, &mut errors, input.assigned_to.as_deref()).await?;
        into_result(errors)?;

        let updated_at = Utc::now().max(ticket.created_at);
        let mut active: ActiveModel = ticket.into();
        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(priority) = priority {
            active.priority = Set(priority);
        }
        if let Some(status) = status {
            active.status = Set(status);
        }
        if let Some(assignee) = assigned_to {
            active.assigned_to_id = Set(assignee);
        }
        active.updated_at = Set(updated_at);

        let ticket = active.update(db).await?;
        tracing::info!(ticket_id = id, user_id = acting_user, status = %ticket.status, "Ticket updated");
        Ok(ticket)
    }

    /// Removes a ticket and its comments in one transaction.
    pub async fn delete_ticket(db: &DatabaseConnection, id: i64) -> ServiceResult<()> {
        let txn = db.begin().await?;

        if Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Err(ServiceError::NotFound("Ticket"));
        }

        let comments = ticket_comments::Entity::delete_many()
            .filter(ticket_comments::Column::TicketId.eq(id))
            .exec(&txn)
            .await?;
        Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(ticket_id = id, comments_removed = comments.rows_affected, "Ticket deleted");
        Ok(())
    }
}

/// Parses a choice token. Blank means "not supplied".
fn parse_choice<T: FromStr>(
    errors: &mut ValidationErrors,
    field: &'static str,
    token: Option<&str>,
) -> Option<T> {
    let token = token.map(str::trim).filter(|t| !t.is_empty())?;
    match T::from_str(token) {
        Ok(value) => Some(value),
        Err(_) => {
            add_field_error(
                errors,
                field,
                "invalid_choice",
                format!("Select a valid choice. {token} is not one of the available choices."),
            );
            None
        }
    }
}

/// `None` when absent, `Some(None)` when blank, otherwise an existing user's id.
/// Anything else is recorded against `assigned_to`.
async fn parse_assignee(
    db: &DatabaseConnection,
    errors: &mut ValidationErrors,
    token: Option<&str>,
) -> ServiceResult<Option<Option<i64>>> {
    let Some(token) = token.map(str::trim) else {
        return Ok(None);
    };
    if token.is_empty() {
        return Ok(Some(None));
    }

    let existing = match token.parse::<i64>() {
        Ok(id) => user::Model::exists(db, id).await?.then_some(id),
        Err(_) => None,
    };
    match existing {
        Some(id) => Ok(Some(Some(id))),
        None => {
            add_field_error(
                errors,
                "assigned_to",
                "invalid_choice",
                "Select a valid choice. That user does not exist.",
            );
            Ok(None)
        }
    }
}
