use crate::models::tickets::TicketStatus;

/// Criteria for narrowing the ticket list. Every set field must match.
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    /// Substring of title or description, ignoring ASCII case.
    pub query: Option<String>,
    pub status: Option<TicketStatus>,
    /// Tickets the user created or is assigned to.
    pub involving_user: Option<i64>,
}

impl TicketFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_involving_user(mut self, user_id: i64) -> Self {
        self.involving_user = Some(user_id);
        self
    }

    /// The search text with surrounding whitespace removed, if any remains.
    pub fn search_text(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}
