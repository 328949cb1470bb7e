pub mod m202601150001_create_users;
pub mod m202601150002_create_tickets;
pub mod m202601150003_create_ticket_comments;
