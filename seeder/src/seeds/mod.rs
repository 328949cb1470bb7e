pub mod comments;
pub mod tickets;
pub mod user;
