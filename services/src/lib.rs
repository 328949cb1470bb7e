pub mod comment_service;
pub mod error;
pub mod ticket_service;
pub mod user_service;

pub use error::{ServiceError, ServiceResult};
