use sea_orm::DbErr;
use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures surfaced by the query and mutation layers.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Field-level problems with submitted input.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ServiceError {
    /// A validation failure on a single field.
    pub fn field(field: &'static str, code: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        let mut errors = ValidationErrors::new();
        add_field_error(&mut errors, field, code, message);
        ServiceError::Validation(errors)
    }
}

pub(crate) fn add_field_error(
    errors: &mut ValidationErrors,
    field: &'static str,
    code: &'static str,
    message: impl Into<Cow<'static, str>>,
) {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    errors.add(field, error);
}

/// `Ok(())` when nothing was collected, otherwise the collected errors.
pub(crate) fn into_result(errors: ValidationErrors) -> ServiceResult<()> {
    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Validation(errors))
    }
}
