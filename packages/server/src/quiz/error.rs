use common::ProgressError;
use common::identity::IdentityError;
use common::progress::ParseAnswerError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("'{name}' is already playing in group '{group}'")]
    AlreadyRegistered { name: String, group: String },

    #[error(transparent)]
    InvalidAnswerFormat(#[from] ParseAnswerError),

    #[error(transparent)]
    StateMismatch(#[from] ProgressError),

    #[error("{0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] DbErr),
}

impl From<IdentityError> for QuizError {
    fn from(err: IdentityError) -> Self {
        QuizError::Validation(format!("Invalid contestant id: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, QuizError>;
