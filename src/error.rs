use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Draw is not open for registration")]
    DrawNotOpen,

    #[error("Draw has not started yet")]
    DrawNotStarted,

    #[error("Email or phone already registered for this draw")]
    DuplicateRegistrant,

    #[error("No participants")]
    NoParticipants,

    #[error("Draw has no winner yet")]
    NoWinner,

    #[error("Could not allocate a unique lucky number")]
    LuckyNumberExhausted,

    #[error("Mail is not configured")]
    MailNotConfigured,

    #[error("Mail transport failure: {0}")]
    MailTransportFailure(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl AppError {
    /// Machine readable code carried in the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::AuthError(_) | AppError::JwtError(_) => "AUTH_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DrawNotOpen => "DRAW_NOT_OPEN",
            AppError::DrawNotStarted => "DRAW_NOT_STARTED",
            AppError::DuplicateRegistrant => "DUPLICATE_REGISTRANT",
            AppError::NoParticipants => "NO_PARTICIPANTS",
            AppError::NoWinner => "NO_WINNER",
            AppError::LuckyNumberExhausted => "LUCKY_NUMBER_EXHAUSTED",
            AppError::MailNotConfigured => "MAIL_NOT_CONFIGURED",
            AppError::MailTransportFailure(_) => "MAIL_TRANSPORT_FAILURE",
            _ => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) | AppError::JwtError(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) | AppError::NoParticipants => StatusCode::NOT_FOUND,
            AppError::DrawNotOpen
            | AppError::DrawNotStarted
            | AppError::DuplicateRegistrant
            | AppError::NoWinner
            | AppError::LuckyNumberExhausted => StatusCode::CONFLICT,
            AppError::MailNotConfigured => StatusCode::PRECONDITION_FAILED,
            AppError::MailTransportFailure(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let message = match self {
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                "Database error".to_string()
            }
            AppError::JwtError(err) => {
                log::warn!("JWT error: {err}");
                "Invalid access token".to_string()
            }
            AppError::MailTransportFailure(detail) => {
                log::error!("Mail transport failure: {detail}");
                self.to_string()
            }
            AppError::ConfigError(_) | AppError::InternalError(_) | AppError::SerdeJsonError(_) => {
                log::error!("Internal error: {self}");
                "Internal server error".to_string()
            }
            AppError::ValidationError(msg) | AppError::AuthError(msg) => {
                log::warn!("{self}");
                msg.clone()
            }
            _ => {
                log::warn!("{self}");
                self.to_string()
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": self.code(),
                "message": message
            }
        }))
    }
}
