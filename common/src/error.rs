use actix_web::HttpResponse;
use thiserror::Error;

pub type Res<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    // === CONVERSION ERRORS ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JWT error: {0}")]
    JWT(#[from] jsonwebtoken::errors::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    // === APPLICATION ERRORS ===
    #[error("Authorization error: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Resource conflict: {0}")]
    Conflict(String),

    #[error("Too Many Requests: {0}")]
    TooManyRequests(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Failures the caller cannot act on. Their detail is logged and only
    /// shown to clients in debug builds.
    fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::Database(_) | AppError::JWT(_) | AppError::Reqwest(_) | AppError::Internal(_)
        )
    }

    pub fn to_http_response(&self) -> HttpResponse {
        use actix_web::ResponseError;

        let body = if self.is_internal() {
            log::error!("{}", self);
            if cfg!(debug_assertions) {
                serde_json::json!({ "error": self.to_string() })
            } else {
                serde_json::json!({ "error": "Internal server error" })
            }
        } else {
            serde_json::json!({ "error": self.to_string() })
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        self.to_http_response()
    }

    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
