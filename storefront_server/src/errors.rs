use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use storefront_engine::{checkout::CheckoutRequestError, helpers::SignatureError, FulfillmentError, SellerApiError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("Webhook signature is invalid. {0}")]
    InvalidSignature(#[from] SignatureError),
    /// A checkout notification that can never be processed. The gateway must not redeliver it.
    #[error("The checkout notification was rejected. {0}")]
    RejectedNotification(String),
    /// A checkout notification that could not be processed right now. The gateway should redeliver it later.
    #[error("The checkout notification could not be processed. {0}")]
    RetryableNotification(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::RejectedNotification(_) => StatusCode::BAD_REQUEST,
            Self::InvalidSignature(_) => StatusCode::BAD_REQUEST,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::RetryableNotification(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<FulfillmentError> for ServerError {
    fn from(e: FulfillmentError) -> Self {
        if e.is_retryable() {
            Self::RetryableNotification(e.to_string())
        } else {
            Self::RejectedNotification(e.to_string())
        }
    }
}

impl From<SellerApiError> for ServerError {
    fn from(e: SellerApiError) -> Self {
        match e {
            SellerApiError::OrderNotFound(_) => Self::NoRecordFound(e.to_string()),
            SellerApiError::StatusUnchanged { .. } => Self::InvalidRequestBody(e.to_string()),
            SellerApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<CheckoutRequestError> for ServerError {
    fn from(e: CheckoutRequestError) -> Self {
        Self::InvalidRequestBody(e.to_string())
    }
}
