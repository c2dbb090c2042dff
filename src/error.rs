use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::pins::PinError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Authorization required")]
    Unauthorized(String),
    #[error("{0} Not Found")]
    NotFound(String),
    #[error("Not Found")]
    PathNotFound,
    #[error("Bad Value")]
    BadValue,
    #[error("Bad Function")]
    BadFunction,
    #[error("Bad Pin")]
    BadPin,
    #[error("Not Authorized")]
    Forbidden,
    #[error("{0}")]
    Denied(String),
    #[error(transparent)]
    Hardware(#[from] PinError),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            GatewayError::NotFound(_) | GatewayError::PathNotFound => StatusCode::NOT_FOUND,
            GatewayError::BadValue | GatewayError::BadFunction | GatewayError::BadPin => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::Forbidden | GatewayError::Denied(_) => StatusCode::FORBIDDEN,
            GatewayError::Hardware(_) | GatewayError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            // Challenge carries no body, only the realm header.
            GatewayError::Unauthorized(realm) => HttpResponse::Unauthorized()
                .insert_header((
                    header::WWW_AUTHENTICATE,
                    format!("Basic realm=\"{realm}\""),
                ))
                .finish(),
            _ => HttpResponse::build(self.status_code())
                .content_type(ContentType::plaintext())
                .body(self.to_string()),
        }
    }
}
