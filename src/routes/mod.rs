// Route exports
pub mod discovery;
pub mod profiles;
pub mod rooms;
pub mod swipes;

use actix_web::http::StatusCode;
use actix_web::{error, web, HttpRequest, HttpResponse, Responder};
use std::fmt;
use validator::Validate;

use crate::core::{CoreError, MatchCore};
use crate::models::{ErrorResponse, HealthResponse, IdError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub core: MatchCore,
}

/// Error returned by handlers, rendered as [`ErrorResponse`]
#[derive(Debug)]
pub struct ApiError(pub CoreError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ApiError {}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

impl From<IdError> for ApiError {
    fn from(err: IdError) -> Self {
        Self(err.into())
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            CoreError::Persistence(_) | CoreError::PartialMatchCreation { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.0.code().to_string(),
            message: self.0.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError(CoreError::Validation(format!("Invalid JSON: {}", err))).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError(CoreError::Validation(format!("Invalid query: {}", err))).into()
}

/// Run `validator` checks on a request body
pub(crate) fn validate<T: Validate>(req: &T) -> Result<(), ApiError> {
    req.validate().map_err(|e| ApiError(e.into()))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(swipes::configure)
            .configure(discovery::configure)
            .configure(rooms::configure)
            .configure(profiles::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = match state.core.rooms.ping().await {
        Ok(()) => "healthy",
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            "degraded"
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_quota_maps_to_too_many_requests() {
        let err = ApiError(CoreError::QuotaExceeded { limit: 10 });
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_bad_id_maps_to_bad_request() {
        let err: ApiError = crate::models::UserId::parse("x").unwrap_err().into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
