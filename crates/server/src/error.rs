use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use klife_api::{OkResponse, ServiceError};

/// Unified API error type.
///
/// Produces the same `{"ok": false, "message": "<message>"}` body the local
/// JSON endpoints use for every failure.
pub struct ApiErr {
    status: StatusCode,
    message: String,
}

impl From<ServiceError> for ApiErr {
    fn from(e: ServiceError) -> Self {
        Self {
            status: StatusCode::from_u16(e.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message: e.message().to_string(),
        }
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        (self.status, Json(OkResponse::failed(self.message))).into_response()
    }
}
