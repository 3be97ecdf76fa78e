//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into `{"error": "<message>"}` responses
//! with a matching status code.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode};
use crate::middleware::{TRACE_ID_HEADER, TraceId};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Wire shape of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Human-readable failure description.
    #[schema(example = "User not found")]
    pub error: String,
}

impl From<&Error> for ErrorBody {
    fn from(value: &Error) -> Self {
        Self {
            error: value.message().to_owned(),
        }
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let trace_id = TraceId::current();
        if matches!(self.code(), ErrorCode::InternalError) {
            match trace_id {
                Some(id) => error!(trace_id = %id, error = self.message(), "store failure"),
                None => error!(error = self.message(), "store failure"),
            }
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = trace_id {
            builder.insert_header((TRACE_ID_HEADER, id.to_string()));
        }
        builder.json(ErrorBody::from(self))
    }
}

/// Report undecodable JSON bodies through the standard error envelope.
///
/// Register with `web::JsonConfig::default().error_handler(json_error_handler)`.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!(path = req.path(), error = %err, "rejected request body");
    Error::invalid_request(err.to_string()).into()
}
