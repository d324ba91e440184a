//! JSON replies and the error to status mapping

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::CONTENT_TYPE;
use hyper::{Response, StatusCode};
use rentbook::{ErrorKind, LedgerError};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Every handler answers with a fully buffered body
pub type Reply = Response<Full<Bytes>>;

/// Errors a request can end in
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request fields
    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Route not found")]
    NotFound,

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl From<rentbook_core::Error> for ApiError {
    fn from(err: rentbook_core::Error) -> Self {
        ApiError::Ledger(err.into())
    }
}

impl ApiError {
    pub fn bad_request<S: Into<String>>(msg: S) -> Self {
        ApiError::BadRequest(msg.into())
    }

    /// Status code for the error
    ///
    /// A missing record is reported like any other failed lookup (500), not
    /// as a 404; 404 is reserved for unknown routes.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Ledger(err) => match err.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound | ErrorKind::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

/// Serialize `body` as the reply
pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Reply {
    let bytes = serde_json::to_vec(body)
        .unwrap_or_else(|_| br#"{"message":"failed to encode response"}"#.to_vec());
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(bytes)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from_static(b"bad response"))))
}

/// `200 {"message": ..., "data": ...}`
pub fn success<T: Serialize>(message: &str, data: T) -> Reply {
    json(StatusCode::OK, &json!({ "message": message, "data": data }))
}

/// `{"message": ...}` with the error's status
pub fn failure(err: &ApiError) -> Reply {
    json(err.status(), &json!({ "message": err.to_string() }))
}

/// A reply with no body
pub fn empty(status: StatusCode) -> Reply {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentbook_grid::GridError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::bad_request("x"), 400),
            (ApiError::Unauthorized, 401),
            (ApiError::NotFound, 404),
            (LedgerError::validation("x").into(), 400),
            (rentbook_core::Error::NotFound("01/2024".into()).into(), 500),
            (rentbook_core::Error::InvalidPage("page".into()).into(), 400),
            (
                ApiError::Ledger(GridError::SheetNotFound("Nope!A1".into()).into()),
                500,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status().as_u16(), status, "{err}");
        }
    }

    #[test]
    fn test_upstream_message_is_passed_through() {
        let err = ApiError::Ledger(
            GridError::Api {
                status: 403,
                message: "The caller does not have permission".into(),
            }
            .into(),
        );
        assert_eq!(err.to_string(), "The caller does not have permission");
    }
}
