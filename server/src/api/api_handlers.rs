//! HTTP request handlers for the Folio API
//!
//! Every method and path reaches [`handle_request`]. The handler turns the
//! HTTP request into a core request, runs it on the blocking pool and maps
//! the outcome back to JSON.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use folio_core::{
    core::AppState,
    dispatch, log_debug, log_error,
    router::{Method as CoreMethod, Request as CoreRequest},
    storage::StorageImpl,
    Error,
};

/// Error returned by the HTTP layer
///
/// The single place where core errors become HTTP responses. Server-side
/// failures are logged in full and answered with a generic body.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        ApiError(error)
    }
}

impl ApiError {
    /// Status code for the wrapped error
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::NotFound(_) | Error::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Error::MissingIdentifier { .. } | Error::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Error::Config(_) | Error::Storage(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client
    fn message(&self) -> String {
        match &self.0 {
            Error::RouteNotFound { .. } => "Route not found".to_string(),
            error if error.is_server_error() => "Internal server error".to_string(),
            error => error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_server_error() {
            log_error!("Request failed: {}", self.0);
        } else {
            log_debug!("Request rejected ({}): {}", status, self.0);
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Fallback handler serving every route
pub async fn handle_request<S: StorageImpl>(
    State(app_state): State<AppState<S>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request = CoreRequest {
        method: CoreMethod::parse(method.as_str()),
        path: uri.path().to_string(),
        query: uri.query().unwrap_or_default().to_string(),
        body: body.to_vec(),
    };

    let store = app_state.store.clone();
    let outcome = tokio::task::spawn_blocking(move || dispatch(&store, &request))
        .await
        .map_err(|e| Error::internal(format!("request task failed: {}", e)))??;

    let status = StatusCode::from_u16(outcome.status()).unwrap_or(StatusCode::OK);
    if method == Method::HEAD {
        return Ok((status, Body::empty()).into_response());
    }
    Ok((status, Json(outcome.into_json())).into_response())
}
