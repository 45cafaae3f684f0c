use axum::response::IntoResponse;

pub mod http;

/// Request-boundary error. Everything a handler can fail with maps onto
/// one of these, and from there onto a status code and a JSON body.
pub enum ServiceError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Unavailable(String),
    Internal(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ServiceError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ServiceError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ServiceError::Unavailable(msg) => write!(f, "Upstream unavailable: {}", msg),
            ServiceError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl From<breevs_server_domain::ServiceError> for ServiceError {
    fn from(err: breevs_server_domain::ServiceError) -> Self {
        use breevs_server_domain::ServiceError as Domain;
        match err {
            Domain::NotFound(msg) => ServiceError::NotFound(msg),
            Domain::BadRequest(msg) => ServiceError::BadRequest(msg),
            Domain::Conflict(msg) => ServiceError::Conflict(msg),
            Domain::Unavailable(msg) => ServiceError::Unavailable(msg),
            Domain::Internal(msg) => {
                log::error!("Internal error: {}", msg);
                ServiceError::Internal(msg)
            }
        }
    }
}

impl From<breevs_server_domain::RepoError> for ServiceError {
    fn from(err: breevs_server_domain::RepoError) -> Self {
        breevs_server_domain::ServiceError::from(err).into()
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::http::Response<axum::body::Body> {
        let (status, msg) = match self {
            ServiceError::NotFound(msg) => (axum::http::StatusCode::NOT_FOUND, msg),
            ServiceError::BadRequest(msg) => (axum::http::StatusCode::BAD_REQUEST, msg),
            ServiceError::Conflict(msg) => (axum::http::StatusCode::CONFLICT, msg),
            ServiceError::Unavailable(msg) => (axum::http::StatusCode::BAD_GATEWAY, msg),
            ServiceError::Internal(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = serde_json::json!({ "error": msg });
        (status, axum::Json(body)).into_response()
    }
}
