//! Error types surfaced by the client and the services that build them.

use ferrous_container::DiError;
use thiserror::Error;

/// One entry of the error list an API response carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub code: i32,
    pub message: String,
}

/// Errors returned by client operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The API answered with a non-success status.
    #[error("Request to {url} failed with status {status_code} ({description})")]
    Request {
        url: String,
        status_code: u16,
        description: String,
        details: Vec<ErrorDetail>,
    },
    /// Several independent operations failed.
    #[error("{} errors occurred", .0.len())]
    Aggregate(Vec<ApiError>),
    /// A required service could not be resolved.
    #[error(transparent)]
    Container(#[from] DiError),
}

impl ApiError {
    /// The HTTP status, for request failures.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Request { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

/// Builds [`ApiError::Request`] values from a failed response.
#[derive(Debug, Default)]
pub struct ApiErrorFactory;

impl ApiErrorFactory {
    pub fn new() -> Self {
        Self
    }

    /// Creates the error for a response with `status_code` from `url`.
    pub fn create(&self, url: &str, status_code: u16, details: Vec<ErrorDetail>) -> ApiError {
        let description = status_description(status_code);
        tracing::debug!(url, status_code, description, details = details.len(), "api request failed");
        ApiError::Request {
            url: url.to_string(),
            status_code,
            description: description.to_string(),
            details,
        }
    }
}

fn status_description(status_code: u16) -> &'static str {
    match status_code {
        200 => "Success",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        406 => "Not Acceptable",
        410 => "Gone",
        420 => "Enhance Your Calm",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown Error",
    }
}

/// Collapses aggregates that hold a single error into that error.
#[derive(Debug, Default)]
pub struct SingleErrorUnwrapper;

impl SingleErrorUnwrapper {
    pub fn new() -> Self {
        Self
    }

    /// Returns the innermost error of a chain of single-element aggregates.
    pub fn unwrap_single(&self, error: ApiError) -> ApiError {
        match error {
            ApiError::Aggregate(mut errors) if errors.len() == 1 => match errors.pop() {
                Some(inner) => self.unwrap_single(inner),
                None => ApiError::Aggregate(errors),
            },
            other => other,
        }
    }

    /// Turns the failures of a batch into a single result.
    ///
    /// No failure is `Ok`, one failure is returned as-is, several become an
    /// aggregate.
    pub fn into_result(&self, mut errors: Vec<ApiError>) -> Result<(), ApiError> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(self.unwrap_single(errors.remove(0))),
            _ => Err(ApiError::Aggregate(errors)),
        }
    }
}
