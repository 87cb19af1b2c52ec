//! Handler-facing request errors and their status-code mapping (§7).

use thiserror::Error;

/// Implemented by any error a `Handler` wants mapped to a specific HTTP-style
/// status code. Anything else escaping a handler is logged and mapped to 500
/// with an empty response body by `WorkerLoop` (§7, "any other exception").
pub trait RequestError: std::error::Error + Send + Sync + 'static {
    fn status_code(&self) -> u16;
}

/// The concrete error kinds §7 names, available to handlers that don't need
/// their own error type.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    #[error("request data is incomplete")]
    DataNotComplete,

    #[error("request data is not correct")]
    DataNotCorrect,

    #[error("request data has the wrong type")]
    DataTypeNotCorrect,

    #[error("object does not exist")]
    ObjectDoesNotExist,

    #[error("wrong endpoint for this handler")]
    WrongEndpoint,

    #[error("wrong method for this endpoint")]
    WrongMethod,

    #[error("endpoint does not exist")]
    EndpointDoesNotExist,
}

impl RequestError for HandlerError {
    fn status_code(&self) -> u16 {
        match self {
            HandlerError::MissingParameter(_)
            | HandlerError::DataNotComplete
            | HandlerError::DataNotCorrect
            | HandlerError::DataTypeNotCorrect => 400,
            HandlerError::ObjectDoesNotExist => 404,
            HandlerError::WrongEndpoint | HandlerError::WrongMethod | HandlerError::EndpointDoesNotExist => 500,
        }
    }
}
