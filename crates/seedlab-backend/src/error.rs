use seedlab_bridge::notification::ToastKind;

use crate::validation::ValidationError;

/// Shown when the server did not explain what went wrong.
pub const GENERIC_ERROR_MESSAGE: &str = "Ocurrió un error inesperado. Intente nuevamente.";

/// Failures of a request to the laboratory API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connection, timeout).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// The client has no endpoint for the requested resource.
    #[error("unsupported resource: {0}")]
    Unsupported(String),
    #[error("resource not found")]
    NotFound,
    /// The token is missing, expired or lacks the required role.
    #[error("unauthorized: {message:?}")]
    Unauthorized { message: Option<String> },
    /// Any other non-success status. `message` is the explanation found in
    /// the response body, if any.
    #[error("server answered {status}: {message:?}")]
    Status { status: u16, message: Option<String> },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    /// Text for a toast: the server-provided message when there is one, a
    /// generic description otherwise.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            }
            | ApiError::Unauthorized {
                message: Some(message),
            } => message.clone(),
            ApiError::Unauthorized { message: None } => {
                "La sesión expiró o no tiene permisos para esta acción.".to_owned()
            }
            ApiError::NotFound => "El recurso solicitado no existe.".to_owned(),
            ApiError::Transport(e) if e.is_timeout() || e.is_connect() => {
                "No se pudo conectar con el servidor.".to_owned()
            }
            _ => GENERIC_ERROR_MESSAGE.to_owned(),
        }
    }
}

/// Turns a 404 on a sub-resource that may legitimately not exist yet into an
/// empty result.
pub trait OrEmpty<T> {
    fn or_empty(self) -> Result<Vec<T>, ApiError>;
}

impl<T> OrEmpty<T> for Result<Vec<T>, ApiError> {
    fn or_empty(self) -> Result<Vec<T>, ApiError> {
        match self {
            Err(ApiError::NotFound) => Ok(Vec::new()),
            other => other,
        }
    }
}

/// Anything a service handler may fail with before it reports to the user.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The server refused a precondition check; the text explains why.
    #[error("{0}")]
    Rejected(String),
}

impl ServiceError {
    pub fn toast_kind(&self) -> ToastKind {
        match self {
            ServiceError::Api(_) => ToastKind::Error,
            ServiceError::Validation(_) | ServiceError::Rejected(_) => ToastKind::Warning,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Api(e) => e.user_message(),
            ServiceError::Validation(e) => e.to_string(),
            ServiceError::Rejected(reason) => reason.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn server_message_wins_over_generic_text() {
        let error = ApiError::Status {
            status: 409,
            message: Some("La ficha ya existe".to_owned()),
        };
        assert_eq!(error.user_message(), "La ficha ya existe");

        let error = ApiError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(error.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn not_found_becomes_empty() {
        let result: Result<Vec<i64>, ApiError> = Err(ApiError::NotFound);
        assert_eq!(result.or_empty().unwrap(), Vec::<i64>::new());

        let result: Result<Vec<i64>, ApiError> = Err(ApiError::Status {
            status: 500,
            message: None,
        });
        assert!(result.or_empty().is_err());
    }
}
