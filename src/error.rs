//! Error handler for bookshelf.

use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::database::StoreError;

pub type Result<T> = std::result::Result<T, ServerError>;

const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Enum representing server-side errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    ParsingForm(#[from] FormRejection),

    #[error("Invalid cost")]
    InvalidCost,

    #[error("Invalid book ID")]
    InvalidBookId,

    #[error("Invalid email or password")]
    Unauthorized,

    #[error("{context}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("template rendering failed: {0}")]
    Template(#[from] crate::template::TemplateError),
}

impl ServerError {
    /// Wrap a [`StoreError`] with the message shown to the client.
    ///
    /// Meant for `map_err`: `.map_err(ServerError::store("Failed to insert book"))`.
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| ServerError::Store { context, source }
    }

    /// HTTP status code sent back for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::ParsingForm(_)
            | ServerError::InvalidCost
            | ServerError::InvalidBookId => StatusCode::BAD_REQUEST,
            ServerError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServerError::Store { .. } | ServerError::Template(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            ServerError::ParsingForm(err) => err.body_text(),
            ServerError::Store { context, source } => {
                tracing::error!(error = %source, %context, "server returned 500 status");
                (*context).to_owned()
            },
            ServerError::Template(err) => {
                tracing::error!(error = %err, "server returned 500 status");
                INTERNAL_SERVER_ERROR.to_owned()
            },
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}
