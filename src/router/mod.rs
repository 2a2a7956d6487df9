//! HTTP handlers, each mapped to one store operation.
pub mod book;
pub mod login;
pub mod signup;
pub mod status;

use axum::extract::{Form, FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::ServerError;

/// `application/x-www-form-urlencoded` body whose rejection is a
/// [`ServerError`].
///
/// Missing fields should be `#[serde(default)]` on `T`: an absent field
/// reads as an empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormBody<T>(pub T);

impl<T, S> FromRequest<S> for FormBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state).await?;
        Ok(FormBody(value))
    }
}

/// Application state over an empty in-memory store.
#[cfg(test)]
pub fn state() -> crate::AppState {
    use std::sync::Arc;

    crate::AppState {
        config: Arc::new(crate::config::Configuration::default()),
        db: crate::database::Database::memory(),
        templates: Arc::new(crate::template::Templates::new(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/templates"
        ))),
        metrics: None,
    }
}

/// Store whose every operation fails with the error built by the given
/// function.
#[cfg(test)]
pub(crate) struct FailingStore(pub fn() -> crate::database::StoreError);

#[cfg(test)]
#[async_trait::async_trait]
impl crate::database::UserRepository for FailingStore {
    async fn insert(&self, _: &crate::user::User) -> crate::database::Result<()> {
        Err((self.0)())
    }

    async fn find_by_credentials(
        &self,
        _: &str,
        _: &str,
    ) -> crate::database::Result<Option<crate::user::User>> {
        Err((self.0)())
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl crate::database::BookRepository for FailingStore {
    async fn insert(
        &self,
        _: &crate::book::Book,
    ) -> crate::database::Result<crate::book::BookId> {
        Err((self.0)())
    }

    async fn list(&self) -> crate::database::Result<Vec<crate::book::Book>> {
        Err((self.0)())
    }

    async fn update(
        &self,
        _: &crate::book::BookId,
        _: &str,
        _: &str,
        _: f64,
    ) -> crate::database::Result<()> {
        Err((self.0)())
    }

    async fn delete(&self, _: &crate::book::BookId) -> crate::database::Result<()> {
        Err((self.0)())
    }
}

/// Application state over a store that always fails.
#[cfg(test)]
pub fn failing_state(error: fn() -> crate::database::StoreError) -> crate::AppState {
    use std::sync::Arc;

    let store = Arc::new(FailingStore(error));
    crate::AppState {
        db: crate::database::Database {
            users: store.clone(),
            books: store,
        },
        ..state()
    }
}

#[cfg(test)]
pub(crate) fn decode_error() -> crate::database::StoreError {
    crate::database::StoreError::Decode("invalid type: integer, expected a string".into())
}

#[cfg(test)]
pub(crate) fn backend_error() -> crate::database::StoreError {
    crate::database::StoreError::Backend(mongodb::error::Error::from(std::io::Error::other(
        "connection reset by peer",
    )))
}

#[cfg(test)]
pub(crate) async fn body_string(response: axum::http::Response<axum::body::Body>) -> String {
    use http_body_util::BodyExt;

    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}
