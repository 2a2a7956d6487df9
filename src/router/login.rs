use axum::extract::State;
use axum::response::{Html, Redirect};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::database::StoreError;
use crate::error::{Result, ServerError};
use crate::router::FormBody;
use crate::template::View;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Body {
    pub email: String,
    pub password: String,
}

/// Render login page.
pub async fn page(State(state): State<AppState>) -> Result<Html<String>> {
    Ok(state.templates.render(&View::Login).await?)
}

/// Handle login route.
///
/// Credentials are compared as given, no session is created on success.
pub async fn handler(
    State(state): State<AppState>,
    FormBody(body): FormBody<Body>,
) -> Result<Redirect> {
    match state
        .db
        .users
        .find_by_credentials(&body.email, &body.password)
        .await
    {
        Ok(Some(_)) => Ok(Redirect::to("/book")),
        Ok(None) => Err(ServerError::Unauthorized),
        Err(StoreError::Decode(err)) => {
            tracing::warn!(error = %err, "stored user cannot be decoded");
            Err(ServerError::Unauthorized)
        },
        Err(err) => Err(ServerError::store("Failed to find user")(err)),
    }
}
