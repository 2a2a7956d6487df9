use axum::extract::State;
use axum::response::{Html, Redirect};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::{Result, ServerError};
use crate::router::FormBody;
use crate::template::View;
use crate::user::User;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Body {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Render signup page.
pub async fn page(State(state): State<AppState>) -> Result<Html<String>> {
    Ok(state.templates.render(&View::Signup).await?)
}

/// Handler to create user.
pub async fn handler(
    State(state): State<AppState>,
    FormBody(body): FormBody<Body>,
) -> Result<Redirect> {
    let user = User {
        name: body.name,
        email: body.email,
        password: body.password,
    };

    state
        .db
        .users
        .insert(&user)
        .await
        .map_err(ServerError::store("Error creating user"))?;

    Ok(Redirect::to("/login"))
}
