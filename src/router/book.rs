//! Book catalog management.

use axum::extract::State;
use axum::response::{Html, Redirect};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::book::{Book, BookId, parse_cost};
use crate::database::StoreError;
use crate::error::{Result, ServerError};
use crate::router::FormBody;
use crate::template::View;

const BOOKS_ROUTE: &str = "/book";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitBody {
    pub name: String,
    pub author: String,
    pub cost: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifyBody {
    pub id: String,
    pub name: String,
    pub author: String,
    pub cost: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteBody {
    pub id: String,
}

/// Render every book.
///
/// A single undecodable document fails the whole page.
pub async fn list(State(state): State<AppState>) -> Result<Html<String>> {
    let books = state.db.books.list().await.map_err(|source| {
        let context = match source {
            StoreError::Decode(_) => "Failed to decode book",
            StoreError::Backend(_) => "Failed to retrieve books",
        };
        ServerError::Store { context, source }
    })?;

    let view = View::Books {
        books: books.into_iter().map(Into::into).collect(),
    };

    Ok(state.templates.render(&view).await?)
}

/// Create a book.
pub async fn submit(
    State(state): State<AppState>,
    FormBody(body): FormBody<SubmitBody>,
) -> Result<Redirect> {
    let cost = parse_cost(&body.cost)?;

    let id = state
        .db
        .books
        .insert(&Book::new(body.name, body.author, cost))
        .await
        .map_err(ServerError::store("Failed to insert book"))?;

    tracing::debug!(book_id = %id, "book created");
    Ok(Redirect::to(BOOKS_ROUTE))
}

/// Replace name, author and cost of a book.
///
/// Unknown identifiers are not reported.
pub async fn modify(
    State(state): State<AppState>,
    FormBody(body): FormBody<ModifyBody>,
) -> Result<Redirect> {
    let id = BookId::parse(&body.id)?;
    let cost = parse_cost(&body.cost)?;

    state
        .db
        .books
        .update(&id, &body.name, &body.author, cost)
        .await
        .map_err(ServerError::store("Failed to update book"))?;

    Ok(Redirect::to(BOOKS_ROUTE))
}

/// Remove a book. Deleting twice is not an error.
pub async fn delete(
    State(state): State<AppState>,
    FormBody(body): FormBody<DeleteBody>,
) -> Result<Redirect> {
    let id = BookId::parse(&body.id)?;

    state
        .db
        .books
        .delete(&id)
        .await
        .map_err(ServerError::store("Failed to delete book"))?;

    Ok(Redirect::to(BOOKS_ROUTE))
}

#[cfg(test)]
pub(super) mod tests {
    use crate::book::{Book, BookId};
    use crate::router::body_string;
    use crate::*;
    use axum::http::{Method, StatusCode, header};

    async fn books(state: &AppState) -> Vec<Book> {
        state.db.books.list().await.unwrap()
    }

    async fn insert(state: &AppState, name: &str) -> BookId {
        state
            .db
            .books
            .insert(&Book::new(name.into(), "Herbert".into(), 9.99))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_submit_then_list() {
        let state = router::state();
        let app = app(state.clone());

        let response = make_request(
            app.clone(),
            Method::POST,
            "/submit",
            "name=Dune&author=Herbert&cost=9.99".into(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/book");

        let response = make_request(app, Method::GET, "/book", String::default()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Dune"));
        assert!(html.contains("Herbert"));
        assert!(html.contains("9.99"));

        let books = books(&state).await;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].cost, 9.99);
    }

    #[tokio::test]
    async fn test_submit_keeps_cost_and_assigns_id() {
        let state = router::state();
        let app = app(state.clone());

        make_request(
            app,
            Method::POST,
            "/submit",
            "name=Emma&author=Austen&cost=12.50".into(),
        )
        .await;

        let books = books(&state).await;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].cost, 12.5);
        assert!(!books[0].id.unwrap().to_string().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_cost() {
        let state = router::state();
        let app = app(state.clone());
        let id = insert(&state, "Dune").await;
        let before = books(&state).await;

        let response = make_request(
            app.clone(),
            Method::POST,
            "/submit",
            "name=Dune&author=Herbert&cost=abc".into(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, "Invalid cost");

        // padded numbers are not trimmed.
        let response = make_request(
            app.clone(),
            Method::POST,
            "/submit",
            "name=Dune&author=Herbert&cost=%209.99%20".into(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = make_request(
            app,
            Method::POST,
            "/modify",
            format!("id={id}&name=Other&author=Nobody&cost=abc"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert_eq!(books(&state).await, before);
    }

    #[tokio::test]
    async fn test_modify_handler() {
        let state = router::state();
        let app = app(state.clone());
        let id = insert(&state, "Dune").await;

        let response = make_request(
            app,
            Method::POST,
            "/modify",
            format!("id={id}&name=Dune+Messiah&author=Frank+Herbert&cost=10.5"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/book");

        let books = books(&state).await;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, Some(id));
        assert_eq!(books[0].name, "Dune Messiah");
        assert_eq!(books[0].author, "Frank Herbert");
        assert_eq!(books[0].cost, 10.5);
    }

    #[tokio::test]
    async fn test_modify_unknown_id() {
        let state = router::state();
        let app = app(state.clone());
        insert(&state, "Dune").await;
        let before = books(&state).await;

        let response = make_request(
            app,
            Method::POST,
            "/modify",
            format!("id={}&name=Other&author=Nobody&cost=1", BookId::new()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(books(&state).await, before);
    }

    #[tokio::test]
    async fn test_modify_validation_order() {
        let app = app(router::state());

        for body in [
            "name=Dune&author=Herbert&cost=abc",
            "id=&name=Dune&author=Herbert&cost=abc",
            "id=zzz&name=Dune&author=Herbert&cost=abc",
        ] {
            let response =
                make_request(app.clone(), Method::POST, "/modify", body.into()).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            // identifier is checked before cost.
            assert_eq!(body_string(response).await, "Invalid book ID");
        }
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let state = router::state();
        let app = app(state.clone());
        let id = insert(&state, "Dune").await;
        insert(&state, "Hyperion").await;

        for _ in 0..2 {
            let response =
                make_request(app.clone(), Method::POST, "/delete", format!("id={id}")).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(response.headers()[header::LOCATION], "/book");
        }

        let books = books(&state).await;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].name, "Hyperion");
    }

    #[tokio::test]
    async fn test_delete_invalid_id() {
        let app = app(router::state());

        for body in ["", "id=", "id=12345"] {
            let response =
                make_request(app.clone(), Method::POST, "/delete", body.into()).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let app = app(router::state());

        for path in ["/submit", "/modify", "/delete"] {
            let response =
                make_request(app.clone(), Method::GET, path, String::default()).await;
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        }

        let response = make_request(app, Method::DELETE, "/login", String::default()).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_list_decode_failure() {
        let app = app(router::failing_state(router::decode_error));

        let response = make_request(app, Method::GET, "/book", String::default()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // no partial page.
        assert_eq!(body_string(response).await, "Failed to decode book");
    }

    #[tokio::test]
    async fn test_store_failures() {
        let app = app(router::failing_state(router::backend_error));
        let id = BookId::new();

        let cases = [
            (Method::GET, "/book", String::default(), "Failed to retrieve books"),
            (
                Method::POST,
                "/submit",
                "name=Dune&author=Herbert&cost=9.99".to_owned(),
                "Failed to insert book",
            ),
            (
                Method::POST,
                "/modify",
                format!("id={id}&name=Dune&author=Herbert&cost=9.99"),
                "Failed to update book",
            ),
            (Method::POST, "/delete", format!("id={id}"), "Failed to delete book"),
        ];

        for (method, path, body, message) in cases {
            let response = make_request(app.clone(), method, path, body).await;
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{path}");
            assert_eq!(body_string(response).await, message);
        }
    }
}
