//! HTML views rendered with minijinja.
//!
//! Templates are read from disk on every render so edits show up without a
//! restart.

use std::path::PathBuf;

use axum::response::Html;
use minijinja::{Environment, context};
use serde::Serialize;
use thiserror::Error;

use crate::book::Book;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("cannot read template `{name}`: {source}")]
    Read {
        name: &'static str,
        source: std::io::Error,
    },

    #[error(transparent)]
    Render(#[from] minijinja::Error),
}

/// Every page the application can render.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Login,
    Signup,
    Books { books: Vec<BookRow> },
}

/// Book as shown on `book.html`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookRow {
    pub id: String,
    pub name: String,
    pub author: String,
    pub cost: f64,
}

impl From<Book> for BookRow {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.map(|id| id.to_string()).unwrap_or_default(),
            name: book.name,
            author: book.author,
            cost: book.cost,
        }
    }
}

impl View {
    /// Template file name inside the templates directory.
    pub fn template(&self) -> &'static str {
        match self {
            View::Login => "login.html",
            View::Signup => "signup.html",
            View::Books { .. } => "book.html",
        }
    }

    fn context(&self) -> minijinja::Value {
        match self {
            View::Login | View::Signup => context! {},
            View::Books { books } => context! { books },
        }
    }
}

/// Loads templates from a directory.
#[derive(Debug, Clone)]
pub struct Templates {
    dir: PathBuf,
}

impl Templates {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Read the template of `view` and render it.
    pub async fn render(&self, view: &View) -> Result<Html<String>, TemplateError> {
        let name = view.template();
        let source = tokio::fs::read_to_string(self.dir.join(name))
            .await
            .map_err(|source| TemplateError::Read { name, source })?;

        let mut env = Environment::new();
        env.add_template(name, &source)?;
        let html = env.get_template(name)?.render(view.context())?;

        Ok(Html(html))
    }
}
