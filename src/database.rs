//! Persistence gateway shared by every route.
mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRef;
use thiserror::Error;

use crate::AppState;
use crate::book::{Book, BookId};
use crate::config::Storage;
use crate::user::User;

pub const USERS_COLLECTION: &str = "users";
pub const BOOKS_COLLECTION: &str = "books";

pub type Result<T> = std::result::Result<T, StoreError>;

/// Failure reported by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A stored document does not match the entity shape.
    #[error("document could not be decoded: {0}")]
    Decode(String),

    #[error(transparent)]
    Backend(#[from] mongodb::error::Error),
}

/// Port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user, duplicates included.
    async fn insert(&self, user: &User) -> Result<()>;

    /// Find a user whose email and password both equal the given values.
    async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>>;
}

/// Port for book persistence.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Store a new book and return the identifier the store assigned.
    async fn insert(&self, book: &Book) -> Result<BookId>;

    /// Every book, in store order.
    async fn list(&self) -> Result<Vec<Book>>;

    /// Replace name, author and cost of a book. Unknown ids are ignored.
    async fn update(
        &self,
        id: &BookId,
        name: &str,
        author: &str,
        cost: f64,
    ) -> Result<()>;

    /// Remove a book. Unknown ids are ignored.
    async fn delete(&self, id: &BookId) -> Result<()>;
}

/// Custom db structure to pass to Axum.
#[derive(Clone)]
pub struct Database {
    pub users: Arc<dyn UserRepository>,
    pub books: Arc<dyn BookRepository>,
}

impl Database {
    /// Open the configured store.
    ///
    /// MongoDB connections are checked before returning.
    pub async fn new(storage: &Storage) -> Result<Self> {
        match storage {
            Storage::Mongodb { uri, database } => {
                let store = Arc::new(MongoStore::connect(uri, database).await?);
                Ok(Self::from_store(store))
            },
            Storage::Memory => {
                tracing::warn!("using in-memory storage, data is lost on restart");
                Ok(Self::memory())
            },
        }
    }

    /// Empty process-local store.
    pub fn memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::default()))
    }

    fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository + BookRepository + 'static,
    {
        Self {
            users: store.clone(),
            books: store,
        }
    }
}

impl FromRef<AppState> for Database {
    fn from_ref(app_state: &AppState) -> Database {
        app_state.db.clone()
    }
}
