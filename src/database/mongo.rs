//! MongoDB backend.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Bson, doc};
use mongodb::error::ErrorKind;
use mongodb::{Client, Collection};

use super::{BOOKS_COLLECTION, BookRepository, Result, StoreError, USERS_COLLECTION, UserRepository};
use crate::book::{Book, BookId};
use crate::user::User;

/// Handles on the `users` and `books` collections of one database.
#[derive(Clone, Debug)]
pub struct MongoStore {
    users: Collection<User>,
    books: Collection<Book>,
}

impl MongoStore {
    /// Connect to MongoDB and ping the database.
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);

        db.run_command(doc! { "ping": 1 }).await?;

        tracing::info!(%database, "mongodb connected");

        Ok(Self {
            users: db.collection(USERS_COLLECTION),
            books: db.collection(BOOKS_COLLECTION),
        })
    }
}

/// Separate malformed documents from backend failures.
fn classify(err: mongodb::error::Error) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::BsonDeserialization(de) => StoreError::Decode(de.to_string()),
        _ => StoreError::Backend(err),
    }
}

#[async_trait]
impl UserRepository for MongoStore {
    async fn insert(&self, user: &User) -> Result<()> {
        self.users.insert_one(user).await.map_err(classify)?;
        Ok(())
    }

    async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>> {
        self.users
            .find_one(doc! { "email": email, "password": password })
            .await
            .map_err(classify)
    }
}

#[async_trait]
impl BookRepository for MongoStore {
    async fn insert(&self, book: &Book) -> Result<BookId> {
        let result = self.books.insert_one(book).await.map_err(classify)?;

        match result.inserted_id {
            Bson::ObjectId(id) => Ok(BookId::from(id)),
            other => Err(StoreError::Decode(format!(
                "inserted book has a non ObjectId `_id`: {other}"
            ))),
        }
    }

    async fn list(&self) -> Result<Vec<Book>> {
        let cursor = self.books.find(doc! {}).await.map_err(classify)?;
        cursor.try_collect().await.map_err(classify)
    }

    async fn update(
        &self,
        id: &BookId,
        name: &str,
        author: &str,
        cost: f64,
    ) -> Result<()> {
        self.books
            .update_one(
                doc! { "_id": id.object_id() },
                doc! { "$set": { "name": name, "author": author, "cost": cost } },
            )
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn delete(&self, id: &BookId) -> Result<()> {
        self.books
            .delete_one(doc! { "_id": id.object_id() })
            .await
            .map_err(classify)?;
        Ok(())
    }
}
