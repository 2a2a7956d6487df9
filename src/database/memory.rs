//! Process-local backend.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BookRepository, Result, UserRepository};
use crate::book::{Book, BookId};
use crate::user::User;

/// Users and books kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    books: RwLock<Vec<Book>>,
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> Result<()> {
        self.users.write().await.push(user.clone());
        Ok(())
    }

    async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|user| user.email == email && user.password == password)
            .cloned())
    }
}

#[async_trait]
impl BookRepository for MemoryStore {
    async fn insert(&self, book: &Book) -> Result<BookId> {
        let id = BookId::new();
        self.books.write().await.push(Book {
            id: Some(id),
            ..book.clone()
        });
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<Book>> {
        Ok(self.books.read().await.clone())
    }

    async fn update(
        &self,
        id: &BookId,
        name: &str,
        author: &str,
        cost: f64,
    ) -> Result<()> {
        let mut books = self.books.write().await;
        if let Some(book) = books.iter_mut().find(|book| book.id.as_ref() == Some(id)) {
            book.name = name.to_owned();
            book.author = author.to_owned();
            book.cost = cost;
        }
        Ok(())
    }

    async fn delete(&self, id: &BookId) -> Result<()> {
        let mut books = self.books.write().await;
        if let Some(index) = books.iter().position(|book| book.id.as_ref() == Some(id)) {
            books.remove(index);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_users_are_kept() {
        let store = MemoryStore::default();
        let user = User {
            name: "Paul".into(),
            email: "paul@arrakis.dune".into(),
            password: "muaddib".into(),
        };

        UserRepository::insert(&store, &user).await.unwrap();
        UserRepository::insert(&store, &user).await.unwrap();

        assert_eq!(store.users.read().await.len(), 2);
        assert_eq!(
            store
                .find_by_credentials("paul@arrakis.dune", "muaddib")
                .await
                .unwrap(),
            Some(user)
        );
        assert!(
            store
                .find_by_credentials("paul@arrakis.dune", "MUADDIB")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_books_keep_insertion_order() {
        let store = MemoryStore::default();
        let first = BookRepository::insert(
            &store,
            &Book::new("Dune".into(), "Herbert".into(), 9.99),
        )
        .await
        .unwrap();
        let second = BookRepository::insert(
            &store,
            &Book::new("Hyperion".into(), "Simmons".into(), 7.5),
        )
        .await
        .unwrap();

        let ids: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .filter_map(|book| book.id)
            .collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id() {
        let store = MemoryStore::default();
        let id = BookRepository::insert(
            &store,
            &Book::new("Dune".into(), "Herbert".into(), 9.99),
        )
        .await
        .unwrap();
        let before = store.list().await.unwrap();

        let unknown = BookId::new();
        store.update(&unknown, "Other", "Nobody", 1.0).await.unwrap();
        store.delete(&unknown).await.unwrap();
        assert_eq!(store.list().await.unwrap(), before);

        store.update(&id, "Dune Messiah", "Herbert", 10.0).await.unwrap();
        let books = store.list().await.unwrap();
        assert_eq!(books[0].name, "Dune Messiah");
        assert_eq!(books[0].cost, 10.0);
        assert_eq!(books[0].id, Some(id));
    }
}
