//! Book entity and the values parsed from book forms.

use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServerError};

/// Book as saved on database.
///
/// Missing fields decode to their zero value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    /// Assigned by the store on insert, never changed afterwards.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<BookId>,
    pub name: String,
    pub author: String,
    pub cost: f64,
}

impl Book {
    /// Create a book not yet saved on database.
    pub fn new(name: String, author: String, cost: f64) -> Self {
        Self {
            id: None,
            name,
            author,
            cost,
        }
    }
}

/// Value object of a store-assigned book identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(ObjectId);

impl BookId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Converts a form value into a valid [`BookId`].
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidBookId`] if the value is empty or is not
    /// a 24 characters hexadecimal string.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(ServerError::InvalidBookId);
        }

        raw.parse()
    }

    #[inline]
    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for BookId {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| ServerError::InvalidBookId)
    }
}

impl From<ObjectId> for BookId {
    fn from(id: ObjectId) -> Self {
        Self(id)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

/// Parse the `cost` form field.
///
/// A cost is a finite, non-negative decimal number, given without padding.
pub fn parse_cost(raw: &str) -> Result<f64> {
    match raw.parse::<f64>() {
        Ok(cost) if cost.is_finite() && cost >= 0.0 => Ok(cost),
        _ => Err(ServerError::InvalidCost),
    }
}
