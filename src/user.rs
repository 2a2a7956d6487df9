use serde::{Deserialize, Serialize};

/// User as saved on database.
///
/// The store assigns the document identifier itself, nothing here reads it.
/// Missing fields decode as empty strings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub name: String,
    pub email: String,
    pub password: String,
}
