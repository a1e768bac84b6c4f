//! The todo entity and its request shape.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Todo {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Request body for create and update. Missing and `null` fields decode to their zero values;
/// `id` is ignored on create and must be 0 or equal to the path id on update.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TodoInput {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
