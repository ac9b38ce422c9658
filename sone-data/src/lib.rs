use serde::{Deserialize, Serialize};
use sone_ref::SoneId;

mod album;
mod builder;
pub use album::{Album, AlbumIndex, AlbumTree};
pub use builder::*;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub birth_day: Option<i32>,
    #[serde(default)]
    pub birth_month: Option<i32>,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Profile {
    pub fn is_empty(&self) -> bool {
        *self == Profile::default()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Custom profile field, in the order the owner arranged them.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Field {
    pub name: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Post {
    pub id: String,
    pub sone: String,
    pub time: i64,
    pub text: String,
    #[serde(default)]
    pub recipient: Option<SoneId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostReply {
    pub id: String,
    pub sone: String,
    // not checked against known posts, may belong to any identity
    pub post_id: String,
    pub time: i64,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Image {
    pub id: String,
    pub sone: String,
    pub album: String,
    pub creation_time: i64,
    pub key: String,
    pub title: String,
    pub description: String,
    pub width: i32,
    pub height: i32,
}
