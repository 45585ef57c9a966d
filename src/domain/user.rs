//! Users own portfolio entries; `created_on` is stamped by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "userID")]
    pub user_id: i64,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "createdOn")]
    pub created_on: DateTime<Utc>,
    #[serde(rename = "idcsID")]
    pub idcs_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewUser {
    #[serde(rename = "displayName", alias = "displayname")]
    pub display_name: String,
    #[serde(rename = "idcsID", alias = "idcsid")]
    pub idcs_id: String,
}

impl NewUser {
    pub fn into_user(self, user_id: i64, created_on: DateTime<Utc>) -> User {
        User {
            user_id,
            display_name: self.display_name,
            created_on,
            idcs_id: self.idcs_id,
        }
    }
}
