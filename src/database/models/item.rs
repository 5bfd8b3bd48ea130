use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::Caller;
use crate::gateway::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ItemCreate {
    #[validate(required(message = "field required"))]
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ItemUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NewItem {
    pub title: String,
    pub description: Option<String>,
    pub owner_id: i64,
}

impl Entity for Item {
    type Create = ItemCreate;
    type Update = ItemUpdate;
    type New = NewItem;

    const NAME: &'static str = "Item";
    const TABLE: &'static str = "items";
    const UPDATABLE: &'static [&'static str] = &["title", "description"];
    const REQUIRED: &'static [&'static str] = &["title"];

    fn prepare(payload: ItemCreate, caller: &Caller, _now: DateTime<Utc>) -> NewItem {
        NewItem {
            title: payload.title.unwrap_or_default(),
            description: payload.description,
            owner_id: caller.id,
        }
    }
}
