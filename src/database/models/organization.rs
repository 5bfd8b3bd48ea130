use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::auth::Caller;
use crate::database::Fields;
use crate::gateway::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OrganizationCreate {
    #[validate(required(message = "field required"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    #[validate(email(message = "value is not a valid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OrganizationUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    #[validate(email(message = "value is not a valid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NewOrganization {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Organization {
    type Create = OrganizationCreate;
    type Update = OrganizationUpdate;
    type New = NewOrganization;

    const NAME: &'static str = "Organization";
    const TABLE: &'static str = "organizations";
    const UPDATABLE: &'static [&'static str] =
        &["name", "description", "website", "email", "phone", "address"];
    const REQUIRED: &'static [&'static str] = &["name"];

    fn prepare(payload: OrganizationCreate, _caller: &Caller, now: DateTime<Utc>) -> NewOrganization {
        NewOrganization {
            name: payload.name.unwrap_or_default(),
            description: payload.description,
            website: payload.website,
            email: payload.email,
            phone: payload.phone,
            address: payload.address,
            is_active: true,
            created_at: now,
            updated_at: None,
        }
    }

    fn touch(fields: &mut Fields, now: DateTime<Utc>) {
        fields.insert("updated_at".to_string(), Value::String(now.to_rfc3339()));
    }
}
