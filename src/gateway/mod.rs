//! Uniform CRUD access for any entity kind.
//!
//! The gateway holds no state of its own. Each call receives the store handle
//! it should use, the authenticated [`Caller`], and whatever the operation
//! needs (page window, id, payload). Record shape and validation rules come
//! from the [`Entity`] implementation of the kind being served.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::marker::PhantomData;
use thiserror::Error;
use tracing::{debug, info};
use validator::{Validate, ValidationErrors};

use crate::auth::Caller;
use crate::config::ApiConfig;
use crate::database::{DatabaseError, Fields, Store};

/// An entity kind served by the gateway.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Payload accepted on create; required fields are `Option` + `#[validate(required)]`
    type Create: DeserializeOwned + Validate + Send;
    /// Payload accepted on update; every field optional
    type Update: DeserializeOwned + Validate + Send;
    /// Row written on create, before the store assigns an id
    type New: Serialize + Send;

    /// Human name used in messages, e.g. "Item"
    const NAME: &'static str;
    const TABLE: &'static str;
    /// Columns an update may overwrite. Anything else in the payload is ignored.
    const UPDATABLE: &'static [&'static str];
    /// Columns that may not be set to null
    const REQUIRED: &'static [&'static str];

    fn prepare(payload: Self::Create, caller: &Caller, now: DateTime<Utc>) -> Self::New;

    /// Stamp mutation metadata onto an update.
    fn touch(_fields: &mut Fields, _now: DateTime<Utc>) {}
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{kind} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("Request validation failed")]
    Validation(HashMap<String, String>),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Pagination window for list calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}

impl Page {
    /// Apply configured defaults and clamp to the allowed range.
    pub fn resolve(skip: Option<i64>, limit: Option<i64>, api: &ApiConfig) -> Self {
        Self {
            skip: skip.unwrap_or(0).max(0),
            limit: limit.unwrap_or(api.default_limit).clamp(0, api.max_limit),
        }
    }
}

/// Body returned by a successful delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    pub message: String,
}

pub struct Gateway<E> {
    _entity: PhantomData<E>,
}

impl<E: Entity> Gateway<E> {
    pub async fn list(store: &dyn Store, page: Page, caller: &Caller) -> Result<Vec<E>, GatewayError> {
        debug!(kind = E::NAME, skip = page.skip, limit = page.limit, caller = caller.id, "list");

        store
            .find_all(E::TABLE, page.skip, page.limit)
            .await?
            .into_iter()
            .map(decode_row::<E>)
            .collect()
    }

    pub async fn get(store: &dyn Store, id: i64, caller: &Caller) -> Result<E, GatewayError> {
        debug!(kind = E::NAME, id, caller = caller.id, "get");

        match store.find_by_id(E::TABLE, id).await? {
            Some(row) => decode_row(row),
            None => Err(not_found::<E>(id)),
        }
    }

    pub async fn create(store: &dyn Store, payload: Fields, caller: &Caller) -> Result<E, GatewayError> {
        let create: E::Create = decode_payload(payload)?;
        create.validate().map_err(validation_failed)?;

        let new = E::prepare(create, caller, Utc::now());
        let row = store.insert(E::TABLE, encode_row(&new)?).await?;
        let record = decode_row::<E>(row)?;

        info!(kind = E::NAME, caller = caller.id, "created record");
        Ok(record)
    }

    /// Merge the fields present in `payload` into record `id`.
    pub async fn update(
        store: &dyn Store,
        id: i64,
        payload: Fields,
        caller: &Caller,
    ) -> Result<E, GatewayError> {
        let update: E::Update = decode_payload(payload.clone())?;
        update.validate().map_err(validation_failed)?;
        reject_required_nulls::<E>(&payload)?;

        let mut fields: Fields = payload
            .into_iter()
            .filter(|(column, _)| E::UPDATABLE.contains(&column.as_str()))
            .collect();
        if !fields.is_empty() {
            E::touch(&mut fields, Utc::now());
        }

        let row = store
            .update_fields(E::TABLE, id, fields)
            .await?
            .ok_or_else(|| not_found::<E>(id))?;

        info!(kind = E::NAME, id, caller = caller.id, "updated record");
        decode_row(row)
    }

    pub async fn delete(store: &dyn Store, id: i64, caller: &Caller) -> Result<DeleteAck, GatewayError> {
        if !store.delete(E::TABLE, id).await? {
            return Err(not_found::<E>(id));
        }

        info!(kind = E::NAME, id, caller = caller.id, "deleted record");
        Ok(DeleteAck {
            message: format!("{} deleted successfully", E::NAME),
        })
    }
}

fn not_found<E: Entity>(id: i64) -> GatewayError {
    GatewayError::NotFound { kind: E::NAME, id }
}

/// Decode a request payload, reporting type mismatches under the offending field.
fn decode_payload<T: DeserializeOwned>(payload: Fields) -> Result<T, GatewayError> {
    serde_path_to_error::deserialize(Value::Object(payload)).map_err(|e| {
        let field = match e.path().to_string() {
            path if path == "." => "body".to_string(),
            path => path,
        };
        let mut field_errors = HashMap::new();
        field_errors.insert(field, e.into_inner().to_string());
        GatewayError::Validation(field_errors)
    })
}

fn decode_row<E: Entity>(row: Fields) -> Result<E, GatewayError> {
    serde_json::from_value(Value::Object(row)).map_err(|e| {
        DatabaseError::Query(format!("undecodable {} row: {}", E::NAME, e)).into()
    })
}

fn encode_row<T: Serialize>(new: &T) -> Result<Fields, GatewayError> {
    match serde_json::to_value(new) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(DatabaseError::Query(format!("row must be an object, got {other}")).into()),
        Err(e) => Err(DatabaseError::Query(e.to_string()).into()),
    }
}

fn reject_required_nulls<E: Entity>(payload: &Fields) -> Result<(), GatewayError> {
    let field_errors: HashMap<String, String> = E::REQUIRED
        .iter()
        .filter(|column| matches!(payload.get(**column), Some(Value::Null)))
        .map(|column| (column.to_string(), "field may not be null".to_string()))
        .collect();

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(GatewayError::Validation(field_errors))
    }
}

fn validation_failed(errors: ValidationErrors) -> GatewayError {
    let field_errors = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let message = errs
                .first()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => e.code.to_string(),
                })
                .unwrap_or_default();
            (field.to_string(), message)
        })
        .collect();
    GatewayError::Validation(field_errors)
}
